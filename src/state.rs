use crate::config::AppConfig;
use crate::db::Database;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = Database::connect(&config).await?;
        Ok(Self::from_parts(db, Arc::new(config)))
    }

    pub fn from_parts(db: Database, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    /// State backed by a lazy pool; usable by routes that never reach the
    /// database.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::DEFAULT_DATABASE_URL;

        let db = Database::connect_lazy(DEFAULT_DATABASE_URL).expect("lazy pool ok");
        let config = Arc::new(AppConfig {
            database_url: DEFAULT_DATABASE_URL.into(),
            max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
        });
        Self::from_parts(db, config)
    }
}
