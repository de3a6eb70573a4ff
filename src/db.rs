use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgConnection, PgPool, Postgres, Transaction};
use tracing::{debug, info};

use crate::config::AppConfig;

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id            UUID PRIMARY KEY,
        first_name    VARCHAR(50)  NOT NULL,
        last_name     VARCHAR(50)  NOT NULL,
        email         VARCHAR(120) NOT NULL UNIQUE,
        username      VARCHAR(50)  NOT NULL UNIQUE,
        password_hash VARCHAR(255),
        created_at    TIMESTAMPTZ  NOT NULL DEFAULT now()
    )
"#;

const DROP_USERS_TABLE: &str = "DROP TABLE IF EXISTS users";

/// Process-wide persistence handle. Built once at startup and passed down
/// through `AppState`; cloning only clones the pool handle.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        info!(max_connections = config.max_connections, "database pool ready");
        Ok(Self { pool })
    }

    /// Pool that only opens connections on first use.
    pub fn connect_lazy(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .connect_lazy(database_url)
            .context("build lazy pool")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Opens a scoped session for one unit of work.
    ///
    /// Nothing is persisted unless [`Session::commit`] is called. Dropping the
    /// session on any other path (early return, `?`, panic) rolls the
    /// transaction back and hands the connection back to the pool.
    pub async fn session(&self) -> Result<Session, sqlx::Error> {
        let tx = self.pool.begin().await?;
        debug!("session opened");
        Ok(Session { tx })
    }

    /// Creates the `users` table if it is missing.
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_USERS_TABLE).execute(&self.pool).await?;
        info!("schema initialized");
        Ok(())
    }

    pub async fn drop_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(DROP_USERS_TABLE).execute(&self.pool).await?;
        info!("schema dropped");
        Ok(())
    }

    pub async fn ping(&self) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
    }
}

pub struct Session {
    tx: Transaction<'static, Postgres>,
}

impl Session {
    /// Connection bound to this session's transaction; usable as a
    /// `PgExecutor` by the repositories.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut *self.tx
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await?;
        debug!("session committed");
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), sqlx::Error> {
        self.tx.rollback().await?;
        debug!("session rolled back");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) async fn test_database() -> Database {
    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| crate::config::DEFAULT_DATABASE_URL.to_string());
    let db = Database {
        pool: PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("connect to test database"),
    };
    db.init_schema().await.expect("init schema");
    db
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lazy_pool_does_not_connect_up_front() {
        let db = Database::connect_lazy("postgres://nobody@127.0.0.1:1/none").expect("lazy pool");
        assert_eq!(db.pool().size(), 0);
    }

    #[tokio::test]
    #[ignore = "requires a running postgres at DATABASE_URL; run with --test-threads=1"]
    async fn session_select_one_then_init_and_drop() {
        let db = test_database().await;

        let mut session = db.session().await.expect("open session");
        let one: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(session.conn())
            .await
            .expect("select 1");
        assert_eq!(one, 1);
        session.rollback().await.expect("rollback");

        assert_eq!(db.ping().await.expect("ping"), 1);
        db.drop_schema().await.expect("drop schema");
        db.init_schema().await.expect("re-init schema");
    }
}
