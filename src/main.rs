use clap::Parser;

use calcapi::{
    app,
    cli::{Cli, Command},
    config::AppConfig,
    db::Database,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let command = cli.into_command();

    let mut config = AppConfig::from_env()?;
    tracing::debug!("configuration loaded");

    match command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            let addr = config.bind_addr();

            let state = AppState::init(config).await?;
            state.db.ping().await?;
            if let Err(e) = state.db.init_schema().await {
                tracing::warn!(error = %e, "schema init failed; continuing");
            }

            app::serve(app::build_app(state), &addr).await?;
        }
        Command::InitDb => {
            Database::connect(&config).await?.init_schema().await?;
        }
        Command::DropDb => {
            Database::connect(&config).await?.drop_schema().await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "calcapi=debug,axum=info,tower_http=info,sqlx=warn".to_string())
    };
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}
