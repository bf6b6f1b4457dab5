//! Bracket tournament server.
//!
//! Serves the JSON API over axum, backed by PostgreSQL or, with `--memory`,
//! by an in-process store.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Error};
use bracket::db::{Database, MemoryStore, PgStore};
use bracket_server::{
    api,
    config::{ConfigOverrides, ServerConfig},
    logging, metrics,
};
use pico_args::Arguments;
use tracing::info;

const HELP: &str = "\
Run the bracket tournament server

USAGE:
  bracket_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --db-url     URL         Database connection string  [default: env DATABASE_URL]

FLAGS:
  --memory                 Keep all records in memory (nothing persists)
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  DATABASE_URL             PostgreSQL connection string
  JWT_SECRET               JWT signing secret (at least 32 characters)
  PASSWORD_PEPPER          Password hashing pepper (at least 16 characters)
  METRICS_BIND             Prometheus exporter address (optional)
  (See .env file for all configuration options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = ConfigOverrides {
        use_memory_store: pargs.contains("--memory"),
        bind: pargs.opt_value_from_str::<_, SocketAddr>("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
    };

    logging::init();

    let config = ServerConfig::from_env(overrides)?;

    if let Some(metrics_bind) = config.metrics_bind {
        metrics::init_metrics(metrics_bind).context("Failed to install Prometheus exporter")?;
        info!("Metrics exporter listening on {}", metrics_bind);
    }

    let security = config.security.clone();
    let state = if config.use_memory_store {
        info!("Using in-memory record store; data is lost on exit");
        api::AppState::new(
            Arc::new(MemoryStore::new()),
            security.password_pepper,
            security.jwt_secret,
        )
    } else {
        info!("Connecting to database");
        let db = Database::new(&config.database)
            .await
            .context("Failed to connect to database")?;
        db.migrate().await.context("Failed to run migrations")?;
        info!("Database connected and migrated");

        api::AppState::new(
            Arc::new(PgStore::new(db.pool().clone())),
            security.password_pepper,
            security.jwt_secret,
        )
    };

    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
