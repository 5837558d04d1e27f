use clap::Parser;
use simplemon::db::services::PgMonitorStore;
use simplemon::server::config::AppConfig;
use simplemon::server::logging::init_logging;
use simplemon::version::VERSION;
use simplemon::web::create_axum_router;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version = VERSION, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

async fn open_db(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_open_conns)
        .min_connections(config.db_max_idle_conns)
        .idle_timeout(config.db_max_idle_time)
        .acquire_timeout(config.db_connect_timeout)
        .connect(&config.database_url)
        .await?;

    // Fail fast if the database is unreachable.
    tokio::time::timeout(config.db_connect_timeout, sqlx::query("SELECT 1").execute(&pool))
        .await
        .map_err(|_| sqlx::Error::PoolTimedOut)??;

    Ok(pool)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
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
    info!("Shutdown signal received, draining connections");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let config = Arc::new(AppConfig::load(args.config.as_deref())?);
    let _log_guard = init_logging(&config);
    info!(version = VERSION, env = %config.env, "Starting simplemon");

    // --- Database Pool Setup ---
    let db_pool = match open_db(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!(error = %e, "Cannot connect to database");
            return Err(e.into());
        }
    };
    info!(
        max_connections = config.db_max_open_conns,
        min_connections = config.db_max_idle_conns,
        "Database connection pool established"
    );

    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        info!("Database migrations applied");
    }

    // --- Axum HTTP Server Setup ---
    let store = Arc::new(PgMonitorStore::new(db_pool.clone()));
    let app = create_axum_router(store, config.clone());

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await;
    info!("Server stopped");
    Ok(())
}
