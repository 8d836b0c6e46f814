use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};

use ratingsapp::logging::init_tracing;
use ratingsapp::router::init_router;
use ratingsapp::state::AppState;
use ratingsapp_config::{JwtConfig, ServerConfig};
use ratingsapp_core::password::hash_password;
use ratingsapp_db::{MemoryStore, Repositories, init_db_pool, run_migrations};

/// Password of the seeded super-admin when running without a database.
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let jwt_config = JwtConfig::from_env().context("invalid JWT configuration")?;
    let server_config = ServerConfig::from_env().context("invalid server configuration")?;

    let repositories = match &server_config.database_url {
        Some(url) => {
            let pool = init_db_pool(url)
                .await
                .context("failed to connect to database")?;
            run_migrations(&pool)
                .await
                .context("failed to run migrations")?;
            info!("using PostgreSQL storage");
            Repositories::postgres(pool)
        }
        None => {
            warn!("no database configured, data is kept in memory and lost on shutdown");
            let password = std::env::var("RATINGSAPP_ADMIN_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());
            Repositories::memory(MemoryStore::seeded(hash_password(&password)?))
        }
    };

    let app = init_router(AppState::new(repositories, jwt_config));

    let listener = tokio::net::TcpListener::bind(server_config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", server_config.bind_addr()))?;
    info!(addr = %server_config.bind_addr(), "server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => warn!(error = %err, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
