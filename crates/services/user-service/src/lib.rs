//! User Service Library
//!
//! HTTP user registration and lookup over PostgreSQL, with an external
//! mailer check on sign-up and an optional Redis read-through cache.

pub mod api;
pub mod config;
pub mod infra;
pub mod repository;
pub mod usecase;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::api::{create_router, AppState};
use crate::config::UserServiceConfig;
use crate::infra::{Database, HttpClient, RedisCache, ReqwestClient};
use crate::repository::{MailerClient, UserCacheStore, UserStore};
use crate::usecase::UserManager;

/// In-flight requests get this long to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Wire every collaborator into the HTTP state.
pub async fn build_state(config: &UserServiceConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;
    let repo = Arc::new(UserStore::new(db.get_connection()));

    let http: Arc<dyn HttpClient> = Arc::new(ReqwestClient::new(&config.http_client)?);
    let mailer = Arc::new(MailerClient::new(http, &config.mailer));

    let mut users = UserManager::new(repo, mailer).with_update_mode(config.update_mode);

    if config.cache.enabled {
        match RedisCache::connect(&config.cache.url).await {
            Ok(redis) => {
                users = users.with_cache(Arc::new(UserCacheStore::new(Arc::new(redis))));
                info!("User cache enabled");
            }
            Err(e) => warn!(error = %e, "Redis unavailable, serving without cache"),
        }
    }

    Ok(AppState::new(Arc::new(users)).with_database(db))
}

/// Run the HTTP server until SIGINT/SIGTERM, then drain.
pub async fn run_server(config: UserServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(&config).await?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("User service listening on {}", addr);

    let stop = Arc::new(Notify::new());
    let stopped = stop.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move { stopped.notified().await })
        .await
    });

    tokio::select! {
        result = &mut server => {
            result??;
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    stop.notify_one();
    match tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await {
        Ok(result) => result??,
        Err(_) => {
            warn!("Graceful shutdown timed out, aborting open connections");
            server.abort();
        }
    }

    info!("User service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &UserServiceConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
