// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Server bootstrap and graceful shutdown.

use tokio::{net::TcpListener, signal};
use tokio_util::sync::CancellationToken;

use crate::{
    api::router,
    auth::TokenService,
    config::{Config, ConfigError},
    state::AppState,
    storage::{RecordsDatabase, StorageError},
};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to open database: {0}")]
    Storage(#[from] StorageError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Open the database, bind the listener and serve until a shutdown signal.
pub async fn run(config: Config) -> Result<(), ServerError> {
    let addr = config.bind_addr()?;

    let db = RecordsDatabase::open(&config.database_path())?;
    let tokens = TokenService::new(config.jwt_secret.as_bytes(), config.token_ttl_days);
    let state = AppState::new(db, tokens);
    let app = router(state, &config.cors_origins);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        token_ttl_days = config.token_ttl_days,
        "Student records server listening (docs at /docs)"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn wait_for_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    tracing::info!("Shutdown signal received, draining connections");
    shutdown.cancel();
}
