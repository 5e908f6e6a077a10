pub mod api;
pub mod cli;
pub mod config;
pub mod core_state;
pub mod db;
pub mod emergency;
pub mod llm;
pub mod log;
pub mod models;
pub mod notify;
pub mod seed;
pub mod sync;
pub mod telemedicine;
pub mod translate;
pub mod triage;

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::core_state::{CoreError, CoreState};
use crate::notify::{LogSink, Notifier};

/// How long queued notifications may drain after the server stops.
const NOTIFY_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Sample data seeding failed: {0}")]
    Seed(#[from] db::DatabaseError),
    #[error(transparent)]
    Server(#[from] api::ServerError),
}

/// Run the service until Ctrl-C or SIGTERM.
pub async fn run(config: AppConfig) -> Result<(), RunError> {
    log::init(&config.log);
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let (notifier, notify_task) = Notifier::spawn(Arc::new(LogSink));
    let core = Arc::new(CoreState::from_config(config, notifier)?);

    if core.config.seed_sample_data {
        seed::seed_sample_data(&core.store)?;
    }

    let bind_address = core.config.server.bind_address();
    let mut server = api::start_api_server(core.clone(), &bind_address).await?;

    shutdown_signal().await;
    server.shutdown();
    server.wait().await?;

    // The worker stops once the last notifier clone is gone.
    drop(core);
    if tokio::time::timeout(NOTIFY_DRAIN_TIMEOUT, notify_task)
        .await
        .is_err()
    {
        tracing::warn!("Notification worker did not drain in time");
    }

    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
