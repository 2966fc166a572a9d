use std::time::Duration;
use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::storage::TrackingStorage;

/// Overall shutdown budget in seconds
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Per-task budget in seconds
const TASK_TIMEOUT_SECS: u64 = 10;

pub async fn listen_for_shutdown(storage: &TrackingStorage) {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, closing storage...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }

    let shutdown_result = timeout(
        Duration::from_secs(SHUTDOWN_TIMEOUT_SECS),
        perform_shutdown_tasks(storage),
    )
    .await;

    match shutdown_result {
        Ok(()) => {
            info!("All shutdown tasks completed successfully");
        }
        Err(_) => {
            error!(
                "Shutdown tasks timed out after {} seconds! Forcing exit.",
                SHUTDOWN_TIMEOUT_SECS
            );
            std::process::exit(1);
        }
    }
}

/// Run the shutdown tasks inside the overall budget
async fn perform_shutdown_tasks(storage: &TrackingStorage) {
    match timeout(Duration::from_secs(TASK_TIMEOUT_SECS), storage.close()).await {
        Ok(Ok(())) => {
            info!("Storage connections closed");
        }
        Ok(Err(e)) => {
            error!("Failed to close storage cleanly: {}", e);
        }
        Err(_) => {
            error!(
                "Storage close timed out after {} seconds",
                TASK_TIMEOUT_SECS
            );
        }
    }
}
