//! Lifetime management for the two long-running server tasks.
//!
//! The simulation driver and the network server run side by side. Whichever
//! ends first (by returning, by panicking, or because the process was
//! interrupted) triggers the shared shutdown signal, and the supervisor then
//! waits for whatever is still running. A task handle is awaited exactly once.

use log::{error, info};
use std::future::Future;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};

/// What caused the server to shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownCause {
    /// The simulation driver task ended on its own.
    DriverExited,
    /// The network task ended on its own.
    NetworkExited,
    /// The interrupt future completed (Ctrl+C in the binary).
    Interrupted,
}

/// Waits for the first of `driver`, `network` or `interrupt` to finish, sends
/// `true` on `shutdown`, then waits for the tasks that are still running.
///
/// Panics inside either task are logged and reported through the returned
/// cause rather than propagated.
pub async fn supervise<F>(
    mut driver: JoinHandle<()>,
    mut network: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
    interrupt: F,
) -> ShutdownCause
where
    F: Future<Output = ()>,
{
    let cause = tokio::select! {
        result = &mut driver => {
            log_exit("Simulation driver", result);
            ShutdownCause::DriverExited
        }
        result = &mut network => {
            log_exit("Network task", result);
            ShutdownCause::NetworkExited
        }
        _ = interrupt => {
            info!("Received Ctrl+C, shutting down gracefully...");
            ShutdownCause::Interrupted
        }
    };

    // Receivers may already be gone if both tasks ended.
    let _ = shutdown.send(true);

    match cause {
        ShutdownCause::DriverExited => log_exit("Network task", network.await),
        ShutdownCause::NetworkExited => log_exit("Simulation driver", driver.await),
        ShutdownCause::Interrupted => {
            let (driver_result, network_result) = tokio::join!(driver, network);
            log_exit("Simulation driver", driver_result);
            log_exit("Network task", network_result);
        }
    }

    cause
}

fn log_exit(task: &str, result: Result<(), JoinError>) {
    match result {
        Ok(()) => info!("{} stopped", task),
        Err(e) if e.is_panic() => error!("{} panicked: {}", task, e),
        Err(e) => error!("{} was cancelled: {}", task, e),
    }
}
