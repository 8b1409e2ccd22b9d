//! Process signal wiring.
//!
//! Signals only cancel a token; the main task observes it and performs the
//! shutdown.

use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Spawn a listener that cancels `shutdown` on Ctrl+C or SIGTERM.
///
/// The returned task finishes once `shutdown` is cancelled, by a signal or
/// by anyone else holding the token.
pub fn spawn_listener(shutdown: CancellationToken) -> std::io::Result<JoinHandle<()>> {
    #[cfg(unix)]
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;

    let handle = tokio::spawn(async move {
        #[cfg(unix)]
        let terminate = terminate.recv();

        #[cfg(not(unix))]
        let terminate = std::future::pending::<Option<()>>();

        tokio::select! {
            result = signal::ctrl_c() => match result {
                Ok(()) => tracing::info!("Received Ctrl+C, shutting down gracefully"),
                Err(e) => tracing::error!("Failed to listen for Ctrl+C, shutting down: {}", e),
            },
            _ = terminate => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
            }
            _ = shutdown.cancelled() => return,
        }

        shutdown.cancel();
    });

    Ok(handle)
}
