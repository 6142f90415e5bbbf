//! Graceful shutdown for the HTTP server and anything else long-running.
//!
//! A `watch` channel flips from `false` to `true` once. Late subscribers still
//! see the flag, so a task that starts after shutdown was requested exits
//! immediately.

use std::future::Future;
use tokio::signal;
use tokio::sync::watch;

#[derive(Clone)]
pub struct ShutdownController {
    tx: watch::Sender<bool>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Trigger shutdown programmatically.
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.tx.borrow()
    }

    /// A future that resolves once shutdown is requested. Suitable for
    /// `axum::serve(..).with_graceful_shutdown(..)`.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            // Err means the controller was dropped; treat as shutdown.
            let _ = rx.wait_for(|stop| *stop).await;
        }
    }

    /// Wait for SIGTERM or SIGINT, then trigger shutdown.
    pub async fn listen_for_signals(&self) {
        let ctrl_c = signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "cannot install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => { tracing::info!("received SIGINT, shutting down"); }
            _ = terminate => { tracing::info!("received SIGTERM, shutting down"); }
        }

        self.shutdown();
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn programmatic_shutdown_releases_waiters() {
        let controller = ShutdownController::new();
        let waiter = tokio::spawn(controller.wait());
        controller.shutdown();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish")
            .unwrap();
        assert!(controller.is_shutting_down());
    }

    #[tokio::test]
    async fn late_waiter_sees_earlier_shutdown() {
        let controller = ShutdownController::new();
        controller.shutdown();
        tokio::time::timeout(Duration::from_secs(1), controller.wait())
            .await
            .expect("late waiter should resolve immediately");
    }
}
