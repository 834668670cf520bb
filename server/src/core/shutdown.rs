//! Graceful shutdown
//!
//! A single watch flag tells the HTTP server and every background task to
//! stop. Once the server has drained, registered tasks get
//! `SHUTDOWN_TIMEOUT_SECS` to exit before they are aborted, and then the
//! WAL is checkpointed and the pool closed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use super::constants::SHUTDOWN_TIMEOUT_SECS;
use crate::data::TransactionalService;

#[derive(Clone)]
pub struct ShutdownService {
    stop: Arc<watch::Sender<bool>>,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
    database: Arc<TransactionalService>,
}

impl ShutdownService {
    pub fn new(database: Arc<TransactionalService>) -> Self {
        let (stop, _) = watch::channel(false);
        Self {
            stop: Arc::new(stop),
            tasks: Arc::new(Mutex::new(Vec::new())),
            database,
        }
    }

    /// Track a background task so shutdown waits for it
    pub async fn register(&self, handle: JoinHandle<()>) {
        self.tasks.lock().await.push(handle);
    }

    /// Receiver that flips to `true` when shutdown starts
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.stop.subscribe()
    }

    pub fn trigger(&self) {
        // send_replace stores the value even with no live receivers
        self.stop.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.stop.borrow()
    }

    /// Owned future for `axum::serve(..).with_graceful_shutdown`
    pub fn wait(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut rx = self.subscribe();
        async move {
            let _ = rx.wait_for(|&stop| stop).await;
        }
    }

    /// Stop background tasks, then flush and close the database
    pub async fn shutdown(&self) {
        self.trigger();
        self.drain_tasks().await;
        self.close_database().await;
        tracing::debug!("Shutdown complete");
    }

    async fn drain_tasks(&self) {
        let handles = std::mem::take(&mut *self.tasks.lock().await);
        if handles.is_empty() {
            return;
        }

        let aborts: Vec<_> = handles.iter().map(JoinHandle::abort_handle).collect();
        let timeout = Duration::from_secs(SHUTDOWN_TIMEOUT_SECS);

        match tokio::time::timeout(timeout, futures::future::join_all(handles)).await {
            Ok(results) => {
                let failed = results.iter().filter(|r| r.is_err()).count();
                if failed > 0 {
                    tracing::warn!(failed, "Background tasks ended abnormally");
                }
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = timeout.as_secs(),
                    tasks = aborts.len(),
                    "Background tasks did not stop in time; aborting"
                );
                aborts.iter().for_each(|handle| handle.abort());
            }
        }
    }

    async fn close_database(&self) {
        if let Err(e) = self.database.checkpoint().await {
            tracing::warn!(error = %e, "Final WAL checkpoint failed");
        }
        self.database.close().await;
    }

    /// Trigger shutdown on Ctrl+C or SIGTERM
    pub fn install_signal_handlers(&self) {
        let service = self.clone();
        tokio::spawn(async move {
            let signal = os_signal().await;
            tracing::info!(signal, "Stopping server");
            service.trigger();
        });
    }
}

/// Resolve with the name of the first stop signal received
async fn os_signal() -> &'static str {
    let interrupt = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for Ctrl+C");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    }
}
