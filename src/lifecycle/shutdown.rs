//! Shutdown coordination for the server.

use std::future::Future;
use tokio::sync::broadcast;

/// Why the running server is being stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Stop and exit the process.
    Shutdown,
    /// Stop, then start again from scratch.
    Reload,
}

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
pub struct Shutdown {
    tx: broadcast::Sender<ExitReason>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ExitReason> {
        self.tx.subscribe()
    }

    /// A future resolving once [`trigger`](Self::trigger) is called.
    ///
    /// Subscribes immediately: a trigger sent before the first poll still
    /// resolves it.
    pub fn signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    }

    pub fn trigger(&self, reason: ExitReason) {
        let _ = self.tx.send(reason);
    }

    /// Get the number of active subscribers (tasks still running).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
