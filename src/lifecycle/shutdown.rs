//! Stop signal shared by the listener loop and the signal task.

use tokio::sync::broadcast;

/// Fan-out stop handle for one proxy instance.
///
/// Every `ProxyServer::run` holds a receiver from [`Shutdown::subscribe`];
/// any clone of the handle can stop them all.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscribed server to stop; returns how many were listening.
    ///
    /// Zero means nothing was running, which is not an error.
    pub fn trigger(&self) -> usize {
        let notified = self.tx.send(()).unwrap_or(0);
        tracing::info!(notified, "Shutdown triggered");
        notified
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
