//! Shutdown coordination.

use tokio::sync::broadcast;

use crate::lifecycle::signals;

/// Fan-out trigger for stopping the server from inside the process.
///
/// Dropping the last `Shutdown` also releases every subscriber, so callers
/// must keep it alive for as long as the server should run.
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

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve when `rx` fires (or its sender is gone) or an OS signal arrives.
pub async fn until_shutdown(mut rx: broadcast::Receiver<()>) {
    tokio::select! {
        _ = signals::terminate() => {},
        _ = rx.recv() => tracing::info!("Shutdown requested"),
    }
}
