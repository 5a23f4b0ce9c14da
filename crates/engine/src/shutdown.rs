//! Cooperative shutdown between chunks

use tokio::sync::watch;

/// Receiving side, polled by locale tasks between chunks
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

/// Sending side, held by whoever handles process signals
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

/// Create a connected trigger/handle pair
#[must_use]
pub fn channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

impl Shutdown {
    /// A handle that never fires
    #[must_use]
    pub fn never() -> Self {
        channel().1
    }

    /// Whether shutdown has been requested
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }
}

impl ShutdownTrigger {
    /// Request shutdown; in-flight chunks finish first
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}
