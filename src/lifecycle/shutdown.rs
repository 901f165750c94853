//! Cooperative shutdown signalling.

use tokio::sync::broadcast;

/// Cancellation scope shared by a set of long-running tasks.
///
/// Cloning shares the same scope: a trigger from any clone reaches every
/// subscriber. Tasks subscribe once and await the receiver inside their
/// `select!` loops; both a delivered signal and a closed channel count as
/// cancellation.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the cancellation signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscriber. Safe to call more than once.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
