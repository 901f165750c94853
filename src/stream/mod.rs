//! Redundant change streaming for cluster-state keys.
//!
//! # Data Flow
//! ```text
//! store watch ("/", leader-confirmed)          interval poll (per key Get)
//!     → filter to tracked keys                     → log + skip failures
//!     → output channel            ←──────────────── output channel
//!
//! Both loops share one cancellation scope; a supervisor closes the
//! output and resolves the completion signal once both have stopped.
//! ```
//!
//! # Design Decisions
//! - Watch and poll are independent tasks; they share nothing but the
//!   cancellation scope and the output channel
//! - The poll pass delivers every tracked key's current value at startup
//!   and keeps producing evidence if the watch transport breaks silently
//! - Duplicate events are expected; consumers treat them as upserts
//! - Internal errors are logged and absorbed; only cancellation stops the
//!   stream

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time;

use crate::lifecycle::Shutdown;
use crate::store::{KeyValue, WatchStore};

/// The watch subscription covers the whole namespace and filters
/// client-side, so a change to the tracked key set never requires a
/// different subscription.
const WATCH_PREFIX: &str = "/";

const OUTPUT_BUFFER: usize = 16;

/// Settings for a change stream, immutable for its lifetime.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Keys whose values are emitted on the output.
    pub keys: Vec<String>,
    /// Interval between full poll passes. The first pass runs immediately.
    pub poll_interval: Duration,
    /// Delay before reopening a lost watch subscription.
    pub watch_retry_interval: Duration,
    /// Per-key deadline for poll lookups.
    pub get_timeout: Duration,
}

/// Handle to a running change stream.
pub struct ChangeStream {
    /// Tracked-key observations. Closes once both loops have stopped.
    pub events: mpsc::Receiver<KeyValue>,
    /// Resolves after both loops have stopped and the output has closed.
    pub done: oneshot::Receiver<()>,
}

impl ChangeStream {
    /// Start the watch and poll loops against `store`.
    ///
    /// The stream runs until `external` signals, until the caller drops the
    /// event receiver, or until the caller's shutdown handle goes away.
    /// Either loop exiting permanently cancels the shared scope, which
    /// unblocks the other loop at its next wait point.
    pub fn spawn(
        store: Arc<dyn WatchStore>,
        config: StreamConfig,
        mut external: broadcast::Receiver<()>,
    ) -> Self {
        tracing::info!(keys = %config.keys.join(","), "starting change stream");

        let (out_tx, out_rx) = mpsc::channel(OUTPUT_BUFFER);
        let (done_tx, done_rx) = oneshot::channel();

        let scope = Shutdown::new();

        // Bridge the caller's signal into the stream-local scope. The
        // second arm lets the bridge retire when the stream stops first.
        {
            let scope = scope.clone();
            let mut local = scope.subscribe();
            tokio::spawn(async move {
                tokio::select! {
                    _ = external.recv() => scope.trigger(),
                    _ = local.recv() => {}
                }
            });
        }

        // Subscribe before spawning so a trigger racing task startup is
        // never lost.
        let watch_cancel = scope.subscribe();
        let poll_cancel = scope.subscribe();

        let watch = tokio::spawn(watch_loop(
            Arc::clone(&store),
            config.clone(),
            out_tx.clone(),
            scope.clone(),
            watch_cancel,
        ));
        let poll = tokio::spawn(poll_loop(store, config, out_tx, scope, poll_cancel));

        tokio::spawn(async move {
            let _ = watch.await;
            let _ = poll.await;
            tracing::info!("change stream stopped");
            let _ = done_tx.send(());
        });

        Self {
            events: out_rx,
            done: done_rx,
        }
    }
}

/// Consume the store's watch transport, forwarding tracked-key events.
/// Reopens the subscription after `watch_retry_interval` whenever the
/// transport drops it.
async fn watch_loop(
    store: Arc<dyn WatchStore>,
    config: StreamConfig,
    out: mpsc::Sender<KeyValue>,
    scope: Shutdown,
    mut cancel: broadcast::Receiver<()>,
) {
    'watch: loop {
        tracing::info!(event = "watch_start", "opening watch subscription");
        let mut batches = store.watch(WATCH_PREFIX, true).await;

        'subscription: loop {
            let batch = tokio::select! {
                _ = cancel.recv() => {
                    tracing::info!(event = "watch_stop", "shutdown signalled, stopping watch loop");
                    break 'watch;
                }
                received = batches.recv() => match received {
                    Some(batch) => batch,
                    None => break 'subscription,
                },
            };

            // Advisory only: the transport keeps delivering after this.
            if let Some(error) = &batch.error {
                tracing::warn!(%error, "received error from store watcher");
            }

            for kv in batch.events {
                if !is_tracked(&config.keys, &kv) {
                    continue;
                }
                let delivered = tokio::select! {
                    _ = cancel.recv() => false,
                    sent = out.send(kv) => sent.is_ok(),
                };
                if !delivered {
                    tracing::info!(event = "watch_stop", "stopping watch loop");
                    break 'watch;
                }
            }
        }

        tokio::select! {
            _ = cancel.recv() => {
                tracing::info!(event = "watch_stop", "shutdown signalled, stopping watch loop");
                break 'watch;
            }
            _ = time::sleep(config.watch_retry_interval) => {
                tracing::warn!("watch subscription lost, reopening");
            }
        }
    }

    scope.trigger();
}

/// Look up every tracked key on an interval, forwarding current values.
/// The first pass runs immediately so consumers see pre-existing state
/// without waiting for a mutation.
async fn poll_loop(
    store: Arc<dyn WatchStore>,
    config: StreamConfig,
    out: mpsc::Sender<KeyValue>,
    scope: Shutdown,
    mut cancel: broadcast::Receiver<()>,
) {
    'poll: loop {
        tracing::debug!(event = "poll_start", "polling tracked keys");
        for key in &config.keys {
            let kv = match store.get(key, config.get_timeout).await {
                Err(error) => {
                    tracing::warn!(%key, %error, "failed to poll store");
                    continue;
                }
                Ok(None) => {
                    // Operational alarm: the writer that maintains this key
                    // is expected to always be running.
                    tracing::error!(
                        event = "poll_missing_value",
                        %key,
                        "tracked key has no value (is the key writer running?)"
                    );
                    continue;
                }
                Ok(Some(kv)) => kv,
            };

            let delivered = tokio::select! {
                _ = cancel.recv() => false,
                sent = out.send(kv) => sent.is_ok(),
            };
            if !delivered {
                tracing::info!(event = "poll_stop", "stopping poll loop");
                break 'poll;
            }
        }

        tokio::select! {
            _ = cancel.recv() => {
                tracing::info!(event = "poll_stop", "shutdown signalled, stopping poll loop");
                break 'poll;
            }
            _ = time::sleep(config.poll_interval) => {}
        }
    }

    scope.trigger();
}

fn is_tracked(keys: &[String], kv: &KeyValue) -> bool {
    keys.iter().any(|key| key.as_bytes() == kv.key.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_tracked() {
        let keys = vec!["/service/master".to_string(), "/service/config".to_string()];

        assert!(is_tracked(&keys, &KeyValue::new("/service/master", "10.0.0.1")));
        assert!(!is_tracked(&keys, &KeyValue::new("/service/other", "x")));
        assert!(!is_tracked(&keys, &KeyValue::new("/service/mast", "x")));
    }
}
