//! Shared mocks for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use failover_coordinator::pooler::{Pooler, PoolerError};
use failover_coordinator::store::{KeyValue, StoreError, WatchBatch, WatchStore};

/// Scripted outcome for one pooler operation.
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Ok,
    FailWith(&'static str),
    BlockForever,
}

/// Programmable pooler mock counting invocations per operation.
pub struct MockPooler {
    pause_behavior: Behavior,
    resume_behavior: Behavior,
    probe_behavior: Behavior,
    pub pause_calls: AtomicUsize,
    pub resume_calls: AtomicUsize,
    pub probe_calls: AtomicUsize,
}

impl MockPooler {
    pub fn with(pause: Behavior, resume: Behavior, probe: Behavior) -> Arc<Self> {
        Arc::new(Self {
            pause_behavior: pause,
            resume_behavior: resume,
            probe_behavior: probe,
            pause_calls: AtomicUsize::new(0),
            resume_calls: AtomicUsize::new(0),
            probe_calls: AtomicUsize::new(0),
        })
    }

    pub fn healthy() -> Arc<Self> {
        Self::with(Behavior::Ok, Behavior::Ok, Behavior::Ok)
    }

    pub fn failing(message: &'static str) -> Arc<Self> {
        Self::with(
            Behavior::FailWith(message),
            Behavior::FailWith(message),
            Behavior::FailWith(message),
        )
    }

    pub fn blocking() -> Arc<Self> {
        Self::with(
            Behavior::BlockForever,
            Behavior::BlockForever,
            Behavior::BlockForever,
        )
    }

    pub fn resumes(&self) -> usize {
        self.resume_calls.load(Ordering::SeqCst)
    }

    async fn act(&self, behavior: Behavior) -> Result<(), PoolerError> {
        match behavior {
            Behavior::Ok => Ok(()),
            Behavior::FailWith(message) => Err(PoolerError::Command(message.to_string())),
            Behavior::BlockForever => std::future::pending().await,
        }
    }
}

#[async_trait]
impl Pooler for MockPooler {
    async fn pause(&self) -> Result<(), PoolerError> {
        self.pause_calls.fetch_add(1, Ordering::SeqCst);
        self.act(self.pause_behavior).await
    }

    async fn resume(&self) -> Result<(), PoolerError> {
        self.resume_calls.fetch_add(1, Ordering::SeqCst);
        self.act(self.resume_behavior).await
    }

    async fn show_databases(&self) -> Result<Vec<String>, PoolerError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.act(self.probe_behavior).await?;
        Ok(vec!["postgres".to_string()])
    }
}

/// Store mock with settable key values and a scriptable watch feed.
pub struct MockStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
    failing_gets: AtomicBool,
    watch_tx: Mutex<Option<mpsc::Sender<WatchBatch>>>,
    watch_opens: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            values: Mutex::new(HashMap::new()),
            failing_gets: AtomicBool::new(false),
            watch_tx: Mutex::new(None),
            watch_opens: AtomicUsize::new(0),
        })
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.as_bytes().to_vec());
    }

    pub fn remove(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }

    pub fn fail_gets(&self, failing: bool) {
        self.failing_gets.store(failing, Ordering::SeqCst);
    }

    pub fn watch_opens(&self) -> usize {
        self.watch_opens.load(Ordering::SeqCst)
    }

    /// Drop the current subscription's sender, simulating transport loss.
    pub fn close_watch(&self) {
        *self.watch_tx.lock().unwrap() = None;
    }

    pub async fn push(&self, events: Vec<KeyValue>) {
        self.push_batch(WatchBatch {
            events,
            error: None,
        })
        .await;
    }

    pub async fn push_batch(&self, batch: WatchBatch) {
        let sender = self.wait_for_watch().await;
        sender.send(batch).await.expect("watch receiver dropped");
    }

    /// The stream opens its subscription asynchronously; wait for it.
    async fn wait_for_watch(&self) -> mpsc::Sender<WatchBatch> {
        for _ in 0..200 {
            if let Some(sender) = self.watch_tx.lock().unwrap().clone() {
                return sender;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("no watch subscription was opened");
    }
}

#[async_trait]
impl WatchStore for MockStore {
    async fn get(&self, key: &str, _timeout: Duration) -> Result<Option<KeyValue>, StoreError> {
        if self.failing_gets.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("injected get failure".to_string()));
        }

        Ok(self
            .values
            .lock()
            .unwrap()
            .get(key)
            .map(|value| KeyValue::new(key, value.clone())))
    }

    async fn watch(&self, _prefix: &str, _require_leader: bool) -> mpsc::Receiver<WatchBatch> {
        let (tx, rx) = mpsc::channel(16);
        *self.watch_tx.lock().unwrap() = Some(tx);
        self.watch_opens.fetch_add(1, Ordering::SeqCst);
        rx
    }
}

pub fn kv(key: &str, value: &str) -> KeyValue {
    KeyValue::new(key, value)
}
