//! In-memory message broker for development and tests.
//!
//! Design:
//! - Mutex + Condvar give the blocking timed receive.
//! - Blocking always happens on the blocking pool (`spawn_blocking`), never
//!   on the async runtime threads.
//! - One FIFO VecDeque per destination name.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{FerryError, WireMessage};
use crate::ports::MessageBroker;

/// In-memory broker: named destinations, FIFO per destination, timed
/// blocking receive.
///
/// Lock poisoning is treated as fatal (the `unwrap`s on `lock()`): a
/// poisoned broker means a panicked holder and there is nothing sensible to
/// salvage.
pub struct InMemoryBroker {
    queues: Arc<Mutex<HashMap<String, VecDeque<WireMessage>>>>,
    condvar: Arc<Condvar>,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self {
            queues: Arc::new(Mutex::new(HashMap::new())),
            condvar: Arc::new(Condvar::new()),
        }
    }

    /// Number of messages waiting on a destination.
    pub fn depth(&self, destination: &str) -> usize {
        let queues = self.queues.lock().unwrap();
        queues.get(destination).map_or(0, |q| q.len())
    }

    /// Drop every message waiting on a destination.
    pub fn purge(&self, destination: &str) {
        let mut queues = self.queues.lock().unwrap();
        if let Some(queue) = queues.get_mut(destination) {
            queue.clear();
        }
    }
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBroker for InMemoryBroker {
    async fn send(&self, destination: &str, message: WireMessage) -> Result<(), FerryError> {
        let queues = Arc::clone(&self.queues);
        let condvar = Arc::clone(&self.condvar);
        let destination = destination.to_string();

        tokio::task::spawn_blocking(move || {
            let mut queues = queues.lock().unwrap();
            queues.entry(destination).or_default().push_back(message);

            // notify_all: waiters on other destinations must re-check too.
            condvar.notify_all();
        })
        .await
        .map_err(|e| FerryError::Transport(format!("send failed: {e}")))?;

        Ok(())
    }

    async fn receive(
        &self,
        destination: &str,
        timeout: Duration,
    ) -> Result<Option<WireMessage>, FerryError> {
        let queues = Arc::clone(&self.queues);
        let condvar = Arc::clone(&self.condvar);
        let destination = destination.to_string();

        tokio::task::spawn_blocking(move || {
            let start = std::time::Instant::now();
            let mut guard = queues.lock().unwrap();
            loop {
                let elapsed = start.elapsed();
                if elapsed >= timeout {
                    return Ok(None);
                }
                if let Some(queue) = guard.get_mut(&destination)
                    && let Some(message) = queue.pop_front()
                {
                    return Ok(Some(message));
                }
                let remaining = timeout.saturating_sub(elapsed);
                let (new_guard, result) = condvar.wait_timeout(guard, remaining).unwrap();
                guard = new_guard;

                if result.timed_out() {
                    return Ok(None);
                }
            }
        })
        .await
        .map_err(|e| FerryError::Transport(format!("receive failed: {e}")))?
    }
}
