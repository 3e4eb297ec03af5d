//! FanoutSink: one chunk, several sinks, fixed order.

use async_trait::async_trait;

use crate::domain::FerryError;
use crate::ports::StoreTxn;

use super::{Chunk, Sink};

/// Sink that forwards each chunk to every delegate, in declared order.
///
/// The first delegate error aborts the chunk; later delegates never see it.
/// Fan-out itself undoes nothing: transactional delegates are undone by the
/// enclosing chunk transaction, while non-transactional ones (a queue
/// publish) keep whatever they already emitted. Order the delegates with
/// that in mind.
pub struct FanoutSink<T> {
    delegates: Vec<Box<dyn Sink<T>>>,
}

impl<T: Send + Sync + 'static> FanoutSink<T> {
    /// # Panics
    /// Panics when `delegates` is empty.
    pub fn new(delegates: Vec<Box<dyn Sink<T>>>) -> Self {
        assert!(!delegates.is_empty(), "fanout needs at least one delegate");
        Self { delegates }
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> Sink<T> for FanoutSink<T> {
    async fn write(&self, txn: &mut dyn StoreTxn, chunk: &Chunk<T>) -> Result<(), FerryError> {
        for delegate in &self.delegates {
            delegate.write(&mut *txn, chunk).await?;
        }
        Ok(())
    }
}
