//! Queue-backed sink: encode plus publish, outside the store transaction.

use std::sync::Arc;

use async_trait::async_trait;

use crate::codec::MessageCodec;
use crate::domain::FerryError;
use crate::pipeline::{Chunk, Sink};
use crate::ports::{MessageBroker, StoreTxn};

/// Publishes each chunk item to one broker destination.
///
/// The transaction handle is deliberately unused: the broker is not
/// enlisted in the chunk transaction, so messages published here survive a
/// later rollback of the same chunk. Downstream consumers must tolerate
/// broadcasts for records that never became durable.
pub struct QueueSink<T> {
    broker: Arc<dyn MessageBroker>,
    codec: Arc<dyn MessageCodec<T>>,
    destination: String,
}

impl<T> QueueSink<T> {
    pub fn new(
        broker: Arc<dyn MessageBroker>,
        codec: Arc<dyn MessageCodec<T>>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            broker,
            codec,
            destination: destination.into(),
        }
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> Sink<T> for QueueSink<T> {
    async fn write(&self, _txn: &mut dyn StoreTxn, chunk: &Chunk<T>) -> Result<(), FerryError> {
        for item in chunk.iter() {
            let message = self.codec.encode(item)?;
            self.broker.send(&self.destination, message).await?;
        }
        tracing::debug!(destination = %self.destination, items = chunk.len(), "chunk published");
        Ok(())
    }
}
