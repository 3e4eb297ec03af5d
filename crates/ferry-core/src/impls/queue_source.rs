//! Queue-backed source: timed receive plus decode.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::codec::MessageCodec;
use crate::domain::FerryError;
use crate::pipeline::Source;
use crate::ports::MessageBroker;

/// Pulls items off one broker destination.
///
/// The receive timeout is how a drain run ends: `read` returns `Ok(None)`
/// and the driver treats the source as exhausted. A message that arrives
/// but fails to decode has already been consumed; the decode error aborts
/// the run and the message is not redelivered.
pub struct QueueSource<T> {
    broker: Arc<dyn MessageBroker>,
    codec: Arc<dyn MessageCodec<T>>,
    destination: String,
    receive_timeout: Duration,
}

impl<T> QueueSource<T> {
    pub fn new(
        broker: Arc<dyn MessageBroker>,
        codec: Arc<dyn MessageCodec<T>>,
        destination: impl Into<String>,
        receive_timeout: Duration,
    ) -> Self {
        Self {
            broker,
            codec,
            destination: destination.into(),
            receive_timeout,
        }
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> Source<T> for QueueSource<T> {
    async fn read(&mut self) -> Result<Option<T>, FerryError> {
        match self
            .broker
            .receive(&self.destination, self.receive_timeout)
            .await?
        {
            Some(message) => Ok(Some(self.codec.decode(message)?)),
            None => {
                tracing::debug!(destination = %self.destination, "receive timed out, source exhausted");
                Ok(None)
            }
        }
    }
}
