//! Consumer pipeline: drain status updates from the broker into the store.

use std::sync::Arc;

use crate::codec::StatusUpdateCodec;
use crate::domain::FerryError;
use crate::impls::{QueueSource, StatusUpdateWriter};
use crate::pipeline::{ChunkedDriver, RunReport};
use crate::ports::{MessageBroker, RecordStore};

use super::ConsumerConfig;

/// Drain one batch of status updates into `store`.
///
/// Receives from `config.queue` until a receive times out, decoding each
/// message strictly and applying it as a keyed status update, one chunk per
/// transaction. An update whose key matches no record applies as a no-op;
/// replaying an already-applied update lands on the same row with the same
/// result.
///
/// The run completes when the queue drains, including the case where the
/// very first receive times out. A malformed message fails the run: chunks
/// committed before it stay committed, and the message itself has already
/// been consumed.
pub async fn run_consumer<S>(
    broker: Arc<dyn MessageBroker>,
    store: Arc<S>,
    config: ConsumerConfig,
) -> Result<RunReport, FerryError>
where
    S: RecordStore + 'static,
{
    tracing::info!(queue = %config.queue, chunk_size = config.chunk_size, "consumer run starting");

    let source = QueueSource::new(
        broker,
        Arc::new(StatusUpdateCodec::new()),
        config.queue,
        config.receive_timeout,
    );
    let mut driver = ChunkedDriver::new(
        Box::new(source),
        Box::new(StatusUpdateWriter::new()),
        store,
        config.chunk_size,
    );
    driver.run().await
}
