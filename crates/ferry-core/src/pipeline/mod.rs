//! Chunked pipeline: sources, sinks, and the driver that runs them.

mod chunk;
mod driver;
mod fanout;

pub use chunk::Chunk;
pub use driver::{ChunkedDriver, RunReport, RunState};
pub use fanout::FanoutSink;

use async_trait::async_trait;

use crate::domain::FerryError;
use crate::ports::StoreTxn;

/// Pull-based item producer.
///
/// `Ok(None)` means the source is exhausted and ends the run: for a
/// queue-backed source that is the receive timeout expiring, for a
/// cursor-backed source the end of the result set. It is a sentinel, not an
/// error.
#[async_trait]
pub trait Source<T>: Send {
    async fn read(&mut self) -> Result<Option<T>, FerryError>;
}

/// Push-based chunk consumer.
///
/// The driver hands every sink the chunk together with the open store
/// transaction for that chunk. Transactional sinks write through the
/// handle; non-transactional ones (queue publish) ignore it and take effect
/// immediately.
#[async_trait]
pub trait Sink<T>: Send + Sync {
    async fn write(&self, txn: &mut dyn StoreTxn, chunk: &Chunk<T>) -> Result<(), FerryError>;
}
