//! Application layer: ready-made pipeline wirings over the ports.
//!
//! Two entry points, one per direction:
//! - [`run_producer`]: stream the whole source store to the broker and an
//!   archive store through the fan-out sink.
//! - [`run_consumer`]: drain queued status updates into a store until the
//!   queue goes quiet.
//!
//! Both are one-shot batch runs over a [`ChunkedDriver`](crate::pipeline::ChunkedDriver);
//! callers own scheduling and retry.

mod config;
mod consumer;
mod producer;

pub use self::config::{ConsumerConfig, ProducerConfig};
pub use self::consumer::run_consumer;
pub use self::producer::run_producer;
