//! Port implementations and pipeline adapters.
//!
//! Everything here runs in-process and is suitable for development and
//! tests. Real backends (an AMQP/JMS broker, a SQL store) implement the
//! same ports in their own crates; the adapters in this module work
//! unchanged on top of them.

mod inmem_broker;
mod inmem_store;
mod insert_writer;
mod queue_sink;
mod queue_source;
mod status_writer;

pub use inmem_broker::InMemoryBroker;
pub use inmem_store::InMemoryStore;
pub use insert_writer::RecordInsertWriter;
pub use queue_sink::QueueSink;
pub use queue_source::QueueSource;
pub use status_writer::StatusUpdateWriter;
