//! Ports: interfaces to the systems around the engine.
//!
//! Implementations live in `impls` (in-memory, for development and tests);
//! real backends (an AMQP/JMS broker, a SQL store) implement the same
//! traits in their own crates.

pub mod broker;
pub mod store;

pub use self::broker::MessageBroker;
pub use self::store::{RecordStore, StoreTxn, TxnProvider};
