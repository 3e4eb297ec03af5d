//! ferry-core
//!
//! Chunked record synchronization between a keyed store and a message
//! broker.
//!
//! # Module map
//! - **domain**: records, correlation keys, statuses, wire messages, errors
//! - **ports**: abstraction layer (MessageBroker, RecordStore, StoreTxn)
//! - **codec**: item <-> wire message conversions
//! - **pipeline**: the chunk-at-a-time driver plus Source/Sink seams
//! - **impls**: in-memory broker and store, queue-backed source/sinks
//! - **app**: ready-made producer and consumer pipeline wirings

pub mod app;
pub mod codec;
pub mod domain;
pub mod impls;
pub mod pipeline;
pub mod ports;
