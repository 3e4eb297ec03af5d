//! Keyed record store port, with an explicit transaction handle.

use async_trait::async_trait;

use crate::domain::{CorrelationKey, FerryError, Record, Status};
use crate::pipeline::Source;

/// Opens transactions against a store.
///
/// Split out of [`RecordStore`] so the pipeline driver can own the write
/// transaction for a chunk without caring about the read surface.
#[async_trait]
pub trait TxnProvider: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn StoreTxn>, FerryError>;
}

/// Read surface of the record store.
#[async_trait]
pub trait RecordStore: TxnProvider {
    /// Look up one record by correlation key.
    async fn find_by_key(&self, key: &CorrelationKey) -> Result<Option<Record>, FerryError>;

    /// Cursor over all records, in insertion order.
    ///
    /// Every call returns a fresh forward-only cursor; a pipeline run reads
    /// it once, front to back.
    async fn scan(&self) -> Result<Box<dyn Source<Record>>, FerryError>;
}

/// One open transaction.
///
/// Writes buffer in the handle and become visible to readers only at
/// `commit`. The handle must end in exactly one of `commit` or `rollback`;
/// both consume it, so nothing can be written afterwards. Dropping the
/// handle without committing discards the writes.
#[async_trait]
pub trait StoreTxn: Send {
    /// Set the status of the record with this key.
    ///
    /// Returns the number of rows affected. Zero (no record with that key)
    /// is a normal outcome, not an error.
    async fn update_status_by_key(
        &mut self,
        key: &CorrelationKey,
        status: Status,
    ) -> Result<u64, FerryError>;

    /// Insert a record, returning it with its store-assigned id. Any id on
    /// the input is ignored.
    ///
    /// Fails with [`FerryError::DuplicateKey`] when the record's key
    /// collides with an existing or pending row.
    async fn insert(&mut self, record: &Record) -> Result<Record, FerryError>;

    /// Make the buffered writes durable.
    async fn commit(self: Box<Self>) -> Result<(), FerryError>;

    /// Discard the buffered writes.
    async fn rollback(self: Box<Self>) -> Result<(), FerryError>;
}
