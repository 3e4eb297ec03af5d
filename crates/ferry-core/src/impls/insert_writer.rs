//! Store writer that archives records.

use async_trait::async_trait;

use crate::domain::{FerryError, Record};
use crate::pipeline::{Chunk, Sink};
use crate::ports::StoreTxn;

/// Inserts each chunk record into the destination store, inside the chunk
/// transaction. The destination assigns fresh ids; correlation keys carry
/// over as-is, so a key already present downstream fails the chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordInsertWriter;

impl RecordInsertWriter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Sink<Record> for RecordInsertWriter {
    async fn write(&self, txn: &mut dyn StoreTxn, chunk: &Chunk<Record>) -> Result<(), FerryError> {
        for record in chunk.iter() {
            txn.insert(record).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CorrelationKey, RecordId};
    use crate::impls::InMemoryStore;
    use crate::ports::{RecordStore, TxnProvider};

    #[tokio::test]
    async fn archived_records_get_fresh_ids_and_keep_keys() {
        let store = InMemoryStore::new();
        let key = CorrelationKey::generate();

        // Simulate a record that already has an id in its home store.
        let mut record = Record::new(key, "payload");
        record.id = Some(RecordId::new(41));

        let mut chunk = Chunk::new(1);
        chunk.push(record);

        let mut txn = store.begin().await.unwrap();
        RecordInsertWriter::new()
            .write(&mut *txn, &chunk)
            .await
            .unwrap();
        txn.commit().await.unwrap();

        let archived = store.find_by_key(&key).await.unwrap().unwrap();
        assert_eq!(archived.id, Some(RecordId::new(1)));
        assert_eq!(archived.payload, "payload");
    }
}
