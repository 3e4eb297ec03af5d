//! Producer pipeline: stream the store out to the broker and an archive.

use std::sync::Arc;

use crate::codec::RecordCodec;
use crate::domain::{FerryError, Record};
use crate::impls::{QueueSink, RecordInsertWriter};
use crate::pipeline::{ChunkedDriver, FanoutSink, RunReport, Sink};
use crate::ports::{MessageBroker, RecordStore, TxnProvider};

use super::ProducerConfig;

/// Stream every record in `source_store` out through the fan-out: broadcast
/// to `config.queue`, then archive into `dest_store`, one chunk per archive
/// transaction. The source rows are read through a snapshot cursor and
/// never modified.
///
/// Within a chunk the broadcast runs first and outside the archive
/// transaction. When archiving fails, the chunk rolls back but its messages
/// are already on the queue; consumers of the broadcast must tolerate
/// records that never reached the archive. Earlier chunks stay committed
/// either way.
pub async fn run_producer<P, D>(
    broker: Arc<dyn MessageBroker>,
    source_store: Arc<P>,
    dest_store: Arc<D>,
    config: ProducerConfig,
) -> Result<RunReport, FerryError>
where
    P: RecordStore + 'static,
    D: TxnProvider + 'static,
{
    tracing::info!(queue = %config.queue, chunk_size = config.chunk_size, "producer run starting");

    let source = source_store.scan().await?;
    let sink = FanoutSink::new(vec![
        Box::new(QueueSink::new(
            broker,
            Arc::new(RecordCodec::new()),
            config.queue,
        )) as Box<dyn Sink<Record>>,
        Box::new(RecordInsertWriter::new()),
    ]);
    let mut driver = ChunkedDriver::new(source, Box::new(sink), dest_store, config.chunk_size);
    driver.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::MessageCodec;
    use crate::domain::{CorrelationKey, RecordId, Status};
    use crate::impls::{InMemoryBroker, InMemoryStore};
    use std::time::Duration;

    async fn seed(store: &InMemoryStore, payloads: &[&str]) -> Vec<CorrelationKey> {
        let mut keys = Vec::new();
        let mut txn = store.begin().await.unwrap();
        for payload in payloads {
            let record = Record::new(CorrelationKey::generate(), *payload);
            keys.push(record.key.unwrap());
            txn.insert(&record).await.unwrap();
        }
        txn.commit().await.unwrap();
        keys
    }

    #[tokio::test]
    async fn broadcasts_and_archives_every_record() {
        let broker = Arc::new(InMemoryBroker::new());
        let primary = Arc::new(InMemoryStore::new());
        let archive = Arc::new(InMemoryStore::new());
        let keys = seed(&primary, &["alpha", "beta", "gamma"]).await;

        let report = run_producer(
            Arc::clone(&broker) as Arc<dyn MessageBroker>,
            Arc::clone(&primary),
            Arc::clone(&archive),
            ProducerConfig {
                queue: "broadcast".to_string(),
                chunk_size: 10,
            },
        )
        .await
        .unwrap();

        assert_eq!(report.items_written, 3);
        assert_eq!(report.chunks_committed, 1);
        assert_eq!(primary.len().await, 3);
        assert_eq!(archive.len().await, 3);

        // Messages come out in store order, each carrying the key header
        // and the payload.
        let codec = RecordCodec::new();
        for (key, payload) in keys.iter().zip(["alpha", "beta", "gamma"]) {
            let message = broker
                .receive("broadcast", Duration::from_millis(100))
                .await
                .unwrap()
                .unwrap();
            let record = codec.decode(message).unwrap();
            assert_eq!(record.key, Some(*key));
            assert_eq!(record.payload, payload);
        }

        // Archive rows keep their keys but carry archive-assigned ids.
        let archived = archive.find_by_key(&keys[0]).await.unwrap().unwrap();
        assert_eq!(archived.id, Some(RecordId::new(1)));
        assert_eq!(archived.payload, "alpha");
        assert_eq!(archived.status, Status::Pending);
    }

    #[tokio::test]
    async fn empty_store_produces_nothing() {
        let broker = Arc::new(InMemoryBroker::new());
        let primary = Arc::new(InMemoryStore::new());
        let archive = Arc::new(InMemoryStore::new());

        let report = run_producer(
            Arc::clone(&broker) as Arc<dyn MessageBroker>,
            primary,
            Arc::clone(&archive),
            ProducerConfig {
                queue: "broadcast".to_string(),
                chunk_size: 10,
            },
        )
        .await
        .unwrap();

        assert_eq!(report, RunReport::default());
        assert_eq!(broker.depth("broadcast"), 0);
        assert!(archive.is_empty().await);
    }

    #[tokio::test]
    async fn colliding_archive_key_fails_the_run_but_the_broadcast_is_out() {
        let broker = Arc::new(InMemoryBroker::new());
        let primary = Arc::new(InMemoryStore::new());
        let archive = Arc::new(InMemoryStore::new());
        let keys = seed(&primary, &["fresh", "colliding"]).await;

        // The archive already holds a row under the second key.
        let mut txn = archive.begin().await.unwrap();
        txn.insert(&Record::new(keys[1], "already archived"))
            .await
            .unwrap();
        txn.commit().await.unwrap();

        let err = run_producer(
            Arc::clone(&broker) as Arc<dyn MessageBroker>,
            Arc::clone(&primary),
            Arc::clone(&archive),
            ProducerConfig {
                queue: "broadcast".to_string(),
                chunk_size: 1,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FerryError::DuplicateKey(_)));
        // Chunk one went through whole. Chunk two rolled back its insert
        // after the publish had gone out, so the queue now holds a
        // broadcast with no matching archive row.
        assert_eq!(broker.depth("broadcast"), 2);
        assert_eq!(archive.len().await, 2);
        assert_eq!(
            archive.find_by_key(&keys[0]).await.unwrap().unwrap().payload,
            "fresh"
        );
        assert_eq!(
            archive.find_by_key(&keys[1]).await.unwrap().unwrap().payload,
            "already archived"
        );
    }
}
