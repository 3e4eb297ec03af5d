mod logging;

use std::sync::Arc;
use std::time::Duration;

use ferry_core::app::{ConsumerConfig, ProducerConfig, run_consumer, run_producer};
use ferry_core::codec::{MessageCodec, StatusUpdateCodec};
use ferry_core::domain::{CorrelationKey, Record, Status, StatusUpdate};
use ferry_core::impls::{InMemoryBroker, InMemoryStore};
use ferry_core::ports::{MessageBroker, RecordStore, TxnProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("info");

    // (A) One broker, a primary store, and an empty archive.
    let broker = Arc::new(InMemoryBroker::new());
    let primary = Arc::new(InMemoryStore::new());
    let archive = Arc::new(InMemoryStore::new());

    // (B) Seed the primary store, keeping the keys for later.
    let payloads = ["invoice 1001", "invoice 1002", "invoice 1003"];
    let mut keys = Vec::new();
    let mut txn = primary.begin().await?;
    for payload in payloads {
        let record = Record::new(CorrelationKey::generate(), payload);
        if let Some(key) = record.key {
            keys.push(key);
        }
        txn.insert(&record).await?;
    }
    txn.commit().await?;
    tracing::info!(records = keys.len(), "primary store seeded");

    // (C) Producer: broadcast every record and archive it.
    let producer_config = ProducerConfig::default();
    let broadcast_queue = producer_config.queue.clone();
    let report = run_producer(
        Arc::clone(&broker) as Arc<dyn MessageBroker>,
        Arc::clone(&primary),
        Arc::clone(&archive),
        producer_config,
    )
    .await?;
    println!(
        "producer: {} chunks, {} records; {} messages waiting on {broadcast_queue}, {} archived",
        report.chunks_committed,
        report.items_written,
        broker.depth(&broadcast_queue),
        archive.len().await,
    );

    // (D) Status updates come back for two of the keys, plus one key
    //     nobody has ever seen.
    let consumer_config = ConsumerConfig {
        receive_timeout: Duration::from_millis(200),
        ..ConsumerConfig::default()
    };
    let codec = StatusUpdateCodec::new();
    let updates = [
        StatusUpdate::new(keys[0], Status::Processed),
        StatusUpdate::new(keys[1], Status::Error),
        StatusUpdate::new(CorrelationKey::generate(), Status::Processed),
    ];
    for update in &updates {
        broker
            .send(&consumer_config.queue, codec.encode(update)?)
            .await?;
    }

    // (E) Consumer: drain the updates into the archive.
    let report = run_consumer(
        Arc::clone(&broker) as Arc<dyn MessageBroker>,
        Arc::clone(&archive),
        consumer_config,
    )
    .await?;
    println!(
        "consumer: {} chunks, {} updates applied",
        report.chunks_committed, report.items_written
    );

    // (F) What the archive ended up with.
    for key in &keys {
        if let Some(record) = archive.find_by_key(key).await? {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }
    Ok(())
}
