//! In-memory record store for development and tests.
//!
//! Design:
//! - `BTreeMap<RecordId, Record>` holds committed rows; id order is
//!   insertion order, which is what `scan` promises.
//! - A secondary `HashMap<CorrelationKey, RecordId>` index serves keyed
//!   lookups and uniqueness checks.
//! - Transactions buffer their writes and apply them under one lock at
//!   commit; readers only ever see committed state.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{CorrelationKey, FerryError, Record, RecordId, Status};
use crate::pipeline::Source;
use crate::ports::{RecordStore, StoreTxn, TxnProvider};

/// Committed store state.
struct StoreState {
    records: BTreeMap<RecordId, Record>,

    /// Correlation key index over `records`; keys are unique.
    by_key: HashMap<CorrelationKey, RecordId>,

    /// Next id to hand out. Ids are allocated at insert call time, so a
    /// rolled-back transaction leaves a gap, like a real sequence.
    next_id: u64,
}

impl StoreState {
    fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            by_key: HashMap::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> RecordId {
        let id = RecordId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

/// In-memory implementation of [`RecordStore`].
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::new())),
        }
    }

    /// Committed record count.
    pub async fn len(&self) -> usize {
        self.state.lock().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.records.is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TxnProvider for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTxn>, FerryError> {
        Ok(Box::new(InMemoryTxn {
            state: Arc::clone(&self.state),
            pending: Vec::new(),
            pending_keys: HashSet::new(),
        }))
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn find_by_key(&self, key: &CorrelationKey) -> Result<Option<Record>, FerryError> {
        let state = self.state.lock().await;
        Ok(state
            .by_key
            .get(key)
            .and_then(|id| state.records.get(id))
            .cloned())
    }

    async fn scan(&self) -> Result<Box<dyn Source<Record>>, FerryError> {
        let state = self.state.lock().await;
        let snapshot: VecDeque<Record> = state.records.values().cloned().collect();
        Ok(Box::new(SnapshotCursor { records: snapshot }))
    }
}

/// Forward-only cursor over a point-in-time copy of the store.
struct SnapshotCursor {
    records: VecDeque<Record>,
}

#[async_trait]
impl Source<Record> for SnapshotCursor {
    async fn read(&mut self) -> Result<Option<Record>, FerryError> {
        Ok(self.records.pop_front())
    }
}

/// One buffered write.
enum PendingWrite {
    Insert { id: RecordId, record: Record },
    UpdateStatus { key: CorrelationKey, status: Status },
}

/// Transaction handle over [`InMemoryStore`].
///
/// Uniqueness is checked at `insert` time against both committed state and
/// this transaction's own pending inserts, so most duplicates fail fast.
/// Commit re-validates against committed state before applying anything,
/// which catches a key committed by a concurrent transaction in between.
pub struct InMemoryTxn {
    state: Arc<Mutex<StoreState>>,
    pending: Vec<PendingWrite>,
    pending_keys: HashSet<CorrelationKey>,
}

#[async_trait]
impl StoreTxn for InMemoryTxn {
    async fn update_status_by_key(
        &mut self,
        key: &CorrelationKey,
        status: Status,
    ) -> Result<u64, FerryError> {
        let affected = {
            let state = self.state.lock().await;
            if state.by_key.contains_key(key) || self.pending_keys.contains(key) {
                1
            } else {
                0
            }
        };
        if affected == 1 {
            self.pending.push(PendingWrite::UpdateStatus { key: *key, status });
        } else {
            tracing::debug!(key = %key, "status update matched no record");
        }
        Ok(affected)
    }

    async fn insert(&mut self, record: &Record) -> Result<Record, FerryError> {
        if let Some(key) = record.key {
            let state = self.state.lock().await;
            if state.by_key.contains_key(&key) || self.pending_keys.contains(&key) {
                return Err(FerryError::DuplicateKey(key));
            }
        }

        // Ids come from the shared sequence at call time; rollback burns them.
        let id = {
            let mut state = self.state.lock().await;
            state.allocate_id()
        };

        let mut stored = record.clone();
        stored.id = Some(id);
        if let Some(key) = stored.key {
            self.pending_keys.insert(key);
        }
        self.pending.push(PendingWrite::Insert {
            id,
            record: stored.clone(),
        });
        Ok(stored)
    }

    async fn commit(mut self: Box<Self>) -> Result<(), FerryError> {
        let pending = std::mem::take(&mut self.pending);
        let mut state = self.state.lock().await;

        // Validate every insert before applying anything, so a duplicate
        // committed meanwhile cannot leave this transaction half-applied.
        for write in &pending {
            if let PendingWrite::Insert { record, .. } = write
                && let Some(key) = record.key
                && state.by_key.contains_key(&key)
            {
                return Err(FerryError::DuplicateKey(key));
            }
        }

        for write in pending {
            match write {
                PendingWrite::Insert { id, record } => {
                    if let Some(key) = record.key {
                        state.by_key.insert(key, id);
                    }
                    state.records.insert(id, record);
                }
                PendingWrite::UpdateStatus { key, status } => {
                    // Keys are never deleted, so this lookup only misses if
                    // the update was buffered for a key this same
                    // transaction never inserted; skipping matches the
                    // affected-count it reported.
                    if let Some(id) = state.by_key.get(&key).copied()
                        && let Some(record) = state.records.get_mut(&id)
                    {
                        record.status = status;
                    }
                }
            }
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), FerryError> {
        // Buffered writes just drop; allocated ids stay burned.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(store: &InMemoryStore, records: &[Record]) {
        let mut txn = store.begin().await.unwrap();
        for record in records {
            txn.insert(record).await.unwrap();
        }
        txn.commit().await.unwrap();
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = InMemoryStore::new();
        let mut txn = store.begin().await.unwrap();

        let first = txn
            .insert(&Record::new(CorrelationKey::generate(), "a"))
            .await
            .unwrap();
        let second = txn
            .insert(&Record::new(CorrelationKey::generate(), "b"))
            .await
            .unwrap();
        txn.commit().await.unwrap();

        assert_eq!(first.id, Some(RecordId::new(1)));
        assert_eq!(second.id, Some(RecordId::new(2)));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn writes_are_invisible_until_commit() {
        let store = InMemoryStore::new();
        let record = Record::new(CorrelationKey::generate(), "a");
        let key = record.key.unwrap();

        let mut txn = store.begin().await.unwrap();
        txn.insert(&record).await.unwrap();

        assert_eq!(store.find_by_key(&key).await.unwrap(), None);
        assert!(store.is_empty().await);

        txn.commit().await.unwrap();

        let found = store.find_by_key(&key).await.unwrap().unwrap();
        assert_eq!(found.payload, "a");
        assert_eq!(found.id, Some(RecordId::new(1)));
    }

    #[tokio::test]
    async fn rollback_discards_writes_and_burns_ids() {
        let store = InMemoryStore::new();

        let mut txn = store.begin().await.unwrap();
        txn.insert(&Record::new(CorrelationKey::generate(), "a"))
            .await
            .unwrap();
        txn.rollback().await.unwrap();

        assert!(store.is_empty().await);

        // Id 1 was burned by the rolled-back insert.
        let mut txn = store.begin().await.unwrap();
        let stored = txn
            .insert(&Record::new(CorrelationKey::generate(), "b"))
            .await
            .unwrap();
        txn.commit().await.unwrap();

        assert_eq!(stored.id, Some(RecordId::new(2)));
    }

    #[tokio::test]
    async fn duplicate_key_fails_fast_within_a_txn() {
        let store = InMemoryStore::new();
        let key = CorrelationKey::generate();

        let mut txn = store.begin().await.unwrap();
        txn.insert(&Record::new(key, "a")).await.unwrap();
        let err = txn.insert(&Record::new(key, "b")).await.unwrap_err();

        assert!(matches!(err, FerryError::DuplicateKey(k) if k == key));
    }

    #[tokio::test]
    async fn duplicate_key_fails_across_txns() {
        let store = InMemoryStore::new();
        let key = CorrelationKey::generate();
        seed(&store, &[Record::new(key, "a")]).await;

        let mut txn = store.begin().await.unwrap();
        let err = txn.insert(&Record::new(key, "b")).await.unwrap_err();

        assert!(matches!(err, FerryError::DuplicateKey(k) if k == key));
    }

    #[tokio::test]
    async fn concurrent_insert_of_same_key_is_caught_at_commit() {
        let store = InMemoryStore::new();
        let key = CorrelationKey::generate();

        // Both transactions pass the insert-time check.
        let mut txn1 = store.begin().await.unwrap();
        let mut txn2 = store.begin().await.unwrap();
        txn1.insert(&Record::new(key, "a")).await.unwrap();
        txn2.insert(&Record::new(key, "b")).await.unwrap();

        txn1.commit().await.unwrap();
        let err = txn2.commit().await.unwrap_err();

        assert!(matches!(err, FerryError::DuplicateKey(k) if k == key));
        let found = store.find_by_key(&key).await.unwrap().unwrap();
        assert_eq!(found.payload, "a");
    }

    #[tokio::test]
    async fn update_existing_key_reports_one_row_and_applies() {
        let store = InMemoryStore::new();
        let key = CorrelationKey::generate();
        seed(&store, &[Record::new(key, "a")]).await;

        let mut txn = store.begin().await.unwrap();
        let affected = txn
            .update_status_by_key(&key, Status::Processed)
            .await
            .unwrap();
        txn.commit().await.unwrap();

        assert_eq!(affected, 1);
        let found = store.find_by_key(&key).await.unwrap().unwrap();
        assert_eq!(found.status, Status::Processed);
    }

    #[tokio::test]
    async fn update_unknown_key_reports_zero_rows() {
        let store = InMemoryStore::new();
        seed(&store, &[Record::new(CorrelationKey::generate(), "a")]).await;

        let mut txn = store.begin().await.unwrap();
        let affected = txn
            .update_status_by_key(&CorrelationKey::generate(), Status::Processed)
            .await
            .unwrap();
        txn.commit().await.unwrap();

        assert_eq!(affected, 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_sees_inserts_from_the_same_txn() {
        let store = InMemoryStore::new();
        let key = CorrelationKey::generate();

        let mut txn = store.begin().await.unwrap();
        txn.insert(&Record::new(key, "a")).await.unwrap();
        let affected = txn.update_status_by_key(&key, Status::Error).await.unwrap();
        txn.commit().await.unwrap();

        assert_eq!(affected, 1);
        let found = store.find_by_key(&key).await.unwrap().unwrap();
        assert_eq!(found.status, Status::Error);
    }

    #[tokio::test]
    async fn update_commit_touches_only_the_matching_record() {
        let store = InMemoryStore::new();
        let records: Vec<Record> = ["a", "b", "c"]
            .iter()
            .map(|p| Record::new(CorrelationKey::generate(), *p))
            .collect();
        seed(&store, &records).await;
        let target = records[1].key.unwrap();

        let mut txn = store.begin().await.unwrap();
        txn.update_status_by_key(&target, Status::Processed)
            .await
            .unwrap();
        txn.update_status_by_key(&target, Status::Retry).await.unwrap();
        txn.commit().await.unwrap();

        // Buffered updates replay in order against the indexed row.
        let updated = store.find_by_key(&target).await.unwrap().unwrap();
        assert_eq!(updated.status, Status::Retry);
        for other in [&records[0], &records[2]] {
            let key = other.key.unwrap();
            let record = store.find_by_key(&key).await.unwrap().unwrap();
            assert_eq!(record.status, Status::Pending);
        }
    }

    #[tokio::test]
    async fn scan_yields_insertion_order_and_fresh_cursors() {
        let store = InMemoryStore::new();
        let records: Vec<Record> = ["a", "b", "c"]
            .iter()
            .map(|p| Record::new(CorrelationKey::generate(), *p))
            .collect();
        seed(&store, &records).await;

        let mut cursor = store.scan().await.unwrap();
        for expected in ["a", "b", "c"] {
            let record = cursor.read().await.unwrap().unwrap();
            assert_eq!(record.payload, expected);
        }
        assert!(cursor.read().await.unwrap().is_none());

        // A second scan starts from the beginning again.
        let mut cursor = store.scan().await.unwrap();
        let first = cursor.read().await.unwrap().unwrap();
        assert_eq!(first.payload, "a");
    }

    #[tokio::test]
    async fn scan_is_a_snapshot() {
        let store = InMemoryStore::new();
        seed(&store, &[Record::new(CorrelationKey::generate(), "a")]).await;

        let mut cursor = store.scan().await.unwrap();
        seed(&store, &[Record::new(CorrelationKey::generate(), "b")]).await;

        assert!(cursor.read().await.unwrap().is_some());
        // The row committed after the scan opened is not part of it.
        assert!(cursor.read().await.unwrap().is_none());
    }
}
