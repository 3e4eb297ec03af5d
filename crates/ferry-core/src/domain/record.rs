//! Record entity and its store-assigned identifier.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::key::CorrelationKey;
use super::status::Status;

/// Store-assigned row identifier (sequence-backed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(u64);

impl RecordId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The entity synchronized between store and queue.
///
/// Field notes:
/// - `id` is present only once the record has been persisted; the store
///   assigns it.
/// - `key` is assigned at creation and never changes. It is what messages
///   carry to refer back to this record, and it is unique across all
///   records when present. Records decoded from a broadcast whose
///   correlation header was missing or unreadable have no key.
/// - `payload` is an opaque text blob; the engine never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: Option<RecordId>,
    pub key: Option<CorrelationKey>,
    pub payload: String,
    pub created_on: NaiveDate,
    pub status: Status,
}

impl Record {
    /// New unsaved record: no id yet, status `Pending`, dated today.
    pub fn new(key: CorrelationKey, payload: impl Into<String>) -> Self {
        Self {
            id: None,
            key: Some(key),
            payload: payload.into(),
            created_on: chrono::Utc::now().date_naive(),
            status: Status::Pending,
        }
    }

    /// Same as [`Record::new`] but without a correlation key.
    pub fn new_unkeyed(payload: impl Into<String>) -> Self {
        Self {
            key: None,
            ..Self::new(CorrelationKey::generate(), payload)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_starts_pending_and_unsaved() {
        let key = CorrelationKey::generate();
        let record = Record::new(key, "<data/>");

        assert_eq!(record.id, None);
        assert_eq!(record.key, Some(key));
        assert_eq!(record.payload, "<data/>");
        assert_eq!(record.status, Status::Pending);
        assert_eq!(record.created_on, chrono::Utc::now().date_naive());
    }

    #[test]
    fn unkeyed_record_has_no_key() {
        let record = Record::new_unkeyed("<data/>");
        assert_eq!(record.key, None);
        assert_eq!(record.status, Status::Pending);
    }

    #[test]
    fn serde_roundtrip_keeps_key_textual() {
        let record = Record::new(CorrelationKey::generate(), "payload");
        let json = serde_json::to_value(&record).unwrap();

        // Key serializes as its 26-char wire form.
        let key_text = json["key"].as_str().unwrap();
        assert_eq!(key_text.len(), 26);

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
