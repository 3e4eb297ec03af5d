//! Status update instruction carried by consumer-direction messages.

use serde::{Deserialize, Serialize};

use super::key::CorrelationKey;
use super::status::Status;

/// Instruction to set the status of the record identified by `key`.
///
/// Transient by construction: decoded from a message, applied to the store,
/// dropped. Unlike on a record, the key here is mandatory; an update that
/// cannot name its record is meaningless and fails decoding instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub key: CorrelationKey,
    pub status: Status,
}

impl StatusUpdate {
    pub fn new(key: CorrelationKey, status: Status) -> Self {
        Self { key, status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip() {
        let update = StatusUpdate::new(CorrelationKey::generate(), Status::Processed);
        let json = serde_json::to_string(&update).unwrap();
        let back: StatusUpdate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, update);
    }
}
