//! Codec for producer-direction record broadcasts.

use crate::domain::{CorrelationKey, FerryError, Record, WireMessage};

use super::MessageCodec;

/// Maps a [`Record`] to a text message: the body is the full payload, the
/// correlation header is the key's wire form when the record has one.
///
/// Decoding tolerates a bad header on purpose: a missing or unparsable
/// correlation id leaves the key unset instead of failing, because the
/// payload alone is still a usable record. The body must be text. Decoded
/// records materialize as fresh unsaved rows: no id, status `Pending`,
/// dated at receipt.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordCodec;

impl RecordCodec {
    pub fn new() -> Self {
        Self
    }
}

impl MessageCodec<Record> for RecordCodec {
    fn encode(&self, record: &Record) -> Result<WireMessage, FerryError> {
        let message = WireMessage::text(record.payload.clone());
        Ok(match record.key {
            Some(key) => message.with_correlation_id(key.to_string()),
            None => message,
        })
    }

    fn decode(&self, message: WireMessage) -> Result<Record, FerryError> {
        let key = match message.correlation_id() {
            Some(header) => match header.parse::<CorrelationKey>() {
                Ok(key) => Some(key),
                Err(e) => {
                    tracing::debug!(header, error = %e, "ignoring unreadable correlation header");
                    None
                }
            },
            None => None,
        };

        let body = message
            .text_body()
            .ok_or_else(|| FerryError::Decode("record body is not text".into()))?;

        Ok(match key {
            Some(key) => Record::new(key, body),
            None => Record::new_unkeyed(body),
        })
    }
}
