//! Codec for consumer-direction status updates.

use crate::domain::{CorrelationKey, FerryError, Status, StatusUpdate, WireMessage};

use super::MessageCodec;

/// Maps a [`StatusUpdate`] to a text message: the body is the decimal
/// status code, the correlation header is the key's wire form.
///
/// Decoding is strict in both fields. An update without a readable key or a
/// readable code cannot be applied to anything, so a missing header, a
/// non-text or empty body, an unparsable key, and an unknown code are all
/// [`FerryError::Decode`]. The code may arrive padded with whitespace; a
/// body that is nothing but whitespace still fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusUpdateCodec;

impl StatusUpdateCodec {
    pub fn new() -> Self {
        Self
    }
}

impl MessageCodec<StatusUpdate> for StatusUpdateCodec {
    fn encode(&self, update: &StatusUpdate) -> Result<WireMessage, FerryError> {
        Ok(WireMessage::text(update.status.code().to_string())
            .with_correlation_id(update.key.to_string()))
    }

    fn decode(&self, message: WireMessage) -> Result<StatusUpdate, FerryError> {
        let header = message
            .correlation_id()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| FerryError::Decode("status update without correlation header".into()))?;
        let key: CorrelationKey = header
            .parse()
            .map_err(|e| FerryError::Decode(format!("bad correlation header {header:?}: {e}")))?;

        let body = message
            .text_body()
            .ok_or_else(|| FerryError::Decode("status update body is not text".into()))?;
        if body.is_empty() {
            return Err(FerryError::Decode("status update with empty body".into()));
        }
        let code: i32 = body
            .trim()
            .parse()
            .map_err(|e| FerryError::Decode(format!("bad status code {body:?}: {e}")))?;
        let status = Status::try_from(code)?;

        Ok(StatusUpdate::new(key, status))
    }
}
