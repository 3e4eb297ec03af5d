use thiserror::Error;

use super::key::CorrelationKey;

/// Crate-level error type.
///
/// Every variant is fatal to the pipeline run that raises it: the current
/// chunk rolls back and the error surfaces to the caller. Unknown keys on a
/// status update are deliberately NOT here; they are a rows-affected count
/// of zero, not a failure.
#[derive(Debug, Error)]
pub enum FerryError {
    #[error("decode failed: {0}")]
    Decode(String),

    #[error("encode failed: {0}")]
    Encode(String),

    #[error("duplicate correlation key {0}")]
    DuplicateKey(CorrelationKey),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("store failure: {0}")]
    Store(String),
}
