//! Wire codecs: domain items to and from transport messages.

mod record;
mod status_update;

pub use record::RecordCodec;
pub use status_update::StatusUpdateCodec;

use crate::domain::{FerryError, WireMessage};

/// Bidirectional mapping between one domain item and one wire message.
///
/// Codecs are pure: no I/O, no state. How strict decoding is depends on the
/// direction; see the two implementations for what each tolerates.
pub trait MessageCodec<T>: Send + Sync {
    fn encode(&self, item: &T) -> Result<WireMessage, FerryError>;

    fn decode(&self, message: WireMessage) -> Result<T, FerryError>;
}
