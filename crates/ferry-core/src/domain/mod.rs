//! Domain model (records, keys, statuses, wire messages, errors).

pub mod errors;
pub mod key;
pub mod message;
pub mod record;
pub mod status;
pub mod status_update;

pub use self::errors::FerryError;
pub use self::key::CorrelationKey;
pub use self::message::{MessageBody, WireMessage};
pub use self::record::{Record, RecordId};
pub use self::status::Status;
pub use self::status_update::StatusUpdate;
