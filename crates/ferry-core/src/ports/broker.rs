//! MessageBroker port: named destinations with timeout-bounded receive.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::{FerryError, WireMessage};

/// Queue transport seam.
///
/// Design intent:
/// - `receive` blocks up to `timeout` and returns `Ok(None)` when nothing
///   arrived in time; the pipeline treats that as end-of-input, never as an
///   error.
/// - A message returned from `receive` is consumed. There is no redelivery,
///   so whatever happens after the receive is the caller's problem.
/// - `send` is fire-and-forget; durability is the broker's concern.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Publish one message to a destination.
    async fn send(&self, destination: &str, message: WireMessage) -> Result<(), FerryError>;

    /// Receive one message, waiting up to `timeout`.
    async fn receive(
        &self,
        destination: &str,
        timeout: Duration,
    ) -> Result<Option<WireMessage>, FerryError>;
}
