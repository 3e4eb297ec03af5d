//! Store writer for status updates.

use async_trait::async_trait;

use crate::domain::{FerryError, StatusUpdate};
use crate::pipeline::{Chunk, Sink};
use crate::ports::StoreTxn;

/// Applies each status update by key, inside the chunk transaction.
///
/// Unknown keys are skipped, not failed: an update can outlive its record,
/// and rows-affected zero is everything a store has to say about that.
/// Applying the same update twice lands on the same end state, which is
/// what makes rerunning a failed drain safe.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusUpdateWriter;

impl StatusUpdateWriter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Sink<StatusUpdate> for StatusUpdateWriter {
    async fn write(
        &self,
        txn: &mut dyn StoreTxn,
        chunk: &Chunk<StatusUpdate>,
    ) -> Result<(), FerryError> {
        for update in chunk.iter() {
            let affected = txn.update_status_by_key(&update.key, update.status).await?;
            if affected == 0 {
                tracing::debug!(key = %update.key, status = %update.status, "no record for status update");
            }
        }
        Ok(())
    }
}
