//! Pipeline configuration.
//!
//! Plain structs passed explicitly to the run functions. There is no
//! process-wide configuration state; two runs with different settings can
//! coexist in one process.

use std::time::Duration;

/// Consumer pipeline settings.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Destination the status updates arrive on.
    pub queue: String,

    /// Items per transaction.
    pub chunk_size: usize,

    /// How long one receive waits before the run counts as drained.
    pub receive_timeout: Duration,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            queue: "records.status".to_string(),
            chunk_size: 10,
            receive_timeout: Duration::from_millis(5000),
        }
    }
}

/// Producer pipeline settings.
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Destination the records are broadcast to.
    pub queue: String,

    /// Items per transaction.
    pub chunk_size: usize,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            queue: "records.broadcast".to_string(),
            chunk_size: 10,
        }
    }
}
