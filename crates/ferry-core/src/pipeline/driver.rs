//! ChunkedDriver: fill a chunk, commit a chunk, repeat until the source
//! dries up.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::FerryError;
use crate::ports::TxnProvider;

use super::{Chunk, Sink, Source};

/// Driver run state.
///
/// Transitions:
/// - Idle -> Running (`run` entered)
/// - Running -> Completed (source exhausted, final chunk committed)
/// - Running -> Failed (any read, write, commit, or begin error)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Failed,
}

impl RunState {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Completed | RunState::Failed)
    }
}

/// What a successful run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub chunks_committed: u64,
    pub items_written: u64,
}

/// Chunk-at-a-time pipeline driver.
///
/// One logical worker: read items from the source until a chunk is full or
/// the source returns `None`, then write the chunk through the sink inside
/// a single store transaction. The atomicity unit is the chunk: a run
/// failing on chunk K leaves chunks 1..K-1 durably committed and K rolled
/// back. The run is not re-driven automatically.
///
/// An exhausted source on the very first read is a successful run that
/// wrote nothing.
pub struct ChunkedDriver<T> {
    source: Box<dyn Source<T>>,
    sink: Box<dyn Sink<T>>,
    txns: Arc<dyn TxnProvider>,
    chunk_size: usize,
    state: RunState,
}

impl<T: Send + Sync + 'static> ChunkedDriver<T> {
    /// # Panics
    /// Panics when `chunk_size` is zero.
    pub fn new(
        source: Box<dyn Source<T>>,
        sink: Box<dyn Sink<T>>,
        txns: Arc<dyn TxnProvider>,
        chunk_size: usize,
    ) -> Self {
        assert!(chunk_size > 0, "chunk_size must be positive");
        Self {
            source,
            sink,
            txns,
            chunk_size,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Drive the pipeline to completion.
    ///
    /// On success returns the report and `state()` reads `Completed`. On
    /// error the in-progress chunk has been rolled back, earlier chunks
    /// stay committed, and `state()` reads `Failed`.
    pub async fn run(&mut self) -> Result<RunReport, FerryError> {
        self.state = RunState::Running;
        match self.drive().await {
            Ok(report) => {
                self.state = RunState::Completed;
                tracing::info!(
                    chunks = report.chunks_committed,
                    items = report.items_written,
                    "pipeline run completed"
                );
                Ok(report)
            }
            Err(e) => {
                self.state = RunState::Failed;
                tracing::error!(error = %e, "pipeline run failed");
                Err(e)
            }
        }
    }

    async fn drive(&mut self) -> Result<RunReport, FerryError> {
        let mut report = RunReport::default();
        loop {
            let (chunk, exhausted) = self.fill_chunk().await?;

            if !chunk.is_empty() {
                self.commit_chunk(&chunk).await?;
                report.chunks_committed += 1;
                report.items_written += chunk.len() as u64;
            }

            if exhausted {
                return Ok(report);
            }
        }
    }

    /// Read until the chunk is full or the source returns `None`.
    async fn fill_chunk(&mut self) -> Result<(Chunk<T>, bool), FerryError> {
        let mut chunk = Chunk::new(self.chunk_size);
        while !chunk.is_full() {
            match self.source.read().await? {
                Some(item) => chunk.push(item),
                None => return Ok((chunk, true)),
            }
        }
        Ok((chunk, false))
    }

    /// One transaction per chunk. On a sink error the transaction rolls
    /// back; a rollback failure is logged and the sink error wins.
    async fn commit_chunk(&mut self, chunk: &Chunk<T>) -> Result<(), FerryError> {
        let mut txn = self.txns.begin().await?;
        match self.sink.write(&mut *txn, chunk).await {
            Ok(()) => {
                txn.commit().await?;
                tracing::debug!(items = chunk.len(), "chunk committed");
                Ok(())
            }
            Err(write_err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::warn!(error = %rollback_err, "rollback failed");
                }
                Err(write_err)
            }
        }
    }
}
