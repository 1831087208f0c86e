//! Batch insert over one client stream
//!
//! A producer routine feeds a bounded channel with one `InsertRequest` per
//! item, in input order; the channel's receiver is the request stream. The
//! server answers once, after end-of-stream, with a summary that carries
//! item-level failures as data.

use std::sync::Arc;

use futures::channel::mpsc;
use futures::{SinkExt, StreamExt};
use tracing::debug;

use crate::error::Result;
use crate::request::{self, Metadata};
use crate::response::BatchOutcome;
use crate::transport::{Session, VectorTransport};

/// Progress of a batch insert
///
/// `Idle -> Streaming -> AwaitingSummary -> Complete`. A transport failure
/// after leaving `Idle` ends in `Failed`; a rejected namespace leaves the
/// batch `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Streaming,
    AwaitingSummary,
    Complete,
    Failed,
}

/// Drives one batch insert from input items to a `BatchOutcome`
pub struct BatchInsert {
    namespace: String,
    items: Vec<(Vec<f32>, Metadata)>,
    buffer: usize,
    state: BatchState,
}

impl BatchInsert {
    pub fn new(namespace: impl Into<String>, items: Vec<(Vec<f32>, Metadata)>, buffer: usize) -> Self {
        Self {
            namespace: namespace.into(),
            items,
            buffer: buffer.max(1),
            state: BatchState::Idle,
        }
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn transition(&mut self, next: BatchState) {
        debug!(
            "batch insert into '{}': {:?} -> {:?}",
            self.namespace, self.state, next
        );
        self.state = next;
    }

    /// Stream every item and wait for the server's summary
    ///
    /// Empty input completes immediately without opening a stream. If the
    /// transport fails before the summary arrives the whole call fails and
    /// no item is reported as inserted.
    pub async fn run(&mut self, session: &Session) -> Result<BatchOutcome> {
        request::require_namespace(&self.namespace)?;

        if self.items.is_empty() {
            self.transition(BatchState::Complete);
            return Ok(BatchOutcome::default());
        }

        let count = self.items.len();
        let namespace = self.namespace.clone();
        let items = std::mem::take(&mut self.items);
        let (mut tx, rx) = mpsc::channel(self.buffer);

        // Dropping `tx` at the end of this routine is the end-of-stream signal
        let produce = async move {
            for (vector, metadata) in items {
                let message = request::batch_item(&namespace, vector, metadata);
                if tx.send(message).await.is_err() {
                    // Receiver gone: the call has already failed
                    break;
                }
            }
        };
        let call = session.call("batch_insert", move |transport: Arc<dyn VectorTransport>| async move {
            transport.batch_insert(rx.boxed()).await
        });
        tokio::pin!(produce);
        tokio::pin!(call);

        self.transition(BatchState::Streaming);
        let response = tokio::select! {
            biased;
            _ = &mut produce => {
                self.transition(BatchState::AwaitingSummary);
                call.await
            }
            response = &mut call => response,
        };
        let response = match response {
            Ok(response) => response,
            Err(e) => {
                self.transition(BatchState::Failed);
                return Err(e);
            }
        };

        let outcome = BatchOutcome::from(response);
        debug!(
            "batch insert sent {} items: {} inserted, {} failed",
            count, outcome.inserted_count, outcome.failed_count
        );
        self.transition(BatchState::Complete);
        Ok(outcome)
    }
}
