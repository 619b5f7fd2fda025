//! Per-segment scoring session.
//!
//! A session is bound to one segment's doc-values cursor for the configured
//! field. The host positions it with [`DocScorer::set_document`] and then
//! asks for the score with [`DocScorer::execute`]. Missing values, I/O
//! failures and malformed or mismatched vectors all score `0.0`; nothing on
//! this path returns an error.

use std::sync::Arc;

use tracing::trace;

use crate::codec::VectorCodec;
use crate::doc_values::{BinaryDocValues, DocId};
use crate::metric::Metric;
use crate::vector::QueryVector;

/// The two operations a host needs from a per-segment scorer.
pub trait DocScorer {
    /// Move to `doc_id`. Ids must be strictly increasing within a session.
    fn set_document(&mut self, doc_id: DocId);

    /// Score the current document.
    fn execute(&mut self) -> f64;
}

/// Where the session stands with respect to the current document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No document has been set yet.
    Unbound,
    /// The current document has a value for the field.
    Bound(DocId),
    /// The current document has no readable value for the field.
    Absent(DocId),
}

/// Scores the documents of one segment against a shared query vector.
pub struct VectorScoreSession<'s> {
    query: Arc<QueryVector>,
    /// `None` scores every document `0.0`.
    metric: Option<Metric>,
    codec: VectorCodec,
    /// `None` when the segment has no values for the field at all.
    accessor: Option<Box<dyn BinaryDocValues + 's>>,
    state: SessionState,
    /// Reused for every decoded document vector.
    scratch: Vec<f64>,
}

impl<'s> VectorScoreSession<'s> {
    /// Create a session over `accessor`.
    pub fn new(
        query: Arc<QueryVector>,
        metric: Option<Metric>,
        accessor: Option<Box<dyn BinaryDocValues + 's>>,
    ) -> Self {
        let dimension = query.dimension();
        VectorScoreSession {
            codec: VectorCodec::new(dimension),
            scratch: Vec::with_capacity(dimension),
            query,
            metric,
            accessor,
            state: SessionState::Unbound,
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the segment carries the field at all.
    pub fn has_field(&self) -> bool {
        self.accessor.is_some()
    }

    /// Convenience for `set_document` followed by `execute`.
    pub fn score(&mut self, doc_id: DocId) -> f64 {
        self.set_document(doc_id);
        self.execute()
    }
}

impl DocScorer for VectorScoreSession<'_> {
    fn set_document(&mut self, doc_id: DocId) {
        let Some(accessor) = self.accessor.as_mut() else {
            self.state = SessionState::Absent(doc_id);
            return;
        };

        self.state = match accessor.advance_exact(doc_id) {
            Ok(true) => SessionState::Bound(doc_id),
            Ok(false) => SessionState::Absent(doc_id),
            Err(e) => {
                trace!(doc_id, error = %e, "doc values advance failed");
                SessionState::Absent(doc_id)
            }
        };
    }

    fn execute(&mut self) -> f64 {
        let Some(metric) = self.metric else {
            return 0.0;
        };
        let doc_id = match self.state {
            SessionState::Bound(doc_id) => doc_id,
            SessionState::Unbound | SessionState::Absent(_) => return 0.0,
        };
        let Some(accessor) = self.accessor.as_mut() else {
            return 0.0;
        };

        let bytes = match accessor.binary_value() {
            Ok(bytes) => bytes,
            Err(e) => {
                trace!(doc_id, error = %e, "doc values read failed");
                return 0.0;
            }
        };

        match self.codec.decode_into(bytes, &mut self.scratch) {
            Some(doc) => metric.score(doc, &self.query),
            None => {
                trace!(
                    doc_id,
                    len = bytes.len(),
                    dimension = self.codec.dimension(),
                    "document vector unreadable or of wrong dimension"
                );
                0.0
            }
        }
    }
}
