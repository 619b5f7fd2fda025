//! Segment-parallel scoring.
//!
//! Each segment gets its own session on a rayon worker. Sessions share only
//! the factory's immutable query vector, so no locking is involved. Within a
//! segment, documents are scored sequentially in the order given.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::doc_values::{DocId, SegmentReader};
use crate::factory::{ScorerFactory, metric_name};
use crate::metric::Metric;
use crate::session::DocScorer;

/// Documents of one segment to score.
#[derive(Debug, Clone)]
pub struct SegmentTask<'a> {
    /// Segment to read from.
    pub segment: &'a dyn SegmentReader,
    /// Candidate documents, strictly increasing.
    pub doc_ids: Vec<DocId>,
}

impl<'a> SegmentTask<'a> {
    /// Score the given documents of `segment`.
    pub fn new(segment: &'a dyn SegmentReader, doc_ids: Vec<DocId>) -> Self {
        SegmentTask { segment, doc_ids }
    }

    /// Score every document of `segment`.
    pub fn all_docs(segment: &'a dyn SegmentReader) -> Self {
        SegmentTask {
            segment,
            doc_ids: (0..segment.max_doc()).collect(),
        }
    }
}

/// One scored document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredDoc {
    /// Segment ordinal.
    pub segment: usize,
    /// Document id within the segment.
    pub doc_id: DocId,
    /// Raw metric score.
    pub score: f64,
}

/// Scores produced for one segment, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentScores {
    /// Segment ordinal.
    pub segment: usize,
    /// Scored documents.
    pub docs: Vec<ScoredDoc>,
}

/// Score every task in parallel. Output order matches `tasks`.
pub fn score_segments(factory: &ScorerFactory, tasks: &[SegmentTask<'_>]) -> Vec<SegmentScores> {
    debug!(
        segments = tasks.len(),
        metric = metric_name(factory.metric()),
        "scoring segments"
    );

    tasks
        .par_iter()
        .map(|task| score_segment(factory, task))
        .collect()
}

/// Score one task on the calling thread.
pub fn score_segment(factory: &ScorerFactory, task: &SegmentTask<'_>) -> SegmentScores {
    let segment = task.segment.ord();
    let mut session = factory.new_session(task.segment);
    let mut docs = Vec::with_capacity(task.doc_ids.len());
    let mut last: Option<DocId> = None;

    for &doc_id in &task.doc_ids {
        if let Some(prev) = last
            && doc_id <= prev
        {
            warn!(segment, doc_id, prev, "skipping out-of-order document");
            continue;
        }
        last = Some(doc_id);

        session.set_document(doc_id);
        docs.push(ScoredDoc {
            segment,
            doc_id,
            score: session.execute(),
        });
    }

    SegmentScores { segment, docs }
}

/// Order documents best first for `metric`.
///
/// Larger scores come first for similarities, smaller for distances.
/// Ties keep segment and document order.
pub fn sort_best_first(docs: &mut [ScoredDoc], metric: Metric) {
    docs.sort_by(|a, b| {
        let by_score = if metric.higher_is_better() {
            b.score.total_cmp(&a.score)
        } else {
            a.score.total_cmp(&b.score)
        };
        by_score
            .then_with(|| a.segment.cmp(&b.segment))
            .then_with(|| a.doc_id.cmp(&b.doc_id))
    });
}
