//! Per-query scorer factory.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::doc_values::SegmentReader;
use crate::error::Result;
use crate::metric::Metric;
use crate::params::ScoringParams;
use crate::session::VectorScoreSession;
use crate::vector::QueryVector;

/// Compiled form of one query's scoring parameters.
///
/// Built once per query. It owns the query vector and hands out one
/// independent [`VectorScoreSession`] per segment; sessions share the query
/// vector read-only and nothing else.
#[derive(Debug, Clone)]
pub struct ScorerFactory {
    field: String,
    metric: Option<Metric>,
    query: Arc<QueryVector>,
    exclude: bool,
}

impl ScorerFactory {
    /// Build the query vector and resolve the metric.
    pub fn new(params: ScoringParams) -> Result<Self> {
        let query = QueryVector::from_source(params.vector, params.metric)?;

        debug!(
            field = %params.field,
            metric = metric_name(params.metric),
            dimension = query.dimension(),
            "compiled vector score"
        );

        Ok(ScorerFactory {
            field: params.field,
            metric: params.metric,
            query: Arc::new(query),
            exclude: params.exclude,
        })
    }

    /// Open a session over one segment.
    ///
    /// A segment whose doc values cannot be opened scores every document 0.
    pub fn new_session<'s>(&self, segment: &'s dyn SegmentReader) -> VectorScoreSession<'s> {
        let accessor = match segment.binary_doc_values(&self.field) {
            Ok(accessor) => accessor,
            Err(e) => {
                warn!(
                    segment = segment.ord(),
                    field = %self.field,
                    error = %e,
                    "failed to open doc values, segment will score zero"
                );
                None
            }
        };

        debug!(
            segment = segment.ord(),
            has_field = accessor.is_some(),
            "opened scoring session"
        );

        VectorScoreSession::new(Arc::clone(&self.query), self.metric, accessor)
    }

    /// The score never depends on the host's own relevance score.
    pub fn needs_score(&self) -> bool {
        false
    }

    /// Doc-values field read by every session.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Selected metric, `None` when every metric flag was off.
    pub fn metric(&self) -> Option<Metric> {
        self.metric
    }

    /// Shared query vector.
    pub fn query(&self) -> &QueryVector {
        &self.query
    }

    /// Reserved flag, carried through untouched.
    pub fn exclude(&self) -> bool {
        self.exclude
    }
}

/// Name of an optional metric, for logs and reports.
pub fn metric_name(metric: Option<Metric>) -> &'static str {
    metric.map_or("none", |m| m.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc_values::{BinaryDocValues, DocId, MemorySegment};
    use crate::session::DocScorer;
    use crate::vector::VectorSource;
    use std::io;

    fn factory(metric: impl Into<Option<Metric>>, query: &[f64]) -> ScorerFactory {
        ScorerFactory::new(ScoringParams::new(
            "embedding",
            VectorSource::Literal(query.to_vec()),
            metric,
        ))
        .unwrap()
    }

    #[test]
    fn test_factory_properties() {
        let f = factory(Metric::Cosine, &[3.0, 4.0]);

        assert_eq!(f.field(), "embedding");
        assert_eq!(f.metric(), Some(Metric::Cosine));
        assert_eq!(f.query().norm_squared(), Some(25.0));
        assert!(!f.needs_score());
        assert!(!f.exclude());
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut first = MemorySegment::new(0);
        first.add_vector(0, "embedding", &[1.0, 2.0]).unwrap();
        first.add_vector(1, "embedding", &[5.0, 5.0]).unwrap();

        let mut second = MemorySegment::new(1);
        second.add_vector(0, "embedding", &[3.0, 4.0]).unwrap();

        let f = factory(Metric::L1, &[1.0, 2.0]);
        let mut a = f.new_session(&first);
        let mut b = f.new_session(&second);

        a.set_document(0);
        b.set_document(0);
        assert_eq!(a.execute(), 0.0);
        assert_eq!(b.execute(), 4.0);

        a.set_document(1);
        assert_eq!(a.execute(), 7.0);
        assert_eq!(b.execute(), 4.0);
    }

    #[test]
    fn test_no_metric_scores_zero() {
        let mut segment = MemorySegment::new(0);
        segment.add_vector(0, "embedding", &[1.0, 2.0]).unwrap();
        segment.add_vector(1, "embedding", &[-4.0, 9.5]).unwrap();

        let f = factory(None, &[3.0, 4.0]);
        assert_eq!(f.metric(), None);
        assert_eq!(metric_name(f.metric()), "none");
        assert!(f.query().norm_squared().is_none());

        let mut session = f.new_session(&segment);
        assert_eq!(session.score(0), 0.0);
        assert_eq!(session.score(1), 0.0);
        assert_eq!(session.score(2), 0.0);
    }

    #[derive(Debug)]
    struct BrokenSegment;

    impl SegmentReader for BrokenSegment {
        fn ord(&self) -> usize {
            3
        }

        fn max_doc(&self) -> DocId {
            10
        }

        fn binary_doc_values(
            &self,
            _field: &str,
        ) -> io::Result<Option<Box<dyn BinaryDocValues + '_>>> {
            Err(io::Error::other("segment closed"))
        }
    }

    #[test]
    fn test_unopenable_segment_scores_zero() {
        let f = factory(Metric::DotProduct, &[1.0]);
        let segment = BrokenSegment;
        let mut session = f.new_session(&segment);

        assert!(!session.has_field());
        assert_eq!(session.score(4), 0.0);
    }

    #[test]
    fn test_bad_query_vector_fails_at_compile() {
        let params = ScoringParams::new(
            "embedding",
            VectorSource::Encoded(vec![0, 3, 1, 2, 3]),
            Metric::L2,
        );
        assert!(ScorerFactory::new(params).is_err());
    }
}
