//! Similarity metrics used to score a document vector against the query.
//!
//! Every metric is a single pass over the two vectors. Scores are returned
//! raw: larger is better for [`Metric::Cosine`] and [`Metric::DotProduct`],
//! smaller is better for the two distances. Use [`Metric::higher_is_better`]
//! when ordering results.

use std::fmt;

use crate::vector::QueryVector;

/// The similarity metric selected for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Cosine of the angle between the vectors. Zero when either is all-zero.
    Cosine,
    /// Raw dot product.
    DotProduct,
    /// Manhattan distance.
    L1,
    /// Euclidean distance.
    L2,
}

impl Metric {
    /// Resolve the boolean metric flags of a script configuration.
    ///
    /// Precedence is cosine, then dot product, then l2norm, then l1norm.
    /// Returns `None` when every flag is off; such a query scores every
    /// document `0.0`.
    pub fn from_flags(
        cosine: bool,
        dot_product: bool,
        l2norm: bool,
        l1norm: bool,
    ) -> Option<Self> {
        if cosine {
            Some(Metric::Cosine)
        } else if dot_product {
            Some(Metric::DotProduct)
        } else if l2norm {
            Some(Metric::L2)
        } else if l1norm {
            Some(Metric::L1)
        } else {
            None
        }
    }

    /// Score `doc` against `query`.
    ///
    /// The caller guarantees both vectors have the same dimension.
    pub fn score(&self, doc: &[f64], query: &QueryVector) -> f64 {
        let q = query.values();
        debug_assert_eq!(doc.len(), q.len());

        match self {
            Metric::Cosine => {
                let query_norm_squared = query.norm_squared().unwrap_or_else(|| sum_of_squares(q));
                cosine(doc, q, query_norm_squared)
            }
            Metric::DotProduct => dot_product(doc, q),
            Metric::L1 => l1_distance(doc, q),
            Metric::L2 => l2_distance(doc, q),
        }
    }

    /// Whether larger scores mean more similar vectors.
    pub fn higher_is_better(&self) -> bool {
        matches!(self, Metric::Cosine | Metric::DotProduct)
    }

    /// Whether the query's squared norm must be computed up front.
    pub fn needs_query_norm(&self) -> bool {
        matches!(self, Metric::Cosine)
    }

    /// Get the name of this metric.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Cosine => "cosine",
            Metric::DotProduct => "dot_product",
            Metric::L1 => "l1norm",
            Metric::L2 => "l2norm",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sum of squared components.
pub fn sum_of_squares(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    for v in values {
        sum += v * v;
    }
    sum
}

/// Cosine similarity given the query's precomputed squared norm.
///
/// The dot product and the document norm are accumulated in the same loop.
/// The result is not clamped to `[-1, 1]`.
pub fn cosine(doc: &[f64], query: &[f64], query_norm_squared: f64) -> f64 {
    let mut score = 0.0;
    let mut doc_norm_squared = 0.0;

    for (d, q) in doc.iter().zip(query) {
        score += d * q;
        doc_norm_squared += d * d;
    }

    if doc_norm_squared == 0.0 || query_norm_squared == 0.0 {
        return 0.0;
    }

    score / (doc_norm_squared.sqrt() * query_norm_squared.sqrt())
}

/// Dot product.
pub fn dot_product(doc: &[f64], query: &[f64]) -> f64 {
    let mut score = 0.0;
    for (d, q) in doc.iter().zip(query) {
        score += d * q;
    }
    score
}

/// Manhattan distance.
pub fn l1_distance(doc: &[f64], query: &[f64]) -> f64 {
    let mut score = 0.0;
    for (d, q) in doc.iter().zip(query) {
        score += (d - q).abs();
    }
    score
}

/// Euclidean distance.
pub fn l2_distance(doc: &[f64], query: &[f64]) -> f64 {
    let mut score = 0.0;
    for (d, q) in doc.iter().zip(query) {
        // abs before squaring keeps the accumulation identical to the reference scorer
        let dis = (d - q).abs();
        score += dis * dis;
    }
    score.sqrt()
}
