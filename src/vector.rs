//! The query-side vector.

use crate::codec;
use crate::error::{FastCosineError, Result};
use crate::metric::{Metric, sum_of_squares};

/// Where the query vector comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorSource {
    /// Literal components, in order.
    Literal(Vec<f64>),
    /// A frame in the binary vector layout (already base64-decoded).
    Encoded(Vec<u8>),
}

/// Immutable query vector, shared read-only by every session of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryVector {
    values: Box<[f64]>,
    /// Sum of squares, only present when the metric needs it.
    norm_squared: Option<f64>,
}

impl QueryVector {
    /// Build a query vector from literal components.
    ///
    /// The squared norm is computed here, once, if `metric` needs it.
    pub fn new(values: Vec<f64>, metric: impl Into<Option<Metric>>) -> Result<Self> {
        if values.is_empty() {
            return Err(FastCosineError::invalid_parameter(
                "vector",
                "query vector must have at least one dimension",
            ));
        }

        let norm_squared = metric
            .into()
            .is_some_and(|m| m.needs_query_norm())
            .then(|| sum_of_squares(&values));

        Ok(QueryVector {
            values: values.into_boxed_slice(),
            norm_squared,
        })
    }

    /// Build a query vector from either supported source.
    pub fn from_source(source: VectorSource, metric: impl Into<Option<Metric>>) -> Result<Self> {
        match source {
            VectorSource::Literal(values) => Self::new(values, metric),
            VectorSource::Encoded(bytes) => {
                let values = codec::decode_frame(&bytes).ok_or_else(|| {
                    FastCosineError::invalid_parameter(
                        "encoded_vector",
                        "not a valid encoded vector",
                    )
                })?;
                Self::new(values, metric)
            }
        }
    }

    /// The components.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of components.
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Precomputed sum of squares, if the metric asked for it.
    pub fn norm_squared(&self) -> Option<f64> {
        self.norm_squared
    }
}
