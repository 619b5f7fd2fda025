//! # fast-cosine
//!
//! Per-document vector similarity scoring for a host search engine.
//!
//! Each candidate document stores its embedding as a binary doc value. At
//! query time the host compiles the script parameters once into a
//! [`ScorerFactory`](factory::ScorerFactory), opens one
//! [`VectorScoreSession`](session::VectorScoreSession) per segment, and asks
//! it for a score per document.
//!
//! ## Features
//!
//! - Cosine similarity, dot product, L1 and L2 distance
//! - Allocation-free per-document decoding into a reused scratch buffer
//! - Missing, malformed or mismatched document vectors score `0.0` instead of failing the query
//! - Segment-parallel scoring on rayon
//!
//! ```
//! use fast_cosine::doc_values::MemorySegment;
//! use fast_cosine::engine::{FastCosineEngine, ScriptContext, VECTOR_SCORE_SCRIPT};
//! use fast_cosine::session::DocScorer;
//! use serde_json::json;
//!
//! # fn main() -> fast_cosine::error::Result<()> {
//! let mut segment = MemorySegment::new(0);
//! segment.add_vector(0, "embedding", &[3.0, 4.0])?;
//!
//! let params = json!({"field": "embedding", "vector": [1.0, 2.0], "l1norm": true});
//! let factory = FastCosineEngine::new().compile(
//!     VECTOR_SCORE_SCRIPT,
//!     ScriptContext::Score,
//!     params.as_object().unwrap(),
//! )?;
//!
//! let mut session = factory.new_session(&segment);
//! session.set_document(0);
//! assert_eq!(session.execute(), 4.0);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod codec;
pub mod doc_values;
pub mod engine;
pub mod error;
pub mod factory;
pub mod metric;
pub mod parallel;
pub mod params;
pub mod session;
pub mod util;
pub mod vector;

pub mod prelude {
    pub use crate::doc_values::{BinaryDocValues, DocId, MemorySegment, SegmentReader};
    pub use crate::engine::{FastCosineEngine, ScriptContext, VECTOR_SCORE_SCRIPT};
    pub use crate::error::{FastCosineError, Result};
    pub use crate::factory::ScorerFactory;
    pub use crate::metric::Metric;
    pub use crate::params::ScoringParams;
    pub use crate::session::{DocScorer, VectorScoreSession};
    pub use crate::vector::{QueryVector, VectorSource};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
