//! Error types for fast-cosine.
//!
//! Only configuration problems are errors. Anything that goes wrong while
//! scoring an individual document degrades to a zero score instead, so none
//! of these variants are ever produced on the per-document path.
//!
//! # Examples
//!
//! ```
//! use fast_cosine::error::{FastCosineError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(FastCosineError::missing_parameter("field"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for fast-cosine operations.
#[derive(Error, Debug)]
pub enum FastCosineError {
    /// I/O errors (reading parameter or document files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A required script parameter was not supplied
    #[error("Missing parameter [{0}]")]
    MissingParameter(String),

    /// A recognised script parameter had the wrong type or an unusable value
    #[error("Invalid parameter [{name}]: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Neither a literal nor an encoded query vector was supplied
    #[error("Must have 'vector' or 'encoded_vector' as a parameter")]
    MissingVector,

    /// The script identifier is not one this engine knows
    #[error("Unknown script name {0}")]
    UnknownScript(String),

    /// The engine was asked to compile for a context it cannot serve
    #[error("{engine} scripts cannot be used for context [{context}]")]
    UnsupportedContext { engine: String, context: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with FastCosineError.
pub type Result<T> = std::result::Result<T, FastCosineError>;

impl FastCosineError {
    /// Create a new missing parameter error.
    pub fn missing_parameter<S: Into<String>>(name: S) -> Self {
        FastCosineError::MissingParameter(name.into())
    }

    /// Create a new invalid parameter error.
    pub fn invalid_parameter<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        FastCosineError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a new unknown script error.
    pub fn unknown_script<S: Into<String>>(id: S) -> Self {
        FastCosineError::UnknownScript(id.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        FastCosineError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        FastCosineError::Other(format!("Invalid argument: {}", msg.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = FastCosineError::missing_parameter("field");
        assert_eq!(error.to_string(), "Missing parameter [field]");

        let error = FastCosineError::unknown_script("painless");
        assert_eq!(error.to_string(), "Unknown script name painless");

        let error = FastCosineError::invalid_parameter("cosine", "expected a boolean");
        assert_eq!(
            error.to_string(),
            "Invalid parameter [cosine]: expected a boolean"
        );

        assert_eq!(
            FastCosineError::MissingVector.to_string(),
            "Must have 'vector' or 'encoded_vector' as a parameter"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = FastCosineError::from(io_error);

        match error {
            FastCosineError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
