//! Script engine entry point.
//!
//! The host registers [`FastCosineEngine`] under its language name and calls
//! [`FastCosineEngine::compile`] once per query with the script identifier,
//! the context it wants to run the script in, and the raw parameter map.
//! Every configuration problem surfaces here, before any document is scored.

use serde_json::{Map, Value};

use crate::error::{FastCosineError, Result};
use crate::factory::ScorerFactory;
use crate::params::ScoringParams;

/// Language name the engine registers under.
pub const SCRIPT_LANG: &str = "fast_cosine";

/// The one script identifier this engine compiles.
pub const VECTOR_SCORE_SCRIPT: &str = "staysense";

/// Where the host wants to run a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptContext {
    /// Document scoring. The only supported context.
    Score,
    /// Query-time document filtering.
    Filter,
    /// Aggregation value scripts.
    Aggregation,
    /// Document update scripts.
    Update,
}

impl ScriptContext {
    /// Context name as the host reports it.
    pub fn name(&self) -> &'static str {
        match self {
            ScriptContext::Score => "score",
            ScriptContext::Filter => "filter",
            ScriptContext::Aggregation => "aggs",
            ScriptContext::Update => "update",
        }
    }
}

/// Stateless script engine. One instance may compile any number of queries
/// concurrently; each compiled query owns its own vector and norm.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastCosineEngine;

impl FastCosineEngine {
    /// Create a new engine.
    pub fn new() -> Self {
        FastCosineEngine
    }

    /// Language name of this engine.
    pub fn engine_type(&self) -> &'static str {
        SCRIPT_LANG
    }

    /// Compile a script into a scorer factory.
    pub fn compile(
        &self,
        identifier: &str,
        context: ScriptContext,
        params: &Map<String, Value>,
    ) -> Result<ScorerFactory> {
        self.check_script(identifier, context)?;
        ScorerFactory::new(ScoringParams::from_map(params)?)
    }

    /// Compile already validated parameters.
    pub fn compile_params(
        &self,
        identifier: &str,
        context: ScriptContext,
        params: ScoringParams,
    ) -> Result<ScorerFactory> {
        self.check_script(identifier, context)?;
        ScorerFactory::new(params)
    }

    fn check_script(&self, identifier: &str, context: ScriptContext) -> Result<()> {
        if context != ScriptContext::Score {
            return Err(FastCosineError::UnsupportedContext {
                engine: SCRIPT_LANG.to_string(),
                context: context.name().to_string(),
            });
        }

        if identifier != VECTOR_SCORE_SCRIPT {
            return Err(FastCosineError::unknown_script(identifier));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Metric;
    use crate::vector::VectorSource;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_engine_type() {
        assert_eq!(FastCosineEngine::new().engine_type(), "fast_cosine");
    }

    #[test]
    fn test_compile() {
        let engine = FastCosineEngine::new();
        let factory = engine
            .compile(
                VECTOR_SCORE_SCRIPT,
                ScriptContext::Score,
                &params(json!({"field": "embedding", "vector": [1.0, 0.0], "cosine": true})),
            )
            .unwrap();

        assert_eq!(factory.metric(), Some(Metric::Cosine));
        assert_eq!(factory.field(), "embedding");
    }

    #[test]
    fn test_compile_params() {
        let engine = FastCosineEngine::new();
        let params = ScoringParams::new("f", VectorSource::Literal(vec![1.0]), Metric::L2);

        let factory = engine
            .compile_params(VECTOR_SCORE_SCRIPT, ScriptContext::Score, params.clone())
            .unwrap();
        assert_eq!(factory.metric(), Some(Metric::L2));

        let err = engine
            .compile_params("painless", ScriptContext::Score, params.clone())
            .unwrap_err();
        assert!(matches!(err, FastCosineError::UnknownScript(_)));

        let err = engine
            .compile_params(VECTOR_SCORE_SCRIPT, ScriptContext::Update, params)
            .unwrap_err();
        assert!(matches!(err, FastCosineError::UnsupportedContext { .. }));
    }

    #[test]
    fn test_all_flags_off_compiles() {
        let factory = FastCosineEngine::new()
            .compile(
                VECTOR_SCORE_SCRIPT,
                ScriptContext::Score,
                &params(json!({"field": "f", "vector": [1.0, 2.0], "l1norm": false})),
            )
            .unwrap();

        assert_eq!(factory.metric(), None);
    }

    #[test]
    fn test_unknown_script() {
        let err = FastCosineEngine::new()
            .compile(
                "painless",
                ScriptContext::Score,
                &params(json!({"field": "f", "vector": [1.0]})),
            )
            .unwrap_err();

        assert_eq!(err.to_string(), "Unknown script name painless");
    }

    #[test]
    fn test_unsupported_context() {
        let err = FastCosineEngine::new()
            .compile(
                VECTOR_SCORE_SCRIPT,
                ScriptContext::Filter,
                &params(json!({"field": "f", "vector": [1.0]})),
            )
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "fast_cosine scripts cannot be used for context [filter]"
        );
    }

    #[test]
    fn test_configuration_errors_surface() {
        let engine = FastCosineEngine::new();

        let err = engine
            .compile(
                VECTOR_SCORE_SCRIPT,
                ScriptContext::Score,
                &params(json!({"vector": [1.0]})),
            )
            .unwrap_err();
        assert!(matches!(err, FastCosineError::MissingParameter(_)));

        let err = engine
            .compile(
                VECTOR_SCORE_SCRIPT,
                ScriptContext::Score,
                &params(json!({"field": "f"})),
            )
            .unwrap_err();
        assert!(matches!(err, FastCosineError::MissingVector));
    }
}
