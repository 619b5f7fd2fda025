//! Script parameters.
//!
//! The host hands script parameters over as a JSON object. Recognised keys:
//!
//! | key | type | default |
//! |---|---|---|
//! | `field` | string | required |
//! | `vector` | array of numbers | one of `vector` / `encoded_vector` |
//! | `encoded_vector` | base64 string | one of `vector` / `encoded_vector` |
//! | `cosine` | bool | `false` |
//! | `dot_product` | bool | `false` |
//! | `l2norm` | bool | `false` |
//! | `l1norm` | bool | `true` |
//! | `exclude` | bool | `false`, reserved |
//!
//! Unknown keys are ignored. A `null` value counts as absent. With every
//! metric flag off the query still compiles and scores every document `0.0`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value};

use crate::error::{FastCosineError, Result};
use crate::metric::Metric;
use crate::vector::VectorSource;

/// Parameter names.
pub const FIELD: &str = "field";
pub const VECTOR: &str = "vector";
pub const ENCODED_VECTOR: &str = "encoded_vector";
pub const COSINE: &str = "cosine";
pub const DOT_PRODUCT: &str = "dot_product";
pub const L2NORM: &str = "l2norm";
pub const L1NORM: &str = "l1norm";
pub const EXCLUDE: &str = "exclude";

/// Validated script parameters for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringParams {
    /// Doc-values field holding the encoded document vectors.
    pub field: String,
    /// Query vector source.
    pub vector: VectorSource,
    /// Selected metric, resolved from the boolean flags. `None` when every
    /// flag is off.
    pub metric: Option<Metric>,
    /// Parsed and kept, but not used by scoring.
    pub exclude: bool,
}

impl ScoringParams {
    /// Create parameters directly, bypassing the JSON surface.
    pub fn new<S: Into<String>>(
        field: S,
        vector: VectorSource,
        metric: impl Into<Option<Metric>>,
    ) -> Self {
        ScoringParams {
            field: field.into(),
            vector,
            metric: metric.into(),
            exclude: false,
        }
    }

    /// Validate a host parameter map.
    pub fn from_map(params: &Map<String, Value>) -> Result<Self> {
        let field = match get(params, FIELD) {
            None => return Err(FastCosineError::missing_parameter(FIELD)),
            Some(Value::String(s)) => s.clone(),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
            Some(_) => {
                return Err(FastCosineError::invalid_parameter(FIELD, "expected a field name"));
            }
        };

        let cosine = flag(params, COSINE, false)?;
        let dot_product = flag(params, DOT_PRODUCT, false)?;
        let l2norm = flag(params, L2NORM, false)?;
        let l1norm = flag(params, L1NORM, true)?;
        let exclude = flag(params, EXCLUDE, false)?;

        let metric = Metric::from_flags(cosine, dot_product, l2norm, l1norm);

        let vector = match (get(params, VECTOR), get(params, ENCODED_VECTOR)) {
            (Some(literal), None) => VectorSource::Literal(literal_vector(literal)?),
            (None, Some(encoded)) => VectorSource::Encoded(encoded_vector(encoded)?),
            (None, None) => return Err(FastCosineError::MissingVector),
            (Some(_), Some(_)) => {
                return Err(FastCosineError::invalid_parameter(
                    ENCODED_VECTOR,
                    "only one of 'vector' and 'encoded_vector' may be given",
                ));
            }
        };

        Ok(ScoringParams {
            field,
            vector,
            metric,
            exclude,
        })
    }

    /// Validate a JSON value that must be an object.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Err(FastCosineError::invalid_argument(
                "script parameters must be a JSON object",
            )),
        }
    }
}

fn get<'a>(params: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    params.get(name).filter(|v| !v.is_null())
}

fn flag(params: &Map<String, Value>, name: &str, default: bool) -> Result<bool> {
    match get(params, name) {
        None => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(FastCosineError::invalid_parameter(name, "expected a boolean")),
    }
}

fn literal_vector(value: &Value) -> Result<Vec<f64>> {
    let items = value
        .as_array()
        .ok_or_else(|| FastCosineError::invalid_parameter(VECTOR, "expected an array of numbers"))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_f64().ok_or_else(|| {
                FastCosineError::invalid_parameter(VECTOR, format!("element {i} is not a number"))
            })
        })
        .collect()
}

fn encoded_vector(value: &Value) -> Result<Vec<u8>> {
    let encoded = value
        .as_str()
        .ok_or_else(|| FastCosineError::invalid_parameter(ENCODED_VECTOR, "expected a string"))?;

    STANDARD
        .decode(encoded)
        .map_err(|e| FastCosineError::invalid_parameter(ENCODED_VECTOR, format!("bad base64: {e}")))
}
