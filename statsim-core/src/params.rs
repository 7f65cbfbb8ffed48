//! The open parameter bag consumed by every simulation, plus the shared
//! range-validation helper.
//!
//! Policy (carried over from the original service, by design): unknown
//! keys are ignored, missing keys fall back to documented defaults, and
//! only wrong-typed or out-of-domain values are rejected.

use serde_json::{Map, Value};

use crate::errors::SimulationError;

/// String-keyed parameter mapping with heterogeneous JSON values.
///
/// Each simulation declares its own recognized subset via the typed
/// accessors below; everything else in the bag is ignored.
#[derive(Debug, Clone, Default)]
pub struct SimulationParams(Map<String, Value>);

impl SimulationParams {
    /// Empty bag; every accessor returns its default.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, SimulationError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(SimulationError::InvalidParameter {
                param: "parameters".to_string(),
                message: format!("expected a JSON object, got {}", type_name(&other)),
            }),
        }
    }

    /// Insert a parameter. Intended for tests and programmatic callers;
    /// the dispatcher normally builds the whole bag via `from_value`.
    pub fn set(&mut self, key: &str, value: Value) -> &mut Self {
        self.0.insert(key.to_string(), value);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// The raw underlying map, for echoing parameters into `meta`.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The reproducibility seed, when one was supplied.
    pub fn seed(&self) -> Option<u64> {
        self.0.get("seed").and_then(as_u64_lenient)
    }

    /// Unsigned integer parameter with a default. Integral floats are
    /// accepted; anything else wrong-typed is rejected.
    pub fn u64_or(&self, key: &str, default: u64) -> Result<u64, SimulationError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(v) => as_u64_lenient(v).ok_or_else(|| SimulationError::InvalidParameter {
                param: key.to_string(),
                message: format!("expected a non-negative integer, got {}", type_name(v)),
            }),
        }
    }

    /// Signed integer parameter with a default.
    pub fn i64_or(&self, key: &str, default: i64) -> Result<i64, SimulationError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(v) => as_i64_lenient(v).ok_or_else(|| SimulationError::InvalidParameter {
                param: key.to_string(),
                message: format!("expected an integer, got {}", type_name(v)),
            }),
        }
    }

    /// Float parameter with a default. Integers are accepted.
    pub fn f64_or(&self, key: &str, default: f64) -> Result<f64, SimulationError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(v) => v.as_f64().ok_or_else(|| SimulationError::InvalidParameter {
                param: key.to_string(),
                message: format!("expected a number, got {}", type_name(v)),
            }),
        }
    }

    /// String parameter with a default.
    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> Result<&'a str, SimulationError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(v) => v.as_str().ok_or_else(|| SimulationError::InvalidParameter {
                param: key.to_string(),
                message: format!("expected a string, got {}", type_name(v)),
            }),
        }
    }

    /// Boolean parameter with a default.
    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, SimulationError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(v) => v.as_bool().ok_or_else(|| SimulationError::InvalidParameter {
                param: key.to_string(),
                message: format!("expected a boolean, got {}", type_name(v)),
            }),
        }
    }

    /// Nested object parameter (e.g. `dist_params`, `colors`).
    pub fn object(&self, key: &str) -> Result<Option<&Map<String, Value>>, SimulationError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(v) => Err(SimulationError::InvalidParameter {
                param: key.to_string(),
                message: format!("expected an object, got {}", type_name(v)),
            }),
        }
    }

    /// Numeric sequence parameter (e.g. raw `data`), absent when the key
    /// is missing.
    pub fn f64_array(&self, key: &str) -> Result<Option<Vec<f64>>, SimulationError> {
        let arr = match self.0.get(key) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Array(arr)) => arr,
            Some(v) => {
                return Err(SimulationError::InvalidParameter {
                    param: key.to_string(),
                    message: format!("expected an array of numbers, got {}", type_name(v)),
                })
            }
        };
        arr.iter()
            .map(|v| {
                v.as_f64().ok_or_else(|| SimulationError::InvalidParameter {
                    param: key.to_string(),
                    message: format!("expected an array of numbers, found {}", type_name(v)),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

impl From<Map<String, Value>> for SimulationParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Reject an integer parameter outside `[min, max]`.
///
/// Every cost-bounding parameter (trial counts, sample sizes, replicate
/// counts) passes through here before any allocation happens.
pub fn ensure_range_u64(
    param: &str,
    value: u64,
    min: u64,
    max: u64,
) -> Result<(), SimulationError> {
    if value < min || value > max {
        return Err(SimulationError::OutOfRange {
            param: param.to_string(),
            min: min as f64,
            max: max as f64,
            got: value as f64,
        });
    }
    Ok(())
}

/// Reject a float parameter outside `[min, max]`.
pub fn ensure_range_f64(
    param: &str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), SimulationError> {
    if !value.is_finite() || value < min || value > max {
        return Err(SimulationError::OutOfRange {
            param: param.to_string(),
            min,
            max,
            got: value,
        });
    }
    Ok(())
}

fn as_u64_lenient(v: &Value) -> Option<u64> {
    if let Some(u) = v.as_u64() {
        return Some(u);
    }
    // Integral floats (e.g. 10000.0 from a JS client) are accepted.
    match v.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Some(f as u64),
        _ => None,
    }
}

fn as_i64_lenient(v: &Value) -> Option<i64> {
    if let Some(i) = v.as_i64() {
        return Some(i);
    }
    match v.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
            Some(f as i64)
        }
        _ => None,
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
