//! Key Builder Module
//!
//! Derives composite cache keys from a base key and optional structured params.
//!
//! Params are encoded canonically: object members sorted by key, no whitespace,
//! strings kept verbatim. Dates are expected as `chrono::DateTime<Utc>`, which
//! serializes to one fixed UTC form; convert other offsets with
//! `with_timezone(&Utc)` before attaching them.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

// == Composite Key ==
/// Store key: the base key plus the canonical encoding of its params.
///
/// Bare and parameterized keys are distinct variants, so no base key string can
/// ever stand in for a base key with params.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CompositeKey {
    base: String,
    params: Option<String>,
}

impl CompositeKey {
    /// Key without params.
    pub(crate) fn bare(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            params: None,
        }
    }

    /// Key for params already converted to a `Value`.
    pub(crate) fn with_params(base: impl Into<String>, params: &Value) -> Result<Self> {
        let mut encoded = String::with_capacity(32);
        write_canonical(params, &mut encoded)?;
        Ok(Self {
            base: base.into(),
            params: Some(encoded),
        })
    }
}

impl From<&str> for CompositeKey {
    fn from(base: &str) -> Self {
        Self::bare(base)
    }
}

/// Bare keys print as the base key; keys with params as a JSON pair `[base,params]`.
impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.params {
            None => f.write_str(&self.base),
            Some(params) => {
                let base = serde_json::to_string(&self.base).map_err(|_| fmt::Error)?;
                write!(f, "[{},{}]", base, params)
            }
        }
    }
}

// == Build Key ==
/// Builds the composite key string for `base_key` and optional `params`.
///
/// Without params the composite key is `base_key` itself. With params it is the
/// JSON pair `[base_key, canonical_params]`.
pub fn build_key<P>(base_key: &str, params: Option<&P>) -> Result<String>
where
    P: Serialize + ?Sized,
{
    let key = match params {
        None => CompositeKey::bare(base_key),
        Some(params) => CompositeKey::with_params(base_key, &serde_json::to_value(params)?)?,
    };
    Ok(key.to_string())
}

// == Canonical Encoding ==
fn write_canonical(value: &Value, out: &mut String) -> Result<()> {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) => out.push_str(&value.to_string()),
        Value::String(s) => out.push_str(&serde_json::to_string(s)?),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut members: Vec<(&String, &Value)> = map.iter().collect();
            members.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (name, member)) in members.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(name)?);
                out.push(':');
                write_canonical(member, out)?;
            }
            out.push('}');
        }
    }
    Ok(())
}
