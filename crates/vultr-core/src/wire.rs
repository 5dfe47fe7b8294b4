//! Untyped wire values and the coercions applied to them.
//!
//! The Vultr API does not keep a field's JSON type stable between
//! responses: `"vcpu_count": 2` and `"vcpu_count": "2"` both occur, and
//! fields are sometimes missing or `null`. Every field is read through
//! [`WireValue`] and converted by one helper per target type.

use crate::errors::{DecodeError, Result};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};

/// Text rendered for a field that is absent or `null` on the wire.
///
/// Callers see this literal instead of an empty string, so "missing" stays
/// distinguishable from "empty".
pub const MISSING_PLACEHOLDER: &str = "<nil>";

/// A decoded JSON object, keyed by field name
pub type Fields = Map<String, Value>;

/// One field of a payload, classified by its wire representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WireValue<'a> {
    Absent,
    Null,
    Number(&'a Number),
    Text(&'a str),
    Bool(bool),
    Nested(&'a Value),
}

impl<'a> WireValue<'a> {
    /// Look up `key` in `fields`
    pub fn lookup(fields: &'a Fields, key: &str) -> Self {
        fields.get(key).map_or(WireValue::Absent, WireValue::from_value)
    }

    pub fn from_value(value: &'a Value) -> Self {
        match value {
            Value::Null => WireValue::Null,
            Value::Bool(b) => WireValue::Bool(*b),
            Value::Number(n) => WireValue::Number(n),
            Value::String(s) => WireValue::Text(s),
            Value::Array(_) | Value::Object(_) => WireValue::Nested(value),
        }
    }

    /// True for an absent key or an explicit `null`
    pub fn is_missing(&self) -> bool {
        matches!(self, WireValue::Absent | WireValue::Null)
    }

    /// Display text of the value. Missing values render as
    /// [`MISSING_PLACEHOLDER`].
    pub fn render(&self) -> String {
        match self {
            WireValue::Absent | WireValue::Null => MISSING_PLACEHOLDER.to_string(),
            WireValue::Number(n) => render_number(n),
            WireValue::Text(s) => (*s).to_string(),
            WireValue::Bool(b) => b.to_string(),
            WireValue::Nested(v) => v.to_string(),
        }
    }

    /// Convert to `T`, naming `field` in the error when that fails.
    ///
    /// Missing values, empty strings and the placeholder text all coerce to
    /// zero.
    pub fn coerce<T: Coerce>(&self, field: &str) -> Result<T> {
        let coerced = match self {
            WireValue::Absent | WireValue::Null => Some(T::ZERO),
            WireValue::Number(n) => T::from_number(n),
            WireValue::Text(s) if s.is_empty() || *s == MISSING_PLACEHOLDER => Some(T::ZERO),
            WireValue::Text(s) => T::from_text(s),
            WireValue::Bool(_) | WireValue::Nested(_) => None,
        };

        coerced.ok_or_else(|| DecodeError::FieldCoercion {
            field: field.to_string(),
            value: self.render(),
        })
    }
}

// Integral floats print without a fractional part ("2", not "2.0").
fn render_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string())
    }
}

/// Numeric types a wire value can be coerced into
pub trait Coerce: Sized {
    const ZERO: Self;

    fn from_number(n: &Number) -> Option<Self>;

    fn from_text(s: &str) -> Option<Self>;
}

impl Coerce for i64 {
    const ZERO: Self = 0;

    fn from_number(n: &Number) -> Option<Self> {
        n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        })
    }

    fn from_text(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl Coerce for f64 {
    const ZERO: Self = 0.0;

    fn from_number(n: &Number) -> Option<Self> {
        n.as_f64()
    }

    fn from_text(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

/// Render `key` of `fields` as display text
pub fn text(fields: &Fields, key: &str) -> String {
    WireValue::lookup(fields, key).render()
}

/// Coerce `key` of `fields` into a number
pub fn number<T: Coerce>(fields: &Fields, key: &str) -> Result<T> {
    WireValue::lookup(fields, key).coerce(key)
}

/// Placeholder used as the serde default for absent text fields
pub fn missing_text() -> String {
    MISSING_PLACEHOLDER.to_string()
}

/// `deserialize_with` helper rendering any scalar as text
pub fn deserialize_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(WireValue::from_value(&value).render())
}

/// `deserialize_with` helper accepting an integer as number or string
pub fn deserialize_integer<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    WireValue::from_value(&value)
        .coerce("integer")
        .map_err(serde::de::Error::custom)
}

/// `deserialize_with` helper accepting `true`/`false` as well as the
/// `"yes"`/`"no"` strings some endpoints use
pub fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match WireValue::from_value(&value) {
        WireValue::Bool(b) => Ok(b),
        WireValue::Absent | WireValue::Null => Ok(false),
        WireValue::Text(s) => match s {
            "yes" | "true" | "1" => Ok(true),
            "no" | "false" | "0" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected a yes/no flag, found '{}'",
                other
            ))),
        },
        WireValue::Number(n) => Ok(n.as_f64().map_or(false, |f| f != 0.0)),
        WireValue::Nested(v) => Err(serde::de::Error::custom(format!(
            "expected a yes/no flag, found {}",
            v
        ))),
    }
}

/// `deserialize_with` helper turning `null` into the type's default.
/// The API sends `null` for some lists that are simply empty.
pub fn null_to_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_render_scalars() {
        let f = fields(json!({
            "ram": 1024,
            "cost": 5.5,
            "label": "web",
            "flag": true,
            "gone": null,
            "whole": 2.0
        }));

        assert_eq!(text(&f, "ram"), "1024");
        assert_eq!(text(&f, "cost"), "5.5");
        assert_eq!(text(&f, "label"), "web");
        assert_eq!(text(&f, "flag"), "true");
        assert_eq!(text(&f, "gone"), MISSING_PLACEHOLDER);
        assert_eq!(text(&f, "absent"), MISSING_PLACEHOLDER);
        assert_eq!(text(&f, "whole"), "2");
    }

    #[test]
    fn test_integer_coercion() {
        let f = fields(json!({
            "num": 4,
            "str": "4",
            "float": 4.0,
            "empty": "",
            "null": null,
            "frac": 4.5,
            "junk": "four",
            "nested": {"a": 1},
            "neg": "-3"
        }));

        assert_eq!(number::<i64>(&f, "num").unwrap(), 4);
        assert_eq!(number::<i64>(&f, "str").unwrap(), 4);
        assert_eq!(number::<i64>(&f, "float").unwrap(), 4);
        assert_eq!(number::<i64>(&f, "empty").unwrap(), 0);
        assert_eq!(number::<i64>(&f, "null").unwrap(), 0);
        assert_eq!(number::<i64>(&f, "missing").unwrap(), 0);
        assert_eq!(number::<i64>(&f, "neg").unwrap(), -3);

        assert!(number::<i64>(&f, "frac").is_err());
        assert!(number::<i64>(&f, "nested").is_err());

        let err = number::<i64>(&f, "junk").unwrap_err();
        assert_eq!(
            err,
            DecodeError::FieldCoercion {
                field: "junk".to_string(),
                value: "four".to_string(),
            }
        );
    }

    #[test]
    fn test_float_coercion() {
        let f = fields(json!({
            "num": 1.25,
            "int": 3,
            "str": "0.75",
            "bad": "1.2.3",
            "bool": false
        }));

        assert_eq!(number::<f64>(&f, "num").unwrap(), 1.25);
        assert_eq!(number::<f64>(&f, "int").unwrap(), 3.0);
        assert_eq!(number::<f64>(&f, "str").unwrap(), 0.75);
        assert_eq!(number::<f64>(&f, "missing").unwrap(), 0.0);
        assert_eq!(number::<f64>(&f, "bad").unwrap_err().field(), Some("bad"));
        assert!(number::<f64>(&f, "bool").is_err());
    }

    #[test]
    fn test_serde_helpers() {
        #[derive(Deserialize)]
        struct Probe {
            #[serde(default = "missing_text", deserialize_with = "deserialize_text")]
            label: String,
            #[serde(default, deserialize_with = "deserialize_integer")]
            id: i64,
            #[serde(default, deserialize_with = "deserialize_flag")]
            windows: bool,
            #[serde(default, deserialize_with = "null_to_default")]
            items: Vec<String>,
        }

        let probe: Probe =
            serde_json::from_value(json!({"id": "12", "windows": "yes", "items": null})).unwrap();
        assert_eq!(probe.label, MISSING_PLACEHOLDER);
        assert_eq!(probe.id, 12);
        assert!(probe.windows);
        assert!(probe.items.is_empty());

        let probe: Probe = serde_json::from_value(json!({"label": 7, "id": 3})).unwrap();
        assert_eq!(probe.label, "7");
        assert_eq!(probe.id, 3);
        assert!(!probe.windows);

        assert!(serde_json::from_value::<Probe>(json!({"id": "x"})).is_err());
    }
}
