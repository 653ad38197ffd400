//! Row identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a single row (the table index value).
///
/// JSON integers become [`RowId::Int`], JSON strings become [`RowId::Str`].
/// Other JSON values are not accepted as identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Str(String),
}

impl RowId {
    /// Convert a JSON value into an identifier.
    ///
    /// Returns `None` for floats, integers outside the `i64` range, booleans,
    /// `null`, arrays and objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }

    /// Convert back into a JSON value.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Int(i) => Value::from(*i),
            Self::Str(s) => Value::from(s.as_str()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Str(_) => None,
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for RowId {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_accepts_integers_and_strings() {
        assert_eq!(RowId::from_json(&json!(7)), Some(RowId::Int(7)));
        assert_eq!(RowId::from_json(&json!(-3)), Some(RowId::Int(-3)));
        assert_eq!(RowId::from_json(&json!("A1")), Some(RowId::from("A1")));
    }

    #[test]
    fn from_json_rejects_other_values() {
        assert_eq!(RowId::from_json(&json!(1.5)), None);
        assert_eq!(RowId::from_json(&json!(u64::MAX)), None);
        assert_eq!(RowId::from_json(&json!(true)), None);
        assert_eq!(RowId::from_json(&json!(null)), None);
        assert_eq!(RowId::from_json(&json!([1])), None);
        assert_eq!(RowId::from_json(&json!({"id": 1})), None);
    }

    #[test]
    fn display_is_bare() {
        assert_eq!(RowId::Int(42).to_string(), "42");
        assert_eq!(RowId::from("A2").to_string(), "A2");
    }

    #[test]
    fn serde_untagged() {
        let ids = vec![RowId::Int(1), RowId::from("x")];
        let json = serde_json::to_string(&ids).unwrap();
        assert_eq!(json, r#"[1,"x"]"#);
        let back: Vec<RowId> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ids);
    }
}
