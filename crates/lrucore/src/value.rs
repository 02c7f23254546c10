//! Tagged value type for caches holding heterogeneous data

use std::fmt;

/// A value whose kind is checked on reassignment.
///
/// `Cache<K, V>` is statically typed over `V`; use `Value` when one cache must
/// hold data of several kinds while still rejecting kind changes on update.
///
/// Only the typed paths check the kind: [`Entry::set_typed_value`] and
/// [`Cache::put_typed`]. The generic [`Entry::set_value`] and [`Cache::put`]
/// replace a `Value` of any kind, so a cache that must keep kinds stable
/// should write through the typed paths only.
///
/// [`Entry::set_typed_value`]: crate::Entry::set_typed_value
/// [`Entry::set_value`]: crate::Entry::set_value
/// [`Cache::put_typed`]: crate::Cache::put_typed
/// [`Cache::put`]: crate::Cache::put
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Boolean flag
    Bool(bool),
    /// UTF-8 text
    Str(String),
    /// Raw bytes
    Bytes(Vec<u8>),
}

impl Value {
    /// Name of the variant, used in type mismatch reports
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
        }
    }

    /// True when both values are the same variant
    pub fn same_kind(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Parse a token: integer, then float, then `true`/`false`, else text
    pub fn parse(token: &str) -> Self {
        if let Ok(i) = token.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = token.parse::<f64>() {
            return Value::Float(f);
        }
        match token {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Str(token.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => f.write_str(s),
            Value::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Value::parse("42"), Value::Int(42));
        assert_eq!(Value::parse("-3"), Value::Int(-3));
        assert_eq!(Value::parse("2.5"), Value::Float(2.5));
        assert_eq!(Value::parse("true"), Value::Bool(true));
        assert_eq!(Value::parse("hello"), Value::Str("hello".to_string()));
    }

    #[test]
    fn test_same_kind() {
        assert!(Value::Int(1).same_kind(&Value::Int(2)));
        assert!(!Value::Int(1).same_kind(&Value::Float(1.0)));
        assert!(!Value::Str("a".into()).same_kind(&Value::Bytes(b"a".to_vec())));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(7).to_string(), "7");
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(Value::Bool(false).to_string(), "false");
    }
}
