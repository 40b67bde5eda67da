//! Bindable scalar values.
//!
//! [`Value`] is the closed set of scalars a driver can bind to a placeholder.
//! Everything the builder accumulates as an argument is a `Value`; sub-queries
//! are carried as [`Sql`](crate::Sql) fragments instead and never reach the
//! argument list as a value.

use crate::error::Error;

/// A scalar value bindable by the underlying driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Read this value as a `u64` if it holds a non-negative number.
    ///
    /// Drivers frequently return counts as signed integers or strings;
    /// this normalizes all of them.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Int(i) if *i >= 0 => Some(*i as u64),
            Value::UInt(u) => Some(*u),
            Value::Str(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Read this value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

macro_rules! value_from_int {
    ($($t:ty => $variant:ident as $cast:ty),* $(,)?) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::$variant(v as $cast)
            }
        }
    )*};
}

value_from_int!(
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    isize => Int as i64,
    u8 => UInt as u64,
    u16 => UInt as u64,
    u32 => UInt as u64,
    u64 => UInt as u64,
    usize => UInt as u64,
);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
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

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::from(i),
            Value::UInt(u) => serde_json::Value::from(u),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s),
        }
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = Error;

    fn try_from(v: serde_json::Value) -> Result<Self, Error> {
        match v {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Value::UInt(u))
                } else {
                    // as_f64 is always Some for a serde_json::Number
                    Ok(Value::Float(n.as_f64().unwrap_or_default()))
                }
            }
            serde_json::Value::String(s) => Ok(Value::Str(s)),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Err(Error::validation(
                "only scalar JSON values are bindable",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_primitives() {
        assert_eq!(Value::from(5), Value::Int(5));
        assert_eq!(Value::from(5u32), Value::UInt(5));
        assert_eq!(Value::from("x"), Value::Str("x".to_string()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("y")), Value::Str("y".to_string()));
    }

    #[test]
    fn round_trips_scalar_json() {
        let v = Value::try_from(serde_json::json!(42)).unwrap();
        assert_eq!(v, Value::Int(42));
        assert_eq!(serde_json::Value::from(v), serde_json::json!(42));
    }

    #[test]
    fn rejects_non_scalar_json() {
        assert!(Value::try_from(serde_json::json!([1, 2])).is_err());
        assert!(Value::try_from(serde_json::json!({"a": 1})).is_err());
    }

    #[test]
    fn reads_counts_from_mixed_types() {
        assert_eq!(Value::Int(3).as_u64(), Some(3));
        assert_eq!(Value::Str("7".to_string()).as_u64(), Some(7));
        assert_eq!(Value::Int(-1).as_u64(), None);
    }
}
