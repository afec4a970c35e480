//! Traits for converting between typed Rust properties and [`Value`]
//!
//! Field and method accessors registered through
//! [`ShapeBuilder`](crate::ShapeBuilder) go through these traits: reads call
//! [`ToValue`] on the borrowed field or returned value, writes call
//! [`FromValue`] on the incoming value. Conversions never guess: the only
//! widening accepted is integer to float.

use crate::value::{Record, Value};
use indexmap::IndexMap;

/// Error raised when a [`Value`] cannot become the requested Rust type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("expected {expected}, got {got}")]
pub struct ConversionError {
    /// Expected type name
    pub expected: &'static str,
    /// Kind of the value that was supplied
    pub got: &'static str,
}

impl ConversionError {
    fn new(expected: &'static str, value: &Value) -> Self {
        Self {
            expected,
            got: value.kind(),
        }
    }
}

/// Borrowing conversion into a [`Value`]
pub trait ToValue {
    /// Produce the dynamic representation of `self`
    fn to_value(&self) -> Value;
}

/// Owning conversion out of a [`Value`]
pub trait FromValue: Sized {
    /// Convert, failing if the value has the wrong shape
    fn from_value(value: Value) -> Result<Self, ConversionError>;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        Ok(value)
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        value
            .as_bool()
            .ok_or_else(|| ConversionError::new("bool", &value))
    }
}

macro_rules! impl_int_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    Value::Int(*self as i64)
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ConversionError> {
                    value
                        .as_int()
                        .and_then(|i| <$ty>::try_from(i).ok())
                        .ok_or_else(|| ConversionError::new(stringify!($ty), &value))
                }
            }
        )*
    };
}

impl_int_conversions!(i8, i16, i32, i64, isize, u8, u16, u32);

// u64 and usize may exceed i64; values that do not fit are exposed as floats
// and accepted back only in that range.
macro_rules! impl_wide_uint_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    match i64::try_from(*self) {
                        Ok(i) => Value::Int(i),
                        Err(_) => Value::Float(*self as f64),
                    }
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ConversionError> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(i).ok(),
                        Value::Float(f)
                            if f.fract() == 0.0
                                && f >= i64::MAX as f64
                                && f <= <$ty>::MAX as f64 =>
                        {
                            Some(f as $ty)
                        }
                        _ => None,
                    }
                    .ok_or_else(|| ConversionError::new(stringify!($ty), &value))
                }
            }
        )*
    };
}

impl_wide_uint_conversions!(u64, usize);

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        value
            .as_float()
            .ok_or_else(|| ConversionError::new("f64", &value))
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(*self as f64)
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        value
            .as_float()
            .map(|f| f as f32)
            .ok_or_else(|| ConversionError::new("f32", &value))
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(ConversionError::new("String", &other)),
        }
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ConversionError::new("Vec", &other)),
        }
    }
}

impl<T: ToValue> ToValue for IndexMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

impl<T: FromValue> FromValue for IndexMap<String, T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Map(map) => map
                .into_iter()
                .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
                .collect(),
            other => Err(ConversionError::new("IndexMap", &other)),
        }
    }
}

impl ToValue for Record {
    fn to_value(&self) -> Value {
        self.clone().into()
    }
}

impl FromValue for Record {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Map(map) => Ok(Record::from(map)),
            other => Err(ConversionError::new("Record", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_round_trip() {
        assert_eq!(42i32.to_value(), Value::Int(42));
        assert_eq!(i32::from_value(Value::Int(42)), Ok(42));
        assert_eq!(u8::from_value(Value::Int(7)), Ok(7));
    }

    #[test]
    fn test_int_out_of_range() {
        let err = u8::from_value(Value::Int(300)).unwrap_err();
        assert_eq!(err.expected, "u8");
        assert_eq!(err.got, "int");
    }

    #[test]
    fn test_no_string_coercion() {
        let err = i64::from_value(Value::Str("42".to_string())).unwrap_err();
        assert_eq!(err.to_string(), "expected i64, got string");
    }

    #[test]
    fn test_float_accepts_int() {
        assert_eq!(f64::from_value(Value::Int(3)), Ok(3.0));
        assert!(i64::from_value(Value::Float(3.0)).is_err());
    }

    #[test]
    fn test_option_null() {
        assert_eq!(Option::<String>::from_value(Value::Null), Ok(None));
        assert_eq!(None::<String>.to_value(), Value::Null);
        assert_eq!(
            Option::<String>::from_value(Value::Str("x".to_string())),
            Ok(Some("x".to_string()))
        );
    }

    #[test]
    fn test_vec_conversion() {
        let v = vec![1i64, 2, 3];
        let value = v.to_value();
        assert_eq!(Vec::<i64>::from_value(value), Ok(v));
        assert!(Vec::<i64>::from_value(Value::List(vec![Value::Bool(true)])).is_err());
    }

    #[test]
    fn test_wide_uint() {
        assert_eq!(5u64.to_value(), Value::Int(5));
        assert!(matches!(u64::MAX.to_value(), Value::Float(_)));
        assert!(u64::from_value(Value::Int(-1)).is_err());
    }

    #[test]
    fn test_wide_uint_float_round_trip() {
        assert_eq!(u64::from_value(u64::MAX.to_value()), Ok(u64::MAX));
        assert_eq!(u64::from_value(Value::Float(9.5e18)), Ok(9_500_000_000_000_000_000));

        assert!(u64::from_value(Value::Float(3.0)).is_err());
        assert!(u64::from_value(Value::Float(1e20)).is_err());
        assert!(u64::from_value(Value::Float(-1e19)).is_err());
    }

    #[test]
    fn test_float_widening_reads_back_as_float() {
        let stored = f64::from_value(Value::Int(2)).unwrap();
        assert_eq!(stored.to_value(), Value::Float(2.0));
    }
}
