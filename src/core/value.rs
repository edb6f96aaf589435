//! Typed values passed between the console and bound primitives.

use std::fmt::{self, Display};

/// Type tag of a console value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueType {
    /// Signed integer numeral.
    Integer,
    /// Floating point numeral.
    Float,
    /// Raw token text.
    Text,
}

impl ValueType {
    /// Get the display name for this type.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Integer => "int",
            ValueType::Float => "float",
            ValueType::Text => "text",
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved console value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Coerce raw text to the requested type.
    ///
    /// Numerals must parse completely; text always succeeds.
    ///
    /// # Examples
    ///
    /// ```
    /// use bevy_dropdown_console::core::{Value, ValueType};
    ///
    /// assert_eq!(Value::coerce("42", ValueType::Integer), Some(Value::Integer(42)));
    /// assert_eq!(Value::coerce("4.5", ValueType::Integer), None);
    /// assert_eq!(Value::coerce("4", ValueType::Float), Some(Value::Float(4.0)));
    /// ```
    pub fn coerce(text: &str, ty: ValueType) -> Option<Value> {
        match ty {
            ValueType::Integer => text.parse().ok().map(Value::Integer),
            ValueType::Float => text
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Float),
            ValueType::Text => Some(Value::Text(text.to_string())),
        }
    }

    /// Parse a numeral, preferring an integer reading.
    pub fn parse_number(text: &str) -> Option<Value> {
        Value::coerce(text, ValueType::Integer).or_else(|| Value::coerce(text, ValueType::Float))
    }

    /// Get the type tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Integer(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::Text(_) => ValueType::Text,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Integers widen to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            // Avoid unnecessary decimal places
            Value::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{v:.0}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Rust primitives that can sit behind a variable binding.
///
/// Implemented for `bool`, `i32`, `i64`, `u32`, `f32`, `f64` and `String`.
pub trait ConsoleValue: Clone + Send + Sync + 'static {
    /// Tag used to coerce `set` arguments for this type.
    const TYPE: ValueType;

    /// Convert into a console value.
    fn into_value(self) -> Value;

    /// Convert from a console value of type [`Self::TYPE`].
    ///
    /// Returns `None` when the value is out of range for `Self`.
    fn from_value(value: &Value) -> Option<Self>;
}

impl ConsoleValue for bool {
    const TYPE: ValueType = ValueType::Integer;

    fn into_value(self) -> Value {
        Value::Integer(self as i64)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value.as_integer()? {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }
    }
}

impl ConsoleValue for i32 {
    const TYPE: ValueType = ValueType::Integer;

    fn into_value(self) -> Value {
        Value::Integer(self.into())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_integer()?.try_into().ok()
    }
}

impl ConsoleValue for u32 {
    const TYPE: ValueType = ValueType::Integer;

    fn into_value(self) -> Value {
        Value::Integer(self.into())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_integer()?.try_into().ok()
    }
}

impl ConsoleValue for i64 {
    const TYPE: ValueType = ValueType::Integer;

    fn into_value(self) -> Value {
        Value::Integer(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_integer()
    }
}

impl ConsoleValue for f32 {
    const TYPE: ValueType = ValueType::Float;

    fn into_value(self) -> Value {
        Value::Float(self.into())
    }

    fn from_value(value: &Value) -> Option<Self> {
        let v = value.as_float()? as f32;
        v.is_finite().then_some(v)
    }
}

impl ConsoleValue for f64 {
    const TYPE: ValueType = ValueType::Float;

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl ConsoleValue for String {
    const TYPE: ValueType = ValueType::Text;

    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_text().map(str::to_string)
    }
}
