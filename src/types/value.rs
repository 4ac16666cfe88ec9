use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single decoded field value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FieldValue {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    String(String),
}

impl FieldValue {
    /// Exact `u8` value, only for `UInt8`
    pub fn as_u8(&self) -> Option<u8> {
        match self {
            FieldValue::UInt8(v) => Some(*v),
            _ => None,
        }
    }

    /// Any integer variant that fits in an `i64`
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            FieldValue::Int8(v) => Some(v as i64),
            FieldValue::UInt8(v) => Some(v as i64),
            FieldValue::Int16(v) => Some(v as i64),
            FieldValue::UInt16(v) => Some(v as i64),
            FieldValue::Int32(v) => Some(v as i64),
            FieldValue::UInt32(v) => Some(v as i64),
            FieldValue::Int64(v) => Some(v),
            FieldValue::UInt64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Any non-negative integer variant
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            FieldValue::UInt64(v) => Some(v),
            _ => self.as_i64().and_then(|v| u64::try_from(v).ok()),
        }
    }

    /// Any numeric variant widened to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v as f64),
            FieldValue::UInt64(v) => Some(*v as f64),
            FieldValue::String(_) => None,
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, FieldValue::String(_))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int8(v) => write!(f, "{}", v),
            FieldValue::UInt8(v) => write!(f, "{}", v),
            FieldValue::Int16(v) => write!(f, "{}", v),
            FieldValue::UInt16(v) => write!(f, "{}", v),
            FieldValue::Int32(v) => write!(f, "{}", v),
            FieldValue::UInt32(v) => write!(f, "{}", v),
            FieldValue::Int64(v) => write!(f, "{}", v),
            FieldValue::UInt64(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::String(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_accessors() {
        assert_eq!(FieldValue::UInt8(7).as_u8(), Some(7));
        assert_eq!(FieldValue::Int8(7).as_u8(), None);
        assert_eq!(FieldValue::Int16(-3).as_i64(), Some(-3));
        assert_eq!(FieldValue::UInt64(u64::MAX).as_i64(), None);
        assert_eq!(FieldValue::UInt64(u64::MAX).as_u64(), Some(u64::MAX));
        assert_eq!(FieldValue::Int32(-1).as_u64(), None);
        assert_eq!(FieldValue::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(FieldValue::String("ATT".into()).as_f64(), None);
        assert_eq!(FieldValue::String("ATT".into()).as_str(), Some("ATT"));
        assert_eq!(FieldValue::UInt8(1).as_str(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::Int16(-42).to_string(), "-42");
        assert_eq!(FieldValue::Float(-5.0).to_string(), "-5");
        assert_eq!(FieldValue::String("RCIN".into()).to_string(), "RCIN");
        assert!(FieldValue::UInt32(3).is_numeric());
        assert!(!FieldValue::String(String::new()).is_numeric());
    }
}
