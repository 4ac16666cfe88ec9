use crate::types::format::TypeCode;
use crate::types::value::FieldValue;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One named field of a decoded record, with the code that produced it
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecordField {
    pub name: String,
    pub code: TypeCode,
    pub value: FieldValue,
}

/// A decoded message. Fields keep the order declared by their format.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Record {
    pub msg_type: u8,
    pub name: String,
    pub fields: Vec<RecordField>,
}

impl Record {
    pub fn new(msg_type: u8, name: impl Into<String>) -> Self {
        Self {
            msg_type,
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(msg_type: u8, name: impl Into<String>, capacity: usize) -> Self {
        Self {
            msg_type,
            name: name.into(),
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Insert a field. A repeated column name replaces the earlier value in place.
    pub fn insert(&mut self, name: impl Into<String>, code: TypeCode, value: FieldValue) {
        let name = name.into();
        if let Some(existing) = self.fields.iter_mut().find(|f| f.name == name) {
            existing.code = code;
            existing.value = value;
        } else {
            self.fields.push(RecordField { name, code, value });
        }
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.field(column).map(|f| &f.value)
    }

    pub fn field(&self, column: &str) -> Option<&RecordField> {
        self.fields.iter().find(|f| f.name == column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|f| (f.name.as_str(), &f.value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get_u8(&self, column: &str) -> Option<u8> {
        self.get(column).and_then(FieldValue::as_u8)
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(FieldValue::as_i64)
    }

    pub fn get_f64(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(FieldValue::as_f64)
    }

    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(FieldValue::as_str)
    }

    /// Timestamp in microseconds from the conventional `TimeUS` column
    pub fn timestamp_us(&self) -> Option<u64> {
        self.get("TimeUS").and_then(FieldValue::as_u64)
    }
}
