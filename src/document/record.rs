//! Typed access to individual records.
//!
//! Records are flat JSON objects stored in section collections. The views in
//! this module remember where a record lives (`claim.claims[3]`) so that every
//! missing or mistyped field is reported with its location.

use super::amount::{Amount, Coin};
use crate::errors::{MigrationError, Result};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier of a record.
///
/// Exported documents encode 64-bit identifiers as strings, while hand-made
/// fixtures often use integers; both compare by their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(String);

impl Key {
    pub fn from_value(location: &str, value: &Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(Self(text.clone())),
            Value::Number(n) => Ok(Self(n.to_string())),
            _ => Err(MigrationError::shape(location, "identifier")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for Key {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

fn object_at<'a>(location: &str, value: &'a Value) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| MigrationError::shape(location, "record object"))
}

/// Read-only view of one record.
#[derive(Debug, Clone)]
pub struct RecordView<'a> {
    location: String,
    fields: &'a Map<String, Value>,
}

impl<'a> RecordView<'a> {
    pub fn new(section: &str, index: usize, value: &'a Value) -> Result<Self> {
        Self::at(format!("{section}[{index}]"), value)
    }

    pub fn at(location: String, value: &'a Value) -> Result<Self> {
        let fields = object_at(&location, value)?;
        Ok(Self { location, fields })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn fields(&self) -> &'a Map<String, Value> {
        self.fields
    }

    fn field_location(&self, field: &str) -> String {
        format!("{}.{}", self.location, field)
    }

    pub fn require(&self, field: &str) -> Result<&'a Value> {
        self.fields
            .get(field)
            .ok_or_else(|| MigrationError::missing_field(&self.location, field))
    }

    /// Field value, treating an explicit `null` as absent.
    pub fn optional(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    pub fn require_str(&self, field: &str) -> Result<&'a str> {
        self.require(field)?
            .as_str()
            .ok_or_else(|| MigrationError::shape(self.field_location(field), "string"))
    }

    pub fn require_key(&self, field: &str) -> Result<Key> {
        Key::from_value(&self.field_location(field), self.require(field)?)
    }

    pub fn require_bool(&self, field: &str) -> Result<bool> {
        self.require(field)?
            .as_bool()
            .ok_or_else(|| MigrationError::shape(self.field_location(field), "boolean"))
    }

    /// Unsigned integer stored as a JSON number or a digit string.
    pub fn require_u64(&self, field: &str) -> Result<u64> {
        let value = self.require(field)?;
        value
            .as_u64()
            .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
            .ok_or_else(|| MigrationError::shape(self.field_location(field), "unsigned integer"))
    }

    pub fn require_object(&self, field: &str) -> Result<RecordView<'a>> {
        RecordView::at(self.field_location(field), self.require(field)?)
    }

    pub fn require_coin(&self, field: &str) -> Result<Coin> {
        Coin::from_value(&self.field_location(field), self.require(field)?)
    }

    pub fn require_amount(&self, field: &str) -> Result<Amount> {
        Amount::from_value(&self.field_location(field), self.require(field)?)
    }
}

/// Mutable view of one record.
#[derive(Debug)]
pub struct RecordMut<'a> {
    location: String,
    fields: &'a mut Map<String, Value>,
}

impl<'a> RecordMut<'a> {
    pub fn new(section: &str, index: usize, value: &'a mut Value) -> Result<Self> {
        let location = format!("{section}[{index}]");
        let fields = value
            .as_object_mut()
            .ok_or_else(|| MigrationError::shape(&location, "record object"))?;
        Ok(Self { location, fields })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Borrow this record read-only, keeping its location.
    pub fn view(&self) -> RecordView<'_> {
        RecordView {
            location: self.location.clone(),
            fields: &*self.fields,
        }
    }

    /// Remove a field and return its value. Absent fields are an error.
    pub fn take(&mut self, field: &str) -> Result<Value> {
        self.fields
            .remove(field)
            .ok_or_else(|| MigrationError::missing_field(&self.location, field))
    }

    /// Remove a field that older records may not carry.
    pub fn take_optional(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field).filter(|v| !v.is_null())
    }

    pub fn remove(&mut self, field: &str) -> Result<()> {
        self.take(field).map(drop)
    }

    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let value = self.take(from)?;
        self.fields.insert(to.to_string(), value);
        Ok(())
    }

    pub fn insert(&mut self, field: &str, value: impl Into<Value>) {
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }
}
