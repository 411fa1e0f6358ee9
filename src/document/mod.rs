//! In-memory genesis document.
//!
//! A genesis document is a JSON object with a handful of top-level fields
//! (`chain_id`, `genesis_time`, `consensus_params`, ...) and an `app_state`
//! object whose members are the module **sections**. [`Document`] keeps the
//! two apart so that `app_state` is always an object, and exposes section,
//! path and collection accessors that fail with typed errors instead of
//! panicking on absent keys.
//!
//! Keys are stored in sorted maps, so serialization is deterministic.

pub mod amount;
pub mod record;

pub use amount::{Amount, Coin, Rate};
pub use record::{Key, RecordMut, RecordView};

use crate::errors::{MigrationError, Result};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

const APP_STATE: &str = "app_state";

/// Exported chain state being migrated.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Map<String, Value>,
    app_state: Map<String, Value>,
}

impl Document {
    /// Build a document from parsed JSON.
    ///
    /// The root must be an object carrying an `app_state` object.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut root) = value else {
            return Err(MigrationError::shape("document root", "object"));
        };
        let app_state = match root.remove(APP_STATE) {
            Some(Value::Object(map)) => map,
            Some(_) => return Err(MigrationError::shape(APP_STATE, "object")),
            None => return Err(MigrationError::missing_section(APP_STATE)),
        };
        Ok(Self { root, app_state })
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn into_value(self) -> Value {
        let mut root = self.root;
        root.insert(APP_STATE.to_string(), Value::Object(self.app_state));
        Value::Object(root)
    }

    /// Pretty-printed JSON with sorted keys.
    pub fn to_canonical_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// SHA-256 of the canonical serialization, hex encoded.
    pub fn digest(&self) -> Result<String> {
        let text = self.to_canonical_string()?;
        Ok(format!("{:x}", Sha256::digest(text.as_bytes())))
    }

    // ---- sections -------------------------------------------------------

    pub fn has_section(&self, name: &str) -> bool {
        self.app_state.contains_key(name)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.app_state.keys().map(String::as_str)
    }

    pub fn section(&self, name: &str) -> Result<&Value> {
        self.app_state
            .get(name)
            .ok_or_else(|| MigrationError::missing_section(name))
    }

    pub fn section_mut(&mut self, name: &str) -> Result<&mut Value> {
        self.app_state
            .get_mut(name)
            .ok_or_else(|| MigrationError::missing_section(name))
    }

    /// Insert or replace a whole section.
    pub fn insert_section(&mut self, name: &str, value: Value) {
        self.app_state.insert(name.to_string(), value);
    }

    pub fn remove_section(&mut self, name: &str) -> Result<Value> {
        self.app_state
            .remove(name)
            .ok_or_else(|| MigrationError::missing_section(name))
    }

    /// Deep-copy section `from` under the name `to`, leaving `from` in place.
    pub fn copy_section(&mut self, from: &str, to: &str) -> Result<()> {
        let copy = self.section(from)?.clone();
        self.insert_section(to, copy);
        Ok(())
    }

    // ---- dotted paths under app_state ------------------------------------

    pub fn get_path(&self, path: &str) -> Result<&Value> {
        let (section, rest) = split_path(path);
        let mut current = self.section(section)?;
        let mut location = section.to_string();
        for field in rest {
            current = current
                .as_object()
                .ok_or_else(|| MigrationError::shape(&location, "object"))?
                .get(field)
                .ok_or_else(|| MigrationError::missing_field(&location, field))?;
            location = format!("{location}.{field}");
        }
        Ok(current)
    }

    pub fn get_path_mut(&mut self, path: &str) -> Result<&mut Value> {
        let (section, rest) = split_path(path);
        let mut current = self.section_mut(section)?;
        let mut location = section.to_string();
        for field in rest {
            current = current
                .as_object_mut()
                .ok_or_else(|| MigrationError::shape(&location, "object"))?
                .get_mut(field)
                .ok_or_else(|| MigrationError::missing_field(&location, field))?;
            location = format!("{location}.{field}");
        }
        Ok(current)
    }

    /// Parent object of the last path segment, plus that segment.
    fn parent_mut<'p>(&mut self, path: &'p str) -> Result<(&mut Map<String, Value>, &'p str)> {
        let (parent, field) = path
            .rsplit_once('.')
            .ok_or_else(|| MigrationError::shape(path, "field path below a section"))?;
        let object = self
            .get_path_mut(parent)?
            .as_object_mut()
            .ok_or_else(|| MigrationError::shape(parent, "object"))?;
        Ok((object, field))
    }

    /// Set the field at `path`. Every parent must already exist.
    pub fn set_path(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let (object, field) = self.parent_mut(path)?;
        object.insert(field.to_string(), value.into());
        Ok(())
    }

    pub fn remove_path(&mut self, path: &str) -> Result<Value> {
        let parent_location = path.rsplit_once('.').map_or(path, |(p, _)| p).to_string();
        let (object, field) = self.parent_mut(path)?;
        object
            .remove(field)
            .ok_or_else(|| MigrationError::missing_field(parent_location, field))
    }

    // ---- record collections -------------------------------------------

    /// Record array at `path`, e.g. `claim.claims`, or `accounts` for a
    /// section that is itself an array.
    pub fn records(&self, path: &str) -> Result<&Vec<Value>> {
        self.get_path(path)?
            .as_array()
            .ok_or_else(|| MigrationError::shape(path, "array"))
    }

    pub fn records_mut(&mut self, path: &str) -> Result<&mut Vec<Value>> {
        self.get_path_mut(path)?
            .as_array_mut()
            .ok_or_else(|| MigrationError::shape(path, "array"))
    }

    pub fn push_record(&mut self, path: &str, record: Value) -> Result<()> {
        self.records_mut(path)?.push(record);
        Ok(())
    }

    // ---- top-level fields ----------------------------------------------

    pub fn root_field(&self, key: &str) -> Result<&Value> {
        self.root
            .get(key)
            .ok_or_else(|| MigrationError::missing_section(key))
    }

    pub fn set_root_field(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        if key == APP_STATE {
            return Err(MigrationError::shape(key, "section accessors for app_state"));
        }
        self.root.insert(key.to_string(), value.into());
        Ok(())
    }

    pub fn remove_root_field(&mut self, key: &str) -> Result<Value> {
        self.root
            .remove(key)
            .ok_or_else(|| MigrationError::missing_section(key))
    }

    /// Record the target chain identity: trimmed chain id and genesis time.
    pub fn stamp_chain(&mut self, chain_id: &str, genesis_time: &str) {
        self.root
            .insert("chain_id".to_string(), Value::from(chain_id.trim()));
        self.root
            .insert("genesis_time".to_string(), Value::from(genesis_time));
    }
}

fn split_path(path: &str) -> (&str, std::str::Split<'_, char>) {
    let mut parts = path.split('.');
    let section = parts.next().unwrap_or_default();
    (section, parts)
}

#[derive(Serialize)]
#[serde(untagged)]
enum Entry<'a> {
    Value(&'a Value),
    Map(&'a Map<String, Value>),
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut entries: BTreeMap<&str, Entry<'_>> = self
            .root
            .iter()
            .map(|(k, v)| (k.as_str(), Entry::Value(v)))
            .collect();
        entries.insert(APP_STATE, Entry::Map(&self.app_state));
        serializer.collect_map(entries)
    }
}
