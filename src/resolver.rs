//! Record lookup by identifier.
//!
//! Reference fields in a genesis document (`argument_id`, `claim_id`,
//! `category_id`, ...) are plain identifiers with no structural link to the
//! record they name. [`Resolver`] turns such an identifier into the record,
//! and treats a dangling reference as fatal.

use crate::document::{Document, Key, RecordView};
use crate::errors::{MigrationError, Result};
use std::collections::HashMap;
use std::fmt;

/// Path of a record array under `app_state`, e.g. `claim.claims`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection(&'static str);

impl Collection {
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    pub const fn path(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Linear-scan lookups over one document.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    document: &'a Document,
}

impl<'a> Resolver<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// All records of a collection as located views.
    pub fn records(&self, collection: Collection) -> Result<Vec<RecordView<'a>>> {
        self.document
            .records(collection.path())?
            .iter()
            .enumerate()
            .map(|(index, value)| RecordView::new(collection.path(), index, value))
            .collect()
    }

    /// First record whose `field` equals `key`.
    pub fn find(&self, collection: Collection, field: &str, key: &Key) -> Result<RecordView<'a>> {
        self.find_position(collection, field, key)
            .map(|(_, record)| record)
    }

    /// Like [`Resolver::find`], also returning the record's position.
    pub fn find_position(
        &self,
        collection: Collection,
        field: &str,
        key: &Key,
    ) -> Result<(usize, RecordView<'a>)> {
        for (index, record) in self.records(collection)?.into_iter().enumerate() {
            if record.require_key(field)? == *key {
                return Ok((index, record));
            }
        }
        Err(MigrationError::reference_not_found(
            collection.to_string(),
            field,
            key,
        ))
    }

    /// First record matching a compound predicate.
    ///
    /// `description` and `key` only feed the error raised when nothing
    /// matches.
    pub fn find_where<F>(
        &self,
        collection: Collection,
        description: &str,
        key: impl fmt::Display,
        mut predicate: F,
    ) -> Result<RecordView<'a>>
    where
        F: FnMut(&RecordView<'a>) -> Result<bool>,
    {
        for record in self.records(collection)? {
            if predicate(&record)? {
                return Ok(record);
            }
        }
        Err(MigrationError::reference_not_found(
            collection.to_string(),
            description,
            key,
        ))
    }

    /// First match in `primary`, falling back to `secondary`.
    pub fn find_where_either<F>(
        &self,
        primary: Collection,
        secondary: Collection,
        description: &str,
        key: impl fmt::Display,
        mut predicate: F,
    ) -> Result<RecordView<'a>>
    where
        F: FnMut(&RecordView<'a>) -> Result<bool>,
    {
        for collection in [primary, secondary] {
            for record in self.records(collection)? {
                if predicate(&record)? {
                    return Ok(record);
                }
            }
        }
        Err(MigrationError::reference_not_found(
            format!("{primary}|{secondary}"),
            description,
            key,
        ))
    }

    pub fn index(&self, collection: Collection, field: &str) -> Result<SectionIndex> {
        SectionIndex::build(self.document, collection, field)
    }
}

/// Map-based index over one collection.
///
/// Keeps the first occurrence of each key so lookups agree with the linear
/// scan when identifiers repeat.
#[derive(Debug, Clone)]
pub struct SectionIndex {
    collection: Collection,
    field: String,
    positions: HashMap<Key, usize>,
}

impl SectionIndex {
    pub fn build(document: &Document, collection: Collection, field: &str) -> Result<Self> {
        let mut positions = HashMap::new();
        for (index, record) in Resolver::new(document)
            .records(collection)?
            .into_iter()
            .enumerate()
        {
            positions.entry(record.require_key(field)?).or_insert(index);
        }
        Ok(Self {
            collection,
            field: field.to_string(),
            positions,
        })
    }

    pub fn position(&self, key: &Key) -> Result<usize> {
        self.positions.get(key).copied().ok_or_else(|| {
            MigrationError::reference_not_found(self.collection.to_string(), &self.field, key)
        })
    }

    pub fn get<'a>(&self, document: &'a Document, key: &Key) -> Result<RecordView<'a>> {
        let position = self.position(key)?;
        let records = document.records(self.collection.path())?;
        let value = records.get(position).ok_or_else(|| {
            MigrationError::reference_not_found(self.collection.to_string(), &self.field, key)
        })?;
        RecordView::new(self.collection.path(), position, value)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.positions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
