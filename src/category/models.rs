use std::collections::HashMap;

use crate::store::{cell_text, StoreRecord};

/// Lowercased category name to record id, built by a full table scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameIndex {
    ids: HashMap<String, String>,
}

impl NameIndex {
    /// Name precedence: `Name`, then `Category`, then the record id itself.
    pub fn label(record: &StoreRecord) -> String {
        record
            .field("Name")
            .and_then(cell_text)
            .or_else(|| record.field("Category").and_then(cell_text))
            .unwrap_or_else(|| record.id.clone())
    }

    /// Add a record; the first record seen under a name keeps it.
    pub fn insert(&mut self, record: &StoreRecord) {
        self.ids
            .entry(Self::label(record).to_lowercase())
            .or_insert_with(|| record.id.clone());
    }

    /// Case-insensitive lookup.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.ids.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<'a> FromIterator<&'a StoreRecord> for NameIndex {
    fn from_iter<I: IntoIterator<Item = &'a StoreRecord>>(iter: I) -> Self {
        let mut index = NameIndex::default();
        for record in iter {
            index.insert(record);
        }
        index
    }
}

/// Record id to display name, for the ids a summary actually references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayNames {
    names: HashMap<String, String>,
}

impl DisplayNames {
    /// A record without a usable `Name` is displayed by its id.
    pub fn insert(&mut self, record: &StoreRecord) {
        let name = record
            .field("Name")
            .and_then(cell_text)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| record.id.clone());
        self.names.insert(record.id.clone(), name);
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Display form for an id; unknown ids are shown verbatim.
    pub fn display<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).unwrap_or(id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
