use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    text_util::normalize,
};

const BUNDLED_CATALOG: &str = include_str!("../data/catalog.json");

/// A pre-written answer and the key phrases that lead to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    pub keys: Vec<String>,
    /// Opaque answer body; may carry inline markup.
    pub answer: String,
}

/// Ordered list of entries. Order decides ties between equal scores.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    normalized_keys: Vec<Vec<String>>,
}

impl Catalog {
    /// Validate entries and precompute their normalized key phrases.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::InvalidData("catalog has no entries".into()));
        }

        let mut normalized_keys = Vec::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            if entry.title.trim().is_empty() {
                return Err(Error::InvalidData(format!(
                    "catalog entry {idx} has an empty title"
                )));
            }
            if entry.keys.is_empty() {
                return Err(Error::InvalidData(format!(
                    "catalog entry '{}' has no keys",
                    entry.title
                )));
            }

            let mut keys = Vec::with_capacity(entry.keys.len());
            for key in &entry.keys {
                let norm = normalize(key);
                if norm.is_empty() {
                    return Err(Error::InvalidData(format!(
                        "key {key:?} of catalog entry '{}' normalizes to an empty string",
                        entry.title
                    )));
                }
                keys.push(norm);
            }
            normalized_keys.push(keys);
        }

        Ok(Self {
            entries,
            normalized_keys,
        })
    }

    /// The catalog compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Normalized key phrases of the entry at `idx`, in declaration order.
    pub fn normalized_keys(&self, idx: usize) -> &[String] {
        &self.normalized_keys[idx]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.title.as_str())
    }
}
