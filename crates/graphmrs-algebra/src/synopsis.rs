//! Predicate signatures ("synopses").
//!
//! The signature dictionary itself is authored elsewhere; this module only
//! defines the lookup seam and a JSON-backed table:
//!
//! ```json
//! { "_apple_n_1": [ { "name": "ARG0", "sort": "x" } ],
//!   "_the_q": [ { "name": "ARG0", "sort": "x" },
//!               { "name": "RSTR", "sort": "h" },
//!               { "name": "BODY", "sort": "h" } ] }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{CompositionError, Result};
use crate::var::VarSort;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSpec {
    pub name: String,
    pub sort: VarSort,
}

pub trait SynopsisLookup {
    /// Ordered role signature for `predicate`, if known.
    fn roles(&self, predicate: &str) -> Option<&[RoleSpec]>;

    fn find(&self, predicate: &str) -> Result<&[RoleSpec]> {
        self.roles(predicate).ok_or_else(|| {
            CompositionError::Lookup(format!("Couldn't find {predicate} in the synopsis table"))
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SynopsisTable {
    entries: BTreeMap<String, Vec<RoleSpec>>,
}

impl SynopsisTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn from_json_file(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    pub fn insert(&mut self, predicate: impl Into<String>, roles: Vec<RoleSpec>) {
        self.entries.insert(predicate.into(), roles);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SynopsisLookup for SynopsisTable {
    fn roles(&self, predicate: &str) -> Option<&[RoleSpec]> {
        self.entries.get(predicate).map(Vec::as_slice)
    }
}
