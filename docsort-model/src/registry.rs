//! Registry of sortable fields.

use crate::field::FieldSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping of logical field name to its [`FieldSpec`]. Names are matched
/// exactly and case-sensitively.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRegistry {
    fields: BTreeMap<String, FieldSpec>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.insert(name, spec);
        self
    }

    /// Inserts or replaces a field, returning the previous spec.
    pub fn insert(&mut self, name: impl Into<String>, spec: FieldSpec) -> Option<FieldSpec> {
        self.fields.insert(name.into(), spec)
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }
}

impl<S: Into<String>> FromIterator<(S, FieldSpec)> for FieldRegistry {
    fn from_iter<I: IntoIterator<Item = (S, FieldSpec)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, spec)| (name.into(), spec))
                .collect(),
        }
    }
}
