//! Per-field sort configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Value type of a sortable field. Drives how the compiler makes it sortable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Compared case-insensitively through a lowercased temporary
    String,
    Number,
    /// Compared by element count through a size temporary
    Array,
    /// Sorted directly, or through a null-coalescing temporary when a
    /// replacement is configured
    Date,
    Boolean,
    /// Any `type` string that untyped configuration supplied but this crate
    /// does not know. Never produced by the typed constructors.
    #[serde(other)]
    Unrecognized,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Array => "array",
            FieldKind::Date => "date",
            FieldKind::Boolean => "boolean",
            FieldKind::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry entry describing one sortable logical field.
///
/// Field names follow snake_case, with the camelCase spellings accepted as
/// aliases so registries written for JavaScript hosts load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Physical document path, possibly dotted. Defaults to the logical name.
    #[serde(
        default,
        alias = "databaseKey",
        alias = "storageKey",
        skip_serializing_if = "Option::is_none"
    )]
    pub storage_key: Option<String>,
    #[serde(
        default,
        alias = "nullReplacementKey",
        skip_serializing_if = "Option::is_none"
    )]
    pub null_replacement_key: Option<String>,
    #[serde(
        default,
        alias = "nullReplacementValue",
        skip_serializing_if = "Option::is_none"
    )]
    pub null_replacement_value: Option<Value>,
}

impl FieldSpec {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            storage_key: None,
            null_replacement_key: None,
            null_replacement_value: None,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    pub fn number() -> Self {
        Self::new(FieldKind::Number)
    }

    pub fn array() -> Self {
        Self::new(FieldKind::Array)
    }

    pub fn date() -> Self {
        Self::new(FieldKind::Date)
    }

    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    pub fn with_null_replacement_key(mut self, key: impl Into<String>) -> Self {
        self.null_replacement_key = Some(key.into());
        self
    }

    pub fn with_null_replacement_value(mut self, value: impl Into<Value>) -> Self {
        self.null_replacement_value = Some(value.into());
        self
    }

    /// Physical key this field reads from, given its logical name.
    pub fn storage_key_or<'a>(&'a self, logical_name: &'a str) -> &'a str {
        match self.storage_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => logical_name,
        }
    }

    /// Replacement key, ignoring an empty string.
    pub fn replacement_key(&self) -> Option<&str> {
        self.null_replacement_key
            .as_deref()
            .filter(|key| !key.is_empty())
    }

    /// Replacement literal, ignoring an explicit `null`.
    pub fn replacement_value(&self) -> Option<&Value> {
        self.null_replacement_value
            .as_ref()
            .filter(|value| !value.is_null())
    }

    pub fn has_null_replacement(&self) -> bool {
        self.replacement_key().is_some() || self.replacement_value().is_some()
    }
}
