//! Sort directions and ordered sort-key lists.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort direction for a single key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    /// Aggregation-engine spelling: `1` ascending, `-1` descending.
    pub fn as_i32(&self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }

    pub fn is_descending(&self) -> bool {
        matches!(self, SortDirection::Descending)
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("asc"),
            SortDirection::Descending => f.write_str("desc"),
        }
    }
}

/// Ordered mapping of field path to direction. First insertion fixes the
/// sort precedence; the last direction set for a path wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SortKeys(Vec<(String, SortDirection)>);

impl SortKeys {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// `{ _id: ascending }`, the order used when a directive yields nothing.
    pub fn id_ascending() -> Self {
        Self::new().with("_id", SortDirection::Ascending)
    }

    pub fn with(mut self, path: impl Into<String>, direction: SortDirection) -> Self {
        self.set(path, direction);
        self
    }

    /// Appends a key, or overwrites the direction of an existing one in
    /// place. Returns `true` when the path was not present before.
    pub fn set(&mut self, path: impl Into<String>, direction: SortDirection) -> bool {
        let path = path.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == path) {
            Some((_, existing)) => {
                *existing = direction;
                false
            }
            None => {
                self.0.push((path, direction));
                true
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<SortDirection> {
        self.0
            .iter()
            .find(|(existing, _)| existing == path)
            .map(|(_, direction)| *direction)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SortDirection)> {
        self.0.iter().map(|(path, direction)| (path.as_str(), *direction))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, SortDirection)> for SortKeys {
    fn from_iter<I: IntoIterator<Item = (S, SortDirection)>>(iter: I) -> Self {
        let mut keys = SortKeys::new();
        for (path, direction) in iter {
            keys.set(path, direction);
        }
        keys
    }
}
