//! Compiled stage sequences.

use crate::{expr::Expr, sort::SortKeys};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// One declarative transformation step. Order inside a pipeline matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Materialize derived fields
    Set { assignments: Vec<(String, Expr)> },
    /// Order documents by the given keys
    Sort { keys: SortKeys },
    /// Drop the named fields from output documents
    Unset { names: Vec<String> },
}

impl Stage {
    pub fn sort(keys: SortKeys) -> Self {
        Stage::Sort { keys }
    }

    /// MongoDB aggregation stage document.
    pub fn to_json(&self) -> Value {
        match self {
            Stage::Set { assignments } => {
                let body: Map<String, Value> = assignments
                    .iter()
                    .map(|(name, expr)| (name.clone(), expr.to_json()))
                    .collect();
                json!({ "$set": body })
            }
            Stage::Sort { keys } => {
                let body: Map<String, Value> = keys
                    .iter()
                    .map(|(path, direction)| (path.to_string(), json!(direction.as_i32())))
                    .collect();
                json!({ "$sort": body })
            }
            Stage::Unset { names } => json!({ "$unset": names }),
        }
    }
}

/// Ordered stage sequence produced by one compile call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompiledPipeline(Vec<Stage>);

impl CompiledPipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self(stages)
    }

    /// Single `Sort` stage over `keys`.
    pub fn sort_only(keys: SortKeys) -> Self {
        Self(vec![Stage::sort(keys)])
    }

    pub fn stages(&self) -> &[Stage] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stage> {
        self.0.iter()
    }

    pub fn sort_keys(&self) -> Option<&SortKeys> {
        self.0.iter().find_map(|stage| match stage {
            Stage::Sort { keys } => Some(keys),
            _ => None,
        })
    }

    pub fn assignments(&self) -> Option<&[(String, Expr)]> {
        self.0.iter().find_map(|stage| match stage {
            Stage::Set { assignments } => Some(assignments.as_slice()),
            _ => None,
        })
    }

    pub fn unset_names(&self) -> Option<&[String]> {
        self.0.iter().find_map(|stage| match stage {
            Stage::Unset { names } => Some(names.as_slice()),
            _ => None,
        })
    }

    /// Array of MongoDB aggregation stage documents, ready to splice into a
    /// host pipeline.
    pub fn to_json(&self) -> Value {
        Value::Array(self.0.iter().map(Stage::to_json).collect())
    }
}

impl<'a> IntoIterator for &'a CompiledPipeline {
    type Item = &'a Stage;
    type IntoIter = std::slice::Iter<'a, Stage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortDirection;

    #[test]
    fn renders_stage_documents_in_order() {
        let pipeline = CompiledPipeline::new(vec![
            Stage::Set {
                assignments: vec![(
                    "name__sort_lower".to_string(),
                    Expr::lower(Expr::field("name")),
                )],
            },
            Stage::sort(
                SortKeys::new()
                    .with("name__sort_lower", SortDirection::Ascending)
                    .with("score", SortDirection::Descending),
            ),
            Stage::Unset {
                names: vec!["name__sort_lower".to_string()],
            },
        ]);

        let rendered = pipeline.to_json();
        assert_eq!(
            rendered,
            json!([
                { "$set": { "name__sort_lower": { "$toLower": "$name" } } },
                { "$sort": { "name__sort_lower": 1, "score": -1 } },
                { "$unset": ["name__sort_lower"] }
            ])
        );

        // Sort key precedence survives rendering.
        let sort_body = rendered[1]["$sort"].as_object().unwrap();
        let order: Vec<_> = sort_body.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["name__sort_lower", "score"]);
    }

    #[test]
    fn accessors_find_each_stage_kind() {
        let pipeline = CompiledPipeline::sort_only(SortKeys::id_ascending());
        assert_eq!(pipeline.len(), 1);
        assert!(pipeline.assignments().is_none());
        assert!(pipeline.unset_names().is_none());
        assert_eq!(pipeline.sort_keys(), Some(&SortKeys::id_ascending()));
    }
}
