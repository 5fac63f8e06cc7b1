//! In-memory reference executor for compiled pipelines.
//!
//! Evaluates the three stage kinds against `serde_json::Value` documents the
//! way a document aggregation engine would. Useful for checking what a
//! pipeline does to real data without a database.

pub mod ordering;
pub mod path;

pub use ordering::compare_values;

use crate::error::ExecError;
use docsort_model::{CompiledPipeline, Expr, SortKeys, Stage};
use path::{get_path, remove_path, set_path};
use serde_json::Value;
use std::cmp::Ordering;
use tracing::trace;

/// Engine capable of running a compiled pipeline over a document batch.
pub trait StageExecutor {
    type Document;
    type Error;

    fn execute(
        &self,
        pipeline: &CompiledPipeline,
        documents: Vec<Self::Document>,
    ) -> Result<Vec<Self::Document>, Self::Error>;
}

/// Executor over JSON documents held in memory
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryExecutor;

impl InMemoryExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl StageExecutor for InMemoryExecutor {
    type Document = Value;
    type Error = ExecError;

    fn execute(
        &self,
        pipeline: &CompiledPipeline,
        mut documents: Vec<Value>,
    ) -> Result<Vec<Value>, ExecError> {
        for stage in pipeline {
            trace!(documents = documents.len(), ?stage, "executing stage");
            match stage {
                Stage::Set { assignments } => {
                    for document in documents.iter_mut() {
                        apply_set(document, assignments)?;
                    }
                }
                Stage::Sort { keys } => {
                    documents.sort_by(|a, b| compare_documents(a, b, keys));
                }
                Stage::Unset { names } => {
                    for document in documents.iter_mut() {
                        for name in names {
                            remove_path(document, name);
                        }
                    }
                }
            }
        }
        Ok(documents)
    }
}

// Every assignment sees the document as it was before the stage.
fn apply_set(document: &mut Value, assignments: &[(String, Expr)]) -> Result<(), ExecError> {
    let computed = {
        let current: &Value = document;
        assignments
            .iter()
            .map(|(name, expr)| -> Result<_, ExecError> {
                Ok((name, evaluate(expr, current, name)?))
            })
            .collect::<Result<Vec<_>, ExecError>>()?
    };

    for (name, value) in computed {
        if let Some(value) = value {
            set_path(document, name, value)?;
        }
    }
    Ok(())
}

/// Evaluates `expr` against `document`. `Ok(None)` means the value is missing.
/// `target` names the field being computed, for error messages.
pub fn evaluate(expr: &Expr, document: &Value, target: &str) -> Result<Option<Value>, ExecError> {
    match expr {
        Expr::Field(path) => Ok(get_path(document, path).cloned()),
        Expr::Literal(value) => Ok(Some(value.clone())),
        Expr::Lower(inner) => {
            let lowered = match evaluate(inner, document, target)? {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.to_lowercase(),
                Some(Value::Number(n)) => n.to_string(),
                Some(other) => {
                    return Err(ExecError::LowerOfNonScalar {
                        path: target.to_string(),
                        found: kind_name(Some(&other)),
                    });
                }
            };
            Ok(Some(Value::String(lowered)))
        }
        Expr::Size(inner) => match evaluate(inner, document, target)? {
            Some(Value::Array(items)) => Ok(Some(Value::from(items.len()))),
            other => Err(ExecError::SizeOfNonArray {
                path: target.to_string(),
                found: kind_name(other.as_ref()),
            }),
        },
        Expr::Coalesce(candidates) => {
            for candidate in candidates {
                match evaluate(candidate, document, target)? {
                    None | Some(Value::Null) => continue,
                    found => return Ok(found),
                }
            }
            Ok(None)
        }
    }
}

/// Compares two documents key by key; the first unequal key decides.
pub fn compare_documents(a: &Value, b: &Value, keys: &SortKeys) -> Ordering {
    keys.iter()
        .map(|(path, direction)| {
            let ordering = compare_values(get_path(a, path), get_path(b, path));
            if direction.is_descending() {
                ordering.reverse()
            } else {
                ordering
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn kind_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "missing",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "bool",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}
