//! Expressions used to compute temporary sort fields.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Derived-value expression, evaluated per document by the aggregation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Value stored at a (possibly dotted) document path
    Field(String),
    /// Constant value
    Literal(Value),
    /// Lowercased string form of the inner value; null/missing becomes `""`
    Lower(Box<Expr>),
    /// Element count of the inner array value
    Size(Box<Expr>),
    /// First candidate that is neither null nor missing, evaluated left to right
    Coalesce(Vec<Expr>),
}

impl Expr {
    pub fn field(path: impl Into<String>) -> Self {
        Expr::Field(path.into())
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn lower(inner: Expr) -> Self {
        Expr::Lower(Box::new(inner))
    }

    pub fn size(inner: Expr) -> Self {
        Expr::Size(Box::new(inner))
    }

    pub fn coalesce(candidates: Vec<Expr>) -> Self {
        Expr::Coalesce(candidates)
    }

    /// Aggregation-expression rendering (`"$path"`, `{"$toLower": ..}`, ...).
    pub fn to_json(&self) -> Value {
        match self {
            Expr::Field(path) => Value::String(format!("${path}")),
            Expr::Literal(value) => render_literal(value),
            Expr::Lower(inner) => json!({ "$toLower": inner.to_json() }),
            Expr::Size(inner) => json!({ "$size": inner.to_json() }),
            Expr::Coalesce(candidates) => match candidates.as_slice() {
                [] => Value::Null,
                [single] => single.to_json(),
                _ => json!({
                    "$ifNull": candidates.iter().map(Expr::to_json).collect::<Vec<_>>()
                }),
            },
        }
    }
}

// A bare string starting with `$` would be read back as a field path.
fn render_literal(value: &Value) -> Value {
    match value {
        Value::String(s) if s.starts_with('$') => json!({ "$literal": s }),
        Value::Object(_) | Value::Array(_) => json!({ "$literal": value }),
        other => other.clone(),
    }
}
