//! Core data model definitions shared across docsort crates.
#![allow(missing_docs)]

pub mod expr;
pub mod field;
pub mod pipeline;
pub mod registry;
pub mod sort;

// Intentionally curated re-exports for downstream consumers.
pub use expr::Expr;
pub use field::{FieldKind, FieldSpec};
pub use pipeline::{CompiledPipeline, Stage};
pub use registry::FieldRegistry;
pub use sort::{SortDirection, SortKeys};
