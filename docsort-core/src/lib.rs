//! Sort-directive compiler for document aggregation pipelines.
//!
//! A directive such as `"name,-score"` is checked against a [`FieldRegistry`]
//! and compiled into `$set` / `$sort` / `$unset` stages that make every field
//! sortable: strings case-insensitively, arrays by length, dates with optional
//! null replacement.
//!
//! ```
//! use docsort_core::{CompileOptions, PipelineCompiler};
//! use docsort_model::{FieldRegistry, FieldSpec};
//!
//! let compiler = PipelineCompiler::with_registry(
//!     FieldRegistry::new()
//!         .with_field("name", FieldSpec::string())
//!         .with_field("score", FieldSpec::number()),
//! );
//! let pipeline = compiler
//!     .compile(Some("name,-score"), &CompileOptions::default())
//!     .unwrap();
//! assert_eq!(pipeline.len(), 3);
//! ```
#![allow(missing_docs)]

pub mod compiler;
pub mod directive;
pub mod error;
pub mod executor;
pub mod strategy;
pub mod trace;

pub use compiler::{CompileOptions, PipelineCompiler, shared};
pub use directive::{SortToken, tokenize};
pub use error::{CompileError, ExecError, Result};
pub use executor::{InMemoryExecutor, StageExecutor};
pub use strategy::{FieldPlan, plan_field};
pub use trace::{NoopTracer, PipelineTracer, TracingTracer};

pub use docsort_model::{
    CompiledPipeline, Expr, FieldKind, FieldRegistry, FieldSpec, SortDirection,
    SortKeys, Stage,
};
