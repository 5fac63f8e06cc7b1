//! Directive to stage-pipeline compiler.

use crate::{
    directive::tokenize,
    error::{CompileError, Result},
    strategy::{FieldPlan, plan_field},
    trace::{PipelineTracer, TracingTracer},
};
use docsort_model::{
    CompiledPipeline, Expr, FieldRegistry, SortDirection, SortKeys, Stage,
};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock},
};
use tracing::{debug, warn};

/// Per-call compile options
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    /// Leave temporary fields in place; the caller projects them away later.
    pub project_pending: bool,
    /// Order used whenever the directive yields nothing actionable.
    pub fallback: SortKeys,
    /// Hand the result to the compiler's trace sink.
    pub trace: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            project_pending: false,
            fallback: SortKeys::id_ascending(),
            trace: false,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project_pending(mut self, project_pending: bool) -> Self {
        self.project_pending = project_pending;
        self
    }

    pub fn fallback(mut self, fallback: SortKeys) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

/// Compiles sort directives against an applied [`FieldRegistry`].
///
/// The registry is swapped wholesale by [`PipelineCompiler::apply`] and read
/// by every compile; a compile works on an `Arc` snapshot, so a concurrent
/// `apply` never tears a compile in half.
pub struct PipelineCompiler {
    registry: RwLock<Option<Arc<FieldRegistry>>>,
    tracer: Arc<dyn PipelineTracer>,
}

impl fmt::Debug for PipelineCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field_count = self.registry().map(|registry| registry.len());

        f.debug_struct("PipelineCompiler")
            .field("configured", &field_count.is_some())
            .field("field_count", &field_count)
            .finish()
    }
}

impl Default for PipelineCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineCompiler {
    /// Unconfigured compiler; every compile fails until a registry is applied.
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(None),
            tracer: Arc::new(TracingTracer),
        }
    }

    /// Compiler that is configured from the start.
    pub fn with_registry(registry: FieldRegistry) -> Self {
        let compiler = Self::new();
        compiler.apply(registry);
        compiler
    }

    /// Replace the trace sink.
    pub fn with_tracer(mut self, tracer: impl PipelineTracer + 'static) -> Self {
        self.tracer = Arc::new(tracer);
        self
    }

    /// Install `registry`, replacing whatever was applied before.
    pub fn apply(&self, registry: FieldRegistry) {
        debug!(fields = registry.len(), "applying sort registry");
        let mut guard = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(registry));
    }

    pub fn is_configured(&self) -> bool {
        self.registry().is_some()
    }

    /// Snapshot of the applied registry.
    pub fn registry(&self) -> Option<Arc<FieldRegistry>> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn configured_registry(&self) -> Result<Arc<FieldRegistry>> {
        self.registry().ok_or(CompileError::NotConfigured)
    }

    /// Compile `directive` into a stage pipeline.
    ///
    /// An absent or empty directive, one whose tokens all miss the registry,
    /// and one naming a field of unrecognised kind all produce the single
    /// fallback sort stage.
    pub fn compile(
        &self,
        directive: Option<&str>,
        options: &CompileOptions,
    ) -> Result<CompiledPipeline> {
        let registry = self.configured_registry()?;
        let pipeline = build_pipeline(&registry, directive, options);

        if options.trace {
            self.tracer.emit(&pipeline);
        }

        Ok(pipeline)
    }

    /// Compile a directive taken from untyped input such as a decoded query
    /// string. `null` counts as absent; any other non-string is rejected.
    pub fn compile_value(
        &self,
        directive: Option<&Value>,
        options: &CompileOptions,
    ) -> Result<CompiledPipeline> {
        match directive {
            None | Some(Value::Null) => self.compile(None, options),
            Some(Value::String(directive)) => self.compile(Some(directive), options),
            Some(other) => {
                self.configured_registry()?;
                Err(CompileError::InvalidArgument(format!(
                    "sort directive must be a string, received {}",
                    json_type_name(other)
                )))
            }
        }
    }
}

fn build_pipeline(
    registry: &FieldRegistry,
    directive: Option<&str>,
    options: &CompileOptions,
) -> CompiledPipeline {
    let fallback = || CompiledPipeline::sort_only(options.fallback.clone());

    let Some(directive) = directive.filter(|d| !d.is_empty()) else {
        return fallback();
    };

    let mut fields = tokenize(directive)
        .filter_map(|token| {
            registry
                .get(token.field_name)
                .map(|spec| (token, spec))
        })
        .peekable();

    if fields.peek().is_none() {
        debug!(directive, "no registered fields in sort directive; using fallback");
        return fallback();
    }

    let mut assignments: Vec<(String, Expr)> = Vec::new();
    let mut keys = SortKeys::new();

    for (token, spec) in fields {
        let Some(plan) = plan_field(token.field_name, spec) else {
            warn!(
                field = token.field_name,
                kind = %spec.kind,
                "unrecognized field kind in sort registry; using fallback"
            );
            return fallback();
        };

        let direction = SortDirection::from_descending(token.descending);
        if !keys.set(plan.sort_path(), direction) {
            debug!(
                field = token.field_name,
                path = plan.sort_path(),
                %direction,
                "repeated sort key; later direction wins"
            );
            continue;
        }

        if let FieldPlan::Temporary { name, expr } = plan {
            assignments.push((name, expr));
        }
    }

    if assignments.is_empty() {
        return CompiledPipeline::sort_only(keys);
    }

    let temporaries: Vec<String> =
        assignments.iter().map(|(name, _)| name.clone()).collect();
    let mut stages = vec![Stage::Set { assignments }, Stage::sort(keys)];
    if !options.project_pending {
        stages.push(Stage::Unset { names: temporaries });
    }

    CompiledPipeline::new(stages)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

static SHARED: Lazy<PipelineCompiler> = Lazy::new(PipelineCompiler::new);

/// Process-wide compiler for hosts that configure once at startup and compile
/// from anywhere. Starts unconfigured.
pub fn shared() -> &'static PipelineCompiler {
    &SHARED
}
