//! Observability sink for compiled pipelines.

use docsort_model::CompiledPipeline;
use tracing::{info, warn};

/// Tracing target used by [`TracingTracer`].
pub const PIPELINE_TRACE_TARGET: &str = "docsort::pipeline";

/// Receives compiled pipelines when a compile asks for tracing.
///
/// Implementations must not block and must swallow their own failures; the
/// compile result never depends on the sink.
#[cfg_attr(test, mockall::automock)]
pub trait PipelineTracer: Send + Sync {
    fn emit(&self, pipeline: &CompiledPipeline);
}

/// Default sink: the rendered stage documents as an `info` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTracer;

impl PipelineTracer for TracingTracer {
    fn emit(&self, pipeline: &CompiledPipeline) {
        match serde_json::to_string_pretty(&pipeline.to_json()) {
            Ok(rendered) => info!(
                target: PIPELINE_TRACE_TARGET,
                stages = pipeline.len(),
                "compiled sort pipeline:\n{rendered}"
            ),
            Err(err) => warn!(
                target: PIPELINE_TRACE_TARGET,
                "failed to render sort pipeline for tracing: {err}"
            ),
        }
    }
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl PipelineTracer for NoopTracer {
    fn emit(&self, _pipeline: &CompiledPipeline) {}
}
