use thiserror::Error;

/// Errors raised to the caller of a compile. Unusable directives are not
/// errors; they degrade to the fallback sort.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("the sort registry has not been applied yet")]
    NotConfigured,

    #[error("invalid sort directive: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, CompileError>;

/// Errors raised while evaluating a pipeline in memory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    #[error("the argument to $size must be an array, found {found} at `{path}`")]
    SizeOfNonArray { path: String, found: &'static str },

    #[error("can't lowercase {found} at `{path}`")]
    LowerOfNonScalar { path: String, found: &'static str },

    #[error("cannot assign `{path}`: {reason}")]
    InvalidAssignment { path: String, reason: String },
}
