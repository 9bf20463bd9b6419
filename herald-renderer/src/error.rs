//! Error types for herald-renderer.

use thiserror::Error;

/// A template could not be parsed. Raised at load time; the plan it belongs
/// to is never built.
#[derive(Debug, Error)]
#[error("failed to compile template for field `{field}`: {detail}")]
pub struct CompileError {
    /// Name of the field whose template is malformed.
    pub field: String,
    /// Full error chain reported by the template engine.
    pub detail: String,
    #[source]
    pub source: tera::Error,
}

/// All errors that can arise while executing a compiled plan.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template evaluation failed (undefined variable, type mismatch, ...).
    #[error("failed to render field `{field}`: {detail}")]
    Field {
        field: String,
        detail: String,
        #[source]
        source: tera::Error,
    },

    /// A rendered value could not be decoded into its structured form.
    #[error("field `{field}` rendered to an invalid value: {detail}")]
    Decode { field: String, detail: String },

    /// Typed lookup of a variable that is not bound.
    #[error("variable `{name}` is not defined")]
    UndefinedVariable { name: String },

    /// Typed lookup of a variable bound to a value of the wrong type.
    #[error("variable `{name}` is {found}, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Building the engine context from the variables failed.
    #[error("render context error: {0}")]
    Context(#[from] tera::Error),

    /// Variables did not serialize to a mapping.
    #[error("variable serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Flatten an engine error and all of its causes into one line.
///
/// Tera reports the useful part ("Variable `x` not found ...") as a cause of a
/// generic "Failed to render" error, so the top-level message alone is not
/// enough.
pub(crate) fn describe(err: &tera::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut cause = std::error::Error::source(err);
    while let Some(e) = cause {
        parts.push(e.to_string());
        cause = std::error::Error::source(e);
    }
    parts.join(": ")
}
