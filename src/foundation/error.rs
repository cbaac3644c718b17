/// Convenience result type used by loaders, the card driver and the CLI.
pub type CardResult<T> = Result<T, CardError>;

/// Result of document model operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Result of a single layer render call.
///
/// Every recoverable condition in the rendering path (missing attribute, unreachable resource,
/// undecodable payload) comes back as `Err`; nothing in that path panics for bad card data.
pub type LayerResult<T> = Result<T, RenderError>;

/// Top-level error taxonomy used by crate APIs.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// Invalid user-provided data (settings, card input shape).
    #[error("validation error: {0}")]
    Validation(String),

    /// Template could not be parsed or is missing required structure.
    #[error("template error: {0}")]
    Template(String),

    /// Errors raised by the document model.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// A layer failed while the driver ran in strict mode.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardError::Template`] value.
    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template(msg.into())
    }
}

/// Failures of document reads, writes and token streams.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The final key of a path getter is absent.
    #[error("no value at '{path}'")]
    Missing {
        /// Dotted path that was requested.
        path: String,
    },

    /// An existing value cannot be read as the requested kind.
    #[error("expected {expected} at '{path}', found {found}")]
    TypeMismatch {
        /// Dotted path of the offending value.
        path: String,
        /// Kind the caller asked for.
        expected: &'static str,
        /// Kind actually stored.
        found: &'static str,
    },

    /// Malformed token stream.
    #[error("parse error at offset {offset}: {message}")]
    Parse {
        /// Byte offset into the source text.
        offset: usize,
        /// What went wrong.
        message: String,
    },

    /// Writer used out of sequence (for example a name outside an object).
    #[error("write error: {0}")]
    Write(String),
}

impl DocumentError {
    pub(crate) fn missing(path: &[&str]) -> Self {
        Self::Missing {
            path: join_path(path),
        }
    }

    pub(crate) fn type_mismatch(path: &[&str], expected: &'static str, found: &'static str) -> Self {
        Self::TypeMismatch {
            path: join_path(path),
            expected,
            found,
        }
    }

    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
        }
    }
}

/// Error reported by a layer renderer. The message always names the layer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RenderError {
    message: String,
}

impl RenderError {
    /// Build a render error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Build a [`RenderError`] from `format!` arguments.
#[macro_export]
macro_rules! render_error {
    ($($arg:tt)*) => {
        $crate::RenderError::new(format!($($arg)*))
    };
}

/// Join path segments with `.` for diagnostics.
pub fn join_path(path: &[&str]) -> String {
    path.join(".")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
