use thiserror::Error;

#[derive(Error, Debug)]
pub enum PgxError {
    #[error("{source_name}: not a valid PGX header: {reason}")]
    FormatError {
        source_name: String,
        reason: String,
    },

    #[error("{source_name}: expected {expected} samples, got {actual}")]
    ValidationError {
        source_name: String,
        expected: usize,
        actual: usize,
    },

    #[error("{source_name}: failed to read input: {error}")]
    IoError {
        source_name: String,
        #[source]
        error: std::io::Error,
    },
}

impl PgxError {
    pub(crate) fn format(source_name: &str, reason: impl Into<String>) -> Self {
        PgxError::FormatError {
            source_name: source_name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(source_name: &str, error: std::io::Error) -> Self {
        PgxError::IoError {
            source_name: source_name.to_string(),
            error,
        }
    }

    /// Identifier of the input that failed (file path or caller-supplied name).
    pub fn source_name(&self) -> &str {
        match self {
            PgxError::FormatError { source_name, .. }
            | PgxError::ValidationError { source_name, .. }
            | PgxError::IoError { source_name, .. } => source_name,
        }
    }
}

pub type Result<T> = std::result::Result<T, PgxError>;
