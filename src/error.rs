//! Error handling for Pareidolia
//!
//! Every pipeline stage returns [`Result`]; the HTTP handler is the single
//! place where errors turn into responses.

use thiserror::Error;

/// Result type alias for Pareidolia operations
pub type Result<T> = std::result::Result<T, PareidoliaError>;

/// Main error type for Pareidolia operations
#[derive(Error, Debug)]
pub enum PareidoliaError {
    // Input Errors
    #[error("Invalid WAV data: {reason}")]
    Decode {
        reason: String,
        #[source]
        source: Option<hound::Error>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Invalid parameter '{name}': {reason} (got {value:?})")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    // Processing Errors
    #[error("Shape mismatch: expected sequence length {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Internal error: {reason}")]
    Internal { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PareidoliaError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            PareidoliaError::Decode { .. } => "DECODE_ERROR",
            PareidoliaError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            PareidoliaError::InvalidParameter { .. } => "INVALID_PARAMETER",
            PareidoliaError::MissingField { .. } => "MISSING_FIELD",
            PareidoliaError::InvalidRequest { .. } => "INVALID_REQUEST",
            PareidoliaError::ShapeMismatch { .. } => "SHAPE_MISMATCH",
            PareidoliaError::Internal { .. } => "INTERNAL_ERROR",
            PareidoliaError::Io(_) => "IO_ERROR",
            PareidoliaError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Whether the caller could fix this by sending different input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PareidoliaError::Decode { .. }
                | PareidoliaError::UnsupportedFormat { .. }
                | PareidoliaError::InvalidParameter { .. }
                | PareidoliaError::MissingField { .. }
                | PareidoliaError::InvalidRequest { .. }
                | PareidoliaError::ShapeMismatch { .. }
        )
    }

    pub(crate) fn invalid_parameter(name: &str, value: &str, reason: impl Into<String>) -> Self {
        PareidoliaError::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn internal(reason: impl Into<String>) -> Self {
        PareidoliaError::Internal {
            reason: reason.into(),
        }
    }
}

impl From<ndarray::ShapeError> for PareidoliaError {
    fn from(err: ndarray::ShapeError) -> Self {
        PareidoliaError::internal(format!("tensor shape error: {}", err))
    }
}
