//! Error types for image intake and preview operations

use std::borrow::Cow;
use thiserror::Error;

/// Result type alias for intake operations
pub type Result<T> = std::result::Result<T, IntakeError>;

/// Banner text shown for a file whose media type is not an image
pub const INVALID_TYPE_MESSAGE: &str = "Please select a valid image file";

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Banner text shown when the external remover fails
pub const PROCESSING_FAILURE_MESSAGE: &str = "Failed to remove background. Please try again.";

/// Error types surfaced by the intake controller and its collaborators
#[derive(Error, Debug)]
pub enum IntakeError {
    /// Declared media type does not carry the accepted image prefix
    #[error("Invalid file type: '{media_type}' is not an image")]
    InvalidType { media_type: String },

    /// File exceeds the configured size limit
    #[error("File too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    /// External background-removal capability rejected or failed
    #[error("Processing failure: {0}")]
    ProcessingFailure(String),

    /// An upload was attempted while a removal call is outstanding
    #[error("An image is already being processed")]
    Busy,

    /// A result-only action was requested without a live result
    #[error("No processed result is available")]
    NoResult,

    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl IntakeError {
    /// Create a new invalid type error
    pub fn invalid_type<S: Into<String>>(media_type: S) -> Self {
        Self::InvalidType {
            media_type: media_type.into(),
        }
    }

    /// Create a new too-large error
    #[must_use]
    pub fn too_large(size: u64, limit: u64) -> Self {
        Self::TooLarge { size, limit }
    }

    /// Create a new processing failure
    pub fn processing<S: Into<String>>(msg: S) -> Self {
        Self::ProcessingFailure(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<std::path::Path>>(
        operation: &str,
        path: P,
        error: &std::io::Error,
    ) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {} '{}': {}", operation, path_display, error),
        ))
    }

    /// Create configuration error with valid ranges
    pub fn config_value_error<T: std::fmt::Display>(
        parameter: &str,
        value: T,
        valid_range: &str,
    ) -> Self {
        Self::InvalidConfig(format!(
            "Invalid {}: {} (valid range: {})",
            parameter, value, valid_range
        ))
    }

    /// Non-technical text for the dismissible error banner.
    ///
    /// Diagnostic detail from [`Display`](std::fmt::Display) is meant for logs only.
    #[must_use]
    pub fn user_message(&self) -> Cow<'static, str> {
        match self {
            Self::InvalidType { .. } => Cow::Borrowed(INVALID_TYPE_MESSAGE),
            Self::TooLarge { limit, .. } => Cow::Owned(too_large_message(*limit)),
            Self::ProcessingFailure(_) => Cow::Borrowed(PROCESSING_FAILURE_MESSAGE),
            Self::Busy => Cow::Borrowed("Please wait for the current image to finish processing"),
            Self::NoResult => Cow::Borrowed("There is no processed image to download"),
            Self::Io(_) | Self::InvalidConfig(_) => {
                Cow::Borrowed("Something went wrong. Please try again.")
            },
        }
    }

    /// Whether the UI should show the generic processing banner
    #[must_use]
    pub fn is_processing_failure(&self) -> bool {
        matches!(self, Self::ProcessingFailure(_))
    }

    /// Whether this error belongs to upload validation
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidType { .. } | Self::TooLarge { .. })
    }
}

/// Banner text for a file above `limit` bytes, rounded to whole MB (at least 1)
#[must_use]
pub fn too_large_message(limit: u64) -> String {
    let megabytes = ((limit + BYTES_PER_MB / 2) / BYTES_PER_MB).max(1);
    format!("File size must be less than {}MB", megabytes)
}

// io::Error is not Clone; the copy keeps its kind and message.
impl Clone for IntakeError {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidType { media_type } => Self::InvalidType {
                media_type: media_type.clone(),
            },
            Self::TooLarge { size, limit } => Self::TooLarge {
                size: *size,
                limit: *limit,
            },
            Self::ProcessingFailure(msg) => Self::ProcessingFailure(msg.clone()),
            Self::Busy => Self::Busy,
            Self::NoResult => Self::NoResult,
            Self::Io(err) => Self::Io(std::io::Error::new(err.kind(), err.to_string())),
            Self::InvalidConfig(msg) => Self::InvalidConfig(msg.clone()),
        }
    }
}
