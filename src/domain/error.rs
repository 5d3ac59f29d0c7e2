use std::io;

use thiserror::Error;

/// Library-wide error type for manifest generation.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// Kubernetes version does not match the `[v]MAJOR.MINOR.PATCH[suffix]` grammar.
    #[error(
        "Invalid Kubernetes version {0:?}. Please resubmit with a valid kubernetes version (e.g 1.7.8, 1.8.3)"
    )]
    InvalidVersion(String),

    /// Key not in the recognized parameter table (strict decoding only).
    #[error("Unrecognized field '{0}'")]
    UnrecognizedField(String),

    /// Value could not be coerced to the field's type.
    #[error("Malformed value {value:?} for field '{field}': {reason}")]
    MalformedField { field: String, value: String, reason: String },

    /// Template resource missing, unreadable, or syntactically invalid.
    #[error("Could not load template {path}: {reason}")]
    TemplateLoad { path: String, reason: String },

    /// Template referenced something the parameter record does not provide.
    #[error("Could not render template {template}: {reason}")]
    Substitution { template: String, reason: String },
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub(crate) fn malformed(field: &str, value: &str, reason: impl Into<String>) -> Self {
        AppError::MalformedField {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the failure was caused by the submitted parameters or template,
    /// as opposed to the service environment.
    pub fn is_bad_request(&self) -> bool {
        match self {
            AppError::InvalidVersion(_)
            | AppError::UnrecognizedField(_)
            | AppError::MalformedField { .. }
            | AppError::TemplateLoad { .. }
            | AppError::Substitution { .. } => true,
            AppError::Io(_) | AppError::Configuration(_) | AppError::TomlParseError(_) => false,
        }
    }
}
