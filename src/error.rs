//! Error types for the library web client

use std::time::Duration;

use thiserror::Error;

/// Failure classes the controllers react to.
///
/// Every class is recoverable: callers fall back to substitute data or show a
/// dismissible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network failure, timeout or cancellation before a response arrived
    Transport,
    /// The backend answered with a non-2xx status
    HttpStatus,
    /// The backend answered 2xx but flagged the payload as unsuccessful
    Payload,
    /// Input rejected locally, no request was made
    Validation,
    /// Local storage or configuration problem
    Local,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timeout after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Request cancelled")]
    Cancelled,

    #[error("HTTP error! status: {status}")]
    HttpStatus {
        status: u16,
        message: Option<String>,
    },

    #[error("{0}")]
    Api(String),

    #[error("Invalid response payload: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Transport(_) | AppError::Timeout(_) | AppError::Cancelled => {
                ErrorCategory::Transport
            }
            AppError::HttpStatus { .. } => ErrorCategory::HttpStatus,
            AppError::Api(_) | AppError::Decode(_) => ErrorCategory::Payload,
            AppError::Validation(_) => ErrorCategory::Validation,
            AppError::Storage(_) | AppError::Config(_) => ErrorCategory::Local,
        }
    }

    /// Text shown to the patron in notifications and error panels.
    ///
    /// Prefers the backend's own error message when one came back with a
    /// failing status.
    pub fn user_message(&self) -> String {
        match self {
            AppError::HttpStatus {
                message: Some(message),
                ..
            } => message.clone(),
            AppError::Validation(message) | AppError::Api(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return AppError::Decode(e.to_string());
        }
        if let Some(status) = e.status() {
            return AppError::HttpStatus {
                status: status.as_u16(),
                message: None,
            };
        }
        AppError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Decode(e.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = e
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid {}", field),
                })
            })
            .collect();
        AppError::Validation(messages.join(", "))
    }
}

/// Result type alias for client operations
pub type AppResult<T> = Result<T, AppError>;
