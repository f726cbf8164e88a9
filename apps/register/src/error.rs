//! # API Error Type
//!
//! Unified error type for register commands, plus the startup errors.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Register                           │
//! │                                                                         │
//! │  Presentation                Rust Register                              │
//! │  ────────────                ─────────────                              │
//! │                                                                         │
//! │  set_custom_tip("-5")                                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  CoreError::InvalidInput(NotNegative) ──────► ApiError ─────────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  e.code    = "VALIDATION_ERROR"                                        │
//! │  e.message = "Invalid input: custom tip must not be negative"          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The presentation layer turns the message into user-facing copy and must
//! not apply the attempted change.

use std::path::PathBuf;

use bistro_core::CoreError;
use serde::Serialize;
use thiserror::Error;

/// API error returned from register commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "MINIMUM_PARTICIPANTS",
///   "message": "A split needs at least 2 participants (currently 2)"
/// }
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Participant index does not exist
    OutOfRange,

    /// Split would drop below two people
    MinimumParticipants,

    /// Operation not allowed in the current checkout / split state
    InvalidState,

    /// Cart item not found
    NotFound,

    /// No checkout in progress
    NoCheckout,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates the error returned when no checkout has been started.
    pub fn no_checkout() -> Self {
        ApiError::new(ErrorCode::NoCheckout, "No checkout in progress")
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::InvalidInput(_) => ErrorCode::ValidationError,
            CoreError::OutOfRange { .. } => ErrorCode::OutOfRange,
            CoreError::MinimumParticipants { .. } => ErrorCode::MinimumParticipants,
            CoreError::InvariantViolation { .. } => ErrorCode::InvalidState,
            CoreError::ItemNotFound(_) => ErrorCode::NotFound,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<bistro_core::ValidationError> for ApiError {
    fn from(err: bistro_core::ValidationError) -> Self {
        ApiError::from(CoreError::from(err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Startup Errors
// =============================================================================

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for `ConfigState`.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is outside what the register accepts.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Anything that stops the register binary.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}
