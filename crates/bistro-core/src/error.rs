//! # Error Types
//!
//! Domain-specific error types for bistro-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bistro-core errors (this file)                                        │
//! │  ├── CoreError        - Engine failures (bad index, wrong state, ...)  │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  register errors (app crate)                                           │
//! │  └── ApiError         - What the presentation layer sees (serialized)  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError::InvalidInput → ApiError → UI       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure is reported to the immediate caller. Nothing here is fatal:
//! the caller fixes the request and tries again, and a failed call never
//! leaves a ledger half-updated.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Bill engine errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Malformed or out-of-domain numeric input (negative price, quantity,
    /// tax rate, tip or split amount).
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Participant index beyond the current bounds of the ledger.
    #[error("Participant index {index} out of range (ledger has {len} participants)")]
    OutOfRange { index: usize, len: usize },

    /// The operation would leave fewer participants than a split allows.
    ///
    /// ## User Workflow
    /// ```text
    /// Split: [Person 1, Person 2]
    ///      │
    ///      ▼
    /// Click "Remove" on Person 2
    ///      │
    ///      ▼
    /// MinimumParticipants { min: 2, current: 2 }
    ///      │
    ///      ▼
    /// UI keeps both rows, hides the Remove button
    /// ```
    #[error("A split needs at least {min} participants (currently {current})")]
    MinimumParticipants { min: usize, current: usize },

    /// The ledger is not in a state that supports the operation.
    ///
    /// ## When This Occurs
    /// - Adding a participant before the bill is split
    /// - Rebalancing an unsplit ledger
    /// - Enabling a split that is already active
    #[error("Cannot {operation} while the ledger is {state}")]
    InvariantViolation {
        operation: &'static str,
        state: &'static str,
    },

    /// A cart operation referenced an item id that is not in the cart.
    #[error("Item not in cart: {0}")]
    ItemNotFound(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any state is touched, so a rejected request leaves
/// everything as it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    NotNegative { field: String },

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. "12.345" for a currency amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g. two line items sharing an id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Arithmetic would leave the representable money range.
    #[error("{field} is too large")]
    Overflow { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::OutOfRange { index: 4, len: 3 };
        assert_eq!(
            err.to_string(),
            "Participant index 4 out of range (ledger has 3 participants)"
        );

        let err = CoreError::InvariantViolation {
            operation: "add a participant",
            state: "unsplit",
        };
        assert_eq!(
            err.to_string(),
            "Cannot add a participant while the ledger is unsplit"
        );
    }

    #[test]
    fn test_validation_converts_to_invalid_input() {
        let validation_err = ValidationError::NotNegative {
            field: "tip".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::InvalidInput(_)));
        assert_eq!(core_err.to_string(), "Invalid input: tip must not be negative");
    }
}
