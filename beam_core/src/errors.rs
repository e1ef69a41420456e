//! # Error Types
//!
//! Structured error types for beam_core. Rendering itself is forgiving
//! (out-of-range geometry is clamped, misses are not errors); these errors
//! are raised at the boundaries: the model store, configuration loading and
//! kind parsing.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::errors::{DiagramError, DiagramResult};
//!
//! fn validate_length(length: f64) -> DiagramResult<()> {
//!     if length <= 0.0 {
//!         return Err(DiagramError::invalid_input(
//!             "length",
//!             length.to_string(),
//!             "Beam length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for beam_core operations
pub type DiagramResult<T> = Result<T, DiagramError>;

/// Structured error type for model and rendering operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum DiagramError {
    /// An input value is invalid (non-finite, out of range, duplicate id)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A support or load kind string is not one the renderer knows how to draw
    #[error("Unknown {category} kind: '{kind}'")]
    UnknownKind { category: String, kind: String },

    /// The referenced support/load/beam does not exist
    #[error("Element not found: {id}")]
    ElementNotFound { id: Uuid },

    /// A store mutation was attempted with no active beam
    #[error("No active beam")]
    NoActiveBeam,

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {path} - {reason}")]
    Config { path: String, reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl DiagramError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        DiagramError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownKind error
    pub fn unknown_kind(category: impl Into<String>, kind: impl Into<String>) -> Self {
        DiagramError::UnknownKind {
            category: category.into(),
            kind: kind.into(),
        }
    }

    /// Create an ElementNotFound error
    pub fn not_found(id: Uuid) -> Self {
        DiagramError::ElementNotFound { id }
    }

    /// Create a Config error
    pub fn config(path: impl Into<String>, reason: impl Into<String>) -> Self {
        DiagramError::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DiagramError::InvalidInput { .. } => "INVALID_INPUT",
            DiagramError::UnknownKind { .. } => "UNKNOWN_KIND",
            DiagramError::ElementNotFound { .. } => "ELEMENT_NOT_FOUND",
            DiagramError::NoActiveBeam => "NO_ACTIVE_BEAM",
            DiagramError::Config { .. } => "CONFIG_ERROR",
            DiagramError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for DiagramError {
    fn from(err: serde_json::Error) -> Self {
        DiagramError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = DiagramError::invalid_input("length", "-5.0", "Beam length must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: DiagramError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(DiagramError::NoActiveBeam.error_code(), "NO_ACTIVE_BEAM");
        assert_eq!(DiagramError::unknown_kind("support", "hinge").error_code(), "UNKNOWN_KIND");
        assert_eq!(DiagramError::not_found(Uuid::nil()).error_code(), "ELEMENT_NOT_FOUND");
    }

    #[test]
    fn test_serde_json_conversion() {
        let err: DiagramError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
