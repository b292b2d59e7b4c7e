//! # Error Types
//!
//! Structured error types for windload_core.
//!
//! The wind-load pipeline itself never fails: unresolved quantities come back
//! as `None` in the result. Errors surface at the edges of the crate: table
//! loading and free-form input parsing. The terrain classifier also uses them
//! internally before falling back to its conservative category.
//!
//! ## Example
//!
//! ```rust
//! use windload_core::errors::{CalcError, CalcResult};
//!
//! fn validate_height(height_m: f64) -> CalcResult<()> {
//!     if !height_m.is_finite() || height_m < 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "height_m".to_string(),
//!             value: height_m.to_string(),
//!             reason: "Height must be a finite, non-negative number".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for windload_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for table loading, input parsing and geodata access.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, unknown code, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A wind table is malformed or incomplete
    #[error("Table data error in '{table}': {reason}")]
    TableData { table: String, reason: String },

    /// The geodata service could not be reached (timeout, DNS, refused)
    #[error("Geodata request failed: {reason}")]
    GeodataRequest { reason: String },

    /// The geodata service answered, but not with something usable
    #[error("Geodata response rejected: {reason}")]
    GeodataResponse { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a TableData error
    pub fn table_data(table: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::TableData {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Create a GeodataRequest error
    pub fn geodata_request(reason: impl Into<String>) -> Self {
        CalcError::GeodataRequest {
            reason: reason.into(),
        }
    }

    /// Create a GeodataResponse error
    pub fn geodata_response(reason: impl Into<String>) -> Self {
        CalcError::GeodataResponse {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::GeodataRequest { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::TableData { .. } => "TABLE_DATA",
            CalcError::GeodataRequest { .. } => "GEODATA_REQUEST",
            CalcError::GeodataResponse { .. } => "GEODATA_RESPONSE",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<toml::de::Error> for CalcError {
    fn from(err: toml::de::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}
