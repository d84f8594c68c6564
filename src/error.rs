//! Error types for value holders
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Holder Error Enum ==
/// Unified error type for holder construction and decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HolderError {
    /// A required argument (value or codec) was missing or malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The codec could not encode a value or reconstruct one from bytes
    #[error("Serializer error: {0}")]
    Serializer(String),
}

impl HolderError {
    /// Builds a serializer error from any displayable codec failure.
    pub fn serializer(err: impl std::fmt::Display) -> Self {
        HolderError::Serializer(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for holder operations.
pub type Result<T> = std::result::Result<T, HolderError>;
