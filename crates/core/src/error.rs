//! Error types for ftkit
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! # Categories
//!
//! | Category | Variants | Raised by |
//! |----------|----------|-----------|
//! | Compile | `MissingSchema`, `ConfigConflict`, `InvalidArgument` | `build()` |
//! | Decode | `ReplyFormat`, `FieldNotFound`, `Conversion` | reply decoder, record accessors |
//! | Remote | `Server`, `Transport` | executor |
//! | Setup | `Config` | configuration loading |
//!
//! None of these are retryable: they describe a caller mistake or an
//! unexpected engine reply.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for ftkit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for command compilation and reply decoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum Error {
    // ==================== Compile Errors ====================
    /// Index definition was built without any schema field
    #[error("index definition has no schema fields")]
    MissingSchema,

    /// Mutually exclusive options were set together
    #[error("configuration conflict: {reason}")]
    ConfigConflict {
        /// Which options collided
        reason: String,
    },

    /// An option or descriptor carries a value the engine would reject
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument
        reason: String,
    },

    // ==================== Decode Errors ====================
    /// Reply does not have the expected shape
    #[error("reply format error: {reason}")]
    ReplyFormat {
        /// Which part of the reply was malformed
        reason: String,
    },

    /// A decoded record has no field with the requested name
    #[error("field not found: {field}")]
    FieldNotFound {
        /// Requested field name
        field: String,
    },

    /// A reply value could not be coerced to the requested type
    #[error("cannot convert {actual} to {expected}")]
    Conversion {
        /// Requested type
        expected: String,
        /// Description of the value found
        actual: String,
    },

    // ==================== Remote Errors ====================
    /// The engine answered with an error reply
    #[error("server error: {message}")]
    Server {
        /// Error message sent by the engine
        message: String,
    },

    /// The transport failed to deliver the command
    #[error("transport error: {reason}")]
    Transport {
        /// Transport-specific failure description
        reason: String,
    },

    // ==================== Setup Errors ====================
    /// Configuration could not be read or parsed
    #[error("config error: {reason}")]
    Config {
        /// Parse or I/O failure description
        reason: String,
    },
}

impl Error {
    /// Create a configuration-conflict error
    pub fn conflict(reason: impl Into<String>) -> Self {
        Error::ConfigConflict {
            reason: reason.into(),
        }
    }

    /// Create an invalid-argument error
    pub fn invalid(reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a reply-format error
    pub fn reply_format(reason: impl Into<String>) -> Self {
        Error::ReplyFormat {
            reason: reason.into(),
        }
    }

    /// Create a conversion error
    pub fn conversion(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Error::Conversion {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// True for errors detected while compiling a command, before anything is sent
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            Error::MissingSchema | Error::ConfigConflict { .. } | Error::InvalidArgument { .. }
        )
    }
}
