//! Protocol-neutral reply representation.
//!
//! The transport decodes whatever wire protocol it speaks into a [`Reply`]
//! tree. Nesting is preserved: an aggregation reply is an array whose
//! records are arrays of their own, and the decoder relies on that.

use serde::{Deserialize, Serialize};

/// Reply returned by the transport for one command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reply {
    /// `+OK` style status.
    SimpleString(String),
    /// Binary-safe payload.
    BulkString(Vec<u8>),
    /// Null bulk string or null array.
    Null,
    /// Integer reply.
    Integer(i64),
    /// RESP3 double reply.
    Double(f64),
    /// Array reply, possibly nested.
    Array(Vec<Reply>),
    /// `-ERR ...` style error.
    Error(String),
}

impl Reply {
    /// Creates a bulk string reply from text.
    pub fn bulk(text: impl AsRef<[u8]>) -> Self {
        Reply::BulkString(text.as_ref().to_vec())
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Reply::SimpleString(_) => "simple string",
            Reply::BulkString(_) => "bulk string",
            Reply::Null => "null",
            Reply::Integer(_) => "integer",
            Reply::Double(_) => "double",
            Reply::Array(_) => "array",
            Reply::Error(_) => "error",
        }
    }

    /// Get as text if this is a simple or UTF-8 bulk string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Reply::SimpleString(s) => Some(s),
            Reply::BulkString(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Get the elements if this is an array.
    pub fn as_array(&self) -> Option<&[Reply]> {
        match self {
            Reply::Array(items) => Some(items),
            _ => None,
        }
    }

    /// True for the null reply.
    pub fn is_null(&self) -> bool {
        matches!(self, Reply::Null)
    }

    /// Short human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Reply::SimpleString(s) => format!("simple string {:?}", s),
            Reply::BulkString(b) => format!("bulk string {:?}", String::from_utf8_lossy(b)),
            Reply::Null => "null".to_string(),
            Reply::Integer(i) => format!("integer {}", i),
            Reply::Double(d) => format!("double {}", d),
            Reply::Array(items) => format!("array of {} elements", items.len()),
            Reply::Error(e) => format!("error {:?}", e),
        }
    }
}
