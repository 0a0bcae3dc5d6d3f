//! Command tokens
//!
//! A compiled command is a flat sequence of [`Token`]s. The engine's grammar
//! is positional, so a token carries no name: its meaning comes from where it
//! sits in the sequence.
//!
//! ## Type Rules
//!
//! - Three kinds only: string, integer, double
//! - `Int(1) != Double(1.0)`: tokens of different kinds are never equal
//! - Doubles render with the shortest round-trip representation (`2.5`, `1`)

use serde::{Deserialize, Serialize};
use std::fmt;

/// One positional argument of a compiled command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    /// Keyword, identifier or free-form expression
    Str(String),
    /// Counts, offsets, lifespans
    Int(i64),
    /// Weights, scores, quantiles
    Double(f64),
}

impl Token {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Token::Str(_) => "Str",
            Token::Int(_) => "Int",
            Token::Double(_) => "Double",
        }
    }

    /// Get as &str if this is a Str token
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Token::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int token
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Token::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Double token
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Token::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Wire representation handed to the transport
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// True if this token is the given keyword
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.as_str() == Some(keyword)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Str(s) => f.write_str(s),
            Token::Int(i) => write!(f, "{}", i),
            Token::Double(d) => write!(f, "{}", d),
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token::Str(s.to_string())
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Token::Str(s)
    }
}

impl From<&String> for Token {
    fn from(s: &String) -> Self {
        Token::Str(s.clone())
    }
}

impl From<i64> for Token {
    fn from(i: i64) -> Self {
        Token::Int(i)
    }
}

impl From<u32> for Token {
    fn from(i: u32) -> Self {
        Token::Int(i as i64)
    }
}

// Saturates; builders range-check unsigned option values before compiling.
impl From<u64> for Token {
    fn from(i: u64) -> Self {
        Token::Int(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<usize> for Token {
    fn from(i: usize) -> Self {
        Token::Int(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Token {
    fn from(d: f64) -> Self {
        Token::Double(d)
    }
}
