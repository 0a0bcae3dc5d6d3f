//! Core types for ftkit
//!
//! This crate defines the foundational types shared by the command compiler,
//! the reply decoder and the executor:
//! - Token: one positional argument of a compiled command
//! - Reply: protocol-neutral reply returned by the transport
//! - Structure: storage structure an index is declared on (hash or JSON)
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod reply;
pub mod structure;
pub mod token;

pub use error::{Error, Result};
pub use reply::Reply;
pub use structure::Structure;
pub use token::Token;
