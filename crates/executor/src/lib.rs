//! # ftkit executor
//!
//! Runs compiled search commands against an engine and decodes the replies.
//!
//! - [`Command`]/[`Output`] - serializable request and result types
//! - [`Executor`] - frames commands, sends them through a [`Transport`],
//!   decodes what comes back
//! - [`ExecutorConfig`] - command names and defaults, loadable from TOML
//!
//! ## Flow
//!
//! | Step | Crate | Result |
//! |------|-------|--------|
//! | compile | `ftkit-command` | [`IndexDefinition`] / [`AggregationCommand`] |
//! | frame | this crate | [`CommandFrame`] |
//! | send | caller's [`Transport`] | [`Reply`] |
//! | decode | `ftkit-reply` | [`AggregateResult`] / [`CursorPage`] |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod command;
mod config;
mod executor;
mod output;
mod transport;

#[cfg(test)]
mod tests;

// =============================================================================
// Public API
// =============================================================================

pub use command::Command;
pub use config::{ExecutorConfig, CONFIG_FILE_NAME};
pub use executor::Executor;
pub use output::Output;
pub use transport::{CommandFrame, Transport};

pub use ftkit_command::*;
pub use ftkit_core::{Error, Reply, Structure, Token};
pub use ftkit_reply::*;

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
