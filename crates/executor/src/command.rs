//! Command enum for the executor.
//!
//! Commands are pure data: a compiled body plus whatever the executor needs
//! to frame it. They serialize to JSON so they can be logged, queued or
//! shipped to another process before being sent.

use ftkit_command::{AggregationCommand, IndexDefinition};
use serde::{Deserialize, Serialize};

/// One request to the search engine.
///
/// | Variant | Wire command | Output |
/// |---------|--------------|--------|
/// | `CreateIndex` | `FT.CREATE <index> ...` | [`Output::Status`](crate::Output::Status) |
/// | `Aggregate` | `FT.AGGREGATE <index> ...` | [`Output::Records`](crate::Output::Records) or [`Output::Page`](crate::Output::Page) |
/// | `CursorRead` | `FT.CURSOR READ <index> <id> [COUNT n]` | [`Output::Page`](crate::Output::Page) |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Create an index from a compiled definition
    CreateIndex {
        /// Index name
        index: String,
        /// Compiled definition body
        definition: IndexDefinition,
    },

    /// Run a compiled aggregation; the index travels inside the command
    Aggregate(AggregationCommand),

    /// Read the next page of an open cursor
    CursorRead {
        /// Index the cursor was opened on
        index: String,
        /// Cursor id from the previous page
        cursor: u64,
        /// Page size override
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<u64>,
    },
}

impl Command {
    /// Index the command targets
    pub fn index(&self) -> &str {
        match self {
            Command::CreateIndex { index, .. } => index,
            Command::Aggregate(aggregation) => aggregation.index(),
            Command::CursorRead { index, .. } => index,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateIndex { .. } => "CreateIndex",
            Command::Aggregate(_) => "Aggregate",
            Command::CursorRead { .. } => "CursorRead",
        }
    }
}

impl From<AggregationCommand> for Command {
    fn from(aggregation: AggregationCommand) -> Self {
        Command::Aggregate(aggregation)
    }
}
