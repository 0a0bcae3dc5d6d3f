//! Output enum for command execution results.

use ftkit_reply::{AggregateResult, CursorPage};
use serde::{Deserialize, Serialize};

/// Successful command results.
///
/// The variant is fixed by the command: index creation yields a status,
/// a plain aggregation yields records, and anything involving a cursor
/// yields a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// Status line from the engine (normally `OK`)
    Status(String),

    /// Decoded aggregation rows
    Records(AggregateResult),

    /// One cursor page
    Page(CursorPage),
}

impl Output {
    /// Records of a `Records` or `Page` output
    pub fn records(&self) -> &[ftkit_reply::Record] {
        match self {
            Output::Status(_) => &[],
            Output::Records(result) => result.records(),
            Output::Page(page) => &page.records,
        }
    }
}
