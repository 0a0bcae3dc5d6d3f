//! Storage structures an index can be declared on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Underlying key structure the engine indexes.
///
/// Determines the leading `ON <structure>` tokens of an index definition and
/// how schema field identifiers are interpreted: hash fields are plain field
/// names, JSON fields are JSONPath expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Structure {
    /// Hash-backed documents (default)
    #[default]
    Hash,
    /// JSON document-backed documents
    Json,
}

impl Structure {
    /// Keyword emitted after `ON`
    pub fn keyword(&self) -> &'static str {
        match self {
            Structure::Hash => "HASH",
            Structure::Json => "JSON",
        }
    }

    /// True if field identifiers for this structure are JSONPath expressions
    pub fn uses_json_paths(&self) -> bool {
        matches!(self, Structure::Json)
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
