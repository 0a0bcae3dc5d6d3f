//! Pipeline Tests
//!
//! End-to-end tests through the public `ftkit` facade:
//! - Index definitions: canonical order, conflicts, field grammar
//! - Aggregations: stage order, reducers, trailing options
//! - Decoding: grouped replies, cursors, conversions, through the executor
//! - Properties: length and ordering laws over generated inputs


mod decode;
mod index_definition;
mod properties;
