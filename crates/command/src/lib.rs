//! Command compiler for ftkit
//!
//! Turns declarative descriptions into the positional argument sequences the
//! search engine expects:
//! - [`IndexBuilder`] → [`IndexDefinition`] (body of `FT.CREATE`)
//! - [`AggregationBuilder`] → [`AggregationCommand`] (body of `FT.AGGREGATE`)
//!
//! Both compile through the two-pass [`assembler`]: the exact token count is
//! computed first, then tokens are written once into a buffer of that size.
//! Builders are plain values; `build()` never mutates them and can be called
//! repeatedly.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod assembler;
pub mod index;
pub mod property;
pub mod reducer;
pub mod schema;

pub use aggregate::{
    AggregationBuilder, AggregationCommand, CursorOptions, GroupBy, Load, SortBy, Stage, MATCH_ALL,
};
pub use assembler::{assemble, Clause, Part, TokenWriter};
pub use index::{IndexBuilder, IndexDefinition, IndexOptions, DEFAULT_SCORE};
pub use reducer::{Reducer, SortOrder};
pub use schema::{Field, FieldType, Phonetic, Sortable};
