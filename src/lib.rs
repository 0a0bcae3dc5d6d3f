//! ftkit - command compiler and reply decoder for RediSearch-style engines
//!
//! ftkit turns declarative index and aggregation descriptions into the exact
//! positional argument sequences of `FT.CREATE` and `FT.AGGREGATE`, and turns
//! the engine's flat aggregation replies back into typed records.
//!
//! # Quick Start
//!
//! ```ignore
//! use ftkit::{AggregationBuilder, Executor, Field, GroupBy, IndexBuilder, Reducer};
//!
//! let executor = Executor::new(transport);
//!
//! let definition = IndexBuilder::json()
//!     .field(Field::tag("$.documentType").alias("documentType"))
//!     .field(Field::numeric("$.score").alias("score"))
//!     .build()?;
//! executor.create_index("idx", &definition)?;
//!
//! let command = AggregationBuilder::new("idx")
//!     .group_by(GroupBy::new(["documentType"]).reduce(Reducer::sum("score").alias("total")))
//!     .build()?;
//! for record in &executor.aggregate(&command)? {
//!     println!("{} {}", record.get_str("documentType")?, record.get_i64("total")?);
//! }
//! ```
//!
//! # Architecture
//!
//! | Crate | Role |
//! |-------|------|
//! | `ftkit-core` | tokens, replies, errors, structure kinds |
//! | `ftkit-command` | index and aggregation compilers |
//! | `ftkit-reply` | aggregation and cursor reply decoding |
//! | `ftkit-executor` | framing, dispatch, configuration |
//!
//! Networking is not part of ftkit: callers plug a connection in through
//! the [`Transport`] trait.

// Re-export the public API from ftkit-executor
pub use ftkit_executor::*;
