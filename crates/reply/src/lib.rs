//! Reply decoder for ftkit
//!
//! Reconstructs typed records from the flat, order-dependent replies of
//! `FT.AGGREGATE` and `FT.CURSOR READ`:
//! - [`decode_aggregate`]: `[count, record...]` → [`AggregateResult`]
//! - [`decode_cursor`]: `[[total, record...], cursor]` → [`CursorPage`]
//!
//! Decoding is a pure function of the reply: no shared state, reentrant,
//! and all-or-nothing (a malformed reply yields an error, never a partial
//! result).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod decode;
pub mod record;

pub use decode::{decode_aggregate, decode_cursor, AggregateResult, CursorPage};
pub use record::{RawValue, Record};
