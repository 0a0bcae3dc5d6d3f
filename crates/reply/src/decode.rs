//! Aggregation reply decoding
//!
//! ## Reply Shape
//!
//! ```text
//! [ <count>,
//!   [ name, value, name, value, ... ],   record 1
//!   [ name, value, ... ],                record 2
//!   ... ]
//! ```
//!
//! Records are delimited by their nesting, not by a fixed field count:
//! after a GROUPBY with varying reducers, or with sparse documents, two
//! records may carry different fields. A reply whose records arrive
//! flattened into the top-level array is rejected as malformed.
//!
//! Cursor reads wrap the same shape with a cursor id:
//!
//! ```text
//! [ [ <total>, record... ], <cursor id> ]
//! ```

use ftkit_core::{Error, Reply, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::{RawValue, Record};

/// Decoded records of one aggregation reply, in reply order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    records: Vec<Record>,
}

impl AggregateResult {
    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the aggregation produced no record
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in reply order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate over records
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Take ownership of the records
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl IntoIterator for AggregateResult {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a AggregateResult {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// One page read through an aggregation cursor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CursorPage {
    /// Total reported by the engine for the whole aggregation
    pub total: u64,
    /// Records of this page
    pub records: Vec<Record>,
    /// Cursor to pass to the next read; 0 once the cursor is exhausted
    pub cursor: u64,
}

impl CursorPage {
    /// True if no further page can be read
    pub fn is_exhausted(&self) -> bool {
        self.cursor == 0
    }
}

/// Decode a plain `FT.AGGREGATE` reply.
///
/// # Errors
///
/// - [`Error::Server`] if the engine replied with an error
/// - [`Error::ReplyFormat`] if the reply is not `[count, record...]`, a
///   record is not a nested array, a record has an odd number of elements
///   or a non-text field name, or the record count differs from `count`
pub fn decode_aggregate(reply: Reply) -> Result<AggregateResult> {
    let items = top_level(reply)?;
    let (declared, records) = decode_rows(items)?;

    if records.len() as u64 != declared {
        return Err(Error::reply_format(format!(
            "reply declares {} records but carries {}",
            declared,
            records.len()
        )));
    }

    debug!(records = records.len(), "decoded aggregation reply");
    Ok(AggregateResult { records })
}

/// Decode a `WITHCURSOR` aggregation or `FT.CURSOR READ` reply.
///
/// The page's leading count is the engine's running total, so it is reported
/// as [`CursorPage::total`] instead of being checked against the page size.
pub fn decode_cursor(reply: Reply) -> Result<CursorPage> {
    let mut items = top_level(reply)?;
    if items.len() != 2 {
        return Err(Error::reply_format(format!(
            "cursor reply has {} elements, expected [page, cursor]",
            items.len()
        )));
    }

    let cursor = items.pop().map(non_negative).transpose()?.unwrap_or(0);
    let page = match items.pop() {
        Some(page) => top_level(page)?,
        None => Vec::new(),
    };
    let (total, records) = decode_rows(page)?;

    debug!(records = records.len(), cursor, "decoded cursor page");
    Ok(CursorPage {
        total,
        records,
        cursor,
    })
}

fn top_level(reply: Reply) -> Result<Vec<Reply>> {
    match reply {
        Reply::Array(items) => Ok(items),
        Reply::Error(message) => Err(Error::Server { message }),
        other => Err(Error::reply_format(format!(
            "expected an array reply, got {}",
            other.describe()
        ))),
    }
}

fn decode_rows(items: Vec<Reply>) -> Result<(u64, Vec<Record>)> {
    let mut items = items.into_iter();
    let declared = match items.next() {
        Some(count) => non_negative(count)?,
        None => return Err(Error::reply_format("reply is empty, expected a record count")),
    };

    let records = items
        .enumerate()
        .map(|(i, row)| decode_record(i, row))
        .collect::<Result<Vec<_>>>()?;
    Ok((declared, records))
}

fn non_negative(reply: Reply) -> Result<u64> {
    let value = match &reply {
        Reply::Integer(i) => u64::try_from(*i).ok(),
        other => other.as_text().and_then(|t| t.trim().parse::<u64>().ok()),
    };
    value.ok_or_else(|| {
        Error::reply_format(format!(
            "expected a non-negative count, got {}",
            reply.describe()
        ))
    })
}

fn decode_record(index: usize, row: Reply) -> Result<Record> {
    let items = match row {
        Reply::Array(items) => items,
        other => {
            return Err(Error::reply_format(format!(
                "record {} is {}, expected a nested name/value array",
                index,
                other.describe()
            )))
        }
    };
    if items.len() % 2 != 0 {
        return Err(Error::reply_format(format!(
            "record {} has an odd number of elements ({})",
            index,
            items.len()
        )));
    }

    let mut fields = Vec::with_capacity(items.len() / 2);
    let mut items = items.into_iter();
    while let (Some(name), Some(value)) = (items.next(), items.next()) {
        let name = match name.as_text() {
            Some(text) => text.to_string(),
            None => {
                return Err(Error::reply_format(format!(
                    "record {} has a non-text field name: {}",
                    index,
                    name.describe()
                )))
            }
        };
        fields.push((name, RawValue::new(value)));
    }
    Ok(Record::new(fields))
}
