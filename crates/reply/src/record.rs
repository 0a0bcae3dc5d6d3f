//! Decoded records and lazily converted values.
//!
//! Values are kept exactly as the engine delivered them. Conversion to
//! string, integer or float happens on access and is lossless: a value that
//! would need truncation to become an integer is a conversion error, never a
//! rounded number.

use ftkit_core::{Error, Reply, Result};
use serde::{Deserialize, Serialize};

/// One field value as delivered by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawValue(Reply);

impl RawValue {
    /// Wrap a reply element
    pub fn new(reply: Reply) -> Self {
        RawValue(reply)
    }

    /// The underlying reply element
    pub fn reply(&self) -> &Reply {
        &self.0
    }

    /// True if the engine sent a null for this field
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Borrow the value as text.
    ///
    /// Only string replies qualify; use [`RawValue::to_text`] to render
    /// numbers as well.
    pub fn as_str(&self) -> Result<&str> {
        self.0
            .as_text()
            .ok_or_else(|| Error::conversion("string", self.0.describe()))
    }

    /// Render the value as text, including numeric replies.
    pub fn to_text(&self) -> Result<String> {
        match &self.0 {
            Reply::Integer(i) => Ok(i.to_string()),
            Reply::Double(d) => Ok(d.to_string()),
            _ => self.as_str().map(str::to_string),
        }
    }

    /// Convert to an integer without losing information.
    ///
    /// `"15"` and `"15.0"` both give 15; `"15.5"` is an error.
    pub fn as_i64(&self) -> Result<i64> {
        match &self.0 {
            Reply::Integer(i) => Ok(*i),
            Reply::Double(d) => exact_i64(*d).ok_or_else(|| self.not("integer")),
            _ => {
                let text = self.as_str().map_err(|_| self.not("integer"))?.trim();
                if let Ok(i) = text.parse::<i64>() {
                    return Ok(i);
                }
                // "15.000": parse the integer digits, not a rounded float
                if let Some((whole, fraction)) = text.split_once('.') {
                    if !fraction.is_empty() && fraction.bytes().all(|b| b == b'0') {
                        return whole.parse::<i64>().map_err(|_| self.not("integer"));
                    }
                }
                text.parse::<f64>()
                    .ok()
                    .and_then(exact_i64)
                    .ok_or_else(|| self.not("integer"))
            }
        }
    }

    /// Convert to a float.
    ///
    /// Accepts the engine's `inf`/`-inf` spellings.
    pub fn as_f64(&self) -> Result<f64> {
        match &self.0 {
            Reply::Double(d) => Ok(*d),
            Reply::Integer(i) => Ok(*i as f64),
            _ => self
                .as_str()
                .map_err(|_| self.not("float"))?
                .trim()
                .parse::<f64>()
                .map_err(|_| self.not("float")),
        }
    }

    /// Elements of a list value (`TOLIST`, `RANDOM_SAMPLE`)
    pub fn as_list(&self) -> Result<Vec<RawValue>> {
        self.0
            .as_array()
            .map(|items| items.iter().cloned().map(RawValue).collect())
            .ok_or_else(|| self.not("list"))
    }

    fn not(&self, expected: &str) -> Error {
        Error::conversion(expected, self.0.describe())
    }
}

/// From 2^53 on, floats no longer hold every integer, so the value they
/// carry may already differ from what the engine sent.
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

fn exact_i64(d: f64) -> Option<i64> {
    if d.is_finite() && d.fract() == 0.0 && d.abs() < MAX_EXACT_FLOAT_INT {
        Some(d as i64)
    } else {
        None
    }
}

/// One aggregation result row.
///
/// Fields keep the order the engine sent them in. Lookup is by exact,
/// case-sensitive name and scans only this record's fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, RawValue)>,
}

impl Record {
    /// Record from name/value pairs
    pub fn new(fields: Vec<(String, RawValue)>) -> Self {
        Record { fields }
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in reply order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Name/value pairs in reply order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Value of the first field called `name`
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// True if the record carries `name`
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn require(&self, name: &str) -> Result<&RawValue> {
        self.get(name).ok_or_else(|| Error::FieldNotFound {
            field: name.to_string(),
        })
    }

    /// Field as borrowed text
    pub fn get_str(&self, name: &str) -> Result<&str> {
        self.require(name)?.as_str()
    }

    /// Field as integer
    pub fn get_i64(&self, name: &str) -> Result<i64> {
        self.require(name)?.as_i64()
    }

    /// Field as float
    pub fn get_f64(&self, name: &str) -> Result<f64> {
        self.require(name)?.as_f64()
    }
}
