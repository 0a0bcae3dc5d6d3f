//! Reducer descriptors for GROUPBY stages
//!
//! Each reducer compiles to
//!
//! ```text
//! REDUCE <FUNCTION> <argc> <args>... [AS <alias>]
//! ```
//!
//! Property arguments are normalized to `@name`. Without an alias the engine
//! names the output column itself (for example `__generated_aliassumscore`),
//! so callers that read the column back should set one.

use ftkit_core::{Error, Result, Token};
use serde::{Deserialize, Serialize};

use crate::assembler::{Clause, TokenWriter};
use crate::property::property;

/// Sort direction for SORTBY keys and `FIRST_VALUE ... BY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl SortOrder {
    /// Keyword as the engine expects it
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// One aggregate function applied to each group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reducer {
    function: String,
    args: Vec<Token>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
}

impl Reducer {
    /// Arbitrary reducer function with raw arguments
    pub fn new(function: impl Into<String>, args: Vec<Token>) -> Self {
        Reducer {
            function: function.into(),
            args,
            alias: None,
        }
    }

    fn on_property(function: &str, name: &str) -> Self {
        Reducer::new(function, vec![Token::Str(property(name))])
    }

    /// `COUNT`: number of records in the group
    pub fn count() -> Self {
        Reducer::new("COUNT", Vec::new())
    }

    /// `COUNT_DISTINCT`: exact distinct values of a property
    pub fn count_distinct(name: &str) -> Self {
        Reducer::on_property("COUNT_DISTINCT", name)
    }

    /// `COUNT_DISTINCTISH`: approximate distinct values of a property
    pub fn count_distinctish(name: &str) -> Self {
        Reducer::on_property("COUNT_DISTINCTISH", name)
    }

    /// `SUM`
    pub fn sum(name: &str) -> Self {
        Reducer::on_property("SUM", name)
    }

    /// `MIN`
    pub fn min(name: &str) -> Self {
        Reducer::on_property("MIN", name)
    }

    /// `MAX`
    pub fn max(name: &str) -> Self {
        Reducer::on_property("MAX", name)
    }

    /// `AVG`
    pub fn avg(name: &str) -> Self {
        Reducer::on_property("AVG", name)
    }

    /// `STDDEV`
    pub fn stddev(name: &str) -> Self {
        Reducer::on_property("STDDEV", name)
    }

    /// `TOLIST`: distinct values collected into a list
    pub fn to_list(name: &str) -> Self {
        Reducer::on_property("TOLIST", name)
    }

    /// `QUANTILE`: value at quantile `q` in `[0, 1]`
    pub fn quantile(name: &str, q: f64) -> Self {
        Reducer::new("QUANTILE", vec![Token::Str(property(name)), Token::Double(q)])
    }

    /// `FIRST_VALUE`: first value of a property in the group
    pub fn first_value(name: &str) -> Self {
        Reducer::on_property("FIRST_VALUE", name)
    }

    /// `FIRST_VALUE ... BY`: first value of `name` when ordered by `by`
    pub fn first_value_by(name: &str, by: &str, order: SortOrder) -> Self {
        Reducer::new(
            "FIRST_VALUE",
            vec![
                Token::Str(property(name)),
                Token::from("BY"),
                Token::Str(property(by)),
                Token::from(order.keyword()),
            ],
        )
    }

    /// `RANDOM_SAMPLE`: up to `size` random values
    pub fn random_sample(name: &str, size: u64) -> Self {
        // an out-of-range size keeps its digits and fails validation
        let size = match i64::try_from(size) {
            Ok(size) => Token::Int(size),
            Err(_) => Token::Str(size.to_string()),
        };
        Reducer::new("RANDOM_SAMPLE", vec![Token::Str(property(name)), size])
    }

    /// Builder: name the output column
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Function name
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Raw arguments
    pub fn args(&self) -> &[Token] {
        &self.args
    }

    /// Output alias, if set
    pub fn output_alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.function.is_empty() {
            return Err(Error::invalid("reducer function name must not be empty"));
        }
        if matches!(self.alias.as_deref(), Some("")) {
            return Err(Error::invalid(format!(
                "reducer {} has an empty alias",
                self.function
            )));
        }
        if self.function == "RANDOM_SAMPLE" && self.args.get(1).and_then(Token::as_int).is_none()
        {
            return Err(Error::invalid(
                "RANDOM_SAMPLE needs a sample size within the integer range",
            ));
        }
        if self.function == "QUANTILE" {
            let q = self.args.get(1).and_then(Token::as_double);
            if !q.is_some_and(|q| (0.0..=1.0).contains(&q)) {
                return Err(Error::invalid("QUANTILE needs a quantile within [0, 1]"));
            }
        }
        Ok(())
    }
}

impl Clause for Reducer {
    fn token_count(&self) -> usize {
        3 + self.args.len() + if self.alias.is_some() { 2 } else { 0 }
    }

    fn write_tokens(&self, out: &mut TokenWriter) {
        out.push("REDUCE");
        out.push(self.function.as_str());
        out.push_counted(self.args.iter().cloned());
        if let Some(alias) = &self.alias {
            out.push("AS");
            out.push(alias.as_str());
        }
    }
}
