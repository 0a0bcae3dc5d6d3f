//! Aggregation pipeline builder
//!
//! An aggregation is a base query followed by an ordered pipeline. The
//! engine runs stages in exactly the order they appear on the wire, so
//! [`AggregationBuilder`] keeps every stage in call order: no reordering,
//! no merging of repeated stages.
//!
//! ## Emitted Layout
//!
//! ```text
//! <query> [VERBATIM] [LOAD n f..|LOAD *] [TIMEOUT ms]
//! <stage>...                                  (call order)
//! [WITHCURSOR [COUNT n] [MAXIDLE ms]] [PARAMS 2n k v..] [DIALECT d]
//! ```
//!
//! | Stage | Tokens |
//! |-------|--------|
//! | GroupBy | `GROUPBY n @f.. (REDUCE fn argc args.. [AS alias])..` |
//! | SortBy | `SORTBY 2k (@f ASC|DESC).. [MAX m]` |
//! | Apply | `APPLY <expr> AS <alias>` |
//! | Filter | `FILTER <expr>` |
//! | Limit | `LIMIT <offset> <count>` |

use ftkit_core::{Error, Result, Token};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::assembler::{assemble, check_int, Clause, Part, TokenWriter};
use crate::index::write_joined;
use crate::property::property;
use crate::reducer::{Reducer, SortOrder};

/// Query used when none is given: match every document.
pub const MATCH_ALL: &str = "*";

/// GROUPBY stage: grouping properties plus reducers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBy {
    properties: Vec<String>,
    reducers: Vec<Reducer>,
}

impl GroupBy {
    /// Group on the given properties (`@` is added when missing)
    pub fn new<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        GroupBy {
            properties: properties
                .into_iter()
                .map(|p| property(p.as_ref()))
                .collect(),
            reducers: Vec::new(),
        }
    }

    /// Builder: append a reducer
    pub fn reduce(mut self, reducer: Reducer) -> Self {
        self.reducers.push(reducer);
        self
    }

    /// Grouping properties, `@`-prefixed
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    /// Reducers in declaration order
    pub fn reducers(&self) -> &[Reducer] {
        &self.reducers
    }
}

/// SORTBY stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortBy {
    keys: Vec<(String, SortOrder)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<u64>,
}

impl SortBy {
    /// Empty sort; add keys with [`SortBy::asc`] / [`SortBy::desc`]
    pub fn new() -> Self {
        SortBy::default()
    }

    /// Builder: ascending key
    pub fn asc(self, name: &str) -> Self {
        self.key(name, SortOrder::Asc)
    }

    /// Builder: descending key
    pub fn desc(self, name: &str) -> Self {
        self.key(name, SortOrder::Desc)
    }

    /// Builder: key with explicit order
    pub fn key(mut self, name: &str, order: SortOrder) -> Self {
        self.keys.push((property(name), order));
        self
    }

    /// Builder: keep only the top `max` records
    pub fn max(mut self, max: u64) -> Self {
        self.max = Some(max);
        self
    }

    /// Sort keys, `@`-prefixed
    pub fn keys(&self) -> &[(String, SortOrder)] {
        &self.keys
    }
}

/// One pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stage {
    /// `GROUPBY`
    GroupBy(GroupBy),
    /// `SORTBY`
    SortBy(SortBy),
    /// `APPLY <expr> AS <alias>`
    Apply {
        /// Expression evaluated per record
        expression: String,
        /// Name of the computed property
        alias: String,
    },
    /// `FILTER <expr>`
    Filter(String),
    /// `LIMIT <offset> <count>`
    Limit {
        /// Records skipped
        offset: u64,
        /// Records returned
        count: u64,
    },
}

impl Stage {
    fn validate(&self) -> Result<()> {
        match self {
            Stage::GroupBy(group) => {
                for reducer in &group.reducers {
                    reducer.validate()?;
                }
                Ok(())
            }
            Stage::SortBy(sort) if sort.keys.is_empty() => {
                Err(Error::invalid("SORTBY needs at least one key"))
            }
            Stage::SortBy(sort) => match sort.max {
                Some(max) => check_int("MAX", max),
                None => Ok(()),
            },
            Stage::Apply { expression, alias } if expression.is_empty() || alias.is_empty() => {
                Err(Error::invalid("APPLY needs both an expression and an alias"))
            }
            Stage::Filter(expression) if expression.is_empty() => {
                Err(Error::invalid("FILTER expression must not be empty"))
            }
            Stage::Limit { offset, count } => {
                check_int("LIMIT offset", *offset)?;
                check_int("LIMIT count", *count)
            }
            _ => Ok(()),
        }
    }
}

impl Clause for Stage {
    fn token_count(&self) -> usize {
        match self {
            Stage::GroupBy(group) => {
                2 + group.properties.len() + group.reducers.token_count()
            }
            Stage::SortBy(sort) => {
                2 + 2 * sort.keys.len() + if sort.max.is_some() { 2 } else { 0 }
            }
            Stage::Apply { .. } => 4,
            Stage::Filter(_) => 2,
            Stage::Limit { .. } => 3,
        }
    }

    fn write_tokens(&self, out: &mut TokenWriter) {
        match self {
            Stage::GroupBy(group) => {
                out.push("GROUPBY");
                out.push_counted(group.properties.iter());
                group.reducers.write_tokens(out);
            }
            Stage::SortBy(sort) => {
                out.push("SORTBY");
                out.push(2 * sort.keys.len());
                for (name, order) in &sort.keys {
                    out.push(name.as_str());
                    out.push(order.keyword());
                }
                if let Some(max) = sort.max {
                    out.push("MAX");
                    out.push(max);
                }
            }
            Stage::Apply { expression, alias } => {
                out.push("APPLY");
                out.push(expression.as_str());
                out.push("AS");
                out.push(alias.as_str());
            }
            Stage::Filter(expression) => {
                out.push("FILTER");
                out.push(expression.as_str());
            }
            Stage::Limit { offset, count } => {
                out.push("LIMIT");
                out.push(*offset);
                out.push(*count);
            }
        }
    }
}

/// Fields projected before the pipeline runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Load {
    /// `LOAD *`
    All,
    /// `LOAD n @f..`
    Fields(Vec<String>),
}

/// Cursor-based reading of large results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorOptions {
    /// Records per cursor read
    pub count: Option<u64>,
    /// Idle time before the engine discards the cursor
    pub max_idle_ms: Option<u64>,
}

/// Accumulates the aggregation query, options and pipeline stages.
///
/// # Example
///
/// ```
/// use ftkit_command::{AggregationBuilder, GroupBy, Reducer};
///
/// let command = AggregationBuilder::new("idx:docs")
///     .group_by(GroupBy::new(["documentType"]).reduce(Reducer::sum("score").alias("total")))
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     command.to_string(),
///     "* GROUPBY 1 @documentType REDUCE SUM 1 @score AS total"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationBuilder {
    index: String,
    query: String,
    #[serde(default)]
    verbatim: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    load: Option<Load>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_ms: Option<u64>,
    #[serde(default)]
    stages: Vec<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cursor: Option<CursorOptions>,
    #[serde(default)]
    params: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dialect: Option<u32>,
}

impl AggregationBuilder {
    /// Aggregation over `index`, matching all documents until a query is set
    pub fn new(index: impl Into<String>) -> Self {
        AggregationBuilder {
            index: index.into(),
            query: MATCH_ALL.to_string(),
            verbatim: false,
            load: None,
            timeout_ms: None,
            stages: Vec::new(),
            cursor: None,
            params: Vec::new(),
            dialect: None,
        }
    }

    /// Builder: base query
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Builder: disable stemming for the query
    pub fn verbatim(mut self) -> Self {
        self.verbatim = true;
        self
    }

    /// Builder: load these fields before the pipeline
    pub fn load<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.load = Some(Load::Fields(
            fields.into_iter().map(|f| property(f.as_ref())).collect(),
        ));
        self
    }

    /// Builder: load every document field
    pub fn load_all(mut self) -> Self {
        self.load = Some(Load::All);
        self
    }

    /// Builder: query timeout
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    /// Builder: append a GROUPBY stage
    pub fn group_by(self, group: GroupBy) -> Self {
        self.stage(Stage::GroupBy(group))
    }

    /// Builder: append a SORTBY stage
    pub fn sort_by(self, sort: SortBy) -> Self {
        self.stage(Stage::SortBy(sort))
    }

    /// Builder: append an APPLY stage
    pub fn apply(self, expression: impl Into<String>, alias: impl Into<String>) -> Self {
        self.stage(Stage::Apply {
            expression: expression.into(),
            alias: alias.into(),
        })
    }

    /// Builder: append a FILTER stage
    pub fn filter(self, expression: impl Into<String>) -> Self {
        self.stage(Stage::Filter(expression.into()))
    }

    /// Builder: append a LIMIT stage
    pub fn limit(self, offset: u64, count: u64) -> Self {
        self.stage(Stage::Limit { offset, count })
    }

    /// Builder: append any stage
    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Builder: read results through a cursor
    pub fn with_cursor(mut self, options: CursorOptions) -> Self {
        self.cursor = Some(options);
        self
    }

    /// Builder: query parameter referenced as `$name`
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Builder: query dialect
    pub fn dialect(mut self, dialect: u32) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Index the aggregation runs against
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Declared stages
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Validate and compile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an empty index name or query,
    /// an empty LOAD list or parameter name, a zero dialect, or an
    /// ill-formed stage.
    pub fn build(&self) -> Result<AggregationCommand> {
        self.validate()?;

        let head = self.head_parts();
        let tail = self.tail_parts();

        let mut refs: Vec<&dyn Clause> =
            Vec::with_capacity(head.len() + self.stages.len() + tail.len());
        refs.extend(head.iter().map(|c| c as &dyn Clause));
        refs.extend(self.stages.iter().map(|c| c as &dyn Clause));
        refs.extend(tail.iter().map(|c| c as &dyn Clause));

        let tokens = assemble(&refs);
        debug!(
            index = %self.index,
            stages = self.stages.len(),
            tokens = tokens.len(),
            "compiled aggregation"
        );

        Ok(AggregationCommand {
            index: self.index.clone(),
            tokens,
            dialect: self.dialect,
            cursor: self.cursor.is_some(),
        })
    }

    fn validate(&self) -> Result<()> {
        if self.index.is_empty() {
            return Err(Error::invalid("index name must not be empty"));
        }
        if self.query.is_empty() {
            return Err(Error::invalid("query must not be empty; use \"*\" to match all"));
        }
        if matches!(&self.load, Some(Load::Fields(fields)) if fields.is_empty()) {
            return Err(Error::invalid("LOAD needs at least one field"));
        }
        if self.params.iter().any(|(name, _)| name.is_empty()) {
            return Err(Error::invalid("parameter names must not be empty"));
        }
        if self.dialect == Some(0) {
            return Err(Error::invalid("DIALECT starts at 1"));
        }
        if let Some(ms) = self.timeout_ms {
            check_int("TIMEOUT", ms)?;
        }
        if let Some(cursor) = self.cursor {
            if let Some(count) = cursor.count {
                check_int("COUNT", count)?;
            }
            if let Some(ms) = cursor.max_idle_ms {
                check_int("MAXIDLE", ms)?;
            }
        }
        for stage in &self.stages {
            stage.validate()?;
        }
        Ok(())
    }

    fn head_parts(&self) -> Vec<Part> {
        let mut parts = vec![Part::Bare(self.query.as_str().into())];
        if self.verbatim {
            parts.push(Part::Flag("VERBATIM"));
        }
        match &self.load {
            Some(Load::All) => parts.push(Part::Keyed("LOAD", "*".into())),
            Some(Load::Fields(fields)) => parts.push(Part::Counted(
                "LOAD",
                fields.iter().map(Token::from).collect(),
            )),
            None => {}
        }
        if let Some(ms) = self.timeout_ms {
            parts.push(Part::Keyed("TIMEOUT", ms.into()));
        }
        parts
    }

    fn tail_parts(&self) -> Vec<Part> {
        let mut parts = Vec::new();
        if let Some(cursor) = self.cursor {
            parts.push(Part::Flag("WITHCURSOR"));
            if let Some(count) = cursor.count {
                parts.push(Part::Keyed("COUNT", count.into()));
            }
            if let Some(ms) = cursor.max_idle_ms {
                parts.push(Part::Keyed("MAXIDLE", ms.into()));
            }
        }
        if !self.params.is_empty() {
            parts.push(Part::Counted(
                "PARAMS",
                self.params
                    .iter()
                    .flat_map(|(name, value)| [Token::from(name), Token::from(value)])
                    .collect(),
            ));
        }
        if let Some(dialect) = self.dialect {
            parts.push(Part::Keyed("DIALECT", dialect.into()));
        }
        parts
    }
}

/// Compiled `FT.AGGREGATE` body: everything after the command and index name.
///
/// Immutable once built; safe to share across threads and resend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationCommand {
    index: String,
    tokens: Box<[Token]>,
    dialect: Option<u32>,
    cursor: bool,
}

impl AggregationCommand {
    /// Index the aggregation runs against
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Compiled tokens
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false: the query token is mandatory
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Dialect set explicitly on the builder
    pub fn dialect(&self) -> Option<u32> {
        self.dialect
    }

    /// True if the reply will be a cursor page
    pub fn uses_cursor(&self) -> bool {
        self.cursor
    }
}

impl fmt::Display for AggregationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.tokens)
    }
}
