//! Index definition builder
//!
//! [`IndexBuilder`] is a plain configuration value: options accumulate
//! through chained calls and nothing is checked until [`IndexBuilder::build`],
//! which validates the whole configuration and compiles it into an
//! [`IndexDefinition`].
//!
//! ## Canonical Clause Order
//!
//! Clauses are always emitted in this order, whatever order the options
//! were set in:
//!
//! ```text
//! ON <structure> [PREFIX n p..] [FILTER f] [LANGUAGE l] [LANGUAGE_FIELD f]
//! [SCORE n] [SCORE_FIELD f] [PAYLOAD_FIELD f] [MAXTEXTFIELDS] [TEMPORARY n]
//! [NOOFFSETS] [NOHL] [NOFIELDS] [NOFREQS] [STOPWORDS n w..]
//! [SKIPINITIALSCAN] SCHEMA <field>...
//! ```

use ftkit_core::{Error, Result, Structure, Token};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::assembler::{assemble, check_int, Clause, Part, TokenWriter};
use crate::schema::Field;

/// Engine default for `SCORE`; the clause is left out when it matches.
pub const DEFAULT_SCORE: f64 = 1.0;

/// Index-level options. Every option is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexOptions {
    /// Only index keys starting with one of these prefixes
    pub prefixes: Vec<String>,
    /// Only index keys matching this expression
    pub filter: Option<String>,
    /// Default stemming language
    pub language: Option<String>,
    /// Document field holding the stemming language
    pub language_field: Option<String>,
    /// Default document score, `[0, 1]`
    pub score: Option<f64>,
    /// Document field holding the score
    pub score_field: Option<String>,
    /// Document field holding the binary payload
    pub payload_field: Option<String>,
    /// Force wide text-field encoding
    pub max_text_fields: bool,
    /// Drop the index after this many seconds of inactivity
    pub temporary: Option<u64>,
    /// `NOOFFSETS`
    pub no_offsets: bool,
    /// `NOHL`
    pub no_highlights: bool,
    /// `NOFIELDS`
    pub no_fields: bool,
    /// `NOFREQS`
    pub no_frequencies: bool,
    /// Custom stopword list; `Some(vec![])` disables stopwords
    pub stopwords: Option<Vec<String>>,
    /// Disable stopwords entirely (`STOPWORDS 0`)
    pub no_stopwords: bool,
    /// Do not scan existing keys at creation
    pub skip_initial_scan: bool,
}

/// Accumulates index configuration and a schema.
///
/// # Example
///
/// ```
/// use ftkit_command::{Field, IndexBuilder};
///
/// let definition = IndexBuilder::hash()
///     .prefix("doc:")
///     .field(Field::text("title").weight(2.0))
///     .field(Field::numeric("score").sortable())
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     definition.to_string(),
///     "ON HASH PREFIX 1 doc: SCHEMA title TEXT WEIGHT 2 score NUMERIC SORTABLE"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexBuilder {
    /// Structure the index is declared on
    pub structure: Structure,
    /// Index-level options
    #[serde(default)]
    pub options: IndexOptions,
    /// Schema fields, in declaration order
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl IndexBuilder {
    /// Builder for an index over the given structure
    pub fn new(structure: Structure) -> Self {
        IndexBuilder {
            structure,
            options: IndexOptions::default(),
            fields: Vec::new(),
        }
    }

    /// Builder for an index over hashes
    pub fn hash() -> Self {
        IndexBuilder::new(Structure::Hash)
    }

    /// Builder for an index over JSON documents
    pub fn json() -> Self {
        IndexBuilder::new(Structure::Json)
    }

    /// Builder: add a key prefix
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.prefixes.push(prefix.into());
        self
    }

    /// Builder: add several key prefixes
    pub fn prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options
            .prefixes
            .extend(prefixes.into_iter().map(Into::into));
        self
    }

    /// Builder: key filter expression
    pub fn filter(mut self, expression: impl Into<String>) -> Self {
        self.options.filter = Some(expression.into());
        self
    }

    /// Builder: default language
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.options.language = Some(language.into());
        self
    }

    /// Builder: language field
    pub fn language_field(mut self, field: impl Into<String>) -> Self {
        self.options.language_field = Some(field.into());
        self
    }

    /// Builder: default score
    pub fn score(mut self, score: f64) -> Self {
        self.options.score = Some(score);
        self
    }

    /// Builder: score field
    pub fn score_field(mut self, field: impl Into<String>) -> Self {
        self.options.score_field = Some(field.into());
        self
    }

    /// Builder: payload field
    pub fn payload_field(mut self, field: impl Into<String>) -> Self {
        self.options.payload_field = Some(field.into());
        self
    }

    /// Builder: `MAXTEXTFIELDS`
    pub fn max_text_fields(mut self) -> Self {
        self.options.max_text_fields = true;
        self
    }

    /// Builder: temporary index expiring after `seconds` of inactivity
    pub fn temporary(mut self, seconds: u64) -> Self {
        self.options.temporary = Some(seconds);
        self
    }

    /// Builder: `NOOFFSETS`
    pub fn no_offsets(mut self) -> Self {
        self.options.no_offsets = true;
        self
    }

    /// Builder: `NOHL`
    pub fn no_highlights(mut self) -> Self {
        self.options.no_highlights = true;
        self
    }

    /// Builder: `NOFIELDS`
    pub fn no_fields(mut self) -> Self {
        self.options.no_fields = true;
        self
    }

    /// Builder: `NOFREQS`
    pub fn no_frequencies(mut self) -> Self {
        self.options.no_frequencies = true;
        self
    }

    /// Builder: custom stopword list (may be empty)
    pub fn stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.stopwords = Some(words.into_iter().map(Into::into).collect());
        self
    }

    /// Builder: disable stopwords
    pub fn no_stopwords(mut self) -> Self {
        self.options.no_stopwords = true;
        self
    }

    /// Builder: `SKIPINITIALSCAN`
    pub fn skip_initial_scan(mut self) -> Self {
        self.options.skip_initial_scan = true;
        self
    }

    /// Builder: append a schema field
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Builder: append several schema fields
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Validate the configuration and compile it.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingSchema`] when no field was added
    /// - [`Error::ConfigConflict`] for a non-empty stopword list combined
    ///   with the no-stopwords flag, or a payload field on a JSON index
    /// - [`Error::InvalidArgument`] for out-of-range values and invalid
    ///   field descriptors
    pub fn build(&self) -> Result<IndexDefinition> {
        self.validate()?;

        let clauses = self.option_parts();
        let schema = SchemaSection(&self.fields);

        let mut refs: Vec<&dyn Clause> = Vec::with_capacity(clauses.len() + 1);
        refs.extend(clauses.iter().map(|c| c as &dyn Clause));
        refs.push(&schema);

        let tokens = assemble(&refs);
        debug!(
            structure = %self.structure,
            fields = self.fields.len(),
            tokens = tokens.len(),
            "compiled index definition"
        );

        Ok(IndexDefinition {
            structure: self.structure,
            tokens,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(Error::MissingSchema);
        }

        let opts = &self.options;
        if opts.no_stopwords && opts.stopwords.as_ref().is_some_and(|w| !w.is_empty()) {
            return Err(Error::conflict(
                "a stopword list and the no-stopwords flag cannot both be set",
            ));
        }
        if opts.payload_field.is_some() && self.structure == Structure::Json {
            return Err(Error::conflict("PAYLOAD_FIELD is not supported on JSON indexes"));
        }
        match opts.temporary {
            Some(0) => {
                return Err(Error::invalid("TEMPORARY lifespan must be greater than zero"));
            }
            Some(seconds) => check_int("TEMPORARY", seconds)?,
            None => {}
        }
        if let Some(score) = opts.score {
            if !(0.0..=1.0).contains(&score) {
                return Err(Error::invalid(format!(
                    "SCORE must be within [0, 1], got {}",
                    score
                )));
            }
        }
        if opts.prefixes.iter().any(String::is_empty) {
            return Err(Error::invalid("key prefixes must not be empty"));
        }

        for field in &self.fields {
            field.validate(self.structure)?;
        }
        Ok(())
    }

    /// Every present option clause, in canonical order.
    fn option_parts(&self) -> Vec<Part> {
        let opts = &self.options;
        let mut parts = vec![Part::Keyed("ON", self.structure.keyword().into())];

        if !opts.prefixes.is_empty() {
            parts.push(Part::Counted(
                "PREFIX",
                opts.prefixes.iter().map(Token::from).collect(),
            ));
        }
        if let Some(filter) = &opts.filter {
            parts.push(Part::Keyed("FILTER", filter.into()));
        }
        if let Some(language) = &opts.language {
            parts.push(Part::Keyed("LANGUAGE", language.into()));
        }
        if let Some(field) = &opts.language_field {
            parts.push(Part::Keyed("LANGUAGE_FIELD", field.into()));
        }
        if let Some(score) = opts.score.filter(|s| *s != DEFAULT_SCORE) {
            parts.push(Part::Keyed("SCORE", score.into()));
        }
        if let Some(field) = &opts.score_field {
            parts.push(Part::Keyed("SCORE_FIELD", field.into()));
        }
        if let Some(field) = &opts.payload_field {
            parts.push(Part::Keyed("PAYLOAD_FIELD", field.into()));
        }
        if opts.max_text_fields {
            parts.push(Part::Flag("MAXTEXTFIELDS"));
        }
        if let Some(seconds) = opts.temporary {
            parts.push(Part::Keyed("TEMPORARY", seconds.into()));
        }
        if opts.no_offsets {
            parts.push(Part::Flag("NOOFFSETS"));
        }
        if opts.no_highlights {
            parts.push(Part::Flag("NOHL"));
        }
        if opts.no_fields {
            parts.push(Part::Flag("NOFIELDS"));
        }
        if opts.no_frequencies {
            parts.push(Part::Flag("NOFREQS"));
        }
        if opts.no_stopwords {
            parts.push(Part::Counted("STOPWORDS", Vec::new()));
        } else if let Some(words) = &opts.stopwords {
            parts.push(Part::Counted(
                "STOPWORDS",
                words.iter().map(Token::from).collect(),
            ));
        }
        if opts.skip_initial_scan {
            parts.push(Part::Flag("SKIPINITIALSCAN"));
        }
        parts
    }
}

/// `SCHEMA` literal followed by every field clause.
struct SchemaSection<'a>(&'a [Field]);

impl Clause for SchemaSection<'_> {
    fn token_count(&self) -> usize {
        1 + self.0.iter().map(Clause::token_count).sum::<usize>()
    }

    fn write_tokens(&self, out: &mut TokenWriter) {
        out.push("SCHEMA");
        for field in self.0 {
            field.write_tokens(out);
        }
    }
}

/// Compiled `FT.CREATE` body: everything after the command and index name.
///
/// Immutable once built; safe to share across threads and resend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDefinition {
    structure: Structure,
    tokens: Box<[Token]>,
}

impl IndexDefinition {
    /// Structure the index is declared on
    pub fn structure(&self) -> Structure {
        self.structure
    }

    /// Compiled tokens
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false for a successfully built definition
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for IndexDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.tokens)
    }
}

pub(crate) fn write_joined(f: &mut fmt::Formatter<'_>, tokens: &[Token]) -> fmt::Result {
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", token)?;
    }
    Ok(())
}
