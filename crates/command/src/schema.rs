//! Schema field descriptors
//!
//! A [`Field`] describes one indexed attribute and knows how it serializes
//! inside the `SCHEMA` section:
//!
//! ```text
//! <identifier> [AS <alias>] <TYPE> [type options] [SORTABLE [UNF]] [NOINDEX]
//! ```
//!
//! | Type | Options |
//! |------|---------|
//! | TEXT | `NOSTEM`, `WEIGHT <w>`, `PHONETIC <matcher>`, `WITHSUFFIXTRIE` |
//! | TAG | `SEPARATOR <c>`, `CASESENSITIVE`, `WITHSUFFIXTRIE` |
//! | NUMERIC | none |
//! | GEO | none |
//!
//! Modifiers are recorded as given and checked by [`Field::validate`] when
//! the index is compiled, so a TEXT-only modifier on a NUMERIC field is
//! reported instead of silently dropped.

use ftkit_core::{Error, Result, Structure};
use serde::{Deserialize, Serialize};

use crate::assembler::{Clause, TokenWriter};

/// Declared type of an indexed field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Full-text field
    Text,
    /// Numeric range field
    Numeric,
    /// Longitude/latitude field
    Geo,
    /// Exact-match tag field
    Tag,
}

impl FieldType {
    /// Keyword emitted in the schema section
    pub fn keyword(&self) -> &'static str {
        match self {
            FieldType::Text => "TEXT",
            FieldType::Numeric => "NUMERIC",
            FieldType::Geo => "GEO",
            FieldType::Tag => "TAG",
        }
    }
}

/// Phonetic matcher for TEXT fields (double metaphone per language)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phonetic {
    /// `dm:en`
    English,
    /// `dm:fr`
    French,
    /// `dm:pt`
    Portuguese,
    /// `dm:es`
    Spanish,
}

impl Phonetic {
    /// Matcher name as the engine expects it
    pub fn matcher(&self) -> &'static str {
        match self {
            Phonetic::English => "dm:en",
            Phonetic::French => "dm:fr",
            Phonetic::Portuguese => "dm:pt",
            Phonetic::Spanish => "dm:es",
        }
    }
}

/// Sortability of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sortable {
    /// Not sortable
    #[default]
    No,
    /// `SORTABLE`
    Yes,
    /// `SORTABLE UNF`: sortable, value kept unnormalized
    Unnormalized,
}

/// One schema field descriptor.
///
/// Built with [`Field::text`], [`Field::numeric`], [`Field::geo`] or
/// [`Field::tag`] and refined with chained modifiers. Never mutated once
/// handed to an index builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Hash field name or JSONPath expression
    pub name: String,
    /// Attribute name used in queries (`AS <alias>`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Declared type
    pub field_type: FieldType,
    /// `NOSTEM` (TEXT)
    #[serde(default)]
    pub no_stem: bool,
    /// `WEIGHT <w>` (TEXT), omitted when 1.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// `PHONETIC <matcher>` (TEXT)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<Phonetic>,
    /// `SEPARATOR <c>` (TAG)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<char>,
    /// `CASESENSITIVE` (TAG)
    #[serde(default)]
    pub case_sensitive: bool,
    /// `WITHSUFFIXTRIE` (TEXT, TAG)
    #[serde(default)]
    pub with_suffix_trie: bool,
    /// `SORTABLE [UNF]`
    #[serde(default)]
    pub sortable: Sortable,
    /// `NOINDEX`
    #[serde(default)]
    pub no_index: bool,
}

impl Field {
    fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Field {
            name: name.into(),
            alias: None,
            field_type,
            no_stem: false,
            weight: None,
            phonetic: None,
            separator: None,
            case_sensitive: false,
            with_suffix_trie: false,
            sortable: Sortable::No,
            no_index: false,
        }
    }

    /// TEXT field
    pub fn text(name: impl Into<String>) -> Self {
        Field::new(name, FieldType::Text)
    }

    /// NUMERIC field
    pub fn numeric(name: impl Into<String>) -> Self {
        Field::new(name, FieldType::Numeric)
    }

    /// GEO field
    pub fn geo(name: impl Into<String>) -> Self {
        Field::new(name, FieldType::Geo)
    }

    /// TAG field
    pub fn tag(name: impl Into<String>) -> Self {
        Field::new(name, FieldType::Tag)
    }

    /// Builder: expose the field under another attribute name
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Builder: disable stemming
    pub fn no_stem(mut self) -> Self {
        self.no_stem = true;
        self
    }

    /// Builder: ranking weight
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Builder: phonetic matcher
    pub fn phonetic(mut self, matcher: Phonetic) -> Self {
        self.phonetic = Some(matcher);
        self
    }

    /// Builder: tag separator, one ASCII punctuation character
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = Some(separator);
        self
    }

    /// Builder: case-sensitive tag matching
    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    /// Builder: keep a suffix trie for contains/suffix queries
    pub fn with_suffix_trie(mut self) -> Self {
        self.with_suffix_trie = true;
        self
    }

    /// Builder: sortable
    pub fn sortable(mut self) -> Self {
        self.sortable = Sortable::Yes;
        self
    }

    /// Builder: sortable without normalization
    pub fn sortable_unf(mut self) -> Self {
        self.sortable = Sortable::Unnormalized;
        self
    }

    /// Builder: store for sorting only, do not index
    pub fn no_index(mut self) -> Self {
        self.no_index = true;
        self
    }

    /// Name queries and replies use for this field
    pub fn attribute(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    fn effective_weight(&self) -> Option<f64> {
        self.weight.filter(|w| *w != 1.0)
    }

    /// Check the descriptor against the grammar and the structure it will be
    /// declared on.
    pub fn validate(&self, structure: Structure) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::invalid("field name must not be empty"));
        }
        if matches!(self.alias.as_deref(), Some("")) {
            return Err(Error::invalid(format!(
                "field '{}' has an empty alias",
                self.name
            )));
        }

        match structure {
            Structure::Json if !self.name.starts_with('$') => {
                return Err(Error::invalid(format!(
                    "JSON field '{}' must be a JSONPath starting with '$'",
                    self.name
                )));
            }
            Structure::Hash if self.name.starts_with('$') => {
                return Err(Error::invalid(format!(
                    "hash field '{}' looks like a JSONPath",
                    self.name
                )));
            }
            _ => {}
        }

        let is_text = self.field_type == FieldType::Text;
        let is_tag = self.field_type == FieldType::Tag;
        let misplaced = [
            (self.no_stem && !is_text, "NOSTEM"),
            (self.weight.is_some() && !is_text, "WEIGHT"),
            (self.phonetic.is_some() && !is_text, "PHONETIC"),
            (self.separator.is_some() && !is_tag, "SEPARATOR"),
            (self.case_sensitive && !is_tag, "CASESENSITIVE"),
            (self.with_suffix_trie && !(is_text || is_tag), "WITHSUFFIXTRIE"),
            (
                self.sortable == Sortable::Unnormalized && !(is_text || is_tag),
                "UNF",
            ),
        ];
        if let Some((_, option)) = misplaced.iter().find(|(bad, _)| *bad) {
            return Err(Error::invalid(format!(
                "{} is not valid on {} field '{}'",
                option,
                self.field_type.keyword(),
                self.name
            )));
        }

        if let Some(separator) = self.separator {
            if !separator.is_ascii_punctuation() {
                return Err(Error::invalid(format!(
                    "tag field '{}' separator must be one ASCII punctuation character, got {:?}",
                    self.name, separator
                )));
            }
        }

        if let Some(weight) = self.weight {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(Error::invalid(format!(
                    "field '{}' weight must be positive, got {}",
                    self.name, weight
                )));
            }
        }

        Ok(())
    }
}

impl Clause for Field {
    fn token_count(&self) -> usize {
        let mut count = 2; // identifier, type
        if self.alias.is_some() {
            count += 2;
        }
        count += usize::from(self.no_stem);
        if self.effective_weight().is_some() {
            count += 2;
        }
        if self.phonetic.is_some() {
            count += 2;
        }
        if self.separator.is_some() {
            count += 2;
        }
        count += usize::from(self.case_sensitive);
        count += usize::from(self.with_suffix_trie);
        count += match self.sortable {
            Sortable::No => 0,
            Sortable::Yes => 1,
            Sortable::Unnormalized => 2,
        };
        count += usize::from(self.no_index);
        count
    }

    fn write_tokens(&self, out: &mut TokenWriter) {
        out.push(self.name.as_str());
        if let Some(alias) = &self.alias {
            out.push("AS");
            out.push(alias.as_str());
        }
        out.push(self.field_type.keyword());
        if self.no_stem {
            out.push("NOSTEM");
        }
        if let Some(weight) = self.effective_weight() {
            out.push("WEIGHT");
            out.push(weight);
        }
        if let Some(phonetic) = self.phonetic {
            out.push("PHONETIC");
            out.push(phonetic.matcher());
        }
        if let Some(separator) = self.separator {
            out.push("SEPARATOR");
            out.push(separator.to_string());
        }
        if self.case_sensitive {
            out.push("CASESENSITIVE");
        }
        if self.with_suffix_trie {
            out.push("WITHSUFFIXTRIE");
        }
        match self.sortable {
            Sortable::No => {}
            Sortable::Yes => out.push("SORTABLE"),
            Sortable::Unnormalized => {
                out.push("SORTABLE");
                out.push("UNF");
            }
        }
        if self.no_index {
            out.push("NOINDEX");
        }
    }
}
