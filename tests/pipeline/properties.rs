//! Generated-input laws for compilation and decoding.

use crate::common::row;
use ftkit::{
    decode_aggregate, AggregationBuilder, Error, Field, IndexBuilder, Phonetic, Reply, Token,
};
use proptest::prelude::*;

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

/// A field descriptor plus the token count worked out by hand from the
/// FT.CREATE field grammar.
#[derive(Debug, Clone)]
struct FieldSpec {
    name: String,
    alias: Option<String>,
    kind: u8,
    no_stem: bool,
    weight: Option<f64>,
    phonetic: Option<Phonetic>,
    separator: Option<char>,
    case_sensitive: bool,
    suffix_trie: bool,
    sortable: u8,
    no_index: bool,
}

impl FieldSpec {
    fn field(&self) -> Field {
        let mut field = match self.kind {
            0 => Field::text(self.name.clone()),
            1 => Field::numeric(self.name.clone()),
            2 => Field::geo(self.name.clone()),
            _ => Field::tag(self.name.clone()),
        };
        if let Some(alias) = &self.alias {
            field = field.alias(alias.clone());
        }
        if self.no_stem {
            field = field.no_stem();
        }
        if let Some(weight) = self.weight {
            field = field.weight(weight);
        }
        if let Some(phonetic) = self.phonetic {
            field = field.phonetic(phonetic);
        }
        if let Some(separator) = self.separator {
            field = field.separator(separator);
        }
        if self.case_sensitive {
            field = field.case_sensitive();
        }
        if self.suffix_trie {
            field = field.with_suffix_trie();
        }
        field = match self.sortable {
            0 => field,
            1 => field.sortable(),
            _ => field.sortable_unf(),
        };
        if self.no_index {
            field = field.no_index();
        }
        field
    }

    fn tokens(&self) -> usize {
        // identifier, type
        let mut n = 2;
        if self.alias.is_some() {
            n += 2; // AS alias
        }
        if self.no_stem {
            n += 1;
        }
        if matches!(self.weight, Some(w) if w != 1.0) {
            n += 2; // WEIGHT w
        }
        if self.phonetic.is_some() {
            n += 2; // PHONETIC dm:xx
        }
        if self.separator.is_some() {
            n += 2; // SEPARATOR c
        }
        if self.case_sensitive {
            n += 1;
        }
        if self.suffix_trie {
            n += 1;
        }
        n += match self.sortable {
            0 => 0,
            1 => 1, // SORTABLE
            _ => 2, // SORTABLE UNF
        };
        if self.no_index {
            n += 1;
        }
        n
    }
}

fn arb_field() -> impl Strategy<Value = FieldSpec> {
    (
        arb_name(),
        proptest::option::of(arb_name()),
        0u8..4,
        any::<(bool, bool, bool, bool)>(),
        proptest::option::of(prop_oneof![Just(1.0), 0.1f64..10.0]),
        proptest::option::of(prop_oneof![
            Just(Phonetic::English),
            Just(Phonetic::French),
            Just(Phonetic::Portuguese),
            Just(Phonetic::Spanish),
        ]),
        proptest::option::of(prop_oneof![Just(','), Just(';'), Just('|')]),
        0u8..3,
    )
        .prop_map(
            |(name, alias, kind, (no_stem, case, trie, no_index), weight, phonetic, sep, sort)| {
                let text = kind == 0;
                let tag = kind == 3;
                FieldSpec {
                    name,
                    alias,
                    kind,
                    no_stem: no_stem && text,
                    weight: weight.filter(|_| text),
                    phonetic: phonetic.filter(|_| text),
                    separator: sep.filter(|_| tag),
                    case_sensitive: case && tag,
                    suffix_trie: trie && (text || tag),
                    // UNF only on TEXT and TAG
                    sortable: if sort == 2 && !(text || tag) { 1 } else { sort },
                    no_index,
                }
            },
        )
}

#[derive(Debug, Clone)]
enum Stop {
    List(Vec<String>),
    Disabled,
}

/// Every FT.CREATE option for a hash index, each set at most once.
#[derive(Debug, Clone)]
enum Opt {
    Prefix(Vec<String>),
    Filter(String),
    Language(String),
    LanguageField(String),
    Score(f64),
    ScoreField(String),
    PayloadField(String),
    MaxTextFields,
    Temporary(u64),
    NoOffsets,
    NoHighlights,
    NoFields,
    NoFrequencies,
    Stopwords(Stop),
    SkipInitialScan,
}

impl Opt {
    fn tokens(&self) -> usize {
        match self {
            Opt::Prefix(prefixes) => 2 + prefixes.len(),
            Opt::Score(score) if *score == 1.0 => 0,
            Opt::Filter(_)
            | Opt::Language(_)
            | Opt::LanguageField(_)
            | Opt::Score(_)
            | Opt::ScoreField(_)
            | Opt::PayloadField(_)
            | Opt::Temporary(_) => 2,
            Opt::Stopwords(Stop::List(words)) => 2 + words.len(),
            Opt::Stopwords(Stop::Disabled) => 2,
            Opt::MaxTextFields
            | Opt::NoOffsets
            | Opt::NoHighlights
            | Opt::NoFields
            | Opt::NoFrequencies
            | Opt::SkipInitialScan => 1,
        }
    }

    fn apply(&self, builder: IndexBuilder) -> IndexBuilder {
        match self {
            Opt::Prefix(prefixes) => builder.prefixes(prefixes.iter().cloned()),
            Opt::Filter(expr) => builder.filter(expr.clone()),
            Opt::Language(lang) => builder.language(lang.clone()),
            Opt::LanguageField(field) => builder.language_field(field.clone()),
            Opt::Score(score) => builder.score(*score),
            Opt::ScoreField(field) => builder.score_field(field.clone()),
            Opt::PayloadField(field) => builder.payload_field(field.clone()),
            Opt::MaxTextFields => builder.max_text_fields(),
            Opt::Temporary(secs) => builder.temporary(*secs),
            Opt::NoOffsets => builder.no_offsets(),
            Opt::NoHighlights => builder.no_highlights(),
            Opt::NoFields => builder.no_fields(),
            Opt::NoFrequencies => builder.no_frequencies(),
            Opt::Stopwords(Stop::List(words)) => builder.stopwords(words.iter().cloned()),
            Opt::Stopwords(Stop::Disabled) => builder.no_stopwords(),
            Opt::SkipInitialScan => builder.skip_initial_scan(),
        }
    }
}

fn arb_opts() -> impl Strategy<Value = Vec<Opt>> {
    (
        (
            proptest::option::of(prop::collection::vec("[a-z]{1,5}:", 1..4)),
            proptest::option::of("@[a-z]{1,5} > [0-9]{1,3}"),
            proptest::option::of(prop_oneof![Just("english"), Just("german")]),
            proptest::option::of(arb_name()),
            proptest::option::of(prop_oneof![Just(1.0), 0.0f64..=1.0]),
        ),
        (
            proptest::option::of(arb_name()),
            proptest::option::of(arb_name()),
            proptest::option::of(1u64..10_000),
            proptest::option::of(prop_oneof![
                prop::collection::vec("[a-z]{1,6}", 0..5).prop_map(Stop::List),
                Just(Stop::Disabled),
            ]),
            any::<[bool; 6]>(),
        ),
    )
        .prop_map(
            |(
                (prefix, filter, language, language_field, score),
                (score_field, payload_field, temporary, stopwords, flags),
            )| {
                let mut opts = Vec::new();
                opts.extend(prefix.map(Opt::Prefix));
                opts.extend(filter.map(Opt::Filter));
                opts.extend(language.map(|l| Opt::Language(l.to_string())));
                opts.extend(language_field.map(Opt::LanguageField));
                opts.extend(score.map(Opt::Score));
                opts.extend(score_field.map(Opt::ScoreField));
                opts.extend(payload_field.map(Opt::PayloadField));
                opts.extend(temporary.map(Opt::Temporary));
                opts.extend(stopwords.map(Opt::Stopwords));
                let toggles = [
                    Opt::MaxTextFields,
                    Opt::NoOffsets,
                    Opt::NoHighlights,
                    Opt::NoFields,
                    Opt::NoFrequencies,
                    Opt::SkipInitialScan,
                ];
                for (on, opt) in flags.into_iter().zip(toggles) {
                    if on {
                        opts.push(opt);
                    }
                }
                opts
            },
        )
}

/// Distinct name/value pairs, once in generation order and once shuffled.
fn arb_pairs_and_permutation(
) -> impl Strategy<Value = (Vec<(String, String)>, Vec<(String, String)>)> {
    prop::collection::btree_map("[a-zA-Z]{1,6}", "-?[0-9]{1,9}", 1..8).prop_flat_map(|pairs| {
        let pairs: Vec<(String, String)> = pairs.into_iter().collect();
        (Just(pairs.clone()), Just(pairs).prop_shuffle())
    })
}

fn record_reply(pairs: &[(String, String)]) -> Reply {
    let pairs: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    Reply::Array(vec![Reply::Integer(1), row(&pairs)])
}

proptest! {
    #[test]
    fn index_length_is_sum_of_clauses(
        opts in arb_opts(),
        fields in prop::collection::vec(arb_field(), 1..6),
    ) {
        let builder = opts.iter().fold(
            IndexBuilder::hash().fields(fields.iter().map(FieldSpec::field)),
            |b, o| o.apply(b),
        );
        let definition = builder.build().unwrap();

        let option_tokens: usize = opts.iter().map(Opt::tokens).sum();
        let field_tokens: usize = fields.iter().map(FieldSpec::tokens).sum();
        // ON HASH, options, SCHEMA, fields
        prop_assert_eq!(definition.len(), 2 + option_tokens + 1 + field_tokens);
    }

    #[test]
    fn index_option_order_is_canonical(
        opts in arb_opts(),
        field in arb_field(),
    ) {
        let forward = opts
            .iter()
            .fold(IndexBuilder::hash().field(field.field()), |b, o| o.apply(b));
        let backward = opts
            .iter()
            .rev()
            .fold(IndexBuilder::hash().field(field.field()), |b, o| o.apply(b));
        prop_assert_eq!(forward.build().unwrap(), backward.build().unwrap());
    }

    #[test]
    fn stopword_conflict_regardless_of_order(
        words in prop::collection::vec("[a-z]{1,6}", 1..5),
        stopwords_first in any::<bool>(),
    ) {
        let builder = IndexBuilder::hash().field(Field::text("body"));
        let builder = if stopwords_first {
            builder.stopwords(words).no_stopwords()
        } else {
            builder.no_stopwords().stopwords(words)
        };
        let is_conflict = matches!(builder.build(), Err(Error::ConfigConflict { .. }));
        prop_assert!(is_conflict);
    }

    #[test]
    fn missing_schema_whatever_the_options(opts in arb_opts()) {
        let builder = opts.iter().fold(IndexBuilder::hash(), |b, o| o.apply(b));
        prop_assert_eq!(builder.build(), Err(Error::MissingSchema));
    }

    #[test]
    fn stage_tokens_follow_call_order(ops in prop::collection::vec(0u8..3, 1..8)) {
        let mut builder = AggregationBuilder::new("idx");
        let mut expected = Vec::new();
        for (i, op) in ops.iter().enumerate() {
            builder = match op {
                0 => {
                    expected.push("FILTER");
                    builder.filter(format!("@n > {}", i))
                }
                1 => {
                    expected.push("APPLY");
                    builder.apply("@n + 1", format!("v{}", i))
                }
                _ => {
                    expected.push("LIMIT");
                    builder.limit(i as u64, 10)
                }
            };
        }
        let command = builder.build().unwrap();
        let keywords: Vec<&str> = command
            .tokens()
            .iter()
            .filter_map(Token::as_str)
            .filter(|t| matches!(*t, "FILTER" | "APPLY" | "LIMIT"))
            .collect();
        prop_assert_eq!(keywords, expected);
    }

    #[test]
    fn decodes_exactly_n_records(
        rows in prop::collection::vec(
            prop::collection::vec(("[a-z]{1,6}", "[0-9]{1,6}"), 0..5),
            0..10,
        ),
    ) {
        let mut items = vec![Reply::Integer(rows.len() as i64)];
        for pairs in &rows {
            let pairs: Vec<(&str, &str)> =
                pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            items.push(row(&pairs));
        }
        let result = decode_aggregate(Reply::Array(items)).unwrap();

        prop_assert_eq!(result.len(), rows.len());
        for (record, pairs) in result.iter().zip(&rows) {
            prop_assert_eq!(record.len(), pairs.len());
            let (name, value) = match pairs.first() {
                Some(first) => first,
                None => continue,
            };
            let parsed: i64 = value.parse().unwrap();
            prop_assert_eq!(record.get_i64(name).unwrap(), parsed);
        }
    }

    #[test]
    fn lookup_ignores_field_order((pairs, shuffled) in arb_pairs_and_permutation()) {
        let original = decode_aggregate(record_reply(&pairs)).unwrap();
        let permuted = decode_aggregate(record_reply(&shuffled)).unwrap();
        let (original, permuted) = (&original.records()[0], &permuted.records()[0]);

        for (name, value) in &pairs {
            prop_assert_eq!(original.get_str(name).unwrap(), value.as_str());
            prop_assert_eq!(permuted.get_str(name).unwrap(), value.as_str());
            prop_assert_eq!(original.get_i64(name).unwrap(), permuted.get_i64(name).unwrap());
            prop_assert_eq!(original.get_f64(name).unwrap(), permuted.get_f64(name).unwrap());
        }
    }
}
