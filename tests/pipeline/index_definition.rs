//! Index definition compilation through the facade.

use crate::common::words;
use ftkit::*;

#[test]
fn json_index_with_aliases() {
    let definition = IndexBuilder::json()
        .prefix("doc:")
        .field(Field::tag("$.documentType").alias("documentType"))
        .field(Field::numeric("$.score").alias("score").sortable())
        .build()
        .unwrap();

    assert_eq!(definition.structure(), Structure::Json);
    assert_eq!(
        definition.to_string(),
        "ON JSON PREFIX 1 doc: SCHEMA $.documentType AS documentType TAG \
         $.score AS score NUMERIC SORTABLE"
    );
}

#[test]
fn options_follow_canonical_order_not_call_order() {
    let definition = IndexBuilder::hash()
        .skip_initial_scan()
        .stopwords(["a", "the"])
        .no_offsets()
        .temporary(60)
        .language("english")
        .filter("@age > 16")
        .prefixes(["user:", "member:"])
        .field(Field::text("name"))
        .build()
        .unwrap();

    assert_eq!(
        words(definition.tokens()),
        vec![
            "ON", "HASH", "PREFIX", "2", "user:", "member:", "FILTER", "@age > 16", "LANGUAGE",
            "english", "TEMPORARY", "60", "NOOFFSETS", "STOPWORDS", "2", "a", "the",
            "SKIPINITIALSCAN", "SCHEMA", "name", "TEXT",
        ]
    );
}

#[test]
fn filter_expression_is_one_token() {
    let definition = IndexBuilder::hash()
        .filter("@age > 16 && @status == 'active'")
        .field(Field::numeric("age"))
        .build()
        .unwrap();
    assert!(definition
        .tokens()
        .contains(&Token::from("@age > 16 && @status == 'active'")));
}

#[test]
fn no_stopwords_emits_zero_count() {
    let definition = IndexBuilder::hash()
        .no_stopwords()
        .field(Field::text("body"))
        .build()
        .unwrap();
    assert!(definition.to_string().contains("STOPWORDS 0 SCHEMA"));
}

#[test]
fn stopword_conflict_in_either_order() {
    let first = IndexBuilder::hash()
        .stopwords(["a"])
        .no_stopwords()
        .field(Field::text("body"))
        .build();
    let second = IndexBuilder::hash()
        .no_stopwords()
        .stopwords(["a"])
        .field(Field::text("body"))
        .build();
    assert!(matches!(first, Err(Error::ConfigConflict { .. })));
    assert!(matches!(second, Err(Error::ConfigConflict { .. })));
}

#[test]
fn schema_required() {
    assert_eq!(IndexBuilder::hash().prefix("p:").build(), Err(Error::MissingSchema));
}

#[test]
fn field_structure_mismatch() {
    let json = IndexBuilder::json().field(Field::text("title")).build();
    let hash = IndexBuilder::hash().field(Field::text("$.title")).build();
    assert!(matches!(json, Err(Error::InvalidArgument { .. })));
    assert!(matches!(hash, Err(Error::InvalidArgument { .. })));
}

#[test]
fn text_field_modifiers() {
    let definition = IndexBuilder::hash()
        .field(
            Field::text("title")
                .no_stem()
                .weight(2.5)
                .phonetic(Phonetic::English)
                .sortable_unf(),
        )
        .field(Field::tag("tags").separator(';').case_sensitive())
        .build()
        .unwrap();
    assert_eq!(
        definition.to_string(),
        "ON HASH SCHEMA title TEXT NOSTEM WEIGHT 2.5 PHONETIC dm:en SORTABLE UNF \
         tags TAG SEPARATOR ; CASESENSITIVE"
    );
}

#[test]
fn builder_is_reusable() {
    let builder = IndexBuilder::hash().field(Field::geo("location"));
    assert_eq!(builder.build().unwrap(), builder.build().unwrap());
}
