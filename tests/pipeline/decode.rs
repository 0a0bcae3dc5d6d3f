//! Reply decoding, standalone and through the executor.

use crate::common::{row, ScriptedTransport};
use ftkit::*;

#[test]
fn grouped_sum_end_to_end() {
    let transport = ScriptedTransport::new(vec![
        Reply::SimpleString("OK".into()),
        Reply::Array(vec![
            Reply::Integer(1),
            row(&[("documentType", "demo"), ("total", "15")]),
        ]),
    ]);
    let executor = Executor::new(&transport);

    let definition = IndexBuilder::json()
        .field(Field::tag("$.documentType").alias("documentType"))
        .field(Field::numeric("$.score").alias("score"))
        .build()
        .unwrap();
    assert_eq!(executor.create_index("idx", &definition).unwrap(), "OK");

    let command = AggregationBuilder::new("idx")
        .group_by(GroupBy::new(["documentType"]).reduce(Reducer::sum("score").alias("total")))
        .build()
        .unwrap();
    let result = executor.aggregate(&command).unwrap();

    assert_eq!(result.len(), 1);
    let record = &result.records()[0];
    assert_eq!(record.get_str("documentType").unwrap(), "demo");
    assert_eq!(record.get_i64("total").unwrap(), 15);

    let frames = transport.frames();
    assert_eq!(frames[0].name, "FT.CREATE");
    assert_eq!(
        frames[1].to_string(),
        "FT.AGGREGATE idx * GROUPBY 1 @documentType REDUCE SUM 1 @score AS total"
    );
}

#[test]
fn fractional_sum_is_not_truncated() {
    let result = decode_aggregate(Reply::Array(vec![
        Reply::Integer(1),
        row(&[("total", "15.5")]),
    ]))
    .unwrap();
    let record = &result.records()[0];
    assert!(matches!(record.get_i64("total"), Err(Error::Conversion { .. })));
    assert_eq!(record.get_f64("total").unwrap(), 15.5);
}

#[test]
fn sparse_records() {
    let result = decode_aggregate(Reply::Array(vec![
        Reply::Integer(3),
        row(&[("a", "1"), ("b", "2")]),
        row(&[]),
        row(&[("c", "x")]),
    ]))
    .unwrap();
    let sizes: Vec<usize> = result.iter().map(Record::len).collect();
    assert_eq!(sizes, vec![2, 0, 1]);
    assert!(matches!(
        result.records()[1].get_str("a"),
        Err(Error::FieldNotFound { .. })
    ));
}

#[test]
fn flattened_reply_is_malformed() {
    let reply = Reply::Array(vec![
        Reply::Integer(1),
        Reply::bulk("documentType"),
        Reply::bulk("demo"),
    ]);
    assert!(matches!(
        decode_aggregate(reply),
        Err(Error::ReplyFormat { .. })
    ));
}

#[test]
fn cursor_pages_until_exhausted() {
    let transport = ScriptedTransport::new(vec![
        Reply::Array(vec![
            Reply::Array(vec![Reply::Integer(3), row(&[("n", "1")]), row(&[("n", "2")])]),
            Reply::Integer(5),
        ]),
        Reply::Array(vec![
            Reply::Array(vec![Reply::Integer(3), row(&[("n", "3")])]),
            Reply::Integer(0),
        ]),
    ]);
    let executor = Executor::new(&transport);
    let command = AggregationBuilder::new("idx")
        .load(["n"])
        .with_cursor(CursorOptions {
            count: Some(2),
            max_idle_ms: None,
        })
        .build()
        .unwrap();

    let mut seen = Vec::new();
    let mut page = executor.aggregate_cursor(&command).unwrap();
    loop {
        for record in &page.records {
            seen.push(record.get_i64("n").unwrap());
        }
        if page.is_exhausted() {
            break;
        }
        page = executor.cursor_read("idx", page.cursor, Some(2)).unwrap();
    }
    assert_eq!(seen, vec![1, 2, 3]);
    assert_eq!(
        transport.frames()[1].to_string(),
        "FT.CURSOR READ idx 5 COUNT 2"
    );
}

#[test]
fn engine_error_reaches_caller() {
    let transport = ScriptedTransport::new(vec![Reply::Error("idx: no such index".into())]);
    let executor = Executor::new(&transport);
    let command = AggregationBuilder::new("idx").build().unwrap();
    assert_eq!(
        executor.aggregate(&command).unwrap_err(),
        Error::Server {
            message: "idx: no such index".into()
        }
    );
}
