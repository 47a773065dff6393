use chrono::{TimeZone, Utc};
use cloudevent_batch::{
    deserialize_events, events, get_events, is_batch, is_valid_batch, serialize_events,
    validate_batch, validate_item, BatchDeserializeOptions, BatchError, BatchItem,
    BatchSerializeOptions, BatchValidateOptions, FilterOptions, MEDIA_TYPE,
};
use cloudevent_codec::{CodecError, SerializeOptions};
use cloudevent_core::{Attr, CloudEvent, EventOptions, ValidateOptions, ValidationError};
use serde_json::{json, Value};

fn make_options() -> EventOptions {
    EventOptions {
        time: Attr::Value(Utc.with_ymd_and_hms(2020, 6, 1, 12, 30, 0).unwrap()),
        ..EventOptions::default()
    }
}

fn make_test_event(id: &str) -> CloudEvent {
    CloudEvent::new(
        Some(id.into()),
        Some("com.example.test".into()),
        Some("/test".into()),
        Some(json!({"hello": "world"})),
        make_options(),
        None,
    )
    .unwrap()
}

// Valid when lenient, one finding when strict
fn make_text_event(id: &str) -> CloudEvent {
    CloudEvent::new(
        Some(id.into()),
        Some("com.example.test".into()),
        Some("/test".into()),
        Some(json!("Hello World, 2020")),
        make_options(),
        None,
    )
    .unwrap()
}

fn make_mixed_batch() -> Vec<BatchItem> {
    vec![
        BatchItem::Undefined,
        json!(null).into(),
        json!(0).into(),
        json!(2.5).into(),
        json!(-1).into(),
        json!("").into(),
        json!("Hello").into(),
        json!(true).into(),
        json!(false).into(),
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap().into(),
        json!({}).into(),
        json!({"id": "fake", "type": "not.an.event"}).into(),
        make_test_event("first").into(),
        json!([]).into(),
        json!([1, 2, 3]).into(),
        BatchItem::List(vec![make_test_event("nested").into()]),
        Option::<CloudEvent>::None.into(),
        make_test_event("second").into(),
        json!(null).into(),
        json!("{\"id\":\"1\"}").into(),
    ]
}

#[test]
fn test_get_events_from_mixed_batch() {
    let batch = make_mixed_batch();
    assert_eq!(batch.len(), 20);

    let found = get_events(&batch, FilterOptions::default());
    let ids: Vec<_> = found.iter().map(|e| e.id.as_deref().unwrap()).collect();
    assert_eq!(ids, vec!["first", "second"]);

    // Triage borrows, the batch is unchanged
    assert_eq!(batch, make_mixed_batch());
}

#[test]
fn test_events_is_lazy_and_finite() {
    let batch = make_mixed_batch();
    let mut iter = events(&batch, FilterOptions::default());

    assert_eq!(iter.next().and_then(|e| e.id.as_deref()), Some("first"));
    assert_eq!(iter.next().and_then(|e| e.id.as_deref()), Some("second"));
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
}

#[test]
fn test_only_valid_filters_by_strictness() {
    let batch: Vec<BatchItem> = vec![
        make_test_event("good").into(),
        make_text_event("text").into(),
        json!(1).into(),
    ];

    let lenient = FilterOptions {
        only_valid: true,
        strict: false,
    };
    assert_eq!(get_events(&batch, lenient).len(), 2);

    let strict = FilterOptions {
        only_valid: true,
        strict: true,
    };
    let found = get_events(&batch, strict);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id.as_deref(), Some("good"));
}

#[test]
fn test_is_batch() {
    assert!(matches!(
        is_batch(&BatchItem::Undefined),
        Err(BatchError::UndefinedOrNull)
    ));
    assert!(matches!(
        is_batch(&json!(null).into()),
        Err(BatchError::UndefinedOrNull)
    ));
    assert!(is_batch(&BatchItem::List(vec![])).unwrap());
    assert!(is_batch(&json!([1, 2]).into()).unwrap());
    assert!(!is_batch(&json!({}).into()).unwrap());
    assert!(!is_batch(&make_test_event("1").into()).unwrap());
}

#[test]
fn test_validate_batch_flattens_findings() {
    let batch = BatchItem::List(vec![
        make_test_event("good").into(),
        json!(42).into(),
        BatchItem::Undefined,
        CloudEvent::new(None, None, None, None, EventOptions::default(), None)
            .unwrap()
            .into(),
    ]);

    let errors = validate_batch(&batch, BatchValidateOptions::default());
    assert_eq!(errors.len(), 5);
    assert_eq!(errors[0], ValidationError::NotAnEvent { found: "number" });
    assert_eq!(
        errors[1],
        ValidationError::UndefinedOrNull {
            field: "CloudEvent".into()
        }
    );
    assert_eq!(
        errors[2],
        ValidationError::UndefinedOrNull { field: "id".into() }
    );
}

#[test]
fn test_validate_batch_of_raw_values() {
    let errors = validate_batch(&json!([null, "x", {}]).into(), BatchValidateOptions::default());
    assert_eq!(
        errors,
        vec![
            ValidationError::UndefinedOrNull {
                field: "CloudEvent".into()
            },
            ValidationError::NotAnEvent { found: "string" },
            ValidationError::NotAnEvent { found: "object" },
        ]
    );
}

#[test]
fn test_validate_batch_of_single_event() {
    let item: BatchItem = make_test_event("1").into();

    assert!(validate_batch(&item, BatchValidateOptions::default()).is_empty());

    let errors = validate_batch(&item, BatchValidateOptions { strict: true });
    assert_eq!(
        errors,
        vec![ValidationError::NotABatch {
            found: "CloudEvent"
        }]
    );
}

#[test]
fn test_validate_batch_of_non_batch() {
    let errors = validate_batch(&BatchItem::Undefined, BatchValidateOptions::default());
    assert_eq!(
        errors,
        vec![ValidationError::UndefinedOrNull {
            field: "batch".into()
        }]
    );

    let errors = validate_batch(&json!("events").into(), BatchValidateOptions::default());
    assert_eq!(errors, vec![ValidationError::NotABatch { found: "string" }]);
    assert_eq!(errors[0].to_string(), "the given string should be an array");
}

#[test]
fn test_validate_item() {
    let options = ValidateOptions::default();
    assert!(validate_item(&make_test_event("1").into(), &options).is_empty());
    assert_eq!(
        validate_item(&Utc::now().into(), &options),
        vec![ValidationError::NotAnEvent { found: "date" }]
    );
}

#[test]
fn test_is_valid_batch() {
    let batch = make_mixed_batch();
    assert!(is_valid_batch(&batch, BatchValidateOptions::default()));

    let batch: Vec<BatchItem> = vec![json!(1).into(), make_text_event("text").into()];
    assert!(is_valid_batch(&batch, BatchValidateOptions::default()));
    assert!(!is_valid_batch(&batch, BatchValidateOptions { strict: true }));
}

#[test]
fn test_serialize_events_round_trip() {
    let batch = make_mixed_batch();
    let text = serialize_events(&batch, &BatchSerializeOptions::default()).unwrap();

    let values: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(values.as_array().unwrap().len(), 2);

    let back = deserialize_events(&text, &BatchDeserializeOptions::default()).unwrap();
    let ids: Vec<_> = back
        .iter()
        .map(|e| e.as_ref().and_then(|e| e.id.as_deref()).unwrap())
        .collect();
    assert_eq!(ids, vec!["first", "second"]);
    assert_eq!(back[0].as_ref().unwrap().payload(), Some(json!({"hello": "world"})));
}

#[test]
fn test_serialize_events_formats() {
    let batch: Vec<BatchItem> = vec![make_test_event("1").into(), make_test_event("2").into()];

    let compact = serialize_events(&batch, &BatchSerializeOptions::default()).unwrap();
    assert!(compact.starts_with("[{"));
    assert!(!compact.contains('\n'));

    let options = BatchSerializeOptions {
        pretty_print: true,
        ..BatchSerializeOptions::default()
    };
    let pretty = serialize_events(&batch, &options).unwrap();
    assert!(pretty.starts_with("[\n  {"));
    assert_eq!(pretty.lines().count(), 4);

    let compact_values: Value = serde_json::from_str(&compact).unwrap();
    let pretty_values: Value = serde_json::from_str(&pretty).unwrap();
    assert_eq!(compact_values, pretty_values);

    assert_eq!(
        serialize_events(&[], &BatchSerializeOptions::default()).unwrap(),
        "[]"
    );
}

#[test]
fn test_serialize_events_failure_policies() {
    let invalid = CloudEvent::new(
        Some("bad".into()),
        Some("com.example.test".into()),
        None,
        None,
        EventOptions::default(),
        None,
    )
    .unwrap();
    let batch: Vec<BatchItem> = vec![
        json!("skipped").into(),
        make_test_event("1").into(),
        invalid.into(),
    ];
    let serialize = SerializeOptions {
        only_valid: true,
        ..SerializeOptions::default()
    };

    // Placeholder
    let options = BatchSerializeOptions {
        serialize: serialize.clone(),
        ..BatchSerializeOptions::default()
    };
    let text = serialize_events(&batch, &options).unwrap();
    let values: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(values[0]["id"], json!("1"));
    assert_eq!(values[1], Value::Null);

    // Placeholder and log
    let options = BatchSerializeOptions {
        serialize: serialize.clone(),
        log_error: true,
        ..BatchSerializeOptions::default()
    };
    assert_eq!(serialize_events(&batch, &options).unwrap(), text);

    // Abort
    let options = BatchSerializeOptions {
        serialize,
        throw_error: true,
        ..BatchSerializeOptions::default()
    };
    match serialize_events(&batch, &options) {
        Err(BatchError::Item { index, source }) => {
            assert_eq!(index, 2);
            assert!(matches!(source, CodecError::NotValid { .. }));
        }
        other => panic!("Expected Item error, got {:?}", other),
    }
}

#[test]
fn test_serialize_events_with_filter() {
    let batch: Vec<BatchItem> = vec![make_test_event("good").into(), make_text_event("text").into()];
    let options = BatchSerializeOptions {
        filter: FilterOptions {
            only_valid: true,
            strict: true,
        },
        ..BatchSerializeOptions::default()
    };

    let text = serialize_events(&batch, &options).unwrap();
    let back = deserialize_events(&text, &BatchDeserializeOptions::default()).unwrap();
    assert_eq!(back.len(), 1);
    assert_eq!(back[0].as_ref().unwrap().id.as_deref(), Some("good"));
}

#[test]
fn test_deserialize_events_failure_policies() {
    let text = r#"[
        {"id":"1","type":"com.example.test","source":"/test","specversion":"1.0"},
        null,
        {"id":"3","type":"com.example.test","source":"/test","specversion":"0.3"}
    ]"#;

    let decoded = deserialize_events(text, &BatchDeserializeOptions::default()).unwrap();
    assert_eq!(decoded.len(), 3);
    assert!(decoded[0].is_some());
    assert!(decoded[1].is_none());
    assert!(decoded[2].is_none());

    let options = BatchDeserializeOptions {
        throw_error: true,
        log_error: true,
        ..BatchDeserializeOptions::default()
    };
    match deserialize_events(text, &options) {
        Err(BatchError::Item { index, source }) => {
            assert_eq!(index, 1);
            assert!(matches!(source, CodecError::NotAnObject("null")));
        }
        other => panic!("Expected Item error, got {:?}", other),
    }
}

#[test]
fn test_deserialize_events_rejects_non_arrays() {
    let options = BatchDeserializeOptions::default();
    assert!(matches!(
        deserialize_events("null", &options),
        Err(BatchError::UndefinedOrNull)
    ));
    match deserialize_events(r#"{"id":"1"}"#, &options) {
        Err(BatchError::NotAnArray(kind)) => assert_eq!(kind, "object"),
        other => panic!("Expected NotAnArray error, got {:?}", other),
    }
    assert!(matches!(
        deserialize_events("[", &options),
        Err(BatchError::Json(_))
    ));
}

#[test]
fn test_media_type() {
    assert_eq!(MEDIA_TYPE, "application/cloudevents-batch+json");
    assert_eq!(CloudEvent::MEDIA_TYPE, "application/cloudevents+json");
}
