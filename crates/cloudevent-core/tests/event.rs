use std::collections::BTreeMap;

use cloudevent_core::{
    get_extensions_of, set_extensions_in, Attr, CloudEvent, DataType, EventError, EventOptions,
    Extensions, ValidateOptions,
};
use serde_json::{json, Map, Value};

fn make_event(data: Option<Value>, options: EventOptions) -> Result<CloudEvent, EventError> {
    CloudEvent::new(
        Some("1".into()),
        Some("com.example.test".into()),
        Some("/".into()),
        data,
        options,
        None,
    )
}

fn make_extensions() -> Extensions {
    let mut extensions = BTreeMap::new();
    extensions.insert("exampleext".to_string(), json!("value"));
    extensions.insert("exampleflag".to_string(), json!(true));
    extensions
}

fn strict() -> EventOptions {
    EventOptions {
        strict: true,
        ..EventOptions::default()
    }
}

#[test]
fn minimal_event_is_valid() {
    let event = make_event(Some(json!({})), EventOptions::default()).unwrap();

    assert!(event.is_valid(&ValidateOptions::default()));
    assert_eq!(event.validate(&ValidateOptions::default()).len(), 0);
    assert_eq!(event.specversion, CloudEvent::VERSION);
    assert_eq!(event.datacontenttype, "application/json");
    assert!(!event.is_strict());
}

#[test]
fn missing_identity_is_tolerated_outside_strict_mode() {
    let event = CloudEvent::new(None, None, None, None, EventOptions::default(), None).unwrap();

    let errors = event.validate(&ValidateOptions::default());
    assert_eq!(errors.len(), 3);
    let fields: Vec<_> = errors.iter().filter_map(|e| e.field()).collect();
    assert_eq!(fields, vec!["id", "type", "source"]);
}

#[test]
fn missing_identity_fails_strict_construction() {
    let result = CloudEvent::new(None, None, None, None, strict(), None);
    assert_eq!(result, Err(EventError::MissingMandatory("id")));

    let result = CloudEvent::new(
        Some("1".into()),
        Some(String::new()),
        Some("/".into()),
        None,
        strict(),
        None,
    );
    assert_eq!(result, Err(EventError::MissingMandatory("type")));
}

#[test]
fn omitted_time_defaults_to_now_but_null_is_kept() {
    let before = chrono::Utc::now();
    let defaulted = make_event(None, EventOptions::default()).unwrap();
    let time = defaulted.time.unwrap();
    assert!(time >= before && time <= chrono::Utc::now());

    let nulled = make_event(
        None,
        EventOptions {
            time: Attr::Null,
            ..EventOptions::default()
        },
    )
    .unwrap();
    assert_eq!(nulled.time, None);
}

#[test]
fn omitted_and_null_optional_attributes_differ() {
    let omitted = make_event(None, EventOptions::default()).unwrap();
    assert!(omitted.dataschema.is_absent());
    assert!(omitted.subject.is_absent());

    let nulled = make_event(
        None,
        EventOptions {
            dataschema: Attr::Null,
            subject: Attr::Null,
            ..EventOptions::default()
        },
    )
    .unwrap();
    assert!(nulled.dataschema.is_null());
    assert!(nulled.subject.is_null());
}

#[test]
fn content_type_always_falls_back_to_default() {
    let event = make_event(
        None,
        EventOptions {
            datacontenttype: None,
            ..EventOptions::default()
        },
    )
    .unwrap();
    assert_eq!(event.datacontenttype, CloudEvent::DATACONTENTTYPE_DEFAULT);

    let event = make_event(
        None,
        EventOptions {
            datacontenttype: Some("text/plain".into()),
            ..EventOptions::default()
        },
    )
    .unwrap();
    assert_eq!(event.datacontenttype, "text/plain");
}

#[test]
fn data_and_base64_conflict_only_fails_strict_construction() {
    let options = EventOptions {
        data_base64: Some("SGVsbG8=".into()),
        ..EventOptions::default()
    };
    let lenient = make_event(Some(json!("Hello")), options.clone()).unwrap();
    assert_eq!(lenient.data_type(), DataType::Binary);

    let result = make_event(
        Some(json!("Hello")),
        EventOptions {
            strict: true,
            ..options
        },
    );
    assert_eq!(result, Err(EventError::DataConflict));
}

#[test]
fn strict_construction_checks_extensions() {
    let result = CloudEvent::new(
        Some("1".into()),
        Some("com.example.test".into()),
        Some("/".into()),
        None,
        strict(),
        Some(Extensions::new()),
    );
    assert_eq!(result, Err(EventError::EmptyExtensions));

    let mut colliding = make_extensions();
    colliding.insert("source".to_string(), json!("x"));
    let result = CloudEvent::new(
        Some("1".into()),
        Some("com.example.test".into()),
        Some("/".into()),
        None,
        strict(),
        Some(colliding.clone()),
    );
    assert_eq!(result, Err(EventError::ExtensionCollision("source".into())));

    let lenient = CloudEvent::new(
        Some("1".into()),
        Some("com.example.test".into()),
        Some("/".into()),
        None,
        EventOptions::default(),
        Some(colliding),
    )
    .unwrap();
    assert!(lenient.extension("source").is_some());
}

#[test]
fn reserved_strict_flag_is_rejected_in_every_mode() {
    let mut extensions = make_extensions();
    extensions.insert("strictvalidation".to_string(), json!(true));

    let result = CloudEvent::new(
        Some("1".into()),
        Some("com.example.test".into()),
        Some("/".into()),
        None,
        EventOptions::default(),
        Some(extensions),
    );
    assert_eq!(
        result,
        Err(EventError::ReservedExtension("strictvalidation".into()))
    );
}

#[test]
fn extensions_are_none_when_empty() {
    let event = CloudEvent::new(
        Some("1".into()),
        Some("com.example.test".into()),
        Some("/".into()),
        None,
        EventOptions::default(),
        Some(Extensions::new()),
    )
    .unwrap();
    assert_eq!(event.extensions(), None);

    let event = CloudEvent::new(
        Some("1".into()),
        Some("com.example.test".into()),
        Some("/".into()),
        None,
        strict(),
        Some(make_extensions()),
    )
    .unwrap();
    assert_eq!(event.extensions(), Some(make_extensions()));
    assert_eq!(event.extension("exampleflag"), Some(&json!(true)));
}

#[test]
fn extensions_round_trip_through_a_plain_object() {
    let mut object = Map::new();
    set_extensions_in(&mut object, &make_extensions()).unwrap();
    assert_eq!(get_extensions_of(&object), Some(make_extensions()));
}

#[test]
fn payload_parses_json_strings() {
    let event = make_event(Some(json!(r#"{"a":1}"#)), EventOptions::default()).unwrap();
    assert_eq!(event.payload(), Some(json!({"a": 1})));

    let event = make_event(Some(json!("Hello World, 2020")), EventOptions::default()).unwrap();
    assert_eq!(event.payload(), Some(json!("Hello World, 2020")));
}

#[test]
fn payload_keeps_strings_for_other_content_types() {
    let event = make_event(
        Some(json!(r#"{"a":1}"#)),
        EventOptions {
            datacontenttype: Some("text/plain".into()),
            ..EventOptions::default()
        },
    )
    .unwrap();
    assert_eq!(event.payload(), Some(json!(r#"{"a":1}"#)));
}

#[test]
fn payload_decodes_base64() {
    let event = make_event(
        None,
        EventOptions {
            data_base64: Some("SGVsbG8gV29ybGQ=".into()),
            ..EventOptions::default()
        },
    )
    .unwrap();
    assert_eq!(event.payload(), Some(json!("Hello World")));
    assert_eq!(event.data_type(), DataType::Binary);
}

#[test]
fn payload_is_fresh_on_every_call() {
    let event = make_event(Some(json!({"nested": {"k": "v"}})), EventOptions::default()).unwrap();

    let mut first = event.payload().unwrap();
    let second = event.payload().unwrap();
    assert_eq!(first, second);

    first["nested"]["k"] = json!("changed");
    assert_eq!(event.data, Some(json!({"nested": {"k": "v"}})));
    assert_eq!(event.payload(), Some(second));
}

#[test]
fn payload_passes_absent_and_null_data_through() {
    let event = make_event(None, EventOptions::default()).unwrap();
    assert_eq!(event.payload(), None);
    assert_eq!(event.data_type(), DataType::Unknown);

    let event = make_event(Some(Value::Null), EventOptions::default()).unwrap();
    assert_eq!(event.payload(), Some(Value::Null));
    assert_eq!(event.data_type(), DataType::Unknown);
}

#[test]
fn events_from_same_inputs_are_equal_but_independent() {
    let first = make_event(
        Some(json!({"k": "v"})),
        EventOptions {
            time: Attr::Null,
            ..EventOptions::default()
        },
    )
    .unwrap();
    let mut second = first.clone();
    assert_eq!(first, second);

    second.data = Some(json!({"k": "changed"}));
    assert_eq!(first.data, Some(json!({"k": "v"})));
    assert_ne!(first, second);
}

#[test]
fn clone_with_id_keeps_everything_else() {
    let event = CloudEvent::new(
        Some("1".into()),
        Some("com.example.test".into()),
        Some("/".into()),
        Some(json!({"k": "v"})),
        EventOptions {
            strict: true,
            subject: Attr::Value("subject".into()),
            ..EventOptions::default()
        },
        Some(make_extensions()),
    )
    .unwrap();

    let copy = event.clone_with_id("2").unwrap();
    assert_eq!(copy.id.as_deref(), Some("2"));
    assert_eq!(copy.time, event.time);
    assert_eq!(copy.subject, event.subject);
    assert_eq!(copy.extensions(), event.extensions());
    assert!(copy.is_strict());
}
