use mog_core::schema::{Mog, SchemaError};
use mog_core::Value;
use serde_json::json;

fn v(j: serde_json::Value) -> Value {
    Value::from(j)
}

#[test]
fn satisfying_value_comes_back_coerced() {
    let m = Mog::new();
    let schema = m
        .compile(
            "
            person           @Object
            person.age       @Number { min : 0 }
            person.born      @Date
            person.email     @Email { lower }
            person.nick      @String { opt }
            ",
        )
        .unwrap();

    let mut value = v(json!({ "age": "41", "born": "1983-05-01", "email": "Ann@Example.COM" }));
    schema.validate(&mut value).unwrap();

    assert_eq!(value.get("age"), Some(&Value::Number(41.0)));
    assert!(matches!(value.get("born"), Some(Value::Date(_))));
    assert_eq!(value.get("email"), Some(&Value::from("ann@example.com")));
    assert_eq!(value.get("nick"), None);
}

#[test]
fn optional_null_is_left_alone() {
    let schema = Mog::new().compile("x.when @Date { opt }").unwrap();
    let out = schema.check(v(json!({ "when": null }))).unwrap();
    assert_eq!(out, v(json!({ "when": null })));
}

#[test]
fn first_failing_field_wins() {
    let schema = Mog::new()
        .compile(
            "
            x       @Object
            x.a     @Number
            x.b     @String
            x.c     @Number
            ",
        )
        .unwrap();

    let err = schema.check(v(json!({ "a": 1, "b": 2, "c": "nope" }))).unwrap_err();
    let failure = err.as_validation().expect("validation failure");
    assert_eq!(failure.path, "x.b");
    assert_eq!(failure.line_number, 3);
    assert_eq!(failure.report.matches(">>>").count(), 1);
}

#[test]
fn leading_segment_is_only_a_label() {
    let schema = Mog::new().compile("root.a.b @Number").unwrap();
    let out = schema.check(v(json!({ "a": { "b": "5" } }))).unwrap();
    assert_eq!(out, v(json!({ "a": { "b": 5 } })));

    let other_label = Mog::new().compile("whatever.a.b @Number").unwrap();
    assert!(other_label.check(v(json!({ "a": { "b": 5 } }))).is_ok());
}

#[test]
fn root_only_path_targets_whole_input() {
    let schema = Mog::new().compile("root @Object").unwrap();
    assert_eq!(schema.check(Value::object()).unwrap(), Value::object());

    let err = schema.check(Value::Null).unwrap_err();
    assert!(err.to_string().starts_with("missing value, expected object, got null"), "{err}");

    let optional = Mog::new().compile("root @Object { opt }").unwrap();
    assert_eq!(optional.check(Value::Null).unwrap(), Value::Null);
}

#[test]
fn recursive_node_type() {
    let m = Mog::new();
    let node = m
        .compile(
            "
            node.label  @String
            node.child  @Node { opt }
            ",
        )
        .unwrap();
    m.add_schema("Node", &node);
    let root = m.compile("root @Node").unwrap();

    let out = root
        .check(v(json!({ "label": "a", "child": { "label": "b", "child": { "label": "c" } } })))
        .unwrap();
    let leaf = out.get("child").and_then(|c| c.get("child")).and_then(|c| c.get("label"));
    assert_eq!(leaf, Some(&Value::from("c")));

    let err = root.check(v(json!({ "label": "a", "child": { "label": 7 } }))).unwrap_err();
    let failure = err.as_validation().unwrap();
    assert_eq!(failure.path, "root");
    assert!(failure.message.contains("wrong value, required string, got number"));
}

#[test]
fn root_level_schema_type_coerces_in_place() {
    let m = Mog::new();
    let person = m.compile("p.age @Number\np.born @Date").unwrap();
    m.add_schema("Person", &person);
    let root = m.compile("root @Person").unwrap();

    let mut value = v(json!({ "age": "41", "born": "1983-05-01" }));
    root.validate(&mut value).unwrap();

    assert_eq!(value.get("age"), Some(&Value::Number(41.0)));
    assert!(matches!(value.get("born"), Some(Value::Date(_))));
}

#[test]
fn nested_schema_types_coerce_at_every_level() {
    let m = Mog::new();
    let node = m.compile("node.weight @Number\nnode.child @Node { opt }").unwrap();
    m.add_schema("Node", &node);
    let root = m.compile("tree @Node").unwrap();

    let out = root
        .check(v(json!({ "weight": "1", "child": { "weight": "2", "child": { "weight": "3" } } })))
        .unwrap();
    assert_eq!(out, v(json!({ "weight": 1, "child": { "weight": 2, "child": { "weight": 3 } } })));
}

#[test]
fn schema_type_keeps_the_types_of_its_own_compiler() {
    let a = Mog::new();
    a.add_fn("Even", |value, _, _| match value.and_then(Value::as_f64) {
        Some(n) if n % 2.0 == 0.0 => Ok(None),
        _ => Err("expected an even number".to_string()),
    });
    let inner = a.compile("w.n @Even").unwrap();
    assert!(inner.check(v(json!({ "n": 2 }))).is_ok());

    let b = Mog::new();
    b.add_schema("Wrapper", &inner);
    let doc = b.compile("doc.w @Wrapper").unwrap();

    assert!(doc.check(v(json!({ "w": { "n": 2 } }))).is_ok());
    let err = doc.check(v(json!({ "w": { "n": 3 } }))).unwrap_err();
    assert!(err.to_string().starts_with("expected an even number"), "{err}");
    assert!(!b.registry().contains("Even"));
}

#[test]
fn self_referencing_data_hits_the_depth_limit() {
    let m = Mog::new().with_max_depth(5);
    let node = m.compile("n.next @Link").unwrap();
    m.add_schema("Link", &node);
    let root = m.compile("r @Link").unwrap();

    let mut chain = json!({ "end": true });
    for _ in 0..10 {
        chain = json!({ "next": chain });
    }

    match root.check(v(chain)) {
        Err(SchemaError::DepthExceeded { limit, .. }) => assert_eq!(limit, 5),
        other => panic!("expected DepthExceeded, got {other:?}"),
    }
}

#[test]
fn number_bounds() {
    let schema = Mog::new().compile("x.n @Number { min : 3, max : 9 }").unwrap();
    assert!(schema.check(v(json!({ "n": 5 }))).is_ok());

    let low = schema.check(v(json!({ "n": 2 }))).unwrap_err();
    assert!(low.as_validation().unwrap().message.contains("(min)"));

    let high = schema.check(v(json!({ "n": 22 }))).unwrap_err();
    assert!(high.as_validation().unwrap().message.contains("(max)"));
}

#[test]
fn coercion_is_idempotent() {
    let schema = Mog::new()
        .compile("x.n @Number\nx.d @Date\nx.e @Email { lower }")
        .unwrap();
    let once = schema.check(v(json!({ "n": "12", "d": "2013-12-12", "e": "A@B.io" }))).unwrap();
    let twice = schema.check(once.clone()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn types_bind_at_call_time() {
    let m = Mog::new();
    let schema = m.compile("x.v @Even").unwrap();

    let err = schema.check(v(json!({ "v": 2 }))).unwrap_err();
    assert!(matches!(err, SchemaError::UnknownType { ref type_name, .. } if type_name == "Even"));

    m.add_fn("Even", |value, _, _| match value.and_then(Value::as_f64) {
        Some(n) if n % 2.0 == 0.0 => Ok(None),
        _ => Err("expected an even number".to_string()),
    });
    assert!(schema.check(v(json!({ "v": 2 }))).is_ok());
    assert!(schema.check(v(json!({ "v": 3 }))).is_err());

    m.add_fn("Even", |_, _, _| Ok(None));
    assert!(schema.check(v(json!({ "v": 3 }))).is_ok());
}

#[test]
fn malformed_line_fails_compilation() {
    let err = Mog::new().compile("x.a @Number\nthis is not a field").unwrap_err();
    match err {
        SchemaError::MalformedLine { line_number, line } => {
            assert_eq!(line_number, 2);
            assert_eq!(line, "this is not a field");
        }
        other => panic!("expected MalformedLine, got {other:?}"),
    }
}

#[test]
fn compiled_schema_is_shared_across_threads() {
    let schema = Mog::new().compile("x.n @Number { max : 100 }").unwrap();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let schema = schema.clone();
            std::thread::spawn(move || schema.check(v(json!({ "n": i * 40 }))).is_ok())
        })
        .collect();
    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![true, true, true, false]);
}
