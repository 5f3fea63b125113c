#![allow(non_snake_case)]

use super::*;

fn sample_map() -> Map {
    let mut map = Map::new();
    map.insert("name", "conneg");
    map.insert("tags", Value::Vector(vec!["a".into(), "b".into()]));
    map
}

// Map tests

#[test]
fn Map___insert_existing_key___replaces_value_in_place() {
    let mut map = sample_map();

    let previous = map.insert("name", "other");

    assert_eq!(previous, Some(Value::from("conneg")));
    assert_eq!(map.len(), 2);
    assert_eq!(map.keys().next(), Some(&Value::from("name")));
}

#[test]
fn Map___get_named___finds_string_and_keyword_keys() {
    let mut map = Map::new();
    map.insert(Value::keyword("id"), 7);
    map.insert("label", "x");

    assert_eq!(map.get_named("id"), Some(&Value::Integer(7)));
    assert_eq!(map.get_named("label"), Some(&Value::from("x")));
    assert_eq!(map.get_named("missing"), None);
}

#[test]
fn Map___merge___later_entries_win() {
    let mut base = sample_map();
    let mut extra = Map::new();
    extra.insert("name", "merged");
    extra.insert("id", 1);

    base.merge(extra);

    assert_eq!(base.get_named("name"), Some(&Value::from("merged")));
    assert_eq!(base.get_named("id"), Some(&Value::Integer(1)));
    assert_eq!(base.len(), 3);
}

#[test]
fn Map___from_iter___deduplicates_keys() {
    let map: Map = vec![
        (Value::from("a"), Value::from(1)),
        (Value::from("a"), Value::from(2)),
    ]
    .into_iter()
    .collect();

    assert_eq!(map.len(), 1);
    assert_eq!(map.get_named("a"), Some(&Value::Integer(2)));
}

#[test]
fn Map___many_distinct_keys___keeps_order_and_lookups() {
    let mut map = Map::new();
    for i in 0..20_000 {
        map.insert(i, i * 2);
    }
    for i in (0..20_000).step_by(7) {
        map.insert(i, -i);
    }

    assert_eq!(map.len(), 20_000);
    assert_eq!(map.keys().next(), Some(&Value::Integer(0)));
    assert_eq!(map.keys().last(), Some(&Value::Integer(19_999)));
    assert_eq!(map.get(&Value::Integer(7)), Some(&Value::Integer(-7)));
    assert_eq!(map.get(&Value::Integer(8)), Some(&Value::Integer(16)));
    assert_eq!(map.get(&Value::Integer(20_000)), None);
}

#[test]
fn Map___structurally_equal_keys___share_one_entry() {
    let mut map = Map::new();
    map.insert(Value::Vector(vec![1.into(), "a".into()]), 1);
    map.insert(Value::Float(0.0), "zero");

    map.insert(Value::Vector(vec![1.into(), "a".into()]), 2);
    map.insert(Value::Float(-0.0), "negative zero");

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&Value::Vector(vec![1.into(), "a".into()])), Some(&Value::Integer(2)));
    assert_eq!(map.get(&Value::Float(0.0)), Some(&Value::from("negative zero")));
}

#[test]
fn Map___string_and_keyword_keys___are_distinct_entries() {
    let mut map = Map::new();
    map.insert("id", 1);
    map.insert(Value::keyword("id"), 2);

    assert_eq!(map.len(), 2);
    assert_eq!(map.get_named("id"), Some(&Value::Integer(1)));
    assert_eq!(map.get(&Value::keyword("id")), Some(&Value::Integer(2)));
}

#[test]
fn Map___with_capacity___accepts_huge_hint() {
    let mut map = Map::with_capacity(usize::MAX);
    map.insert("a", 1);

    assert_eq!(map.len(), 1);
}

#[test]
fn Map___equality___ignores_index_state() {
    let mut left = Map::with_capacity(8);
    left.insert("a", 1);
    let right: Map = vec![(Value::from("a"), Value::from(1))].into_iter().collect();

    assert_eq!(left, right);
}

// Value tests

#[test]
fn Value___keywordize_keys___converts_nested_string_keys() {
    let mut inner = Map::new();
    inner.insert("b", 1);
    let mut outer = Map::new();
    outer.insert("a", Value::Vector(vec![Value::Map(inner)]));

    let result = Value::Map(outer).keywordize_keys();

    let outer = result.as_map().unwrap();
    let (key, nested) = outer.iter().next().unwrap();
    assert_eq!(key, &Value::keyword("a"));
    let Value::Vector(items) = nested else {
        panic!("expected vector");
    };
    assert_eq!(
        items[0].as_map().unwrap().keys().next(),
        Some(&Value::keyword("b"))
    );
}

#[test]
fn Value___keywordize_keys___leaves_values_untouched() {
    let mut map = Map::new();
    map.insert("k", "still a string");

    let result = Value::Map(map).keywordize_keys();

    assert_eq!(
        result.as_map().unwrap().get_named("k"),
        Some(&Value::from("still a string"))
    );
}

#[test]
fn Value___kind___names_variant() {
    assert_eq!(Value::Nil.kind(), "nil");
    assert_eq!(Value::keyword("a").kind(), "keyword");
    assert_eq!(Value::tagged("inst", "x".into()).kind(), "tagged");
}

// serde bridge tests

#[test]
fn Value___deserialize_json___preserves_key_order() {
    let value: Value = serde_json::from_str(r#"{"z": 1, "a": [true, null, 1.5]}"#).unwrap();

    let map = value.as_map().unwrap();
    let keys: Vec<_> = map.keys().cloned().collect();
    assert_eq!(keys, vec![Value::from("z"), Value::from("a")]);
    assert_eq!(
        map.get_named("a"),
        Some(&Value::Vector(vec![
            Value::Bool(true),
            Value::Nil,
            Value::Float(1.5)
        ]))
    );
}

#[test]
fn Value___deserialize_huge_unsigned___falls_back_to_float() {
    let value: Value = serde_json::from_str("18446744073709551615").unwrap();

    assert!(matches!(value, Value::Float(_)));
}

#[test]
fn Value___serialize_keyword___writes_name() {
    let mut map = Map::new();
    map.insert(Value::keyword("id"), Value::symbol("sym"));

    let json = serde_json::to_string(&Value::Map(map)).unwrap();

    assert_eq!(json, r#"{"id":"sym"}"#);
}

#[test]
fn Value___serialize_tagged___writes_inner_value() {
    let value = Value::tagged("inst", Value::from("2024-01-01"));

    let json = serde_json::to_string(&value).unwrap();

    assert_eq!(json, r#""2024-01-01""#);
}
