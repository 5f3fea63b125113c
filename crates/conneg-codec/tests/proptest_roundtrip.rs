//! Property-based round-trip tests for the built-in codecs
//!
//! Every built-in codec that can both decode and encode must read back
//! exactly what it wrote.

use conneg_codec::{BUILTIN_FORMATS, CodecOptions, builtin};
use conneg_core::{Map, Value};
use proptest::prelude::*;

// Strategy: scalars every format represents natively
fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        (-1_000_000_000i64..1_000_000_000).prop_map(Value::Integer),
        (-1.0e6f64..1.0e6).prop_map(Value::Float),
        "[a-z][a-zA-Z0-9 _-]{0,11}".prop_map(Value::String),
    ]
}

// Strategy: nested vectors and string-keyed maps of scalars
fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Vector),
            arb_map(inner),
        ]
    })
}

fn arb_map(values: impl Strategy<Value = Value>) -> impl Strategy<Value = Value> {
    proptest::collection::btree_map("[a-z]{1,8}", values, 0..4).prop_map(|entries| {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (Value::String(k), v))
                .collect::<Map>(),
        )
    })
}

fn roundtrip_formats() -> Vec<&'static str> {
    let options = CodecOptions::default();
    BUILTIN_FORMATS
        .iter()
        .copied()
        .filter(|name| {
            builtin(name, &options).is_some_and(|codec| codec.can_decode() && codec.can_encode())
        })
        .collect()
}

proptest! {
    /// Property: decode(encode(map)) == map for every two-way built-in
    #[test]
    fn proptest_builtin_codecs_roundtrip_maps(value in arb_map(arb_value())) {
        for name in roundtrip_formats() {
            let codec = builtin(name, &CodecOptions::default()).expect("built-in exists");

            let encoded = codec.encode(&value, "utf-8").expect("encode should succeed");
            let decoded = codec.decode(&encoded, "utf-8").expect("decode should succeed");

            prop_assert_eq!(&decoded, &value, "format {}", name);
        }
    }

    /// Property: keywords and symbols survive the formats that model them
    #[test]
    fn proptest_keyword_formats_roundtrip(
        keys in proptest::collection::btree_set("[a-z]{1,8}", 0..4),
        symbol in "sym[a-z.-]{0,4}",
    ) {
        let mut map = Map::new();
        for key in keys {
            map.insert(Value::keyword(key), Value::symbol(symbol.clone()));
        }
        let value = Value::Map(map);

        for name in ["edn", "transit-json", "transit-msgpack"] {
            let codec = builtin(name, &CodecOptions::default()).expect("built-in exists");

            let encoded = codec.encode(&value, "utf-8").expect("encode should succeed");
            let decoded = codec.decode(&encoded, "utf-8").expect("decode should succeed");

            prop_assert_eq!(&decoded, &value, "format {}", name);
        }
    }

    /// Property: json-kw reads back keyword keys it was given
    #[test]
    fn proptest_keywordized_json_roundtrip(
        entries in proptest::collection::btree_map("[a-z]{1,8}", arb_scalar(), 0..4),
    ) {
        let value = Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (Value::keyword(k), v))
                .collect::<Map>(),
        );
        let codec = builtin("json-kw", &CodecOptions::default()).expect("built-in exists");

        let encoded = codec.encode(&value, "utf-8").expect("encode should succeed");
        let decoded = codec.decode(&encoded, "utf-8").expect("decode should succeed");

        prop_assert_eq!(decoded, value);
    }
}
