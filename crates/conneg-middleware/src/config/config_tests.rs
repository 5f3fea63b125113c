#![allow(non_snake_case)]

use super::*;

#[test]
fn FormatConfig___default___uses_builtin_formats_and_default_cache() {
    let config = FormatConfig::new();

    assert!(config.formats.is_empty());
    assert!(config.charset.is_none());
    assert!(!config.sniff_charset);
    assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
}

#[test]
fn FormatConfig___from_json_empty___returns_defaults() {
    let config = FormatConfig::from_json(b"").unwrap();

    assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
}

#[test]
fn FormatConfig___from_json___reads_options_and_kw_alias() {
    let json = br#"{
        "formats": ["json", "edn"],
        "charset": "utf-16",
        "options": { "json": { "kw": true, "pretty": true } }
    }"#;

    let config = FormatConfig::from_json(json).unwrap();

    assert_eq!(config.formats, vec!["json", "edn"]);
    assert_eq!(config.charset.as_deref(), Some("utf-16"));
    let json_options = config.format_options("json");
    assert!(json_options.keywordize);
    assert!(json_options.pretty);
    assert!(!config.format_options("edn").keywordize);
}

#[test]
fn FormatConfig___from_json_invalid___returns_error() {
    let result = FormatConfig::from_json(b"{\"formats\": 3}");

    assert!(result.is_err());
}

#[test]
fn FormatConfig___from_toml___reads_all_fields() {
    let toml = r#"
        formats = ["transit-json", "yaml"]
        sniff_charset = true
        cache_capacity = 64

        [options.yaml]
        html = true

        [options.transit-json]
        verbose = true
    "#;

    let config = FormatConfig::from_toml(toml).unwrap();

    assert_eq!(config.formats, vec!["transit-json", "yaml"]);
    assert!(config.sniff_charset);
    assert_eq!(config.cache_capacity, 64);
    assert!(config.format_options("yaml").html);
    assert!(config.format_options("transit-json").verbose);
}

#[test]
fn FormatConfig___builders___set_formats_and_options() {
    let config = FormatConfig::new()
        .with_formats(["edn"])
        .with_options("edn", CodecOptions::default().with_charset("utf-16"));

    assert_eq!(config.formats, vec!["edn"]);
    assert_eq!(
        config.format_options("edn").charset.as_deref(),
        Some("utf-16")
    );
}
