#![allow(non_snake_case)]

use super::*;

#[test]
fn run___alias_and_utf16___resolves_lowest_q_supported() {
    let out = run("utf8; q=0.8, utf-16", None);

    assert!(out.contains("utf8  q=0.8  unsupported"));
    assert!(out.contains("utf-16  q=1  supported"));
    assert!(out.ends_with("resolved: utf-16\n"));
}

#[test]
fn run___restricted_set___falls_back_to_utf8() {
    let out = run("utf-16", Some("utf-8, iso-8859-1"));

    assert!(out.contains("utf-16  q=1  unsupported"));
    assert!(out.ends_with("resolved: utf-8\n"));
}
