// src/tests/prefix_tests.rs

//! tests for `prefix.rs`

#![allow(non_snake_case)]

use crate::transforms::prefix::PrefixTransform;

use ::test_case::test_case;

#[test_case("prefix", None, None; "None")]
#[test_case("prefix", Some("foo"), Some("prefix foo"); "foo")]
#[test_case("prefix", Some(""), Some("prefix "); "empty record")]
#[test_case("", Some("foo"), Some(" foo"); "empty prefix")]
fn test_PrefixTransform_new(
    prefix: &str,
    record: Option<&str>,
    expect: Option<&str>,
) {
    let transform = PrefixTransform::new(prefix);
    assert_eq!(transform.transform(record).as_deref(), expect);
}

#[test_case("prefix", ": ", Some("foo"), Some("prefix: foo"); "colon")]
#[test_case("prefix", "", Some("foo"), Some("prefixfoo"); "empty sep")]
#[test_case("prefix", "|", None, None; "None")]
fn test_PrefixTransform_new_with_sep(
    prefix: &str,
    sep: &str,
    record: Option<&str>,
    expect: Option<&str>,
) {
    let transform = PrefixTransform::new_with_sep(prefix, sep);
    assert_eq!(transform.transform(record).as_deref(), expect);
}

#[test]
fn test_PrefixTransform_eq() {
    assert_eq!(PrefixTransform::new("p"), PrefixTransform::new_with_sep("p", " "));
    assert_ne!(PrefixTransform::new("p"), PrefixTransform::new_with_sep("p", "-"));
}
