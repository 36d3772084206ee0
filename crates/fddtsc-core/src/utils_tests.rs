use crate::utils::{
    is_identifier_name, is_numeric_literal_name, js_number_to_string, parse_numeric_literal,
    property_name_text, quote_string, unescape_string,
};

#[test]
fn identifier_names() {
    assert!(is_identifier_name("foo"));
    assert!(is_identifier_name("_foo1"));
    assert!(is_identifier_name("ñandú"));
    assert!(!is_identifier_name("1foo"));
    assert!(!is_identifier_name("a b"));
}

#[test]
fn numbers_print_like_javascript() {
    assert_eq!(js_number_to_string(1.0), "1");
    assert_eq!(js_number_to_string(-2.5), "-2.5");
    assert_eq!(js_number_to_string(-0.0), "0");
    assert_eq!(js_number_to_string(1e21), "1e+21");
    assert_eq!(js_number_to_string(f64::INFINITY), "Infinity");
}

#[test]
fn numeric_literals_parse() {
    assert_eq!(parse_numeric_literal("0x1F"), Some(31.0));
    assert_eq!(parse_numeric_literal("1_000"), Some(1000.0));
    assert_eq!(parse_numeric_literal(".5"), Some(0.5));
    assert_eq!(parse_numeric_literal("0b101"), Some(5.0));
}

#[test]
fn numeric_literal_names() {
    assert!(is_numeric_literal_name("0"));
    assert!(is_numeric_literal_name("1.5"));
    assert!(!is_numeric_literal_name("01"));
    assert!(!is_numeric_literal_name("1.50"));
}

#[test]
fn property_names() {
    assert_eq!(property_name_text("a"), "a");
    assert_eq!(property_name_text("0"), "0");
    assert_eq!(property_name_text("data-id"), "\"data-id\"");
}

#[test]
fn strings_quote_and_unescape() {
    assert_eq!(quote_string("line\nbreak"), "\"line\\nbreak\"");
    assert_eq!(unescape_string(r"a\'bA\u{1F600}"), "a'bA😀");
}

#[test]
fn control_characters_are_escaped() {
    let quoted: Vec<String> = ["tab\t", "nul\u{0}", "sep\u{2028}", "back\\slash"]
        .iter()
        .map(|s| quote_string(s))
        .collect();

    insta::assert_snapshot!(quoted.join("\n"), @r#"
    "tab\t"
    "nul\u0000"
    "sep\u2028"
    "back\\slash"
    "#);
}
