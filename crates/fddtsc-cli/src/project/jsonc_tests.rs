use serde_json::{Value, json};

use super::jsonc::{error_message, error_offset, find_key, strip};

#[test]
fn comments_and_trailing_commas_are_blanked() {
    let text = "{\n  // note\n  \"a\": [1, 2,], /* x\n */\n  \"b\": \"// kept, ]\",\n}\n";
    let clean = strip(text);

    assert_eq!(clean.len(), text.len());
    assert_eq!(clean.lines().count(), text.lines().count());
    assert_eq!(clean.find("\"b\""), text.find("\"b\""));

    let value: Value = serde_json::from_str(&clean).unwrap();
    assert_eq!(value, json!({ "a": [1, 2], "b": "// kept, ]" }));
}

#[test]
fn byte_order_mark_is_blanked() {
    let clean = strip("\u{feff}{}");
    assert_eq!(clean, "   {}");
}

#[test]
fn unterminated_block_comment_runs_to_the_end() {
    assert_eq!(strip("{} /* open"), "{}        ");
}

#[test]
fn error_positions_map_to_offsets() {
    let text = "ab\ncd\n";
    assert_eq!(error_offset(text, 2, 2), 4);
    assert_eq!(error_offset(text, 2, 0), 3);
    assert_eq!(error_offset(text, 9, 9), text.len());
    assert_eq!(error_offset("é", 1, 2), 0);
}

#[test]
fn error_messages_lose_their_position_suffix() {
    let err = serde_json::from_str::<Value>("{").unwrap_err();
    assert_eq!(error_message(&err), "EOF while parsing an object");
}

#[test]
fn keys_are_found_only_before_colons() {
    let text = r#"{"a": {"b": 1}, "b": 2, "c": "b"}"#;
    assert_eq!(find_key(text, "b", 0), Some(7..10));
    assert_eq!(find_key(text, "b", 10), Some(16..19));
    assert_eq!(find_key(text, "b", 19), None);
    assert_eq!(find_key(text, "z", 0), None);
}
