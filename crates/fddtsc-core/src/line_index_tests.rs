use crate::line_index::{LineCol, LineIndex};

#[test]
fn first_line() {
    let text = "type A = 1;";
    let index = LineIndex::new(text);
    assert_eq!(index.line_count(), 1);
    assert_eq!(index.line_col(text, 5), LineCol { line: 0, col: 5 });
}

#[test]
fn crlf_counts_as_one_break() {
    let text = "a\r\nb\rc\nd";
    let index = LineIndex::new(text);
    assert_eq!(index.line_count(), 4);
    assert_eq!(index.line_col(text, 3), LineCol { line: 1, col: 0 });
    assert_eq!(index.line_col(text, 5), LineCol { line: 2, col: 0 });
    assert_eq!(index.line_col(text, 7).one_based(), (4, 1));
}

#[test]
fn columns_are_utf16() {
    let text = "// 😀 x";
    let index = LineIndex::new(text);
    let x = text.find('x').unwrap() as u32;
    assert_eq!(index.line_col(text, x), LineCol { line: 0, col: 6 });
}

#[test]
fn offset_past_end_clamps() {
    let text = "a\nbc";
    let index = LineIndex::new(text);
    assert_eq!(index.line_col(text, 100), LineCol { line: 1, col: 2 });
}

#[test]
fn spans_lines() {
    let text = "a\nb";
    let index = LineIndex::new(text);
    assert!(index.spans_lines(0, 2));
    assert!(!index.spans_lines(2, 3));
}
