use rowan::TextSize;

use super::comments::{CommentKind, leading_comment_ranges};

fn render(text: &str, full_start: u32) -> String {
    leading_comment_ranges(text, TextSize::from(full_start))
        .into_iter()
        .map(|c| {
            let kind = match c.kind {
                CommentKind::Line => "line",
                CommentKind::Block => "block",
            };
            let newline = if c.has_trailing_newline { " +nl" } else { "" };
            format!("{kind}{newline} {}\n", &text[c.range])
        })
        .collect()
}

#[test]
fn file_start_collects_immediately() {
    insta::assert_snapshot!(render("/* a */ /* b */x", 0), @r"
    block /* a */
    block /* b */
    ");
}

#[test]
fn same_line_comments_trail_the_previous_token() {
    let text = "a; // trail\n/** doc */\nb";
    insta::assert_snapshot!(render(text, 2), @"block +nl /** doc */");
}

#[test]
fn shebang_is_not_a_comment() {
    let text = "#!/usr/bin/env node\n//! fddtsc::bake\nx";
    insta::assert_snapshot!(render(text, 0), @"line +nl //! fddtsc::bake");
}

#[test]
fn collection_stops_at_the_first_token() {
    let text = "\n// one\n\n// two\ntype A = 1; // three\n";
    insta::assert_snapshot!(render(text, 0), @r"
    line +nl // one
    line +nl // two
    ");
}

#[test]
fn unterminated_block_runs_to_end_of_file() {
    insta::assert_snapshot!(render("x\n/* open", 1), @"block /* open");
}

#[test]
fn unicode_line_separator_starts_collecting() {
    let text = "a;\u{2028}// after\nb";
    insta::assert_snapshot!(render(text, 2), @"line +nl // after");
}

#[test]
fn start_past_end_is_empty() {
    assert!(leading_comment_ranges("abc", TextSize::from(10)).is_empty());
}
