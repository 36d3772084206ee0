use crate::parser::cst::SyntaxKind;
use crate::parser::lexer::{lex, token_text};

/// Format tokens without trivia (default for most tests)
fn snapshot(input: &str) -> String {
    format_tokens(input, false)
}

/// Format tokens with trivia included
fn snapshot_raw(input: &str) -> String {
    format_tokens(input, true)
}

fn format_tokens(input: &str, include_trivia: bool) -> String {
    let tokens = lex(input);
    let mut out = String::new();
    for token in tokens {
        if include_trivia || !token.kind.is_trivia() {
            out.push_str(&format!(
                "{:?} {:?}\n",
                token.kind,
                token_text(input, &token)
            ));
        }
    }
    out
}

#[test]
fn punctuation() {
    insta::assert_snapshot!(snapshot("( ) [ ] { } < > , ; : ? . ... = => | & - !"), @r#"
    ParenOpen "("
    ParenClose ")"
    BracketOpen "["
    BracketClose "]"
    BraceOpen "{"
    BraceClose "}"
    Lt "<"
    Gt ">"
    Comma ","
    Semicolon ";"
    Colon ":"
    Question "?"
    Dot "."
    DotDotDot "..."
    Equals "="
    Arrow "=>"
    Pipe "|"
    Amp "&"
    Minus "-"
    Bang "!"
    "#);
}

#[test]
fn contextual_keywords_are_identifiers() {
    insta::assert_snapshot!(snapshot("export type interface keyof typeof string exports"), @r#"
    KwExport "export"
    Ident "type"
    Ident "interface"
    Ident "keyof"
    KwTypeof "typeof"
    Ident "string"
    Ident "exports"
    "#);
}

#[test]
fn literals() {
    insta::assert_snapshot!(snapshot("'c' 1_000 0x1F 10n .5 1e3 true"), @r#"
    StringLiteral "'c'"
    NumberLiteral "1_000"
    NumberLiteral "0x1F"
    BigIntLiteral "10n"
    NumberLiteral ".5"
    NumberLiteral "1e3"
    KwTrue "true"
    "#);
}

#[test]
fn template_with_substitutions() {
    insta::assert_snapshot!(snapshot("`a${T}b${U}c`"), @r#"
    TemplateHead "`a${"
    Ident "T"
    TemplateMiddle "}b${"
    Ident "U"
    TemplateTail "}c`"
    "#);
}

#[test]
fn template_without_substitutions() {
    insta::assert_snapshot!(snapshot("`plain` `es\\`c`"), @r#"
    NoSubstitutionTemplate "`plain`"
    NoSubstitutionTemplate "`es\\`c`"
    "#);
}

#[test]
fn nested_template_in_substitution() {
    insta::assert_snapshot!(snapshot("`${`x${A}`}`"), @r#"
    TemplateHead "`${"
    TemplateHead "`x${"
    Ident "A"
    TemplateTail "}`"
    TemplateTail "}`"
    "#);
}

#[test]
fn trivia() {
    insta::assert_snapshot!(snapshot_raw("// line\n/* block */ x"), @r#"
    LineComment "// line"
    Newline "\n"
    BlockComment "/* block */"
    Whitespace " "
    Ident "x"
    "#);
}

#[test]
fn shebang() {
    insta::assert_snapshot!(snapshot_raw("#!/usr/bin/env node\nx"), @r##"
    Shebang "#!/usr/bin/env node"
    Newline "\n"
    Ident "x"
    "##);
}

#[test]
fn garbage_is_coalesced() {
    insta::assert_snapshot!(snapshot(r"a \\ b"), @r#"
    Ident "a"
    Garbage "\\\\"
    Ident "b"
    "#);
}

#[test]
fn unterminated_template_is_garbage() {
    let tokens = lex("`abc");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, SyntaxKind::Garbage);
}

#[test]
fn byte_order_mark_is_whitespace() {
    let tokens = lex("\u{feff}type");
    assert_eq!(tokens[0].kind, SyntaxKind::Whitespace);
    assert_eq!(tokens[1].kind, SyntaxKind::Ident);
    assert_eq!(token_text("\u{feff}type", &tokens[1]), "type");
}
