use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind::{self, *};
use crate::parser::cst::TokenSet;
use crate::parser::cst::token_sets::LIST_RECOVERY;

/// Tokens after which a line break lets automatic semicolon insertion end a statement.
const ENDS_EXPRESSION: TokenSet = TokenSet::new(&[
    Ident,
    StringLiteral,
    NumberLiteral,
    BigIntLiteral,
    NoSubstitutionTemplate,
    TemplateTail,
    KwTrue,
    KwFalse,
    KwNull,
    KwThis,
    ParenClose,
    BracketClose,
    BraceClose,
]);

/// Tokens that continue an expression across a line break.
const CONTINUES_EXPRESSION: TokenSet = TokenSet::new(&[
    Dot,
    Question,
    Colon,
    Equals,
    Arrow,
    Plus,
    Minus,
    Star,
    Slash,
    Pipe,
    Amp,
    Lt,
    Gt,
    Comma,
    Operator,
    ParenOpen,
    BracketOpen,
    TemplateHead,
    NoSubstitutionTemplate,
    KwIn,
]);

impl Parser<'_> {
    /// Declaration name: a plain identifier wrapped in `Name`.
    pub(super) fn parse_binding_name(&mut self) -> bool {
        if self.current() != Ident {
            self.error(DiagnosticKind::ExpectedIdentifier);
            return false;
        }
        self.start_node(Name);
        self.bump();
        self.finish_node();
        true
    }

    /// Member name: identifier or keyword, string or numeric literal, or `[computed]`.
    pub(super) fn parse_property_name(&mut self) -> bool {
        let kind = self.current();
        if kind.is_identifier_like() || matches!(kind, StringLiteral | NumberLiteral) {
            self.start_node(Name);
            self.bump();
            self.finish_node();
            return true;
        }
        if kind == BracketOpen {
            self.start_node(Name);
            self.bump();
            self.skip_expression(TokenSet::new(&[BracketClose]));
            self.expect(BracketClose, "]");
            self.finish_node();
            return true;
        }
        self.error(DiagnosticKind::ExpectedIdentifier);
        false
    }

    /// Parameter name, including `this` and destructuring patterns kept as raw tokens.
    pub(super) fn parse_parameter_name(&mut self) -> bool {
        match self.current() {
            Ident | KwThis => {
                self.start_node(Name);
                self.bump();
                self.finish_node();
                true
            }
            BraceOpen | BracketOpen => {
                self.start_node(Name);
                self.skip_balanced();
                self.finish_node();
                true
            }
            _ => {
                self.error(DiagnosticKind::ExpectedIdentifier);
                false
            }
        }
    }

    pub(super) fn parse_module_specifier(&mut self) {
        if self.currently_is(StringLiteral) {
            self.start_node(ModuleSpecifier);
            self.bump();
            self.finish_node();
        } else {
            self.error(DiagnosticKind::ExpectedStringLiteral);
        }
    }

    /// `(` ... `)`, `[` ... `]` or `{` ... `}` as raw tokens, nested groups included.
    pub(super) fn skip_balanced(&mut self) {
        let mut depth = 0u32;
        while !self.should_stop() {
            match self.current() {
                ParenOpen | BracketOpen | BraceOpen => depth += 1,
                ParenClose | BracketClose | BraceClose => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.bump();
            if depth == 0 {
                return;
            }
        }
        self.error(DiagnosticKind::ExpectedToken);
    }

    /// Consumes an expression as raw tokens, balancing brackets.
    ///
    /// Stops before a `stop` token at depth zero, before an unbalanced closing
    /// bracket, and where automatic semicolon insertion ends the statement: a
    /// line break between a token that can end an expression and one that
    /// cannot continue it. Returns whether anything was consumed.
    pub(super) fn skip_expression(&mut self, stop: TokenSet) -> bool {
        let mut depth = 0u32;
        let mut prev: Option<SyntaxKind> = None;
        while !self.should_stop() {
            let kind = self.current();
            if depth == 0 {
                if stop.contains(kind) || matches!(kind, ParenClose | BracketClose | BraceClose) {
                    break;
                }
                if prev.is_some_and(|p| ENDS_EXPRESSION.contains(p))
                    && self.has_preceding_line_break()
                    && !self.continues_expression()
                {
                    break;
                }
            }
            match kind {
                ParenOpen | BracketOpen | BraceOpen => depth += 1,
                ParenClose | BracketClose | BraceClose => depth -= 1,
                _ => {}
            }
            prev = Some(kind);
            self.bump();
        }
        prev.is_some()
    }

    fn continues_expression(&mut self) -> bool {
        if self.currently_is_one_of(CONTINUES_EXPRESSION) {
            return true;
        }
        self.current() == Ident
            && matches!(self.current_text(), "as" | "satisfies" | "instanceof")
    }

    /// Comma-separated list up to `close`. The opening token must already be consumed.
    pub(super) fn parse_comma_list(
        &mut self,
        close: SyntaxKind,
        close_text: &str,
        item: fn(&mut Self) -> bool,
    ) -> bool {
        while !self.should_stop() && !self.currently_is(close) {
            if !item(self) {
                self.skip_until(LIST_RECOVERY.union(TokenSet::new(&[Comma])));
            }
            if !self.eat_token(Comma) {
                break;
            }
        }
        self.expect(close, close_text)
    }
}
