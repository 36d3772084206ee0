use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind::*;
use crate::parser::cst::TokenSet;
use crate::parser::cst::token_sets::MEMBER_RECOVERY;

impl Parser<'_> {
    /// `{ member; member, member }`. Also used for interface bodies.
    pub(super) fn parse_object_type(&mut self) {
        self.start_node(ObjectType);
        self.expect(BraceOpen, "{");
        self.allowing_conditional(|p| {
            while !p.should_stop() && !p.currently_is(BraceClose) {
                if !p.parse_type_member() {
                    p.skip_until(MEMBER_RECOVERY);
                }
                if !p.eat_token(Semicolon)
                    && !p.eat_token(Comma)
                    && !p.currently_is(BraceClose)
                    && !p.has_preceding_line_break()
                {
                    p.error_msg(DiagnosticKind::ExpectedToken, ";");
                }
            }
        });
        self.expect(BraceClose, "}");
        self.finish_node();
    }

    fn parse_type_member(&mut self) -> bool {
        match self.current() {
            ParenOpen | Lt => {
                self.start_node(CallSig);
                self.parse_signature_rest();
                self.finish_node();
                return true;
            }
            KwNew if matches!(self.peek_nth(1), ParenOpen | Lt) => {
                self.start_node(ConstructSig);
                self.bump();
                self.parse_signature_rest();
                self.finish_node();
                return true;
            }
            _ => {}
        }

        let checkpoint = self.checkpoint();
        let mut modifiers = 0;
        while self.at_contextual("readonly") && self.is_member_modifier_followed_by_name() {
            self.bump();
            modifiers += 1;
        }

        if self.is_index_signature() {
            self.start_node_at(checkpoint, IndexSig);
            self.bump();
            self.start_node(Param);
            self.parse_binding_name();
            self.parse_type_annotation();
            self.finish_node();
            self.expect(BracketClose, "]");
            self.parse_type_annotation();
            self.finish_node();
            return true;
        }

        if !self.is_property_name_start() {
            if modifiers > 0 {
                self.start_node_at(checkpoint, PropertySig);
                self.error(DiagnosticKind::ExpectedIdentifier);
                self.finish_node();
            } else {
                self.error(DiagnosticKind::ExpectedIdentifier);
            }
            return false;
        }

        // The member kind is only known after the name and optional `?`.
        self.parse_property_name();
        self.eat_token(Question);
        if matches!(self.current(), ParenOpen | Lt) {
            self.start_node_at(checkpoint, MethodSig);
            self.parse_signature_rest();
        } else {
            self.start_node_at(checkpoint, PropertySig);
            if self.currently_is(Colon) {
                self.parse_type_annotation();
            }
        }
        self.finish_node();
        true
    }

    fn is_property_name_start(&mut self) -> bool {
        let kind = self.current();
        kind.is_identifier_like() || matches!(kind, StringLiteral | NumberLiteral | BracketOpen)
    }

    fn is_member_modifier_followed_by_name(&mut self) -> bool {
        let next = self.peek_nth(1);
        (next.is_identifier_like() || matches!(next, StringLiteral | NumberLiteral | BracketOpen))
            && !self.line_break_before_nth(1)
    }

    /// `[name: K]: T`
    fn is_index_signature(&mut self) -> bool {
        self.currently_is(BracketOpen)
            && self.peek_nth(1).is_identifier_like()
            && self.peek_nth(2) == Colon
    }

    /// `<T>(params): R` after any leading keyword of a call, construct or method signature.
    fn parse_signature_rest(&mut self) {
        if self.currently_is(Lt) {
            self.parse_type_param_list();
        }
        self.parse_param_list();
        if self.currently_is(Colon) {
            self.parse_return_type();
        }
    }

    /// `: T` wrapped in `TypeAnnotation`.
    pub(super) fn parse_type_annotation(&mut self) -> bool {
        self.start_node(TypeAnnotation);
        let ok = self.expect(Colon, ":") && self.parse_type();
        self.finish_node();
        ok
    }

    /// `: T` or `: x is T` wrapped in `ReturnType`.
    pub(super) fn parse_return_type(&mut self) {
        self.start_node(ReturnType);
        if self.expect(Colon, ":") {
            self.parse_type_or_predicate();
        }
        self.finish_node();
    }

    pub(super) fn parse_param_list(&mut self) {
        self.start_node(ParamList);
        if self.expect(ParenOpen, "(") {
            self.allowing_conditional(|p| p.parse_comma_list(ParenClose, ")", Self::parse_param));
        }
        self.finish_node();
    }

    /// `...name?: T = init`, accessibility modifiers rejected.
    fn parse_param(&mut self) -> bool {
        if self.current() == Ident
            && matches!(
                self.current_text(),
                "public" | "private" | "protected" | "readonly" | "override"
            )
            && matches!(self.peek_nth(1), Ident | BraceOpen | BracketOpen)
        {
            self.error_msg(DiagnosticKind::UnsupportedSyntax, "Parameter properties");
        }

        self.start_node(Param);
        self.eat_token(DotDotDot);
        let named = self.parse_parameter_name();
        self.eat_token(Question);
        if self.currently_is(Colon) {
            self.parse_type_annotation();
        }
        if self.currently_is(Equals) {
            self.start_node(Initializer);
            self.bump();
            self.skip_expression(TokenSet::new(&[Comma]));
            self.finish_node();
        }
        self.finish_node();
        named
    }

    pub(super) fn parse_type_param_list(&mut self) {
        self.start_node(TypeParamList);
        self.bump();
        self.allowing_conditional(|p| p.parse_comma_list(Gt, ">", Self::parse_type_param));
        self.finish_node();
    }

    /// `const T extends C = D`; `in`/`out` variance modifiers accepted.
    fn parse_type_param(&mut self) -> bool {
        self.start_node(TypeParam);
        while matches!(self.current(), KwConst | KwIn)
            || (self.at_contextual("out") && self.peek_nth(1) == Ident)
        {
            self.bump();
        }
        let named = self.parse_binding_name();
        if self.currently_is(KwExtends) {
            self.start_node(Constraint);
            self.bump();
            self.parse_type();
            self.finish_node();
        }
        if self.currently_is(Equals) {
            self.start_node(DefaultType);
            self.bump();
            self.parse_type();
            self.finish_node();
        }
        self.finish_node();
        named
    }
}
