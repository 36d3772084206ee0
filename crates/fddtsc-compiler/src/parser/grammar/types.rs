use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind::{self, *};
use crate::parser::cst::token_sets::{LIST_RECOVERY, STATEMENT_RECOVERY};

/// Contextual keywords that name intrinsic types.
pub(crate) const KEYWORD_TYPES: &[&str] = &[
    "any",
    "unknown",
    "string",
    "number",
    "bigint",
    "boolean",
    "symbol",
    "object",
    "never",
    "undefined",
    "intrinsic",
];

impl Parser<'_> {
    /// Type, including function, constructor and conditional types.
    pub(crate) fn parse_type(&mut self) -> bool {
        if !self.enter_recursion() {
            return false;
        }
        let parsed = self.parse_type_inner();
        self.exit_recursion();
        parsed
    }

    fn parse_type_inner(&mut self) -> bool {
        if self.is_start_of_function_type() {
            self.parse_function_type();
            return true;
        }
        if self.currently_is(KwNew) || (self.at_contextual("abstract") && self.next_is(KwNew)) {
            self.parse_constructor_type();
            return true;
        }

        let checkpoint = self.checkpoint();
        if !self.parse_union_type() {
            return false;
        }

        if !self.in_conditional_extends
            && self.currently_is(KwExtends)
            && !self.has_preceding_line_break()
        {
            self.start_node_at(checkpoint, ConditionalType);
            self.bump();
            self.in_conditional_extends = true;
            self.parse_type();
            self.in_conditional_extends = false;
            self.expect(Question, "?");
            self.parse_type();
            self.expect(Colon, ":");
            self.parse_type();
            self.finish_node();
        }
        true
    }

    /// Runs `f` with conditional types allowed again (inside brackets and the like).
    pub(super) fn allowing_conditional<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.in_conditional_extends, false);
        let out = f(self);
        self.in_conditional_extends = saved;
        out
    }

    fn is_start_of_function_type(&mut self) -> bool {
        match self.current() {
            Lt => true,
            ParenOpen => self.is_start_of_parenthesized_parameters(),
            _ => false,
        }
    }

    /// `(` followed by something only a parameter list can contain.
    fn is_start_of_parenthesized_parameters(&mut self) -> bool {
        match self.peek_nth(1) {
            ParenClose | DotDotDot => true,
            BraceOpen | BracketOpen => false,
            Ident | KwThis => {
                matches!(self.peek_nth(2), Colon | Comma | Question | Equals)
                    || (self.peek_nth(2) == ParenClose && self.peek_nth(3) == Arrow)
            }
            _ => false,
        }
    }

    fn parse_function_type(&mut self) {
        self.start_node(FunctionType);
        if self.currently_is(Lt) {
            self.parse_type_param_list();
        }
        self.parse_param_list();
        self.start_node(ReturnType);
        self.expect(Arrow, "=>");
        self.parse_type_or_predicate();
        self.finish_node();
        self.finish_node();
    }

    fn parse_constructor_type(&mut self) {
        self.start_node(ConstructorType);
        self.eat_contextual("abstract");
        self.bump();
        if self.currently_is(Lt) {
            self.parse_type_param_list();
        }
        self.parse_param_list();
        self.start_node(ReturnType);
        self.expect(Arrow, "=>");
        self.parse_type_or_predicate();
        self.finish_node();
        self.finish_node();
    }

    /// Return position: a type, `x is T`, `asserts x` or `asserts x is T`.
    pub(super) fn parse_type_or_predicate(&mut self) -> bool {
        let kind = self.current();
        let asserts = self.at_contextual("asserts")
            && matches!(self.peek_nth(1), Ident | KwThis)
            && !self.line_break_before_nth(1);
        let is_predicate = matches!(kind, Ident | KwThis)
            && self.peek_nth(1) == Ident
            && self.peek_nth_text(1) == "is"
            && !self.line_break_before_nth(1);

        if !asserts && !is_predicate {
            return self.parse_type();
        }

        self.start_node(TypePredicate);
        if asserts {
            self.bump();
        }
        self.start_node(Name);
        self.bump();
        self.finish_node();
        if self.eat_contextual("is") {
            self.parse_type();
        }
        self.finish_node();
        true
    }

    fn parse_union_type(&mut self) -> bool {
        self.parse_binary_type(Pipe, UnionType, Self::parse_intersection_type)
    }

    fn parse_intersection_type(&mut self) -> bool {
        self.parse_binary_type(Amp, IntersectionType, Self::parse_type_operator)
    }

    /// `A op B op C`, with an optional leading operator.
    fn parse_binary_type(
        &mut self,
        op: SyntaxKind,
        node: SyntaxKind,
        operand: fn(&mut Self) -> bool,
    ) -> bool {
        let checkpoint = self.checkpoint();
        let leading = self.currently_is(op);
        if leading {
            self.start_node(node);
            self.bump();
        }
        if !operand(self) {
            if leading {
                self.finish_node();
            }
            return leading;
        }
        if !self.currently_is(op) {
            if leading {
                self.finish_node();
            }
            return true;
        }
        if !leading {
            self.start_node_at(checkpoint, node);
        }
        while self.eat_token(op) {
            if !operand(self) {
                break;
            }
        }
        self.finish_node();
        true
    }

    /// `keyof T`, `readonly T[]`, `unique symbol`, `infer U`.
    fn parse_type_operator(&mut self) -> bool {
        if self.current() == Ident {
            let text = self.current_text();
            let operand_follows = !matches!(
                self.peek_nth(1),
                Comma | Semicolon | ParenClose | BracketClose | BraceClose | Gt | Equals | Colon
                    | Pipe | Amp | Question | Dot | Lt | Error
            );
            match text {
                "keyof" | "unique" | "readonly" if operand_follows => {
                    self.start_node(TypeOperator);
                    self.bump();
                    self.parse_type_operator();
                    self.finish_node();
                    return true;
                }
                "infer" if matches!(self.peek_nth(1), Ident) => {
                    self.start_node(InferType);
                    self.bump();
                    self.start_node(TypeParam);
                    self.parse_binding_name();
                    self.finish_node();
                    self.finish_node();
                    return true;
                }
                _ => {}
            }
        }
        self.parse_postfix_type()
    }

    /// Array types `T[]` and indexed access `T[K]`; a line break before `[` ends the type.
    fn parse_postfix_type(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        if !self.parse_primary_type() {
            return false;
        }
        while self.currently_is(BracketOpen) && !self.has_preceding_line_break() {
            if self.next_is(BracketClose) {
                self.start_node_at(checkpoint, ArrayType);
                self.bump();
                self.bump();
            } else {
                self.start_node_at(checkpoint, IndexedAccessType);
                self.bump();
                self.allowing_conditional(|p| p.parse_type());
                self.expect(BracketClose, "]");
            }
            self.finish_node();
        }
        true
    }

    fn parse_primary_type(&mut self) -> bool {
        match self.current() {
            Ident => {
                let text = self.current_text();
                if KEYWORD_TYPES.contains(&text) && !self.next_is(Dot) {
                    self.start_node(KeywordType);
                    self.bump();
                    self.finish_node();
                } else {
                    self.parse_type_reference();
                }
                true
            }
            KwVoid | KwNull => {
                self.start_node(KeywordType);
                self.bump();
                self.finish_node();
                true
            }
            KwThis => {
                self.start_node(ThisType);
                self.bump();
                self.finish_node();
                true
            }
            KwTrue | KwFalse | StringLiteral | NumberLiteral | BigIntLiteral
            | NoSubstitutionTemplate => {
                self.start_node(LiteralType);
                self.bump();
                self.finish_node();
                true
            }
            Minus if matches!(self.peek_nth(1), NumberLiteral | BigIntLiteral) => {
                self.start_node(LiteralType);
                self.bump();
                self.bump();
                self.finish_node();
                true
            }
            TemplateHead => {
                self.parse_template_literal_type();
                true
            }
            KwTypeof => {
                self.parse_type_query();
                true
            }
            BraceOpen => {
                if self.is_start_of_mapped_type() {
                    self.parse_mapped_type();
                } else {
                    self.parse_object_type();
                }
                true
            }
            BracketOpen => {
                self.parse_tuple_type();
                true
            }
            ParenOpen => {
                self.start_node(ParenType);
                self.bump();
                self.allowing_conditional(|p| p.parse_type());
                self.expect(ParenClose, ")");
                self.finish_node();
                true
            }
            _ => {
                if self.currently_is_one_of(LIST_RECOVERY.union(STATEMENT_RECOVERY))
                    || self.should_stop()
                {
                    self.error(DiagnosticKind::ExpectedType);
                } else {
                    self.error_and_bump(DiagnosticKind::ExpectedType);
                }
                false
            }
        }
    }

    /// `A.B.C<Args>`; type arguments must start on the same line.
    fn parse_type_reference(&mut self) {
        self.start_node(TypeRef);
        self.parse_entity_name();
        if self.currently_is(Lt) && !self.has_preceding_line_break() {
            self.parse_type_arg_list();
        }
        self.finish_node();
    }

    pub(super) fn parse_entity_name(&mut self) {
        self.start_node(EntityName);
        if self.current().is_identifier_like() {
            self.bump();
        } else {
            self.error(DiagnosticKind::ExpectedIdentifier);
        }
        while self.currently_is(Dot) {
            self.bump();
            if self.current().is_identifier_like() {
                self.bump();
            } else {
                self.error(DiagnosticKind::ExpectedIdentifier);
                break;
            }
        }
        self.finish_node();
    }

    pub(super) fn parse_type_arg_list(&mut self) {
        self.start_node(TypeArgList);
        self.bump();
        self.allowing_conditional(|p| p.parse_comma_list(Gt, ">", Self::parse_type));
        self.finish_node();
    }

    fn parse_type_query(&mut self) {
        self.start_node(TypeQuery);
        self.bump();
        self.parse_entity_name();
        if self.currently_is(Lt) && !self.has_preceding_line_break() {
            self.parse_type_arg_list();
        }
        self.finish_node();
    }

    /// `` `a${T}b${U}c` `` as head, spans of (type, middle/tail).
    fn parse_template_literal_type(&mut self) {
        self.start_node(TemplateLiteralType);
        self.bump();
        loop {
            self.start_node(TemplateSpan);
            self.allowing_conditional(|p| p.parse_type());
            let kind = self.current();
            let done = match kind {
                TemplateMiddle => false,
                TemplateTail => true,
                _ => {
                    self.error_msg(DiagnosticKind::ExpectedToken, "}");
                    self.finish_node();
                    break;
                }
            };
            self.bump();
            self.finish_node();
            if done {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_tuple_type(&mut self) {
        self.start_node(TupleType);
        self.bump();
        self.allowing_conditional(|p| p.parse_comma_list(BracketClose, "]", Self::parse_tuple_element));
        self.finish_node();
    }

    /// `T`, `T?`, `...T`, `name: T`, `name?: T`, `...name: T`.
    fn parse_tuple_element(&mut self) -> bool {
        let rest = self.currently_is(DotDotDot);
        let name_at = usize::from(rest);
        let named = self.peek_nth(name_at).is_identifier_like()
            && (self.peek_nth(name_at + 1) == Colon
                || (self.peek_nth(name_at + 1) == Question && self.peek_nth(name_at + 2) == Colon));

        if named {
            self.start_node(NamedTupleMember);
            self.eat_token(DotDotDot);
            self.start_node(Name);
            self.bump();
            self.finish_node();
            self.eat_token(Question);
            self.expect(Colon, ":");
            let parsed = self.parse_type();
            self.finish_node();
            return parsed;
        }

        if rest {
            self.start_node(RestType);
            self.bump();
            let parsed = self.parse_type();
            self.finish_node();
            return parsed;
        }

        let checkpoint = self.checkpoint();
        if !self.parse_type() {
            return false;
        }
        if self.currently_is(Question) {
            self.start_node_at(checkpoint, OptionalType);
            self.bump();
            self.finish_node();
        }
        true
    }

    /// `{` followed by `[K in`, `readonly [` or `+readonly`/`-readonly`.
    fn is_start_of_mapped_type(&mut self) -> bool {
        let mut i = 1;
        if matches!(self.peek_nth(i), Plus | Minus) {
            return self.peek_nth_text(i + 1) == "readonly";
        }
        if self.peek_nth(i) == Ident && self.peek_nth_text(i) == "readonly" {
            i += 1;
        }
        self.peek_nth(i) == BracketOpen
            && self.peek_nth(i + 1).is_identifier_like()
            && self.peek_nth(i + 2) == KwIn
    }

    /// `{ readonly [K in C as N]?: T }` with optional `+`/`-` modifiers.
    fn parse_mapped_type(&mut self) {
        self.start_node(MappedType);
        self.bump();
        self.allowing_conditional(|p| {
            if matches!(p.current(), Plus | Minus) {
                p.bump();
            }
            p.eat_contextual("readonly");
            p.expect(BracketOpen, "[");

            p.start_node(MappedTypeParam);
            p.start_node(Name);
            p.bump();
            p.finish_node();
            p.expect(KwIn, "in");
            p.parse_type();
            if p.eat_contextual("as") {
                p.parse_type();
            }
            p.finish_node();
            p.expect(BracketClose, "]");

            if matches!(p.current(), Plus | Minus) {
                p.bump();
                p.expect(Question, "?");
            } else {
                p.eat_token(Question);
            }
            if p.currently_is(Colon) {
                p.start_node(TypeAnnotation);
                p.bump();
                p.parse_type();
                p.finish_node();
            }
            if !p.eat_token(Semicolon) {
                p.eat_token(Comma);
            }
        });
        self.expect(BraceClose, "}");
        self.finish_node();
    }
}
