use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind::{self, *};
use crate::parser::cst::TokenSet;
use crate::parser::cst::token_sets::STATEMENT_RECOVERY;

/// Top-level declaration keywords the front end does not model.
const UNSUPPORTED_DECLARATIONS: &[(&str, &str)] = &[
    ("namespace", "Namespaces"),
    ("module", "Module declarations"),
    ("global", "Global augmentations"),
    ("abstract", "Classes"),
];

impl Parser<'_> {
    pub fn parse_root(&mut self) {
        self.start_node(Root);
        while !self.should_stop() {
            let before = self.pos;
            self.parse_statement();
            if self.pos == before && !self.should_stop() {
                self.error_and_bump(DiagnosticKind::DeclarationExpected);
            }
        }
        self.skip_trivia_to_buffer();
        self.drain_trivia();
        self.finish_node();
    }

    fn parse_statement(&mut self) {
        match self.current() {
            Semicolon => self.bump(),
            KwImport if !matches!(self.peek_nth(1), ParenOpen | Dot) => self.parse_import(),
            KwExport => match self.peek_nth(1) {
                BraceOpen | Star => self.parse_export_declaration(),
                Ident if self.peek_nth_text(1) == "type"
                    && matches!(self.peek_nth(2), BraceOpen | Star) =>
                {
                    self.parse_export_declaration()
                }
                Equals => self.parse_export_assignment(),
                KwDefault if !self.is_declaration_after_default() => self.parse_export_assignment(),
                _ => self.parse_declaration(),
            },
            _ => self.parse_declaration(),
        }
    }

    /// `export default` followed by something that declares a name.
    fn is_declaration_after_default(&mut self) -> bool {
        match self.peek_nth(2) {
            KwFunction | KwClass => true,
            Ident => {
                let text = self.peek_nth_text(2);
                text == "interface"
                    || text == "abstract"
                    || (text == "async" && self.peek_nth(3) == KwFunction)
            }
            _ => false,
        }
    }

    /// Declarations with optional `export`, `default` and `declare` modifiers.
    fn parse_declaration(&mut self) {
        let checkpoint = self.checkpoint();
        let mut has_modifiers = false;
        if self.eat_token(KwExport) {
            has_modifiers = true;
            self.eat_token(KwDefault);
        }
        if self.at_contextual("declare") && self.is_declare_modifier() {
            self.bump();
            has_modifiers = true;
        }

        let kind = self.declaration_kind();
        match kind {
            Some(TypeAliasDecl) => {
                self.start_node_at(checkpoint, TypeAliasDecl);
                self.parse_type_alias_rest();
            }
            Some(InterfaceDecl) => {
                self.start_node_at(checkpoint, InterfaceDecl);
                self.parse_interface_rest();
            }
            Some(FunctionDecl) => {
                self.start_node_at(checkpoint, FunctionDecl);
                self.parse_function_rest();
            }
            Some(VariableStatement) => {
                self.start_node_at(checkpoint, VariableStatement);
                self.parse_variable_statement_rest();
            }
            Some(UnsupportedDecl) => {
                self.start_node_at(checkpoint, UnsupportedDecl);
                self.parse_unsupported_rest();
            }
            _ if has_modifiers => {
                self.start_node_at(checkpoint, SyntaxKind::Error);
                self.error(DiagnosticKind::DeclarationExpected);
                self.skip_until(STATEMENT_RECOVERY);
            }
            _ => {
                self.start_node_at(checkpoint, ExpressionStmt);
                if !self.skip_expression(TokenSet::new(&[Semicolon])) {
                    self.error_and_bump(DiagnosticKind::DeclarationExpected);
                }
                self.eat_token(Semicolon);
            }
        }
        self.finish_node();
    }

    fn is_declare_modifier(&mut self) -> bool {
        !self.line_break_before_nth(1)
            && (matches!(self.peek_nth(1), KwConst | KwVar | KwFunction | KwClass | KwEnum)
                || (self.peek_nth(1) == Ident
                    && matches!(
                        self.peek_nth_text(1),
                        "type" | "interface" | "let" | "namespace" | "module" | "global" | "abstract"
                            | "async"
                    )))
    }

    /// Decides the declaration at the cursor, after modifiers.
    fn declaration_kind(&mut self) -> Option<SyntaxKind> {
        match self.current() {
            KwFunction => Some(FunctionDecl),
            KwConst if self.next_is(KwEnum) => Some(UnsupportedDecl),
            KwConst | KwVar => Some(VariableStatement),
            KwClass | KwEnum => Some(UnsupportedDecl),
            Ident => {
                let next = self.peek_nth(1);
                let same_line = !self.line_break_before_nth(1);
                match self.current_text() {
                    "type" if next == Ident && same_line => Some(TypeAliasDecl),
                    "interface" if next == Ident && same_line => Some(InterfaceDecl),
                    "let" if matches!(next, Ident | BraceOpen | BracketOpen) => {
                        Some(VariableStatement)
                    }
                    "async" if next == KwFunction && same_line => Some(FunctionDecl),
                    text if same_line
                        && matches!(next, Ident | StringLiteral | BraceOpen | KwClass)
                        && UNSUPPORTED_DECLARATIONS.iter().any(|(kw, _)| *kw == text) =>
                    {
                        Some(UnsupportedDecl)
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// `type Name<T> = Type;`
    fn parse_type_alias_rest(&mut self) {
        self.bump();
        self.parse_binding_name();
        if self.currently_is(Lt) {
            self.parse_type_param_list();
        }
        if self.expect(Equals, "=") {
            self.parse_type();
        }
        self.eat_token(Semicolon);
    }

    /// `interface Name<T> extends A, B<C> { ... }`
    fn parse_interface_rest(&mut self) {
        self.bump();
        self.parse_binding_name();
        if self.currently_is(Lt) {
            self.parse_type_param_list();
        }
        if self.currently_is(KwExtends) {
            self.start_node(HeritageClause);
            self.bump();
            loop {
                self.start_node(TypeRef);
                self.parse_entity_name();
                if self.currently_is(Lt) {
                    self.parse_type_arg_list();
                }
                self.finish_node();
                if !self.eat_token(Comma) {
                    break;
                }
            }
            self.finish_node();
        }
        self.parse_object_type();
    }

    /// `async function name<T>(params): R { body }` or an overload ending in `;`.
    fn parse_function_rest(&mut self) {
        self.eat_contextual("async");
        self.bump();
        if self.eat_token(Star) {
            self.error_msg(DiagnosticKind::UnsupportedSyntax, "Generator functions");
        }
        if self.currently_is(Ident) {
            self.parse_binding_name();
        }
        if self.currently_is(Lt) {
            self.parse_type_param_list();
        }
        self.parse_param_list();
        if self.currently_is(Colon) {
            self.parse_return_type();
        }
        if self.currently_is(BraceOpen) {
            self.start_node(FunctionBody);
            self.skip_balanced();
            self.finish_node();
        } else {
            self.eat_token(Semicolon);
        }
    }

    /// `const a: T = init, b = init;`
    fn parse_variable_statement_rest(&mut self) {
        self.bump();
        loop {
            self.start_node(VariableDecl);
            if matches!(self.current(), BraceOpen | BracketOpen) {
                self.error_msg(DiagnosticKind::UnsupportedSyntax, "Destructuring declarations");
                self.skip_balanced();
            } else {
                self.parse_binding_name();
            }
            self.eat_token(Bang);
            if self.currently_is(Colon) {
                self.parse_type_annotation();
            }
            if self.currently_is(Equals) {
                self.start_node(Initializer);
                self.bump();
                if !self.skip_expression(TokenSet::new(&[Comma, Semicolon])) {
                    self.error(DiagnosticKind::UnsupportedSyntax);
                }
                self.finish_node();
            }
            self.finish_node();
            if !self.eat_token(Comma) {
                break;
            }
        }
        self.eat_token(Semicolon);
    }

    /// Classes, enums and namespaces: reported, then skipped up to the end of their body.
    fn parse_unsupported_rest(&mut self) {
        let what = match self.current() {
            KwClass => "Classes",
            KwEnum => "Enums",
            KwConst => "Enums",
            _ => {
                let text = self.current_text();
                UNSUPPORTED_DECLARATIONS
                    .iter()
                    .find(|(kw, _)| *kw == text)
                    .map_or("Declarations", |(_, what)| *what)
            }
        };
        self.error_msg(DiagnosticKind::UnsupportedSyntax, what);
        while !self.should_stop() && !self.currently_is(BraceOpen) && !self.currently_is(Semicolon) {
            self.bump();
        }
        if self.currently_is(BraceOpen) {
            self.skip_balanced();
        } else {
            self.eat_token(Semicolon);
        }
    }

    /// `import d, * as ns from "m"`, `import type { a, b as c } from "m"`, `import "m"`.
    fn parse_import(&mut self) {
        self.assert_current(KwImport);
        self.start_node(ImportDecl);
        self.bump();

        if self.currently_is(StringLiteral) {
            self.parse_module_specifier();
            self.eat_token(Semicolon);
            self.finish_node();
            return;
        }

        if self.at_contextual("type") && self.is_type_only_import() {
            self.bump();
        }

        self.start_node(ImportClause);
        if self.current() == Ident {
            self.parse_binding_name();
            if self.currently_is(Equals) {
                self.error_msg(DiagnosticKind::UnsupportedSyntax, "Import assignments");
                self.finish_node();
                self.skip_expression(TokenSet::new(&[Semicolon]));
                self.eat_token(Semicolon);
                self.finish_node();
                return;
            }
            self.eat_token(Comma);
        }
        match self.current() {
            Star => {
                self.start_node(NamespaceImport);
                self.bump();
                if !self.eat_contextual("as") {
                    self.error_msg(DiagnosticKind::ExpectedToken, "as");
                }
                self.parse_binding_name();
                self.finish_node();
            }
            BraceOpen => {
                self.start_node(NamedImports);
                self.bump();
                self.parse_comma_list(BraceClose, "}", Self::parse_import_specifier);
                self.finish_node();
            }
            _ => {}
        }
        self.finish_node();

        if !self.eat_contextual("from") {
            self.error_msg(DiagnosticKind::ExpectedToken, "from");
        }
        self.parse_module_specifier();
        self.skip_import_attributes();
        self.eat_token(Semicolon);
        self.finish_node();
    }

    /// `type` after `import` is a modifier unless it is the default binding itself.
    fn is_type_only_import(&mut self) -> bool {
        match self.peek_nth(1) {
            BraceOpen | Star => true,
            Ident => self.peek_nth_text(1) != "from" || self.peek_nth(2) == Ident,
            _ => false,
        }
    }

    /// `with { type: "json" }`
    fn skip_import_attributes(&mut self) {
        if (self.at_contextual("with") || self.at_contextual("assert"))
            && self.next_is(BraceOpen)
            && !self.has_preceding_line_break()
        {
            self.start_node(SyntaxKind::Error);
            self.bump();
            self.skip_balanced();
            self.finish_node();
        }
    }

    /// `[type] name [as alias]`
    fn parse_import_specifier(&mut self) -> bool {
        self.parse_specifier(ImportSpecifier)
    }

    fn parse_export_specifier(&mut self) -> bool {
        self.parse_specifier(ExportSpecifier)
    }

    fn parse_specifier(&mut self, kind: SyntaxKind) -> bool {
        self.start_node(kind);
        let next = self.peek_nth(1);
        if self.at_contextual("type")
            && (next.is_identifier_like() || next == StringLiteral)
            && (self.peek_nth_text(1) != "as" || self.peek_nth_text(2) == "as")
        {
            self.bump();
        }
        let ok = self.parse_specifier_name();
        if self.eat_contextual("as") {
            self.parse_specifier_name();
        }
        self.finish_node();
        ok
    }

    fn parse_specifier_name(&mut self) -> bool {
        let kind = self.current();
        if kind.is_identifier_like() || kind == StringLiteral {
            self.start_node(Name);
            self.bump();
            self.finish_node();
            true
        } else {
            self.error(DiagnosticKind::ExpectedIdentifier);
            false
        }
    }

    /// `export { a, b as c } [from "m"]`, `export * [as ns] from "m"`.
    fn parse_export_declaration(&mut self) {
        self.assert_current(KwExport);
        self.start_node(ExportDecl);
        self.bump();
        self.eat_contextual("type");
        if self.currently_is(Star) {
            self.start_node(ExportStar);
            self.bump();
            if self.eat_contextual("as") {
                self.parse_specifier_name();
            }
            self.finish_node();
            if !self.eat_contextual("from") {
                self.error_msg(DiagnosticKind::ExpectedToken, "from");
            }
            self.parse_module_specifier();
        } else {
            self.start_node(NamedExports);
            self.bump();
            self.parse_comma_list(BraceClose, "}", Self::parse_export_specifier);
            self.finish_node();
            if self.eat_contextual("from") {
                self.parse_module_specifier();
            }
        }
        self.skip_import_attributes();
        self.eat_token(Semicolon);
        self.finish_node();
    }

    /// `export = expr;` or `export default expr;`
    fn parse_export_assignment(&mut self) {
        self.start_node(ExportAssignment);
        self.bump();
        self.bump();
        self.start_node(Initializer);
        if !self.skip_expression(TokenSet::new(&[Semicolon])) {
            self.error(DiagnosticKind::UnsupportedSyntax);
        }
        self.finish_node();
        self.eat_token(Semicolon);
        self.finish_node();
    }
}
