//! Types of declared values, for `typeof` queries and variable emission.
//!
//! Only what the declaration subset can state is known: annotations, literal
//! initializers and function signatures. Anything else is `any`.

use fddtsc_core::utils::parse_numeric_literal;

use super::Checker;
use super::lower::{bigint_digits, template_text};
use super::types::{TypeId, TypeKind};
use crate::parser::SyntaxKind;
use crate::parser::ast::{DeclarationKeyword, Initializer, VariableDecl, VariableStatement, string_literal_value};
use crate::program::{SymbolFlags, SymbolId};
use crate::source_map::SourceId;

impl<'p> Checker<'p> {
    pub(crate) fn type_of_value_symbol(&self, symbol: SymbolId) -> TypeId {
        let data = self.symbols().get(symbol);
        if data.flags.intersects(SymbolFlags::FUNCTION) {
            return self.intern(TypeKind::FunctionValue(symbol));
        }
        let Some(declaration) = data.declarations_of(SyntaxKind::VariableDecl).next() else {
            return TypeId::ANY;
        };
        let Some(decl) = VariableDecl::cast(declaration.node.clone()) else {
            return TypeId::ANY;
        };
        let keyword = declaration
            .node
            .parent()
            .and_then(VariableStatement::cast)
            .map(|s| s.keyword())
            .unwrap_or(DeclarationKeyword::Var);
        self.variable_type(declaration.file, &decl, keyword)
            .unwrap_or(TypeId::ANY)
    }

    /// Declared type of a variable: its annotation, or the type of a literal
    /// initializer (widened unless `const`). `None` when neither exists.
    pub fn variable_type(&self, file: SourceId, decl: &VariableDecl, keyword: DeclarationKeyword) -> Option<TypeId> {
        if let Some(ty) = decl.type_annotation().and_then(|a| a.ty()) {
            return Some(self.type_from_type_node(file, &ty));
        }
        let literal = self.literal_initializer_type(&decl.initializer()?)?;
        if keyword == DeclarationKeyword::Const {
            Some(literal)
        } else {
            Some(self.widen_literal(literal))
        }
    }

    /// Type of an initializer that is a single literal, optionally negated
    /// or followed by `as const`.
    pub fn literal_initializer_type(&self, initializer: &Initializer) -> Option<TypeId> {
        let tokens = initializer.expression_tokens();
        let mut tokens: &[_] = &tokens;
        if let [rest @ .., as_kw, const_kw] = tokens
            && as_kw.text() == "as"
            && const_kw.kind() == SyntaxKind::KwConst
        {
            tokens = rest;
        }
        let (negative, token) = match tokens {
            [token] => (false, token),
            [minus, token] if minus.kind() == SyntaxKind::Minus => (true, token),
            _ => return None,
        };
        let ty = match token.kind() {
            SyntaxKind::StringLiteral if !negative => self.string_literal(&string_literal_value(token.text())),
            SyntaxKind::NoSubstitutionTemplate if !negative => self.string_literal(&template_text(token.text())),
            SyntaxKind::NumberLiteral => {
                let value = parse_numeric_literal(token.text())?;
                self.number_literal(if negative { -value } else { value })
            }
            SyntaxKind::BigIntLiteral => {
                let digits = bigint_digits(token.text());
                if negative && digits != "0" {
                    self.bigint_literal(&format!("-{digits}"))
                } else {
                    self.bigint_literal(&digits)
                }
            }
            SyntaxKind::KwTrue if !negative => TypeId::TRUE,
            SyntaxKind::KwFalse if !negative => TypeId::FALSE,
            SyntaxKind::KwNull if !negative => TypeId::NULL,
            SyntaxKind::Ident if !negative && token.text() == "undefined" => TypeId::UNDEFINED,
            _ => return None,
        };
        Some(ty)
    }

    /// Literal types widened to their primitive, as `let` declarations see them.
    pub fn widen_literal(&self, ty: TypeId) -> TypeId {
        match self.kind(ty) {
            TypeKind::StringLiteral(_) => TypeId::STRING,
            TypeKind::NumberLiteral(_) => TypeId::NUMBER,
            TypeKind::BigIntLiteral(_) => TypeId::BIGINT,
            TypeKind::True | TypeKind::False => TypeId::BOOLEAN,
            TypeKind::Null | TypeKind::Undefined if !self.strict_null_checks => TypeId::ANY,
            TypeKind::Union(members) => {
                let widened = members.iter().map(|&m| self.widen_literal(m)).collect();
                self.get_union(widened)
            }
            _ => ty,
        }
    }
}
