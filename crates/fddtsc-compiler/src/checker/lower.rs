//! Lowering type nodes to types.
//!
//! Lowering is generic: a node inside `type Box<T> = { v: T }` lowers once,
//! with `T` as a type parameter, and references instantiate the result.
//! Results are cached per node.

use fddtsc_core::utils::{parse_numeric_literal, unescape_string};

use super::scope::Meaning;
use super::types::{AliasRef, ElementKind, StringMapping, TupleElement, TypeId, TypeKind};
use super::{AliasState, Checker};
use crate::diagnostics::{DiagnosticKind, Span};
use crate::parser::SyntaxKind;
use crate::parser::ast::{self, TupleElement as TupleElementNode, TypeAliasDecl, string_literal_value};
use crate::program::{NodeKey, SymbolFlags, SymbolId};
use crate::source_map::SourceId;

impl<'p> Checker<'p> {
    /// The type a type node denotes, in the node's lexical scope.
    pub fn type_from_type_node(&self, file: SourceId, node: &ast::Type) -> TypeId {
        let key = NodeKey::of(file, node.as_cst());
        if let Some(&ty) = self.node_types.borrow().get(&key) {
            return ty;
        }
        let ty = self.lower(file, node);
        self.node_types.borrow_mut().insert(key, ty);
        ty
    }

    /// Lowers an optional node; a missing node (a syntax error) is the error type.
    pub(crate) fn type_from_optional(&self, file: SourceId, node: Option<ast::Type>) -> TypeId {
        node.map(|n| self.type_from_type_node(file, &n))
            .unwrap_or(TypeId::ERROR)
    }

    fn lower(&self, file: SourceId, node: &ast::Type) -> TypeId {
        let key = || NodeKey::of(file, node.as_cst());
        match node {
            ast::Type::Keyword(keyword) => keyword_type(&keyword.keyword()),
            ast::Type::Literal(literal) => self.literal_type(literal),
            ast::Type::TemplateLiteral(template) => {
                let mut texts = vec![template.head().map(|h| template_text(h.text())).unwrap_or_default()];
                let mut types = Vec::new();
                for span in template.spans() {
                    types.push(self.type_from_optional(file, span.ty()));
                    texts.push(span.literal().map(|l| template_text(l.text())).unwrap_or_default());
                }
                self.get_template_literal(texts, types)
            }
            ast::Type::Reference(reference) => self.type_from_reference(file, reference),
            ast::Type::Union(union) => {
                let types = union.types().map(|t| self.type_from_type_node(file, &t)).collect();
                self.get_union(types)
            }
            ast::Type::Intersection(intersection) => {
                let types = intersection
                    .types()
                    .map(|t| self.type_from_type_node(file, &t))
                    .collect();
                self.get_intersection(types)
            }
            ast::Type::Array(array) => {
                let element = self.type_from_optional(file, array.element());
                self.array_type(element, false)
            }
            ast::Type::Tuple(tuple) => self.lower_tuple(file, tuple, false),
            ast::Type::Paren(paren) => self.type_from_optional(file, paren.inner()),
            ast::Type::Function(_) | ast::Type::Constructor(_) | ast::Type::Object(_) => {
                self.intern(TypeKind::Anonymous {
                    decl: key(),
                    mapper: None,
                })
            }
            ast::Type::Mapped(_) => self.resolve_mapped(key(), None),
            ast::Type::IndexedAccess(access) => {
                let object = self.type_from_optional(file, access.object());
                let index = self.type_from_optional(file, access.index());
                self.get_indexed_access(object, index)
            }
            ast::Type::Operator(operator) => match operator.operator().as_str() {
                "keyof" => {
                    let operand = self.type_from_optional(file, operator.ty());
                    self.get_index_type(operand)
                }
                "readonly" => match operator.ty() {
                    Some(ast::Type::Array(array)) => {
                        let element = self.type_from_optional(file, array.element());
                        self.array_type(element, true)
                    }
                    Some(ast::Type::Tuple(tuple)) => self.lower_tuple(file, &tuple, true),
                    other => self.type_from_optional(file, other),
                },
                _ => TypeId::SYMBOL,
            },
            ast::Type::Query(query) => match query.name() {
                Some(name) => self
                    .resolve_entity(file, &name, Meaning::Value, false)
                    .map(|symbol| self.type_of_value_symbol(symbol))
                    .unwrap_or(TypeId::ERROR),
                None => TypeId::ERROR,
            },
            ast::Type::Conditional(_) => self.resolve_conditional(key(), None),
            ast::Type::Infer(infer) => infer
                .type_param()
                .and_then(|p| self.symbols().node_symbol(NodeKey::of(file, p.as_cst())))
                .map(|symbol| self.param_type(symbol))
                .unwrap_or(TypeId::ERROR),
            ast::Type::This(_) => TypeId::THIS,
        }
    }

    fn literal_type(&self, literal: &ast::LiteralType) -> TypeId {
        let Some(token) = literal.literal() else {
            return TypeId::ERROR;
        };
        let negative = literal.is_negative();
        match token.kind() {
            SyntaxKind::StringLiteral => self.string_literal(&string_literal_value(token.text())),
            SyntaxKind::NoSubstitutionTemplate => self.string_literal(&template_text(token.text())),
            SyntaxKind::NumberLiteral => match parse_numeric_literal(token.text()) {
                Some(value) => self.number_literal(if negative { -value } else { value }),
                None => TypeId::ERROR,
            },
            SyntaxKind::BigIntLiteral => {
                let digits = bigint_digits(token.text());
                let digits = if negative && digits != "0" { format!("-{digits}") } else { digits };
                self.bigint_literal(&digits)
            }
            SyntaxKind::KwTrue => TypeId::TRUE,
            SyntaxKind::KwFalse => TypeId::FALSE,
            SyntaxKind::KwNull => TypeId::NULL,
            _ => TypeId::ERROR,
        }
    }

    fn lower_tuple(&self, file: SourceId, tuple: &ast::TupleType, readonly: bool) -> TypeId {
        let mut elements = Vec::new();
        for element in tuple.elements() {
            let (node, kind, name) = match element {
                TupleElementNode::Plain(t) => (Some(t), ElementKind::Required, None),
                TupleElementNode::Optional(o) => (o.ty(), ElementKind::Optional, None),
                TupleElementNode::Rest(r) => (r.ty(), ElementKind::Rest, None),
                TupleElementNode::Named(n) => {
                    let kind = if n.is_rest() {
                        ElementKind::Rest
                    } else if n.is_optional() {
                        ElementKind::Optional
                    } else {
                        ElementKind::Required
                    };
                    (n.ty(), kind, n.name().map(|n| n.text()))
                }
            };
            let ty = self.type_from_optional(file, node);
            if kind == ElementKind::Rest {
                self.push_spread(&mut elements, ty, name);
            } else {
                elements.push(TupleElement { ty, kind, name });
            }
        }
        self.intern(TypeKind::Tuple { elements, readonly })
    }

    /// Appends `...ty` to a tuple under construction.
    pub(crate) fn push_spread(&self, elements: &mut Vec<TupleElement>, ty: TypeId, name: Option<String>) {
        if let TypeKind::Tuple { elements: inner, .. } = self.kind(ty) {
            elements.extend(inner);
            return;
        }
        let (ty, kind) = match self.array_element_type(ty) {
            Some(element) => (element, ElementKind::Rest),
            None if self.is_generic(ty) => (ty, ElementKind::Variadic),
            None => (ty, ElementKind::Rest),
        };
        elements.push(TupleElement { ty, kind, name });
    }

    fn type_from_reference(&self, file: SourceId, reference: &ast::TypeRef) -> TypeId {
        let Some(name) = reference.name() else {
            return TypeId::ERROR;
        };
        let args: Vec<TypeId> = reference
            .type_args()
            .iter()
            .flat_map(|list| list.types())
            .map(|t| self.type_from_type_node(file, &t))
            .collect();
        match self.resolve_entity(file, &name, Meaning::Type, false) {
            Some(symbol) => self.type_from_symbol_reference(symbol, args),
            None => TypeId::ERROR,
        }
    }

    /// `symbol<args>` for a type parameter, alias or interface symbol.
    pub(crate) fn type_from_symbol_reference(&self, symbol: SymbolId, args: Vec<TypeId>) -> TypeId {
        let flags = self.symbols().get(symbol).flags;
        if flags.intersects(SymbolFlags::TYPE_PARAMETER) {
            return self.param_type(symbol);
        }
        let params = self.declared_type_params(symbol);
        let required = params
            .iter()
            .filter(|&&p| self.param_default(p).is_none())
            .count();
        if args.len() > params.len() || args.len() < required {
            return TypeId::ERROR;
        }
        let args = self.fill_type_arguments(&params, args);
        if flags.intersects(SymbolFlags::TYPE_ALIAS) {
            self.alias_reference(symbol, &params, args)
        } else if flags.intersects(SymbolFlags::INTERFACE) {
            self.intern(TypeKind::Interface { symbol, args })
        } else {
            TypeId::ERROR
        }
    }

    fn alias_reference(&self, symbol: SymbolId, params: &[SymbolId], args: Vec<TypeId>) -> TypeId {
        let declared = self.declared_alias_type(symbol);
        if params.is_empty() {
            return declared;
        }
        let mapper = self.make_mapper(params.iter().copied().zip(args.iter().copied()).collect());
        let instantiated = self.instantiate(declared, mapper);
        self.attach_alias(instantiated, AliasRef { symbol, args })
    }

    /// Explicit arguments followed by defaults for the missing ones.
    pub(crate) fn fill_type_arguments(&self, params: &[SymbolId], mut args: Vec<TypeId>) -> Vec<TypeId> {
        args.truncate(params.len());
        for i in args.len()..params.len() {
            let filled = match self.param_default(params[i]) {
                Some(default) => {
                    let mapper = self.make_mapper(
                        params[..i].iter().copied().zip(args.iter().copied()).collect(),
                    );
                    self.instantiate(default, mapper)
                }
                None => TypeId::UNKNOWN,
            };
            args.push(filled);
        }
        args
    }

    /// Type parameters of an alias or interface symbol.
    pub(crate) fn declared_type_params(&self, symbol: SymbolId) -> Vec<SymbolId> {
        let declaration = self.symbols().get(symbol).declarations.iter().find(|d| {
            matches!(d.kind(), SyntaxKind::TypeAliasDecl | SyntaxKind::InterfaceDecl)
        });
        let Some(declaration) = declaration else {
            return Vec::new();
        };
        let list = declaration
            .node
            .children()
            .find_map(ast::TypeParamList::cast);
        self.type_params_of(declaration.file, list)
    }

    fn type_param_node(&self, param: SymbolId) -> Option<(SourceId, ast::TypeParam)> {
        let declaration = self.symbols().get(param).declarations.first()?;
        Some((declaration.file, ast::TypeParam::cast(declaration.node.clone())?))
    }

    pub(crate) fn param_constraint(&self, param: SymbolId) -> Option<TypeId> {
        let symbol = self.symbols().get(param);
        let declaration = symbol.declarations.first()?;
        if let Some(mapped) = ast::MappedTypeParam::cast(declaration.node.clone()) {
            return mapped
                .constraint()
                .map(|c| self.type_from_type_node(declaration.file, &c));
        }
        let (file, node) = self.type_param_node(param)?;
        node.constraint().map(|c| self.type_from_type_node(file, &c))
    }

    pub(crate) fn param_default(&self, param: SymbolId) -> Option<TypeId> {
        let (file, node) = self.type_param_node(param)?;
        node.default().map(|d| self.type_from_type_node(file, &d))
    }

    /// The type an alias declaration denotes, with its own parameters free.
    pub(crate) fn declared_alias_type(&self, symbol: SymbolId) -> TypeId {
        let state = self.alias_states.borrow().get(&symbol).copied();
        match state {
            Some(AliasState::Resolved(ty)) => return ty,
            Some(AliasState::Resolving { .. }) => {
                self.alias_states
                    .borrow_mut()
                    .insert(symbol, AliasState::Resolving { circular: true });
                return TypeId::ERROR;
            }
            None => {}
        }
        self.alias_states
            .borrow_mut()
            .insert(symbol, AliasState::Resolving { circular: false });
        let mut ty = self.compute_alias_type(symbol);
        let circular = matches!(
            self.alias_states.borrow().get(&symbol),
            Some(AliasState::Resolving { circular: true })
        );
        if circular {
            let declaration = self.symbols().get(symbol).declarations_of(SyntaxKind::TypeAliasDecl).next();
            if let Some(declaration) = declaration {
                let name = &self.symbols().get(symbol).name;
                self.report(
                    DiagnosticKind::CircularAlias,
                    Span::new(declaration.file, declaration.name_range()),
                    &[name],
                );
            }
            ty = TypeId::ERROR;
        }
        self.alias_states
            .borrow_mut()
            .insert(symbol, AliasState::Resolved(ty));
        ty
    }

    fn compute_alias_type(&self, symbol: SymbolId) -> TypeId {
        let symbols = self.symbols();
        let Some(declaration) = symbols.get(symbol).declarations_of(SyntaxKind::TypeAliasDecl).next() else {
            return TypeId::ERROR;
        };
        let file = declaration.file;
        let Some(alias) = TypeAliasDecl::cast(declaration.node.clone()) else {
            return TypeId::ERROR;
        };
        let Some(body) = alias.ty() else {
            return TypeId::ERROR;
        };
        let params = self.type_params_of(file, alias.type_params());

        if let ast::Type::Keyword(keyword) = &body
            && keyword.keyword() == "intrinsic"
        {
            let mapping = StringMapping::from_name(&symbols.get(symbol).name)
                .filter(|_| self.program.source(file).is_default_lib());
            return match (mapping, params.first()) {
                (Some(mapping), Some(&param)) => self.intern(TypeKind::StringMapping {
                    mapping,
                    ty: self.param_type(param),
                }),
                _ => TypeId::ERROR,
            };
        }

        let ty = self.type_from_type_node(file, &body);
        if !names_alias(&body) {
            return ty;
        }
        let args = params.iter().map(|&p| self.param_type(p)).collect();
        self.attach_alias(ty, AliasRef { symbol, args })
    }

    /// `Array<element>` or `ReadonlyArray<element>`.
    pub(crate) fn array_type(&self, element: TypeId, readonly: bool) -> TypeId {
        let name = if readonly { "ReadonlyArray" } else { "Array" };
        match self.global_type(name) {
            Some(symbol) => self.intern(TypeKind::Interface {
                symbol,
                args: vec![element],
            }),
            None => TypeId::ERROR,
        }
    }

    pub(crate) fn global_type(&self, name: &str) -> Option<SymbolId> {
        self.symbols()
            .globals()
            .get(name)
            .copied()
            .filter(|&id| self.symbols().get(id).flags.intersects(SymbolFlags::TYPE))
    }

    /// Element type of an `Array` or `ReadonlyArray` instance.
    pub(crate) fn array_element_type(&self, ty: TypeId) -> Option<TypeId> {
        let TypeKind::Interface { symbol, args } = self.kind(ty) else {
            return None;
        };
        let is_array = ["Array", "ReadonlyArray"]
            .iter()
            .any(|name| self.global_type(name) == Some(symbol));
        if is_array { args.first().copied() } else { None }
    }

    pub(crate) fn is_readonly_array(&self, ty: TypeId) -> bool {
        matches!(self.kind(ty), TypeKind::Interface { symbol, .. } if self.global_type("ReadonlyArray") == Some(symbol))
    }
}

pub(crate) fn keyword_type(keyword: &str) -> TypeId {
    match keyword {
        "any" => TypeId::ANY,
        "unknown" => TypeId::UNKNOWN,
        "string" => TypeId::STRING,
        "number" => TypeId::NUMBER,
        "bigint" => TypeId::BIGINT,
        "boolean" => TypeId::BOOLEAN,
        "symbol" => TypeId::SYMBOL,
        "object" => TypeId::NON_PRIMITIVE,
        "never" => TypeId::NEVER,
        "undefined" => TypeId::UNDEFINED,
        "null" => TypeId::NULL,
        "void" => TypeId::VOID,
        _ => TypeId::ERROR,
    }
}

/// Whether an alias whose body is `body` names the type it produces.
/// References and keywords keep whatever alias they already carry.
fn names_alias(body: &ast::Type) -> bool {
    match body {
        ast::Type::Paren(paren) => paren.inner().as_ref().is_some_and(names_alias),
        ast::Type::Operator(operator) => operator.operator() == "keyof",
        ast::Type::Union(_)
        | ast::Type::Intersection(_)
        | ast::Type::Object(_)
        | ast::Type::Function(_)
        | ast::Type::Constructor(_)
        | ast::Type::Mapped(_)
        | ast::Type::Conditional(_)
        | ast::Type::IndexedAccess(_) => true,
        _ => false,
    }
}

/// Cooked text of a template piece: `` `a${ ``, `}b${`, `` }c` `` or `` `d` ``.
pub(crate) fn template_text(raw: &str) -> String {
    unescape_string(template_raw(raw))
}

/// Template piece without its delimiters, escapes intact.
pub(crate) fn template_raw(raw: &str) -> &str {
    let body = raw
        .strip_prefix('`')
        .or_else(|| raw.strip_prefix('}'))
        .unwrap_or(raw);
    body.strip_suffix("${")
        .or_else(|| body.strip_suffix('`'))
        .unwrap_or(body)
}

/// Decimal digits of a bigint literal (`0x10n` → `16`).
pub(crate) fn bigint_digits(text: &str) -> String {
    let body: String = text
        .trim_end_matches('n')
        .chars()
        .filter(|&c| c != '_')
        .collect();
    let lower = body.to_ascii_lowercase();
    let parsed = if let Some(hex) = lower.strip_prefix("0x") {
        u128::from_str_radix(hex, 16).ok()
    } else if let Some(oct) = lower.strip_prefix("0o") {
        u128::from_str_radix(oct, 8).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        u128::from_str_radix(bin, 2).ok()
    } else {
        lower.parse::<u128>().ok()
    };
    match parsed {
        Some(value) => value.to_string(),
        None => body.trim_start_matches('0').to_string(),
    }
}
