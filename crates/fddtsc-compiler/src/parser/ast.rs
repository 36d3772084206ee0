//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors.
//! Cast is infallible for correct `SyntaxKind` - validation happens elsewhere.

use fddtsc_core::utils::unescape_string;

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(Root, Root);
ast_node!(ImportDecl, ImportDecl);
ast_node!(ImportClause, ImportClause);
ast_node!(NamespaceImport, NamespaceImport);
ast_node!(NamedImports, NamedImports);
ast_node!(ImportSpecifier, ImportSpecifier);
ast_node!(ModuleSpecifier, ModuleSpecifier);
ast_node!(ExportDecl, ExportDecl);
ast_node!(NamedExports, NamedExports);
ast_node!(ExportSpecifier, ExportSpecifier);
ast_node!(ExportStar, ExportStar);
ast_node!(ExportAssignment, ExportAssignment);
ast_node!(TypeAliasDecl, TypeAliasDecl);
ast_node!(InterfaceDecl, InterfaceDecl);
ast_node!(HeritageClause, HeritageClause);
ast_node!(FunctionDecl, FunctionDecl);
ast_node!(VariableStatement, VariableStatement);
ast_node!(VariableDecl, VariableDecl);
ast_node!(Initializer, Initializer);
ast_node!(Name, Name);
ast_node!(TypeParamList, TypeParamList);
ast_node!(TypeParam, TypeParam);
ast_node!(ParamList, ParamList);
ast_node!(Param, Param);
ast_node!(TypeAnnotation, TypeAnnotation);
ast_node!(ReturnType, ReturnType);
ast_node!(TypeArgList, TypeArgList);
ast_node!(KeywordType, KeywordType);
ast_node!(LiteralType, LiteralType);
ast_node!(TemplateLiteralType, TemplateLiteralType);
ast_node!(TemplateSpan, TemplateSpan);
ast_node!(TypeRef, TypeRef);
ast_node!(EntityName, EntityName);
ast_node!(UnionType, UnionType);
ast_node!(IntersectionType, IntersectionType);
ast_node!(ArrayType, ArrayType);
ast_node!(TupleType, TupleType);
ast_node!(NamedTupleMember, NamedTupleMember);
ast_node!(OptionalType, OptionalType);
ast_node!(RestType, RestType);
ast_node!(ParenType, ParenType);
ast_node!(FunctionType, FunctionType);
ast_node!(ConstructorType, ConstructorType);
ast_node!(ObjectType, ObjectType);
ast_node!(PropertySig, PropertySig);
ast_node!(MethodSig, MethodSig);
ast_node!(CallSig, CallSig);
ast_node!(ConstructSig, ConstructSig);
ast_node!(IndexSig, IndexSig);
ast_node!(MappedType, MappedType);
ast_node!(MappedTypeParam, MappedTypeParam);
ast_node!(IndexedAccessType, IndexedAccessType);
ast_node!(TypeOperator, TypeOperator);
ast_node!(TypeQuery, TypeQuery);
ast_node!(ConditionalType, ConditionalType);
ast_node!(InferType, InferType);
ast_node!(TypePredicate, TypePredicate);
ast_node!(ThisType, ThisType);

fn tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .filter(|t| !t.kind().is_trivia())
}

fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    tokens(node).any(|t| t.kind() == kind)
}

fn has_contextual(node: &SyntaxNode, word: &str) -> bool {
    tokens(node).any(|t| t.kind() == SyntaxKind::Ident && t.text() == word)
}

fn child<N>(node: &SyntaxNode, cast: fn(SyntaxNode) -> Option<N>) -> Option<N> {
    node.children().find_map(cast)
}

/// Value of a quoted string literal token.
pub fn string_literal_value(text: &str) -> String {
    let body = text
        .get(1..text.len().saturating_sub(1))
        .unwrap_or_default();
    unescape_string(body)
}

/// Top-level statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    Import(ImportDecl),
    Export(ExportDecl),
    ExportAssignment(ExportAssignment),
    TypeAlias(TypeAliasDecl),
    Interface(InterfaceDecl),
    Function(FunctionDecl),
    Variable(VariableStatement),
}

impl Statement {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::ImportDecl => ImportDecl::cast(node).map(Statement::Import),
            SyntaxKind::ExportDecl => ExportDecl::cast(node).map(Statement::Export),
            SyntaxKind::ExportAssignment => {
                ExportAssignment::cast(node).map(Statement::ExportAssignment)
            }
            SyntaxKind::TypeAliasDecl => TypeAliasDecl::cast(node).map(Statement::TypeAlias),
            SyntaxKind::InterfaceDecl => InterfaceDecl::cast(node).map(Statement::Interface),
            SyntaxKind::FunctionDecl => FunctionDecl::cast(node).map(Statement::Function),
            SyntaxKind::VariableStatement => {
                VariableStatement::cast(node).map(Statement::Variable)
            }
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Statement::Import(n) => n.as_cst(),
            Statement::Export(n) => n.as_cst(),
            Statement::ExportAssignment(n) => n.as_cst(),
            Statement::TypeAlias(n) => n.as_cst(),
            Statement::Interface(n) => n.as_cst(),
            Statement::Function(n) => n.as_cst(),
            Statement::Variable(n) => n.as_cst(),
        }
    }
}

/// `export`, `default` and `declare` modifiers of a declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub export: bool,
    pub default: bool,
    pub declare: bool,
}

impl Modifiers {
    fn of(node: &SyntaxNode) -> Self {
        Self {
            export: has_token(node, SyntaxKind::KwExport),
            default: has_token(node, SyntaxKind::KwDefault),
            declare: has_contextual(node, "declare"),
        }
    }
}

impl Root {
    pub fn statements(&self) -> impl Iterator<Item = Statement> + '_ {
        self.0.children().filter_map(Statement::cast)
    }

    /// A file is a module when it has a top-level import or export.
    pub fn is_module(&self) -> bool {
        self.0.children().any(|n| match n.kind() {
            SyntaxKind::ImportDecl | SyntaxKind::ExportDecl | SyntaxKind::ExportAssignment => true,
            SyntaxKind::TypeAliasDecl
            | SyntaxKind::InterfaceDecl
            | SyntaxKind::FunctionDecl
            | SyntaxKind::VariableStatement
            | SyntaxKind::UnsupportedDecl => has_token(&n, SyntaxKind::KwExport),
            _ => false,
        })
    }
}

impl Name {
    pub fn token(&self) -> Option<SyntaxToken> {
        tokens(&self.0).next()
    }

    /// Identifier text, or the value of a string-literal name.
    pub fn text(&self) -> String {
        match self.token() {
            Some(t) if t.kind() == SyntaxKind::StringLiteral => string_literal_value(t.text()),
            Some(t) if t.kind() == SyntaxKind::BracketOpen || t.kind() == SyntaxKind::BraceOpen => {
                self.source_text()
            }
            Some(t) => t.text().to_string(),
            None => String::new(),
        }
    }

    pub fn is_string_literal(&self) -> bool {
        self.token()
            .is_some_and(|t| t.kind() == SyntaxKind::StringLiteral)
    }

    /// Computed names and binding patterns are kept as raw tokens.
    pub fn is_raw(&self) -> bool {
        self.token().is_some_and(|t| {
            matches!(t.kind(), SyntaxKind::BracketOpen | SyntaxKind::BraceOpen)
        })
    }

    /// Token texts joined by single spaces where the source had trivia.
    pub fn source_text(&self) -> String {
        let mut out = String::new();
        let mut pending_space = false;
        for element in self.0.descendants_with_tokens() {
            let Some(token) = element.into_token() else {
                continue;
            };
            if token.kind().is_trivia() {
                pending_space = !out.is_empty();
                continue;
            }
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push_str(token.text());
        }
        out
    }
}

impl ImportDecl {
    pub fn is_type_only(&self) -> bool {
        has_contextual(&self.0, "type")
    }

    pub fn clause(&self) -> Option<ImportClause> {
        child(&self.0, ImportClause::cast)
    }

    pub fn module_specifier(&self) -> Option<ModuleSpecifier> {
        child(&self.0, ModuleSpecifier::cast)
    }
}

impl ImportClause {
    pub fn default_name(&self) -> Option<Name> {
        child(&self.0, Name::cast)
    }

    pub fn namespace(&self) -> Option<NamespaceImport> {
        child(&self.0, NamespaceImport::cast)
    }

    pub fn named(&self) -> Option<NamedImports> {
        child(&self.0, NamedImports::cast)
    }
}

impl NamespaceImport {
    pub fn name(&self) -> Option<Name> {
        child(&self.0, Name::cast)
    }
}

impl NamedImports {
    pub fn specifiers(&self) -> impl Iterator<Item = ImportSpecifier> + '_ {
        self.0.children().filter_map(ImportSpecifier::cast)
    }
}

macro_rules! specifier_accessors {
    ($name:ident) => {
        impl $name {
            pub fn is_type_only(&self) -> bool {
                tokens(&self.0)
                    .next()
                    .is_some_and(|t| t.kind() == SyntaxKind::Ident && t.text() == "type")
            }

            /// Name in the other module (`a` in `a as b`).
            pub fn property_name(&self) -> Option<Name> {
                self.0.children().find_map(Name::cast)
            }

            /// Name in this module (`b` in `a as b`, `a` when not renamed).
            pub fn name(&self) -> Option<Name> {
                self.0.children().filter_map(Name::cast).last()
            }
        }
    };
}

specifier_accessors!(ImportSpecifier);
specifier_accessors!(ExportSpecifier);

impl ModuleSpecifier {
    pub fn value(&self) -> String {
        tokens(&self.0)
            .next()
            .map(|t| string_literal_value(t.text()))
            .unwrap_or_default()
    }
}

impl ExportDecl {
    pub fn is_type_only(&self) -> bool {
        has_contextual(&self.0, "type")
    }

    pub fn named_exports(&self) -> Option<NamedExports> {
        child(&self.0, NamedExports::cast)
    }

    pub fn export_star(&self) -> Option<ExportStar> {
        child(&self.0, ExportStar::cast)
    }

    pub fn module_specifier(&self) -> Option<ModuleSpecifier> {
        child(&self.0, ModuleSpecifier::cast)
    }
}

impl NamedExports {
    pub fn specifiers(&self) -> impl Iterator<Item = ExportSpecifier> + '_ {
        self.0.children().filter_map(ExportSpecifier::cast)
    }
}

impl ExportStar {
    /// `ns` in `export * as ns from "m"`.
    pub fn alias(&self) -> Option<Name> {
        child(&self.0, Name::cast)
    }
}

impl ExportAssignment {
    /// `export default x` rather than `export = x`.
    pub fn is_default(&self) -> bool {
        has_token(&self.0, SyntaxKind::KwDefault)
    }

    pub fn expression(&self) -> Option<Initializer> {
        child(&self.0, Initializer::cast)
    }
}

impl TypeAliasDecl {
    pub fn modifiers(&self) -> Modifiers {
        Modifiers::of(&self.0)
    }

    pub fn name(&self) -> Option<Name> {
        child(&self.0, Name::cast)
    }

    pub fn type_params(&self) -> Option<TypeParamList> {
        child(&self.0, TypeParamList::cast)
    }

    pub fn ty(&self) -> Option<Type> {
        child(&self.0, Type::cast)
    }
}

impl InterfaceDecl {
    pub fn modifiers(&self) -> Modifiers {
        Modifiers::of(&self.0)
    }

    pub fn name(&self) -> Option<Name> {
        child(&self.0, Name::cast)
    }

    pub fn type_params(&self) -> Option<TypeParamList> {
        child(&self.0, TypeParamList::cast)
    }

    pub fn heritage(&self) -> Option<HeritageClause> {
        child(&self.0, HeritageClause::cast)
    }

    pub fn body(&self) -> Option<ObjectType> {
        child(&self.0, ObjectType::cast)
    }
}

impl HeritageClause {
    pub fn types(&self) -> impl Iterator<Item = TypeRef> + '_ {
        self.0.children().filter_map(TypeRef::cast)
    }
}

impl FunctionDecl {
    pub fn modifiers(&self) -> Modifiers {
        Modifiers::of(&self.0)
    }

    pub fn is_async(&self) -> bool {
        has_contextual(&self.0, "async")
    }

    pub fn name(&self) -> Option<Name> {
        child(&self.0, Name::cast)
    }

    pub fn type_params(&self) -> Option<TypeParamList> {
        child(&self.0, TypeParamList::cast)
    }

    pub fn params(&self) -> Option<ParamList> {
        child(&self.0, ParamList::cast)
    }

    pub fn return_type(&self) -> Option<ReturnType> {
        child(&self.0, ReturnType::cast)
    }

    pub fn has_body(&self) -> bool {
        self.0
            .children()
            .any(|n| n.kind() == SyntaxKind::FunctionBody)
    }
}

/// `const`, `let` or `var`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKeyword {
    Const,
    Let,
    Var,
}

impl DeclarationKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclarationKeyword::Const => "const",
            DeclarationKeyword::Let => "let",
            DeclarationKeyword::Var => "var",
        }
    }
}

impl VariableStatement {
    pub fn modifiers(&self) -> Modifiers {
        Modifiers::of(&self.0)
    }

    pub fn keyword(&self) -> DeclarationKeyword {
        for t in tokens(&self.0) {
            match t.kind() {
                SyntaxKind::KwConst => return DeclarationKeyword::Const,
                SyntaxKind::KwVar => return DeclarationKeyword::Var,
                SyntaxKind::Ident if t.text() == "let" => return DeclarationKeyword::Let,
                _ => {}
            }
        }
        DeclarationKeyword::Var
    }

    pub fn declarations(&self) -> impl Iterator<Item = VariableDecl> + '_ {
        self.0.children().filter_map(VariableDecl::cast)
    }
}

impl VariableDecl {
    pub fn name(&self) -> Option<Name> {
        child(&self.0, Name::cast)
    }

    pub fn type_annotation(&self) -> Option<TypeAnnotation> {
        child(&self.0, TypeAnnotation::cast)
    }

    pub fn initializer(&self) -> Option<Initializer> {
        child(&self.0, Initializer::cast)
    }
}

impl Initializer {
    /// Expression tokens, without the leading `=` and trivia.
    pub fn expression_tokens(&self) -> Vec<SyntaxToken> {
        self.0
            .descendants_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| !t.kind().is_trivia())
            .skip_while(|t| t.kind() == SyntaxKind::Equals)
            .collect()
    }
}

impl TypeParamList {
    pub fn params(&self) -> impl Iterator<Item = TypeParam> + '_ {
        self.0.children().filter_map(TypeParam::cast)
    }
}

impl TypeParam {
    pub fn name(&self) -> Option<Name> {
        child(&self.0, Name::cast)
    }

    pub fn is_const(&self) -> bool {
        has_token(&self.0, SyntaxKind::KwConst)
    }

    pub fn constraint(&self) -> Option<Type> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::Constraint)
            .and_then(|n| child(&n, Type::cast))
    }

    pub fn default(&self) -> Option<Type> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::DefaultType)
            .and_then(|n| child(&n, Type::cast))
    }
}

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        self.0.children().filter_map(Param::cast)
    }
}

impl Param {
    pub fn is_rest(&self) -> bool {
        has_token(&self.0, SyntaxKind::DotDotDot)
    }

    pub fn is_optional(&self) -> bool {
        has_token(&self.0, SyntaxKind::Question)
    }

    pub fn name(&self) -> Option<Name> {
        child(&self.0, Name::cast)
    }

    pub fn is_this(&self) -> bool {
        self.name()
            .and_then(|n| n.token())
            .is_some_and(|t| t.kind() == SyntaxKind::KwThis)
    }

    pub fn type_annotation(&self) -> Option<TypeAnnotation> {
        child(&self.0, TypeAnnotation::cast)
    }

    pub fn initializer(&self) -> Option<Initializer> {
        child(&self.0, Initializer::cast)
    }
}

impl TypeAnnotation {
    pub fn ty(&self) -> Option<Type> {
        child(&self.0, Type::cast)
    }
}

impl ReturnType {
    pub fn ty(&self) -> Option<Type> {
        child(&self.0, Type::cast)
    }

    pub fn predicate(&self) -> Option<TypePredicate> {
        child(&self.0, TypePredicate::cast)
    }
}

impl TypePredicate {
    pub fn is_asserts(&self) -> bool {
        has_contextual(&self.0, "asserts")
    }

    pub fn parameter_name(&self) -> Option<Name> {
        child(&self.0, Name::cast)
    }

    pub fn ty(&self) -> Option<Type> {
        child(&self.0, Type::cast)
    }
}

impl TypeArgList {
    pub fn types(&self) -> impl Iterator<Item = Type> + '_ {
        self.0.children().filter_map(Type::cast)
    }
}

/// Type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Keyword(KeywordType),
    Literal(LiteralType),
    TemplateLiteral(TemplateLiteralType),
    Reference(TypeRef),
    Union(UnionType),
    Intersection(IntersectionType),
    Array(ArrayType),
    Tuple(TupleType),
    Paren(ParenType),
    Function(FunctionType),
    Constructor(ConstructorType),
    Object(ObjectType),
    Mapped(MappedType),
    IndexedAccess(IndexedAccessType),
    Operator(TypeOperator),
    Query(TypeQuery),
    Conditional(ConditionalType),
    Infer(InferType),
    This(ThisType),
}

impl Type {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::KeywordType => KeywordType::cast(node).map(Type::Keyword),
            SyntaxKind::LiteralType => LiteralType::cast(node).map(Type::Literal),
            SyntaxKind::TemplateLiteralType => {
                TemplateLiteralType::cast(node).map(Type::TemplateLiteral)
            }
            SyntaxKind::TypeRef => TypeRef::cast(node).map(Type::Reference),
            SyntaxKind::UnionType => UnionType::cast(node).map(Type::Union),
            SyntaxKind::IntersectionType => IntersectionType::cast(node).map(Type::Intersection),
            SyntaxKind::ArrayType => ArrayType::cast(node).map(Type::Array),
            SyntaxKind::TupleType => TupleType::cast(node).map(Type::Tuple),
            SyntaxKind::ParenType => ParenType::cast(node).map(Type::Paren),
            SyntaxKind::FunctionType => FunctionType::cast(node).map(Type::Function),
            SyntaxKind::ConstructorType => ConstructorType::cast(node).map(Type::Constructor),
            SyntaxKind::ObjectType => ObjectType::cast(node).map(Type::Object),
            SyntaxKind::MappedType => MappedType::cast(node).map(Type::Mapped),
            SyntaxKind::IndexedAccessType => IndexedAccessType::cast(node).map(Type::IndexedAccess),
            SyntaxKind::TypeOperator => TypeOperator::cast(node).map(Type::Operator),
            SyntaxKind::TypeQuery => TypeQuery::cast(node).map(Type::Query),
            SyntaxKind::ConditionalType => ConditionalType::cast(node).map(Type::Conditional),
            SyntaxKind::InferType => InferType::cast(node).map(Type::Infer),
            SyntaxKind::ThisType => ThisType::cast(node).map(Type::This),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Type::Keyword(n) => n.as_cst(),
            Type::Literal(n) => n.as_cst(),
            Type::TemplateLiteral(n) => n.as_cst(),
            Type::Reference(n) => n.as_cst(),
            Type::Union(n) => n.as_cst(),
            Type::Intersection(n) => n.as_cst(),
            Type::Array(n) => n.as_cst(),
            Type::Tuple(n) => n.as_cst(),
            Type::Paren(n) => n.as_cst(),
            Type::Function(n) => n.as_cst(),
            Type::Constructor(n) => n.as_cst(),
            Type::Object(n) => n.as_cst(),
            Type::Mapped(n) => n.as_cst(),
            Type::IndexedAccess(n) => n.as_cst(),
            Type::Operator(n) => n.as_cst(),
            Type::Query(n) => n.as_cst(),
            Type::Conditional(n) => n.as_cst(),
            Type::Infer(n) => n.as_cst(),
            Type::This(n) => n.as_cst(),
        }
    }
}

impl KeywordType {
    pub fn keyword(&self) -> String {
        tokens(&self.0)
            .next()
            .map(|t| t.text().to_string())
            .unwrap_or_default()
    }
}

impl LiteralType {
    pub fn is_negative(&self) -> bool {
        has_token(&self.0, SyntaxKind::Minus)
    }

    pub fn literal(&self) -> Option<SyntaxToken> {
        tokens(&self.0).find(|t| t.kind() != SyntaxKind::Minus)
    }
}

impl TemplateLiteralType {
    pub fn head(&self) -> Option<SyntaxToken> {
        tokens(&self.0).next()
    }

    pub fn spans(&self) -> impl Iterator<Item = TemplateSpan> + '_ {
        self.0.children().filter_map(TemplateSpan::cast)
    }
}

impl TemplateSpan {
    pub fn ty(&self) -> Option<Type> {
        child(&self.0, Type::cast)
    }

    /// The `TemplateMiddle` or `TemplateTail` closing this span.
    pub fn literal(&self) -> Option<SyntaxToken> {
        tokens(&self.0).next()
    }
}

impl TypeRef {
    pub fn name(&self) -> Option<EntityName> {
        child(&self.0, EntityName::cast)
    }

    pub fn type_args(&self) -> Option<TypeArgList> {
        child(&self.0, TypeArgList::cast)
    }
}

impl EntityName {
    pub fn segments(&self) -> Vec<SyntaxToken> {
        tokens(&self.0)
            .filter(|t| t.kind() != SyntaxKind::Dot)
            .collect()
    }

    pub fn text(&self) -> String {
        self.segments()
            .iter()
            .map(|t| t.text())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl UnionType {
    pub fn types(&self) -> impl Iterator<Item = Type> + '_ {
        self.0.children().filter_map(Type::cast)
    }
}

impl IntersectionType {
    pub fn types(&self) -> impl Iterator<Item = Type> + '_ {
        self.0.children().filter_map(Type::cast)
    }
}

impl ArrayType {
    pub fn element(&self) -> Option<Type> {
        child(&self.0, Type::cast)
    }
}

/// Tuple element with its decoration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TupleElement {
    Plain(Type),
    Optional(OptionalType),
    Rest(RestType),
    Named(NamedTupleMember),
}

impl TupleType {
    pub fn elements(&self) -> impl Iterator<Item = TupleElement> + '_ {
        self.0.children().filter_map(|n| match n.kind() {
            SyntaxKind::OptionalType => OptionalType::cast(n).map(TupleElement::Optional),
            SyntaxKind::RestType => RestType::cast(n).map(TupleElement::Rest),
            SyntaxKind::NamedTupleMember => NamedTupleMember::cast(n).map(TupleElement::Named),
            _ => Type::cast(n).map(TupleElement::Plain),
        })
    }
}

impl OptionalType {
    pub fn ty(&self) -> Option<Type> {
        child(&self.0, Type::cast)
    }
}

impl RestType {
    pub fn ty(&self) -> Option<Type> {
        child(&self.0, Type::cast)
    }
}

impl NamedTupleMember {
    pub fn is_rest(&self) -> bool {
        has_token(&self.0, SyntaxKind::DotDotDot)
    }

    pub fn is_optional(&self) -> bool {
        has_token(&self.0, SyntaxKind::Question)
    }

    pub fn name(&self) -> Option<Name> {
        child(&self.0, Name::cast)
    }

    pub fn ty(&self) -> Option<Type> {
        child(&self.0, Type::cast)
    }
}

impl ParenType {
    pub fn inner(&self) -> Option<Type> {
        child(&self.0, Type::cast)
    }
}

macro_rules! signature_accessors {
    ($name:ident) => {
        impl $name {
            pub fn type_params(&self) -> Option<TypeParamList> {
                child(&self.0, TypeParamList::cast)
            }

            pub fn params(&self) -> Option<ParamList> {
                child(&self.0, ParamList::cast)
            }

            pub fn return_type(&self) -> Option<ReturnType> {
                child(&self.0, ReturnType::cast)
            }
        }
    };
}

signature_accessors!(FunctionType);
signature_accessors!(ConstructorType);
signature_accessors!(CallSig);
signature_accessors!(ConstructSig);
signature_accessors!(MethodSig);

impl ConstructorType {
    pub fn is_abstract(&self) -> bool {
        has_contextual(&self.0, "abstract")
    }
}

/// Member of an object type or interface body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeMember {
    Property(PropertySig),
    Method(MethodSig),
    Call(CallSig),
    Construct(ConstructSig),
    Index(IndexSig),
}

impl TypeMember {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::PropertySig => PropertySig::cast(node).map(TypeMember::Property),
            SyntaxKind::MethodSig => MethodSig::cast(node).map(TypeMember::Method),
            SyntaxKind::CallSig => CallSig::cast(node).map(TypeMember::Call),
            SyntaxKind::ConstructSig => ConstructSig::cast(node).map(TypeMember::Construct),
            SyntaxKind::IndexSig => IndexSig::cast(node).map(TypeMember::Index),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            TypeMember::Property(n) => n.as_cst(),
            TypeMember::Method(n) => n.as_cst(),
            TypeMember::Call(n) => n.as_cst(),
            TypeMember::Construct(n) => n.as_cst(),
            TypeMember::Index(n) => n.as_cst(),
        }
    }
}

impl ObjectType {
    pub fn members(&self) -> impl Iterator<Item = TypeMember> + '_ {
        self.0.children().filter_map(TypeMember::cast)
    }
}

impl PropertySig {
    pub fn is_readonly(&self) -> bool {
        has_contextual(&self.0, "readonly")
    }

    pub fn name(&self) -> Option<Name> {
        child(&self.0, Name::cast)
    }

    pub fn is_optional(&self) -> bool {
        has_token(&self.0, SyntaxKind::Question)
    }

    pub fn type_annotation(&self) -> Option<TypeAnnotation> {
        child(&self.0, TypeAnnotation::cast)
    }
}

impl MethodSig {
    pub fn name(&self) -> Option<Name> {
        child(&self.0, Name::cast)
    }

    pub fn is_optional(&self) -> bool {
        has_token(&self.0, SyntaxKind::Question)
    }
}

impl IndexSig {
    pub fn is_readonly(&self) -> bool {
        has_contextual(&self.0, "readonly")
    }

    pub fn param(&self) -> Option<Param> {
        child(&self.0, Param::cast)
    }

    pub fn type_annotation(&self) -> Option<TypeAnnotation> {
        child(&self.0, TypeAnnotation::cast)
    }
}

/// `+`, `-` or bare modifier on a mapped type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappedModifier {
    Add,
    Remove,
}

impl MappedType {
    pub fn type_param(&self) -> Option<MappedTypeParam> {
        child(&self.0, MappedTypeParam::cast)
    }

    pub fn type_annotation(&self) -> Option<TypeAnnotation> {
        child(&self.0, TypeAnnotation::cast)
    }

    /// `readonly` modifier: `Add` for `readonly`/`+readonly`, `Remove` for `-readonly`.
    pub fn readonly_modifier(&self) -> Option<MappedModifier> {
        let mut sign = None;
        for t in tokens(&self.0) {
            match t.kind() {
                SyntaxKind::Plus => sign = Some(MappedModifier::Add),
                SyntaxKind::Minus => sign = Some(MappedModifier::Remove),
                SyntaxKind::Ident if t.text() == "readonly" => {
                    return Some(sign.unwrap_or(MappedModifier::Add));
                }
                SyntaxKind::BracketOpen => return None,
                _ => {}
            }
        }
        None
    }

    /// `?` modifier after the key: `Add` for `?`/`+?`, `Remove` for `-?`.
    pub fn optional_modifier(&self) -> Option<MappedModifier> {
        let mut after_key = false;
        let mut sign = None;
        for t in tokens(&self.0) {
            match t.kind() {
                SyntaxKind::BracketClose => after_key = true,
                SyntaxKind::Plus if after_key => sign = Some(MappedModifier::Add),
                SyntaxKind::Minus if after_key => sign = Some(MappedModifier::Remove),
                SyntaxKind::Question if after_key => {
                    return Some(sign.unwrap_or(MappedModifier::Add));
                }
                _ => {}
            }
        }
        None
    }
}

impl MappedTypeParam {
    pub fn name(&self) -> Option<Name> {
        child(&self.0, Name::cast)
    }

    pub fn constraint(&self) -> Option<Type> {
        child(&self.0, Type::cast)
    }

    /// The `as` clause type.
    pub fn name_type(&self) -> Option<Type> {
        self.0.children().filter_map(Type::cast).nth(1)
    }
}

impl IndexedAccessType {
    pub fn object(&self) -> Option<Type> {
        child(&self.0, Type::cast)
    }

    pub fn index(&self) -> Option<Type> {
        self.0.children().filter_map(Type::cast).nth(1)
    }
}

impl TypeOperator {
    /// `keyof`, `readonly` or `unique`.
    pub fn operator(&self) -> String {
        tokens(&self.0)
            .next()
            .map(|t| t.text().to_string())
            .unwrap_or_default()
    }

    pub fn ty(&self) -> Option<Type> {
        child(&self.0, Type::cast)
    }
}

impl TypeQuery {
    pub fn name(&self) -> Option<EntityName> {
        child(&self.0, EntityName::cast)
    }

    pub fn type_args(&self) -> Option<TypeArgList> {
        child(&self.0, TypeArgList::cast)
    }
}

impl ConditionalType {
    fn nth(&self, n: usize) -> Option<Type> {
        self.0.children().filter_map(Type::cast).nth(n)
    }

    pub fn check_type(&self) -> Option<Type> {
        self.nth(0)
    }

    pub fn extends_type(&self) -> Option<Type> {
        self.nth(1)
    }

    pub fn true_type(&self) -> Option<Type> {
        self.nth(2)
    }

    pub fn false_type(&self) -> Option<Type> {
        self.nth(3)
    }
}

impl InferType {
    pub fn type_param(&self) -> Option<TypeParam> {
        child(&self.0, TypeParam::cast)
    }
}
