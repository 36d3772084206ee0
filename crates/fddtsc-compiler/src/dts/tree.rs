//! Owned declaration tree.
//!
//! Unlike the source CST, this tree is built to be rewritten: transformers
//! fold it into a new tree, and the printer renders whatever comes out. Nodes
//! remember where they came from through [`Origin`], which is how comments
//! and type information are recovered after rewriting.

use rowan::{TextRange, TextSize};

pub use crate::parser::ast::DeclarationKeyword;
use crate::parser::SyntaxNode;
use crate::source_map::SourceId;

/// Source position of a declaration-tree node.
///
/// `source` is `Some` for nodes copied verbatim from a source file and `None`
/// for nodes the emitter rebuilt; rebuilt nodes still carry the positions of
/// the declaration they were rebuilt from, relative to the file being emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Origin {
    pub source: Option<SourceId>,
    pub full_start: TextSize,
    pub range: TextRange,
}

impl Origin {
    /// Origin of a node copied verbatim from `source`.
    pub fn copied(source: SourceId, node: &SyntaxNode) -> Self {
        Self {
            source: Some(source),
            full_start: full_start(node),
            range: node.text_range(),
        }
    }

    /// Origin of a node rebuilt from `node` of the file being emitted.
    pub fn rebuilt(node: &SyntaxNode) -> Self {
        Self {
            source: None,
            full_start: full_start(node),
            range: node.text_range(),
        }
    }
}

/// End of the last non-trivia token before `node`, or 0.
pub fn full_start(node: &SyntaxNode) -> TextSize {
    let mut token = node.first_token().and_then(|t| t.prev_token());
    while let Some(t) = token {
        if !t.kind().is_trivia() {
            return t.text_range().end();
        }
        token = t.prev_token();
    }
    TextSize::from(0)
}

/// Declarations for one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct DtsFile {
    pub source: SourceId,
    pub statements: Vec<Statement>,
}

/// All files of an `outFile` build.
#[derive(Debug, Clone, PartialEq)]
pub struct DtsBundle {
    pub files: Vec<DtsFile>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Import(ImportDeclaration),
    Export(ExportDeclaration),
    ExportAssignment(ExportAssignment),
    TypeAlias(TypeAliasDeclaration),
    Interface(InterfaceDeclaration),
    Function(FunctionDeclaration),
    Variable(VariableStatement),
}

impl Statement {
    pub fn origin(&self) -> Option<&Origin> {
        match self {
            Statement::Import(s) => s.origin.as_ref(),
            Statement::Export(s) => s.origin.as_ref(),
            Statement::ExportAssignment(s) => s.origin.as_ref(),
            Statement::TypeAlias(s) => s.origin.as_ref(),
            Statement::Interface(s) => s.origin.as_ref(),
            Statement::Function(s) => s.origin.as_ref(),
            Statement::Variable(s) => s.origin.as_ref(),
        }
    }

    /// Whether the statement marks its file as a module.
    pub fn is_module_indicator(&self) -> bool {
        match self {
            Statement::Import(_) | Statement::Export(_) | Statement::ExportAssignment(_) => true,
            Statement::TypeAlias(s) => s.modifiers.export,
            Statement::Interface(s) => s.modifiers.export,
            Statement::Function(s) => s.modifiers.export,
            Statement::Variable(s) => s.modifiers.export,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub export: bool,
    pub default: bool,
    pub declare: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDeclaration {
    pub origin: Option<Origin>,
    pub type_only: bool,
    pub default: Option<String>,
    pub namespace: Option<String>,
    /// `None` when the import has no braces.
    pub named: Option<Vec<Specifier>>,
    /// Module specifier as written, quotes included.
    pub module: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Specifier {
    pub type_only: bool,
    pub property_name: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportDeclaration {
    pub origin: Option<Origin>,
    pub type_only: bool,
    pub clause: ExportClause,
    /// Module specifier as written, quotes included.
    pub module: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportClause {
    Named(Vec<Specifier>),
    Star(Option<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportAssignment {
    pub origin: Option<Origin>,
    pub is_default: bool,
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDeclaration {
    pub origin: Option<Origin>,
    pub modifiers: Modifiers,
    pub name: String,
    pub type_params: Vec<TypeParameter>,
    pub ty: TypeNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDeclaration {
    pub origin: Option<Origin>,
    pub modifiers: Modifiers,
    pub name: String,
    pub type_params: Vec<TypeParameter>,
    pub heritage: Vec<TypeNode>,
    pub members: Vec<TypeMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub origin: Option<Origin>,
    pub modifiers: Modifiers,
    pub name: String,
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableStatement {
    pub origin: Option<Origin>,
    pub modifiers: Modifiers,
    pub keyword: DeclarationKeyword,
    pub declarations: Vec<VariableDeclaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub name: String,
    pub ty: Option<TypeNode>,
    /// Literal initializer kept on `const` declarations, as written.
    pub initializer: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameter {
    pub name: String,
    pub is_const: bool,
    pub constraint: Option<TypeNode>,
    pub default: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub rest: bool,
    pub name: String,
    pub optional: bool,
    pub ty: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub type_params: Vec<TypeParameter>,
    pub params: Vec<Parameter>,
    pub return_type: Option<Box<TypeNode>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub kind: TypeNodeKind,
    pub origin: Option<Origin>,
}

impl TypeNode {
    pub fn synthetic(kind: TypeNodeKind) -> Self {
        Self { kind, origin: None }
    }

    /// Whether the node was copied from a source file.
    pub fn is_from_source(&self) -> bool {
        self.origin.is_some_and(|o| o.source.is_some())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeNodeKind {
    Keyword(Keyword),
    /// String, number, bigint or boolean literal, printed as stored.
    Literal(String),
    /// Texts are stored escaped, without the surrounding delimiters.
    TemplateLiteral {
        head: String,
        spans: Vec<TemplateSpan>,
    },
    Reference {
        name: Vec<String>,
        args: Vec<TypeNode>,
    },
    /// `import("./m").A.B<T>`.
    Import {
        module: String,
        qualifier: Vec<String>,
        args: Vec<TypeNode>,
    },
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    Array(Box<TypeNode>),
    Tuple(Vec<TupleMember>),
    Paren(Box<TypeNode>),
    Function(Signature),
    Constructor {
        is_abstract: bool,
        signature: Signature,
    },
    Object(Vec<TypeMember>),
    Mapped(Box<MappedTypeNode>),
    IndexedAccess {
        object: Box<TypeNode>,
        index: Box<TypeNode>,
    },
    Operator {
        operator: TypeOperatorKind,
        ty: Box<TypeNode>,
    },
    Query {
        name: Vec<String>,
        args: Vec<TypeNode>,
    },
    Conditional {
        check: Box<TypeNode>,
        extends: Box<TypeNode>,
        true_type: Box<TypeNode>,
        false_type: Box<TypeNode>,
    },
    Infer {
        name: String,
        constraint: Option<Box<TypeNode>>,
    },
    Predicate {
        asserts: bool,
        parameter: String,
        ty: Option<Box<TypeNode>>,
    },
    This,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Any,
    Unknown,
    String,
    Number,
    BigInt,
    Boolean,
    Symbol,
    Object,
    Undefined,
    Null,
    Void,
    Never,
    Intrinsic,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Any => "any",
            Keyword::Unknown => "unknown",
            Keyword::String => "string",
            Keyword::Number => "number",
            Keyword::BigInt => "bigint",
            Keyword::Boolean => "boolean",
            Keyword::Symbol => "symbol",
            Keyword::Object => "object",
            Keyword::Undefined => "undefined",
            Keyword::Null => "null",
            Keyword::Void => "void",
            Keyword::Never => "never",
            Keyword::Intrinsic => "intrinsic",
        }
    }

    pub fn from_text(text: &str) -> Option<Self> {
        Some(match text {
            "any" => Keyword::Any,
            "unknown" => Keyword::Unknown,
            "string" => Keyword::String,
            "number" => Keyword::Number,
            "bigint" => Keyword::BigInt,
            "boolean" => Keyword::Boolean,
            "symbol" => Keyword::Symbol,
            "object" => Keyword::Object,
            "undefined" => Keyword::Undefined,
            "null" => Keyword::Null,
            "void" => Keyword::Void,
            "never" => Keyword::Never,
            "intrinsic" => Keyword::Intrinsic,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeOperatorKind {
    Keyof,
    Unique,
    Readonly,
}

impl TypeOperatorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeOperatorKind::Keyof => "keyof",
            TypeOperatorKind::Unique => "unique",
            TypeOperatorKind::Readonly => "readonly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSpan {
    pub ty: TypeNode,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TupleMemberKind {
    Required,
    Optional,
    Rest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleMember {
    pub kind: TupleMemberKind,
    pub name: Option<String>,
    pub ty: TypeNode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappedModifier {
    Add,
    Remove,
    /// Bare `readonly` or `?`.
    Plain,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappedTypeNode {
    pub readonly: Option<MappedModifier>,
    pub parameter: String,
    pub constraint: TypeNode,
    pub name_type: Option<TypeNode>,
    pub optional: Option<MappedModifier>,
    pub ty: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeMember {
    Property(PropertySignature),
    Method(MethodSignature),
    Call(CallSignature),
    Construct(CallSignature),
    Index(IndexSignature),
}

impl TypeMember {
    pub fn origin(&self) -> Option<&Origin> {
        match self {
            TypeMember::Property(m) => m.origin.as_ref(),
            TypeMember::Method(m) => m.origin.as_ref(),
            TypeMember::Call(m) | TypeMember::Construct(m) => m.origin.as_ref(),
            TypeMember::Index(m) => m.origin.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySignature {
    pub origin: Option<Origin>,
    pub readonly: bool,
    /// Name as printed: bare identifier, quoted string, number or `[computed]`.
    pub name: String,
    pub optional: bool,
    pub ty: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    pub origin: Option<Origin>,
    pub name: String,
    pub optional: bool,
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallSignature {
    pub origin: Option<Origin>,
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexSignature {
    pub origin: Option<Origin>,
    pub readonly: bool,
    pub parameter: String,
    pub key: TypeNode,
    pub ty: TypeNode,
}
