//! Syntax kinds for the declaration subset of TypeScript.
//!
//! `SyntaxKind` serves dual roles: token kinds (from lexer) and node kinds (from parser).
//! Logos derives token recognition; node kinds lack token/regex attributes.
//! `TsLang` implements Rowan's `Language` trait for tree construction.
//!
//! Contextual keywords (`type`, `interface`, `keyof`, `string`, ...) lex as `Ident`
//! and are recognised by text in the parser, the same way `tsc` treats them.

use logos::Logos;
use rowan::Language;

use super::lexer::lex_template;

/// All token and node kinds. Tokens first, then nodes, then `__LAST` sentinel.
/// `#[repr(u16)]` enables safe transmute in `kind_from_raw`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token("<")]
    Lt,

    /// Never merged into `>>`; nested type arguments close one at a time.
    #[token(">")]
    Gt,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token("?")]
    Question,

    #[token(".")]
    Dot,

    #[token("...")]
    DotDotDot,

    #[token("=")]
    Equals,

    #[token("=>")]
    Arrow,

    #[token("|")]
    Pipe,

    #[token("&")]
    Amp,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("!")]
    Bang,

    #[token("@")]
    At,

    /// Operators only seen inside skipped bodies and initializers.
    #[regex(r"[%^~#]")]
    Operator,

    #[regex(r#""(?:[^"\\\n\r]|\\(?:\r\n|[^\r]|\r))*""#)]
    #[regex(r"'(?:[^'\\\n\r]|\\(?:\r\n|[^\r]|\r))*'")]
    StringLiteral,

    #[regex(r"[0-9][0-9_]*(?:\.[0-9_]*)?(?:[eE][+-]?[0-9][0-9_]*)?")]
    #[regex(r"\.[0-9][0-9_]*(?:[eE][+-]?[0-9][0-9_]*)?")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[oO][0-7_]+")]
    #[regex(r"0[bB][01_]+")]
    NumberLiteral,

    #[regex(r"[0-9][0-9_]*n")]
    #[regex(r"0[xX][0-9a-fA-F_]+n")]
    BigIntLiteral,

    /// Whole template as scanned by logos; split by the lexer into the four kinds below.
    #[token("`", lex_template)]
    #[doc(hidden)]
    TemplateLiteral,

    NoSubstitutionTemplate,
    TemplateHead,
    TemplateMiddle,
    TemplateTail,

    #[token("export")]
    KwExport,

    #[token("import")]
    KwImport,

    #[token("const")]
    KwConst,

    #[token("var")]
    KwVar,

    #[token("function")]
    KwFunction,

    #[token("default")]
    KwDefault,

    #[token("extends")]
    KwExtends,

    #[token("typeof")]
    KwTypeof,

    #[token("new")]
    KwNew,

    #[token("void")]
    KwVoid,

    #[token("null")]
    KwNull,

    #[token("true")]
    KwTrue,

    #[token("false")]
    KwFalse,

    #[token("this")]
    KwThis,

    #[token("in")]
    KwIn,

    #[token("class")]
    KwClass,

    #[token("enum")]
    KwEnum,

    #[token("return")]
    KwReturn,

    /// Defined after keywords so they take precedence.
    #[regex(r"[a-zA-Z_$\u{80}-\u{10FFFF}][a-zA-Z0-9_$\u{80}-\u{10FFFF}]*")]
    Ident,

    #[regex(r"[ \t\u{b}\u{c}]+")]
    Whitespace,

    #[token("\n")]
    #[token("\r\n")]
    #[token("\r")]
    Newline,

    #[regex(r"//[^\n\r]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
    BlockComment,

    #[regex(r"#![^\n\r]*", allow_greedy = true)]
    Shebang,

    /// Coalesced unrecognized characters
    Garbage,
    Error,

    // --- Node kinds (non-terminals) ---
    Root,
    ImportDecl,
    ImportClause,
    NamespaceImport,
    NamedImports,
    ImportSpecifier,
    ModuleSpecifier,
    ExportDecl,
    NamedExports,
    ExportSpecifier,
    ExportStar,
    ExportAssignment,
    TypeAliasDecl,
    InterfaceDecl,
    HeritageClause,
    FunctionDecl,
    FunctionBody,
    VariableStatement,
    VariableDecl,
    Initializer,
    UnsupportedDecl,
    ExpressionStmt,
    Name,
    TypeParamList,
    TypeParam,
    Constraint,
    DefaultType,
    ParamList,
    Param,
    TypeAnnotation,
    ReturnType,
    TypeArgList,

    // Types
    KeywordType,
    LiteralType,
    TemplateLiteralType,
    TemplateSpan,
    TypeRef,
    EntityName,
    UnionType,
    IntersectionType,
    ArrayType,
    TupleType,
    NamedTupleMember,
    OptionalType,
    RestType,
    ParenType,
    FunctionType,
    ConstructorType,
    ObjectType,
    PropertySig,
    MethodSig,
    CallSig,
    ConstructSig,
    IndexSig,
    MappedType,
    MappedTypeParam,
    IndexedAccessType,
    TypeOperator,
    TypeQuery,
    ConditionalType,
    InferType,
    TypePredicate,
    ThisType,

    // Must be last - used for bounds checking in `kind_from_raw`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Whitespace | Newline | LineComment | BlockComment | Shebang
        )
    }

    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Error | Garbage)
    }

    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(self, LineComment | BlockComment)
    }

    /// Reserved words. All of them are still valid property names.
    #[inline]
    pub fn is_keyword(self) -> bool {
        (KwExport as u16..=KwReturn as u16).contains(&(self as u16))
    }

    /// Tokens that can spell a property or member name.
    #[inline]
    pub fn is_identifier_like(self) -> bool {
        self == Ident || self.is_keyword()
    }

    #[inline]
    pub fn is_type_node(self) -> bool {
        (KeywordType as u16..=ThisType as u16).contains(&(self as u16))
            && !matches!(
                self,
                TemplateSpan
                    | EntityName
                    | NamedTupleMember
                    | OptionalType
                    | RestType
                    | PropertySig
                    | MethodSig
                    | CallSig
                    | ConstructSig
                    | IndexSig
                    | MappedTypeParam
            )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TsLang {}

impl Language for TsLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: We've verified the value is in bounds, and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for Rowan types parameterized by our language.
pub type SyntaxNode = rowan::SyntaxNode<TsLang>;
pub type SyntaxToken = rowan::SyntaxToken<TsLang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

/// 128-bit bitset of token `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    /// Creates an empty token set.
    pub const EMPTY: TokenSet = TokenSet(0);

    /// Panics at compile time if any kind's discriminant >= 128.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u128;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 128, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 128 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_set();
        for i in 0..128u16 {
            if self.0 & (1 << i) != 0 && i < __LAST as u16 {
                let kind: SyntaxKind = unsafe { std::mem::transmute(i) };
                list.entry(&kind);
            }
        }
        list.finish()
    }
}

/// Pre-defined token sets for the parser.
pub mod token_sets {
    use super::*;

    pub const TRIVIA: TokenSet =
        TokenSet::new(&[Whitespace, Newline, LineComment, BlockComment, Shebang]);

    /// Tokens that can begin a type (contextual keywords arrive as `Ident`).
    pub const TYPE_FIRST: TokenSet = TokenSet::new(&[
        ParenOpen,
        BracketOpen,
        BraceOpen,
        Lt,
        Pipe,
        Amp,
        Minus,
        StringLiteral,
        NumberLiteral,
        BigIntLiteral,
        NoSubstitutionTemplate,
        TemplateHead,
        KwTypeof,
        KwNew,
        KwVoid,
        KwNull,
        KwTrue,
        KwFalse,
        KwThis,
        Ident,
    ]);

    /// Statement starts used to resynchronise after a syntax error.
    pub const STATEMENT_RECOVERY: TokenSet = TokenSet::new(&[
        KwExport,
        KwImport,
        KwConst,
        KwVar,
        KwFunction,
        KwClass,
        KwEnum,
        Semicolon,
    ]);

    pub const MEMBER_RECOVERY: TokenSet =
        TokenSet::new(&[BraceClose, Semicolon, Comma]);

    pub const LIST_RECOVERY: TokenSet =
        TokenSet::new(&[ParenClose, BracketClose, Gt, BraceClose, Semicolon]);
}
