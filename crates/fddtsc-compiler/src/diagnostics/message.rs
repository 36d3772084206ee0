use rowan::TextRange;

use crate::source_map::SourceId;

/// Diagnostic kinds grouped by the phase that reports them.
///
/// Each kind maps to the numeric code `tsc` uses for the same condition, so
/// users can search for familiar messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Project configuration
    ConfigSyntax,
    ConfigFileNotFound,
    ExtendsNotFound,
    ExtendsCircular,
    UnknownCompilerOption,
    CompilerOptionType,
    FileNotFound,
    NoInputs,
    FileNotUnderRootDir,

    // Syntax
    UnexpectedToken,
    ExpectedToken,
    ExpectedType,
    ExpectedIdentifier,
    ExpectedStringLiteral,
    DeclarationExpected,
    UnterminatedLiteral,
    UnsupportedSyntax,

    // Binding
    DuplicateIdentifier,
    CannotRedeclareBlockScoped,

    // Checking
    CannotFindName,
    CannotFindNamespace,
    CannotFindModule,
    NoExportedMember,
    NamespaceNoExportedMember,
    NamespaceUsedAsType,
    ValueUsedAsType,
    GenericArity,
    NotGeneric,
    CircularAlias,
    ConstraintNotSatisfied,
    PropertyDoesNotExist,
    CannotIndexType,
    ImplicitAnyParameter,
    ExcessiveInstantiationDepth,

    // Declaration emit
    ReturnTypeRequired,
    VariableTypeRequired,
}

impl DiagnosticKind {
    /// Numeric code shown as `TS<code>` in pretty output.
    pub fn code(&self) -> u32 {
        match self {
            Self::ConfigSyntax => 1005,
            Self::ConfigFileNotFound => 5083,
            Self::ExtendsNotFound => 6053,
            Self::ExtendsCircular => 18000,
            Self::UnknownCompilerOption => 5023,
            Self::CompilerOptionType => 5024,
            Self::FileNotFound => 6053,
            Self::NoInputs => 18003,
            Self::FileNotUnderRootDir => 6059,

            Self::UnexpectedToken => 1012,
            Self::ExpectedToken => 1005,
            Self::ExpectedType => 1110,
            Self::ExpectedIdentifier => 1003,
            Self::ExpectedStringLiteral => 1141,
            Self::DeclarationExpected => 1128,
            Self::UnterminatedLiteral => 1002,
            Self::UnsupportedSyntax => 1109,

            Self::DuplicateIdentifier => 2300,
            Self::CannotRedeclareBlockScoped => 2451,

            Self::CannotFindName => 2304,
            Self::CannotFindNamespace => 2503,
            Self::CannotFindModule => 2307,
            Self::NoExportedMember => 2305,
            Self::NamespaceNoExportedMember => 2694,
            Self::NamespaceUsedAsType => 2709,
            Self::ValueUsedAsType => 2749,
            Self::GenericArity => 2314,
            Self::NotGeneric => 2315,
            Self::CircularAlias => 2456,
            Self::ConstraintNotSatisfied => 2344,
            Self::PropertyDoesNotExist => 2339,
            Self::CannotIndexType => 2536,
            Self::ImplicitAnyParameter => 7006,
            Self::ExcessiveInstantiationDepth => 2589,

            Self::ReturnTypeRequired => 9007,
            Self::VariableTypeRequired => 9010,
        }
    }

    /// Default severity for this kind.
    pub fn default_severity(&self) -> Severity {
        Severity::Error
    }

    pub fn is_syntax(&self) -> bool {
        (Self::UnexpectedToken..=Self::UnsupportedSyntax).contains(self)
    }

    pub fn is_config(&self) -> bool {
        *self <= Self::FileNotUnderRootDir
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::ConfigSyntax => "Invalid JSON in config file.",
            Self::ConfigFileNotFound => "Cannot read file.",
            Self::ExtendsNotFound => "File not found.",
            Self::ExtendsCircular => "Circularity detected while resolving configuration.",
            Self::UnknownCompilerOption => "Unknown compiler option.",
            Self::CompilerOptionType => "Compiler option has the wrong type.",
            Self::FileNotFound => "File not found.",
            Self::NoInputs => "No inputs were found in config file.",
            Self::FileNotUnderRootDir => "File is not under 'rootDir'.",

            Self::UnexpectedToken => "Unexpected token.",
            Self::ExpectedToken => "Token expected.",
            Self::ExpectedType => "Type expected.",
            Self::ExpectedIdentifier => "Identifier expected.",
            Self::ExpectedStringLiteral => "String literal expected.",
            Self::DeclarationExpected => "Declaration or statement expected.",
            Self::UnterminatedLiteral => "Unterminated string literal.",
            Self::UnsupportedSyntax => "Expression expected.",

            Self::DuplicateIdentifier => "Duplicate identifier.",
            Self::CannotRedeclareBlockScoped => "Cannot redeclare block-scoped variable.",

            Self::CannotFindName => "Cannot find name.",
            Self::CannotFindNamespace => "Cannot find namespace.",
            Self::CannotFindModule => "Cannot find module.",
            Self::NoExportedMember => "Module has no exported member.",
            Self::NamespaceNoExportedMember => "Namespace has no exported member.",
            Self::NamespaceUsedAsType => "Cannot use namespace as a type.",
            Self::ValueUsedAsType => "Value is being used as a type here.",
            Self::GenericArity => "Generic type requires type arguments.",
            Self::NotGeneric => "Type is not generic.",
            Self::CircularAlias => "Type alias circularly references itself.",
            Self::ConstraintNotSatisfied => "Type does not satisfy the constraint.",
            Self::PropertyDoesNotExist => "Property does not exist on type.",
            Self::CannotIndexType => "Type cannot be used as an index type.",
            Self::ImplicitAnyParameter => "Parameter implicitly has an 'any' type.",
            Self::ExcessiveInstantiationDepth => {
                "Type instantiation is excessively deep and possibly infinite."
            }

            Self::ReturnTypeRequired => {
                "Function must have an explicit return type annotation with --isolatedDeclarations."
            }
            Self::VariableTypeRequired => {
                "Variable must have an explicit type annotation with --isolatedDeclarations."
            }
        }
    }

    /// Template for custom messages. `{0}`, `{1}` are replaced by caller-provided arguments.
    pub fn custom_message(&self) -> &'static str {
        match self {
            Self::ConfigFileNotFound => "Cannot read file '{0}'.",
            Self::ExtendsNotFound | Self::FileNotFound => "File '{0}' not found.",
            Self::ExtendsCircular => "Circularity detected while resolving configuration: {0}",
            Self::UnknownCompilerOption => "Unknown compiler option '{0}'.",
            Self::CompilerOptionType => "Compiler option '{0}' requires a value of type {1}.",
            Self::NoInputs => {
                "No inputs were found in config file '{0}'. Specified 'include' paths were '{1}' and 'exclude' paths were '{2}'."
            }
            Self::FileNotUnderRootDir => {
                "File '{0}' is not under 'rootDir' '{1}'. 'rootDir' is expected to contain all source files."
            }

            Self::ExpectedToken => "'{0}' expected.",
            Self::UnsupportedSyntax => "{0} are not supported in declaration sources.",

            Self::DuplicateIdentifier => "Duplicate identifier '{0}'.",
            Self::CannotRedeclareBlockScoped => "Cannot redeclare block-scoped variable '{0}'.",

            Self::CannotFindName => "Cannot find name '{0}'.",
            Self::CannotFindNamespace => "Cannot find namespace '{0}'.",
            Self::CannotFindModule => {
                "Cannot find module '{0}' or its corresponding type declarations."
            }
            Self::NoExportedMember => "Module '\"{0}\"' has no exported member '{1}'.",
            Self::NamespaceNoExportedMember => "Namespace '{0}' has no exported member '{1}'.",
            Self::NamespaceUsedAsType => "Cannot use namespace '{0}' as a type.",
            Self::ValueUsedAsType => {
                "'{0}' refers to a value, but is being used as a type here. Did you mean 'typeof {0}'?"
            }
            Self::GenericArity => "Generic type '{0}' requires {1} type argument(s).",
            Self::NotGeneric => "Type '{0}' is not generic.",
            Self::CircularAlias => "Type alias '{0}' circularly references itself.",
            Self::ConstraintNotSatisfied => "Type '{0}' does not satisfy the constraint '{1}'.",
            Self::PropertyDoesNotExist => "Property '{0}' does not exist on type '{1}'.",
            Self::CannotIndexType => "Type '{0}' cannot be used to index type '{1}'.",
            Self::ImplicitAnyParameter => "Parameter '{0}' implicitly has an 'any' type.",

            _ => "{0}",
        }
    }

    /// Render the final message.
    ///
    /// - no arguments → `fallback_message()`
    /// - arguments → `custom_message()` with `{n}` replaced by the n-th argument
    pub fn message(&self, args: &[&str]) -> String {
        if args.is_empty() {
            return self.fallback_message().to_string();
        }
        let mut out = self.custom_message().to_string();
        for (i, arg) in args.iter().enumerate() {
            out = out.replace(&format!("{{{i}}}"), arg);
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl Severity {
    /// Prefix used by the single-line format.
    pub fn prefix(&self) -> &'static str {
        match self {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A position inside one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub source: SourceId,
    pub range: TextRange,
}

impl Span {
    pub fn new(source: SourceId, range: TextRange) -> Self {
        Self { source, range }
    }

    /// Span over byte offsets, for callers that locate text without a syntax tree.
    pub fn from_offsets(source: SourceId, start: usize, end: usize) -> Self {
        let range = TextRange::new((start as u32).into(), (end.max(start) as u32).into());
        Self { source, range }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) span: Span,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    pub(crate) severity: Severity,
    /// Absent for project-wide problems such as missing inputs.
    pub(crate) span: Option<Span>,
    pub(crate) message: String,
    /// Follow-up lines, flattened below the head message with growing indentation.
    pub(crate) chain: Vec<String>,
    pub(crate) related: Vec<RelatedInfo>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, span: Option<Span>, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            span,
            message: message.into(),
            chain: Vec::new(),
            related: Vec::new(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Head message plus chained lines, each level indented two more spaces.
    pub fn flattened_message(&self) -> String {
        let mut out = self.message.clone();
        for (depth, line) in self.chain.iter().enumerate() {
            out.push('\n');
            out.push_str(&"  ".repeat(depth + 1));
            out.push_str(line);
        }
        out
    }
}
