//! `compilerOptions` as written in a config file.
//!
//! Each config layer is validated on its own: path options are made absolute
//! against the directory of the file that sets them, so merging layers is a
//! plain key-wise override. Only the merged map is deserialized into
//! [`CompilerOptions`].

use std::path::Path;

use fddtsc_compiler::options::CompilerOptions;
use fddtsc_compiler::program::paths;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Boolean,
    Path,
    NewLine,
}

impl OptionType {
    /// How the expected type is named in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            OptionType::Boolean => "boolean",
            OptionType::Path => "string",
            OptionType::NewLine => "'crlf' | 'lf'",
        }
    }

    /// Normalized value, or `None` when `value` has the wrong type.
    ///
    /// `null` is accepted for every option and unsets an inherited value.
    pub fn read(self, value: &Value, dir: &Path) -> Option<Value> {
        if value.is_null() {
            return Some(Value::Null);
        }
        match self {
            OptionType::Boolean => value.as_bool().map(Value::Bool),
            OptionType::Path => value.as_str().map(|path| {
                let absolute = paths::resolve(dir, Path::new(path));
                Value::String(absolute.to_string_lossy().replace('\\', "/"))
            }),
            OptionType::NewLine => {
                let lowered = value.as_str()?.to_ascii_lowercase();
                matches!(lowered.as_str(), "lf" | "crlf").then_some(Value::String(lowered))
            }
        }
    }
}

const OPTIONS: &[(&str, OptionType)] = &[
    ("composite", OptionType::Boolean),
    ("declaration", OptionType::Boolean),
    ("declarationDir", OptionType::Path),
    ("emitDeclarationOnly", OptionType::Boolean),
    ("incremental", OptionType::Boolean),
    ("newLine", OptionType::NewLine),
    ("noEmit", OptionType::Boolean),
    ("noEmitOnError", OptionType::Boolean),
    ("noImplicitAny", OptionType::Boolean),
    ("noLib", OptionType::Boolean),
    ("outDir", OptionType::Path),
    ("outFile", OptionType::Path),
    ("removeComments", OptionType::Boolean),
    ("rootDir", OptionType::Path),
    ("strict", OptionType::Boolean),
    ("strictNullChecks", OptionType::Boolean),
    ("tsBuildInfoFile", OptionType::Path),
];

/// Options `tsc` accepts that do not change declaration output.
const IGNORED: &[&str] = &[
    "allowArbitraryExtensions",
    "allowImportingTsExtensions",
    "allowJs",
    "allowSyntheticDefaultImports",
    "allowUnreachableCode",
    "allowUnusedLabels",
    "alwaysStrict",
    "baseUrl",
    "checkJs",
    "declarationMap",
    "diagnostics",
    "downlevelIteration",
    "emitBOM",
    "emitDecoratorMetadata",
    "esModuleInterop",
    "exactOptionalPropertyTypes",
    "experimentalDecorators",
    "extendedDiagnostics",
    "forceConsistentCasingInFileNames",
    "importHelpers",
    "inlineSourceMap",
    "inlineSources",
    "isolatedDeclarations",
    "isolatedModules",
    "jsx",
    "jsxFactory",
    "jsxFragmentFactory",
    "jsxImportSource",
    "lib",
    "listEmittedFiles",
    "listFiles",
    "mapRoot",
    "module",
    "moduleDetection",
    "moduleResolution",
    "noErrorTruncation",
    "noFallthroughCasesInSwitch",
    "noImplicitOverride",
    "noImplicitReturns",
    "noImplicitThis",
    "noPropertyAccessFromIndexSignature",
    "noUncheckedIndexedAccess",
    "noUnusedLocals",
    "noUnusedParameters",
    "paths",
    "preserveConstEnums",
    "pretty",
    "resolveJsonModule",
    "rootDirs",
    "skipDefaultLibCheck",
    "skipLibCheck",
    "sourceMap",
    "sourceRoot",
    "strictBindCallApply",
    "strictBuiltinIteratorReturn",
    "strictFunctionTypes",
    "strictPropertyInitialization",
    "stripInternal",
    "target",
    "traceResolution",
    "typeRoots",
    "types",
    "useDefineForClassFields",
    "useUnknownInCatchVariables",
    "verbatimModuleSyntax",
    "watch",
];

pub enum Lookup {
    Known(OptionType),
    Ignored,
    Unknown,
}

pub fn lookup(name: &str) -> Lookup {
    if let Some((_, ty)) = OPTIONS.iter().find(|(option, _)| *option == name) {
        return Lookup::Known(*ty);
    }
    if IGNORED.contains(&name) {
        return Lookup::Ignored;
    }
    Lookup::Unknown
}

/// Deserializes merged, validated options. Unset (`null`) entries are dropped.
pub fn into_compiler_options(merged: Map<String, Value>) -> serde_json::Result<CompilerOptions> {
    let set: Map<String, Value> = merged.into_iter().filter(|(_, v)| !v.is_null()).collect();
    serde_json::from_value(Value::Object(set))
}

/// Settings the driver insists on, whatever the config says.
pub fn force_declaration_only(options: &mut CompilerOptions) {
    options.declaration = true;
    options.emit_declaration_only = true;
    options.composite = false;
    options.incremental = false;
    options.ts_build_info_file = None;
}
