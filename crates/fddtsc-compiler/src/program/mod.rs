//! Program construction: loading, parsing and binding every reachable file.
//!
//! A [`Program`] owns the [`SourceMap`], one parsed tree per file and the
//! [`SymbolTable`]. Files reach the program as root names or through relative
//! imports of other files; the bundled default library is always first unless
//! `noLib` is set.

mod binder;
mod host;
pub mod paths;
mod resolve;
mod symbols;

#[cfg(test)]
mod binder_tests;
#[cfg(test)]
mod program_tests;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rowan::{NodeOrToken, TextRange};
use tracing::debug;

pub use host::{CompilerHost, EmitHost, FsHost, MemoryHost};
pub use resolve::{is_relative, resolve_module};
pub use symbols::{
    Declaration, ExportTarget, FileSymbols, ImportTarget, ImportedName, NodeKey, Symbol,
    SymbolFlags, SymbolId, SymbolTable,
};

use crate::Diagnostics;
use crate::diagnostics::DiagnosticKind;
use crate::options::CompilerOptions;
use crate::parser::ast::Root;
use crate::parser::{self, Statement, SyntaxNode};
use crate::source_map::{SourceFile, SourceId, SourceKind, SourceMap};

pub const DEFAULT_LIB_NAME: &str = "lib.d.ts";
const DEFAULT_LIB_TEXT: &str = include_str!("lib.d.ts");

/// A module specifier written in a file, with its resolution.
#[derive(Debug, Clone)]
pub struct ModuleReference {
    pub specifier: String,
    /// Range of the quoted specifier.
    pub range: TextRange,
    pub resolved: Option<SourceId>,
}

#[derive(Debug)]
pub struct ProgramFile {
    id: SourceId,
    root: SyntaxNode,
    references: Vec<ModuleReference>,
    modules: HashMap<String, Option<SourceId>>,
}

impl ProgramFile {
    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn syntax(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn root(&self) -> Root {
        Root::cast(self.root.clone()).expect("program files are parsed from a Root")
    }

    pub fn references(&self) -> &[ModuleReference] {
        &self.references
    }

    pub fn resolved_module(&self, specifier: &str) -> Option<SourceId> {
        self.modules.get(specifier).copied().flatten()
    }
}

#[derive(Debug)]
pub struct Program {
    sources: SourceMap,
    options: CompilerOptions,
    files: Vec<ProgramFile>,
    by_id: HashMap<SourceId, usize>,
    root_files: Vec<SourceId>,
    symbols: SymbolTable,
    syntax_diagnostics: Diagnostics,
    global_diagnostics: Diagnostics,
    bind_diagnostics: Diagnostics,
}

impl Program {
    /// Loads, parses and binds the program rooted at `root_names`.
    ///
    /// `sources` may already hold configuration files; their ids stay valid.
    /// Missing root files become diagnostics. Only fuel exhaustion in the
    /// parser is fatal.
    pub fn new(
        mut sources: SourceMap,
        root_names: &[PathBuf],
        options: CompilerOptions,
        host: &dyn CompilerHost,
    ) -> crate::Result<Self> {
        let mut files = Vec::new();
        let mut by_id = HashMap::new();
        let mut root_files = Vec::new();
        let mut syntax_diagnostics = Diagnostics::new();
        let mut global_diagnostics = Diagnostics::new();

        let mut queue: Vec<(SourceKind, PathBuf, String)> = Vec::new();
        if !options.no_lib {
            queue.push((
                SourceKind::DefaultLib,
                PathBuf::from(DEFAULT_LIB_NAME),
                DEFAULT_LIB_TEXT.to_string(),
            ));
        }
        let cwd = host.current_directory();
        for name in root_names {
            let path = paths::resolve(&cwd, name);
            match host.read_file(&path) {
                Some(text) => queue.push((SourceKind::Module, path, text)),
                None => global_diagnostics
                    .report_global(DiagnosticKind::FileNotFound)
                    .message(path.to_string_lossy().replace('\\', "/"))
                    .emit(),
            }
        }
        let root_count = queue.len();

        let mut next = 0;
        while next < queue.len() {
            let (kind, path, text) = queue[next].clone();
            let is_root = next < root_count && kind == SourceKind::Module;
            next += 1;

            if sources.lookup(&path).is_some_and(|id| by_id.contains_key(&id)) {
                continue;
            }
            let id = sources.add(kind, &path, text);
            if is_root {
                root_files.push(id);
            }

            let (parse, diagnostics) = parser::parse(sources.get(id).text(), id)?;
            syntax_diagnostics.extend(diagnostics);
            let root = parse.syntax();

            let mut references = Vec::new();
            let mut modules = HashMap::new();
            for (specifier, range) in module_specifiers(&root) {
                let resolved_path = resolve_module(&specifier, &path, host);
                let resolved = match resolved_path {
                    Some(target) => {
                        let target_id = match sources.lookup(&target) {
                            Some(existing) => existing,
                            None => match host.read_file(&target) {
                                Some(target_text) => {
                                    queue.push((SourceKind::Module, target.clone(), target_text.clone()));
                                    sources.add(SourceKind::Module, &target, target_text)
                                }
                                None => continue,
                            },
                        };
                        Some(target_id)
                    }
                    None => None,
                };
                modules.insert(specifier.clone(), resolved);
                references.push(ModuleReference {
                    specifier,
                    range,
                    resolved,
                });
            }

            debug!(file = %path.display(), imports = references.len(), "parsed");
            by_id.insert(id, files.len());
            files.push(ProgramFile {
                id,
                root,
                references,
                modules,
            });
        }

        let (symbols, bind_diagnostics) = binder::bind(files.iter().map(|f| binder::BindInput {
            file: f.id,
            root: f.root(),
            modules: &f.modules,
        }));
        debug!(files = files.len(), "program bound");

        Ok(Self {
            sources,
            options,
            files,
            by_id,
            root_files,
            symbols,
            syntax_diagnostics,
            global_diagnostics,
            bind_diagnostics,
        })
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    pub fn source(&self, id: SourceId) -> &SourceFile {
        self.sources.get(id)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// All files in load order.
    pub fn files(&self) -> impl Iterator<Item = &ProgramFile> {
        self.files.iter()
    }

    pub fn file(&self, id: SourceId) -> Option<&ProgramFile> {
        self.by_id.get(&id).map(|&i| &self.files[i])
    }

    pub fn root_files(&self) -> &[SourceId] {
        &self.root_files
    }

    /// Files that produce declaration output: neither the default library nor `.d.ts` inputs.
    pub fn files_to_emit(&self) -> impl Iterator<Item = &ProgramFile> {
        self.files.iter().filter(|f| {
            let source = self.sources.get(f.id);
            !source.is_default_lib() && !source.is_declaration_file()
        })
    }

    /// Longest directory containing every emitted file.
    pub fn common_source_directory(&self) -> PathBuf {
        paths::common_directory(self.files_to_emit().map(|f| self.sources.get(f.id).path()))
            .unwrap_or_else(|| PathBuf::from("/"))
    }

    pub fn syntactic_diagnostics(&self) -> &Diagnostics {
        &self.syntax_diagnostics
    }

    /// Problems not tied to one file, such as missing root files.
    pub fn global_diagnostics(&self) -> &Diagnostics {
        &self.global_diagnostics
    }

    pub fn bind_diagnostics(&self) -> &Diagnostics {
        &self.bind_diagnostics
    }

    /// Finds the node a [`NodeKey`] was taken from.
    pub fn node(&self, key: NodeKey) -> Option<SyntaxNode> {
        let root = self.file(key.file)?.syntax();
        if !root.text_range().contains_range(key.range) {
            return None;
        }
        let start = match root.covering_element(key.range) {
            NodeOrToken::Node(node) => node,
            NodeOrToken::Token(token) => token.parent()?,
        };
        start
            .ancestors()
            .find(|n| n.text_range() == key.range && n.kind() == key.kind)
    }

    /// File that declares the module a path names, if it is part of the program.
    pub fn file_by_path(&self, path: &Path) -> Option<&ProgramFile> {
        self.sources.lookup(path).and_then(|id| self.file(id))
    }

    pub fn checker(&self) -> crate::checker::Checker<'_> {
        crate::checker::Checker::new(self)
    }
}

/// Module specifiers of import and re-export statements, with their ranges.
fn module_specifiers(root: &SyntaxNode) -> Vec<(String, TextRange)> {
    let Some(root) = Root::cast(root.clone()) else {
        return Vec::new();
    };
    root.statements()
        .filter_map(|statement| match statement {
            Statement::Import(import) => import.module_specifier(),
            Statement::Export(export) => export.module_specifier(),
            _ => None,
        })
        .map(|spec| (spec.value(), spec.as_cst().text_range()))
        .collect()
}
