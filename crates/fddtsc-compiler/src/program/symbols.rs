//! Symbols and per-file symbol tables produced by the binder.

use std::collections::{HashMap, HashSet};
use std::ops::BitOr;

use indexmap::IndexMap;
use rowan::TextRange;

use crate::parser::{SyntaxKind, SyntaxNode};
use crate::source_map::SourceId;

/// Identity of a symbol. Alias identity in the checker and the transform is
/// always a `SymbolId`, never structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(u32);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SymbolFlags(u32);

impl SymbolFlags {
    pub const NONE: Self = Self(0);
    pub const TYPE_ALIAS: Self = Self(1 << 0);
    pub const INTERFACE: Self = Self(1 << 1);
    pub const FUNCTION: Self = Self(1 << 2);
    pub const VARIABLE: Self = Self(1 << 3);
    pub const BLOCK_SCOPED_VARIABLE: Self = Self(1 << 4);
    /// An import binding; resolves to a symbol in another file.
    pub const ALIAS: Self = Self(1 << 5);
    pub const TYPE_PARAMETER: Self = Self(1 << 6);
    /// A whole file, reachable through namespace imports and `export * as`.
    pub const MODULE: Self = Self(1 << 7);

    pub const TYPE: Self = Self(Self::TYPE_ALIAS.0 | Self::INTERFACE.0 | Self::TYPE_PARAMETER.0);
    pub const VALUE: Self =
        Self(Self::FUNCTION.0 | Self::VARIABLE.0 | Self::BLOCK_SCOPED_VARIABLE.0);

    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SymbolFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Position-based handle to a syntax node, stable across tree views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub file: SourceId,
    pub range: TextRange,
    pub kind: SyntaxKind,
}

impl NodeKey {
    pub fn of(file: SourceId, node: &SyntaxNode) -> Self {
        Self {
            file,
            range: node.text_range(),
            kind: node.kind(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub file: SourceId,
    pub node: SyntaxNode,
}

impl Declaration {
    pub fn kind(&self) -> SyntaxKind {
        self.node.kind()
    }

    /// Range of the declared name, falling back to the whole node.
    pub fn name_range(&self) -> TextRange {
        self.node
            .children()
            .find(|n| n.kind() == SyntaxKind::Name)
            .map(|n| n.text_range())
            .unwrap_or_else(|| self.node.text_range())
    }
}

/// What an import binding refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTarget {
    pub module: Option<SourceId>,
    pub specifier: String,
    pub name: ImportedName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportedName {
    Default,
    Named(String),
    Namespace,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub flags: SymbolFlags,
    pub declarations: Vec<Declaration>,
    pub import: Option<ImportTarget>,
    /// Set for `MODULE` symbols.
    pub module: Option<SourceId>,
}

impl Symbol {
    pub fn declarations_of(&self, kind: SyntaxKind) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(move |d| d.kind() == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    Local(SymbolId),
    Reexport { module: Option<SourceId>, name: String },
    Namespace(Option<SourceId>),
}

#[derive(Debug, Clone, Default)]
pub struct FileSymbols {
    pub is_module: bool,
    pub locals: IndexMap<String, SymbolId>,
    pub exports: IndexMap<String, ExportTarget>,
    pub star_exports: Vec<Option<SourceId>>,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    pub(super) symbols: Vec<Symbol>,
    pub(super) files: HashMap<SourceId, FileSymbols>,
    pub(super) module_symbols: HashMap<SourceId, SymbolId>,
    pub(super) globals: IndexMap<String, SymbolId>,
    pub(super) nodes: HashMap<NodeKey, SymbolId>,
}

impl SymbolTable {
    pub(super) fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub(super) fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    pub fn file(&self, file: SourceId) -> Option<&FileSymbols> {
        self.files.get(&file)
    }

    pub fn globals(&self) -> &IndexMap<String, SymbolId> {
        &self.globals
    }

    pub fn module_symbol(&self, file: SourceId) -> Option<SymbolId> {
        self.module_symbols.get(&file).copied()
    }

    /// Symbol declared by a type parameter, `infer` or mapped-type key node.
    pub fn node_symbol(&self, key: NodeKey) -> Option<SymbolId> {
        self.nodes.get(&key).copied()
    }

    /// File-level name lookup: module locals first, then globals.
    pub fn lookup(&self, file: SourceId, name: &str) -> Option<SymbolId> {
        self.files
            .get(&file)
            .and_then(|f| f.locals.get(name))
            .or_else(|| self.globals.get(name))
            .copied()
    }

    /// Follows import bindings to the symbol they name.
    ///
    /// Returns the symbol itself when it is not an import, and `None` when the
    /// chain ends in an unresolved module or a missing export.
    pub fn resolve_alias(&self, id: SymbolId) -> Option<SymbolId> {
        let mut seen = HashSet::new();
        let mut current = id;
        loop {
            if !seen.insert(current) {
                return None;
            }
            let symbol = self.get(current);
            let Some(target) = &symbol.import else {
                return Some(current);
            };
            let module = target.module?;
            current = match &target.name {
                ImportedName::Namespace => self.module_symbol(module)?,
                ImportedName::Default => self.export_raw(module, "default", &mut HashSet::new())?,
                ImportedName::Named(name) => self.export_raw(module, name, &mut HashSet::new())?,
            };
        }
    }

    /// Export `name` of `module`, with import bindings resolved.
    pub fn export_of(&self, module: SourceId, name: &str) -> Option<SymbolId> {
        let raw = self.export_raw(module, name, &mut HashSet::new())?;
        self.resolve_alias(raw)
    }

    /// Names exported by `module`, including those re-exported through `export *`.
    pub fn export_names(&self, module: SourceId) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_export_names(module, &mut out, &mut HashSet::new());
        out
    }

    fn collect_export_names(&self, module: SourceId, out: &mut Vec<String>, seen: &mut HashSet<SourceId>) {
        if !seen.insert(module) {
            return;
        }
        let Some(file) = self.files.get(&module) else {
            return;
        };
        for name in file.exports.keys() {
            if !out.contains(name) {
                out.push(name.clone());
            }
        }
        for star in file.star_exports.iter().flatten() {
            self.collect_export_names(*star, out, seen);
        }
    }

    fn export_raw(&self, module: SourceId, name: &str, seen: &mut HashSet<SourceId>) -> Option<SymbolId> {
        if !seen.insert(module) {
            return None;
        }
        let file = self.files.get(&module)?;
        match file.exports.get(name) {
            Some(ExportTarget::Local(id)) => Some(*id),
            Some(ExportTarget::Reexport { module, name }) => {
                self.export_raw((*module)?, name, &mut HashSet::new())
            }
            Some(ExportTarget::Namespace(module)) => self.module_symbol((*module)?),
            None if name == "default" => None,
            None => file
                .star_exports
                .iter()
                .flatten()
                .find_map(|star| self.export_raw(*star, name, seen)),
        }
    }

    /// Name under which `module` exports `symbol`, if it does.
    pub fn export_name_of(&self, module: SourceId, symbol: SymbolId) -> Option<String> {
        self.export_names(module)
            .into_iter()
            .find(|name| self.export_of(module, name) == Some(symbol))
    }
}
