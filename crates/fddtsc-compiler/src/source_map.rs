//! Source storage for a compilation session.
//!
//! Every file the session touches (configuration files, the bundled default
//! library, project sources) gets a [`SourceId`]. Ids are dense and stable for
//! the lifetime of the map, so they double as indexes into per-file tables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fddtsc_core::{LineCol, LineIndex};
use rowan::TextSize;

/// Lightweight handle to a source in a compilation session.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct SourceId(pub(crate) u32);

impl SourceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Describes the origin of a source.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SourceKind {
    /// The bundled `lib.d.ts`.
    DefaultLib,
    /// A project configuration file (`tsconfig.json` and its `extends` chain).
    Config,
    /// A TypeScript module or script in the program.
    Module,
}

#[derive(Clone, Debug)]
pub struct SourceFile {
    kind: SourceKind,
    path: PathBuf,
    text: String,
    line_index: LineIndex,
}

impl SourceFile {
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Path as shown in diagnostics, always with forward slashes.
    pub fn display_name(&self) -> String {
        self.path.to_string_lossy().replace('\\', "/")
    }

    pub fn is_default_lib(&self) -> bool {
        self.kind == SourceKind::DefaultLib
    }

    /// `.d.ts`, `.d.mts` and `.d.cts` inputs produce no output of their own.
    pub fn is_declaration_file(&self) -> bool {
        let name = self.path.to_string_lossy();
        [".d.ts", ".d.mts", ".d.cts"]
            .iter()
            .any(|ext| name.ends_with(ext))
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        self.line_index.line_col(&self.text, offset.into())
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Slice of the text for a range.
    pub fn slice(&self, range: rowan::TextRange) -> &str {
        &self.text[range]
    }
}

/// Registry of all sources.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
    by_path: HashMap<PathBuf, SourceId>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source. Adding the same path twice returns the existing id.
    pub fn add(&mut self, kind: SourceKind, path: impl Into<PathBuf>, text: impl Into<String>) -> SourceId {
        let path = path.into();
        if let Some(&id) = self.by_path.get(&path) {
            return id;
        }
        let text = text.into();
        let id = SourceId(self.files.len() as u32);
        self.files.push(SourceFile {
            kind,
            line_index: LineIndex::new(&text),
            path: path.clone(),
            text,
        });
        self.by_path.insert(path, id);
        id
    }

    /// Look up a source by id.
    ///
    /// Ids are only minted by [`SourceMap::add`], so a foreign id is a caller bug.
    pub fn get(&self, id: SourceId) -> &SourceFile {
        &self.files[id.index()]
    }

    pub fn lookup(&self, path: &Path) -> Option<SourceId> {
        self.by_path.get(path).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SourceId, &SourceFile)> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, f)| (SourceId(i as u32), f))
    }

    /// Number of sources in the map.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
