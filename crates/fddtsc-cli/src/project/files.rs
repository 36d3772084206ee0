//! Root file discovery from `include` and `exclude` patterns.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use fddtsc_compiler::program::paths;
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::trace;
use walkdir::{DirEntry, WalkDir};

/// Extensions picked up by wildcard includes.
const EXTENSIONS: &[&str] = &[".d.ts", ".d.mts", ".d.cts", ".ts", ".tsx", ".mts", ".cts"];

/// Declaration extensions and the source extensions that produce them.
const DECLARATION_SOURCES: &[(&str, &[&str])] = &[
    (".d.ts", &[".ts", ".tsx"]),
    (".d.mts", &[".mts"]),
    (".d.cts", &[".cts"]),
];

pub const DEFAULT_INCLUDE: &str = "**/*";
pub const DEFAULT_EXCLUDE: &[&str] = &["node_modules", "bower_components", "jspm_packages"];

/// Patterns from one config file, relative to that file's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternList {
    pub dir: PathBuf,
    pub patterns: Vec<String>,
}

impl PatternList {
    pub fn new(dir: impl Into<PathBuf>, patterns: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            patterns,
        }
    }

    /// Absolute patterns with `/` separators.
    pub fn absolute(&self) -> Vec<String> {
        self.patterns
            .iter()
            .map(|pattern| slash_path(&paths::resolve(&self.dir, Path::new(pattern))))
            .collect()
    }
}

/// Every supported file matched by `include` and not by `exclude`.
///
/// Files come in walk order: a directory's files before its subdirectories,
/// each group sorted by name. A declaration file is dropped when the source
/// it would be generated from was found too.
pub fn discover(include: &[String], exclude: &[String]) -> Result<Vec<PathBuf>, globset::Error> {
    let include: Vec<String> = include.iter().map(|p| expand_directory(p)).collect();
    let exclude: Vec<String> = exclude
        .iter()
        .flat_map(|p| [p.clone(), format!("{}/**", p.trim_end_matches('/'))])
        .collect();
    let include_set = glob_set(&include)?;
    let exclude_set = glob_set(&exclude)?;

    let mut found = Vec::new();
    let mut seen = HashSet::new();
    for pattern in &include {
        let root = walk_root(pattern);
        if !root.is_dir() {
            continue;
        }
        let walker = WalkDir::new(&root)
            .sort_by(files_first)
            .into_iter()
            .filter_entry(|entry| keep_entry(entry, &exclude_set));
        for entry in walker.filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !is_supported(path) || !include_set.is_match(path) {
                continue;
            }
            if seen.insert(path.to_path_buf()) {
                trace!(file = %path.display(), "included");
                found.push(path.to_path_buf());
            }
        }
    }

    found.retain(|path| !is_shadowed(path, &seen));
    Ok(found)
}

fn glob_set(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(glob(pattern)?);
    }
    builder.build()
}

fn glob(pattern: &str) -> Result<Glob, globset::Error> {
    GlobBuilder::new(pattern).literal_separator(true).build()
}

fn has_wildcard(segment: &str) -> bool {
    segment.contains(['*', '?', '[', '{'])
}

/// A pattern naming an existing directory includes everything below it.
fn expand_directory(pattern: &str) -> String {
    let last = pattern.rsplit('/').next().unwrap_or(pattern);
    if !has_wildcard(last) && Path::new(pattern).is_dir() {
        return format!("{}/**/*", pattern.trim_end_matches('/'));
    }
    pattern.to_string()
}

/// Deepest directory of `pattern` without wildcards.
fn walk_root(pattern: &str) -> PathBuf {
    let mut root = PathBuf::new();
    for component in Path::new(pattern).components() {
        if has_wildcard(&component.as_os_str().to_string_lossy()) {
            return root;
        }
        root.push(component);
    }
    // No wildcard at all: a single file, walked from its directory.
    root.parent().map(Path::to_path_buf).unwrap_or(root)
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn keep_entry(entry: &DirEntry, exclude: &GlobSet) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let hidden = entry.file_name().to_string_lossy().starts_with('.');
    !hidden && !exclude.is_match(entry.path())
}

fn is_supported(path: &Path) -> bool {
    let name = path.to_string_lossy();
    EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

fn is_shadowed(path: &Path, found: &HashSet<PathBuf>) -> bool {
    let name = path.to_string_lossy();
    DECLARATION_SOURCES.iter().any(|(declaration, sources)| {
        name.strip_suffix(declaration).is_some_and(|stem| {
            sources
                .iter()
                .any(|ext| found.contains(Path::new(&format!("{stem}{ext}"))))
        })
    })
}

fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
