//! Relative module resolution.
//!
//! Only `./` and `../` specifiers resolve; bare package names never do.

use std::path::{Path, PathBuf};

use super::host::CompilerHost;
use super::paths::normalize;

const EXTENSIONS: &[&str] = &[".ts", ".tsx", ".d.ts"];
const INDEX_FILES: &[&str] = &["index.ts", "index.d.ts"];

pub fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Resolves `specifier` as written in `containing_file`.
pub fn resolve_module(
    specifier: &str,
    containing_file: &Path,
    host: &dyn CompilerHost,
) -> Option<PathBuf> {
    if !is_relative(specifier) {
        return None;
    }
    let dir = containing_file.parent().unwrap_or(Path::new("/"));
    let base = normalize(&dir.join(specifier));

    // `./a.js` names the output of `./a.ts`
    for (js, ts) in [(".js", ".ts"), (".mjs", ".mts"), (".cjs", ".cts")] {
        if let Some(stem) = specifier.strip_suffix(js) {
            let candidate = normalize(&dir.join(format!("{stem}{ts}")));
            if host.file_exists(&candidate) {
                return Some(candidate);
            }
        }
    }

    if has_ts_extension(specifier) && host.file_exists(&base) {
        return Some(base);
    }

    let base_text = base.to_string_lossy();
    for ext in EXTENSIONS {
        let candidate = PathBuf::from(format!("{base_text}{ext}"));
        if host.file_exists(&candidate) {
            return Some(candidate);
        }
    }
    INDEX_FILES
        .iter()
        .map(|index| base.join(index))
        .find(|candidate| host.file_exists(candidate))
}

fn has_ts_extension(specifier: &str) -> bool {
    [".ts", ".tsx", ".mts", ".cts"]
        .iter()
        .any(|ext| specifier.ends_with(ext))
}
