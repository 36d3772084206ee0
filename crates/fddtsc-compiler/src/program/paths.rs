//! Lexical path helpers. Nothing here touches the file system.

use std::path::{Component, Path, PathBuf};

/// Resolves `.` and `..` components without following symlinks.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Joins `path` onto `base` unless it is already absolute, then normalizes.
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Longest directory containing every path.
pub fn common_directory<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Option<PathBuf> {
    let mut common: Option<PathBuf> = None;
    for path in paths {
        let dir = path.parent().unwrap_or(path);
        common = Some(match common {
            None => dir.to_path_buf(),
            Some(current) => current
                .components()
                .zip(dir.components())
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| a.as_os_str())
                .collect(),
        });
    }
    common
}

/// Relative path from directory `from` to `to`, using `/` separators.
pub fn relative_path(from: &Path, to: &Path) -> String {
    let from: Vec<_> = from.components().collect();
    let to: Vec<_> = to.components().collect();
    let shared = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    let mut parts: Vec<String> = Vec::new();
    parts.extend(std::iter::repeat_n("..".to_string(), from.len() - shared));
    parts.extend(
        to[shared..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

/// Module specifier for importing `target` from a file in `from_dir`.
///
/// Declaration extensions are dropped and `./` is prefixed when needed, as in
/// `import("./models/user")`.
pub fn module_specifier(from_dir: &Path, target: &Path) -> String {
    let mut rel = relative_path(from_dir, target);
    for ext in [".d.ts", ".d.mts", ".d.cts", ".tsx", ".ts", ".mts", ".cts"] {
        if let Some(stripped) = rel.strip_suffix(ext) {
            rel = stripped.to_string();
            break;
        }
    }
    if let Some(dir) = rel.strip_suffix("/index") {
        rel = dir.to_string();
    } else if rel == "index" {
        rel = ".".to_string();
    }
    if rel.starts_with("../") || rel == ".." || rel == "." {
        rel
    } else {
        format!("./{rel}")
    }
}
