//! File-system access for the program and the emitter.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use super::paths::normalize;

/// Read side of the file system, as seen by program construction.
pub trait CompilerHost {
    fn read_file(&self, path: &Path) -> Option<String>;

    fn file_exists(&self, path: &Path) -> bool;

    /// Base for relative root names.
    fn current_directory(&self) -> PathBuf;
}

/// Write side of the file system, as seen by the emitter.
pub trait EmitHost {
    fn write_file(&mut self, path: &Path, text: &str) -> io::Result<()>;
}

/// Host backed by the real file system.
#[derive(Debug, Clone)]
pub struct FsHost {
    cwd: PathBuf,
}

impl FsHost {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

impl CompilerHost for FsHost {
    fn read_file(&self, path: &Path) -> Option<String> {
        std::fs::read_to_string(path).ok()
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn current_directory(&self) -> PathBuf {
        self.cwd.clone()
    }
}

impl EmitHost for FsHost {
    fn write_file(&mut self, path: &Path, text: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, text)
    }
}

/// In-memory host for tests and embedding.
///
/// Paths are normalized on the way in, so `/p/./a.ts` and `/p/a.ts` name the
/// same file.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    cwd: PathBuf,
    files: BTreeMap<PathBuf, String>,
    written: BTreeMap<PathBuf, String>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            cwd: PathBuf::from("/"),
            ..Self::default()
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>, text: impl Into<String>) {
        self.files.insert(normalize(path.as_ref()), text.into());
    }

    pub fn written(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.written
            .get(&normalize(path.as_ref()))
            .map(String::as_str)
    }

    pub fn written_files(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.written
            .iter()
            .map(|(p, t)| (p.as_path(), t.as_str()))
    }
}

impl CompilerHost for MemoryHost {
    fn read_file(&self, path: &Path) -> Option<String> {
        self.files.get(&normalize(path)).cloned()
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.contains_key(&normalize(path))
    }

    fn current_directory(&self) -> PathBuf {
        self.cwd.clone()
    }
}

impl EmitHost for MemoryHost {
    fn write_file(&mut self, path: &Path, text: &str) -> io::Result<()> {
        self.written.insert(normalize(path), text.to_string());
        Ok(())
    }
}
