//! Project loading: `tsconfig.json`, its `extends` chain and root files.
//!
//! Every config file read lands in the project's [`SourceMap`] as a
//! [`SourceKind::Config`] source, so configuration diagnostics point into
//! the file that caused them and the same map is handed on to the program.

mod files;
mod jsonc;
mod options;

#[cfg(test)]
mod jsonc_tests;
#[cfg(test)]
mod project_tests;

use std::path::{Path, PathBuf};

use fddtsc_compiler::diagnostics::{DiagnosticBuilder, DiagnosticKind, Span};
use fddtsc_compiler::options::CompilerOptions;
use fddtsc_compiler::program::paths;
use fddtsc_compiler::source_map::{SourceKind, SourceMap};
use fddtsc_compiler::{Diagnostics, DiagnosticsPrinter};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use files::{DEFAULT_EXCLUDE, DEFAULT_INCLUDE, PatternList};
use options::Lookup;

pub const CONFIG_FILE_NAME: &str = "tsconfig.json";

/// A project ready to become a program.
#[derive(Debug)]
pub struct Project {
    pub config_path: PathBuf,
    pub options: CompilerOptions,
    pub root_names: Vec<PathBuf>,
    /// Holds the config file and every file it extends.
    pub sources: SourceMap,
}

/// The project configuration could not be used.
#[derive(Debug, thiserror::Error)]
#[error("invalid project configuration: {} error(s)", diagnostics.error_count())]
pub struct ConfigError {
    diagnostics: Diagnostics,
    sources: SourceMap,
}

impl ConfigError {
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        self.diagnostics.printer(&self.sources)
    }
}

impl Project {
    /// Loads the project at `path`: a config file, or a directory holding
    /// `tsconfig.json`. Relative paths are taken from `cwd`.
    pub fn load(path: &Path, cwd: &Path) -> Result<Self, ConfigError> {
        let path = paths::resolve(cwd, path);
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE_NAME)
        } else {
            path
        };

        let mut loader = Loader::default();
        let layer = loader
            .read(&config_path, None)
            .filter(|_| !loader.diagnostics.has_errors());
        match layer.and_then(|layer| loader.finish(&config_path, layer)) {
            Some(project) => {
                debug!(
                    config = %project.config_path.display(),
                    roots = project.root_names.len(),
                    "project loaded"
                );
                Ok(project)
            }
            None => Err(ConfigError {
                diagnostics: loader.diagnostics,
                sources: loader.sources,
            }),
        }
    }

    pub fn directory(&self) -> &Path {
        self.config_path.parent().unwrap_or(Path::new("/"))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    extends: Option<Extends>,
    compiler_options: Option<Map<String, Value>>,
    files: Option<Vec<String>>,
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Extends {
    One(String),
    Many(Vec<String>),
}

impl Extends {
    fn into_vec(self) -> Vec<String> {
        match self {
            Extends::One(spec) => vec![spec],
            Extends::Many(specs) => specs,
        }
    }
}

/// One config file merged over everything it extends.
#[derive(Debug, Default)]
struct ConfigLayer {
    options: Map<String, Value>,
    files: Option<Vec<PathBuf>>,
    include: Option<PatternList>,
    exclude: Option<PatternList>,
}

impl ConfigLayer {
    /// `top` wins: options key by key, file lists as a whole.
    fn overlay(mut self, top: ConfigLayer) -> ConfigLayer {
        self.options.extend(top.options);
        ConfigLayer {
            options: self.options,
            files: top.files.or(self.files),
            include: top.include.or(self.include),
            exclude: top.exclude.or(self.exclude),
        }
    }
}

#[derive(Default)]
struct Loader {
    sources: SourceMap,
    diagnostics: Diagnostics,
    /// Config files being read, outermost first.
    stack: Vec<PathBuf>,
}

impl Loader {
    fn report(&mut self, kind: DiagnosticKind, span: Option<Span>) -> DiagnosticBuilder<'_> {
        match span {
            Some(span) => self.diagnostics.report(kind, span),
            None => self.diagnostics.report_global(kind),
        }
    }

    /// Reads `path` and its bases. `from` is the `extends` key that led here.
    fn read(&mut self, path: &Path, from: Option<Span>) -> Option<ConfigLayer> {
        let Ok(text) = std::fs::read_to_string(path) else {
            self.report(DiagnosticKind::ConfigFileNotFound, from)
                .message(display(path))
                .emit();
            return None;
        };
        let clean = jsonc::strip(&text);
        let id = self.sources.add(SourceKind::Config, path, text);
        debug!(config = %path.display(), "reading config");

        let raw: RawConfig = if clean.trim().is_empty() {
            RawConfig::default()
        } else {
            match serde_json::from_str(&clean) {
                Ok(raw) => raw,
                Err(err) => {
                    let offset = jsonc::error_offset(&clean, err.line(), err.column());
                    self.diagnostics
                        .report(DiagnosticKind::ConfigSyntax, Span::from_offsets(id, offset, offset))
                        .message(jsonc::error_message(&err))
                        .emit();
                    return None;
                }
            }
        };

        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let key_span = |key: &str, from: usize| {
            jsonc::find_key(&clean, key, from).map(|range| Span::from_offsets(id, range.start, range.end))
        };

        self.stack.push(path.to_path_buf());
        let mut layer = ConfigLayer::default();
        let extends_span = key_span("extends", 0);
        for spec in raw.extends.map(Extends::into_vec).unwrap_or_default() {
            let Some(base_path) = resolve_extends(&dir, &spec) else {
                self.report(DiagnosticKind::ExtendsNotFound, extends_span)
                    .message(&spec)
                    .emit();
                continue;
            };
            if self.stack.contains(&base_path) {
                let chain: Vec<String> = self
                    .stack
                    .iter()
                    .chain(std::iter::once(&base_path))
                    .map(|p| display(p))
                    .collect();
                self.report(DiagnosticKind::ExtendsCircular, extends_span)
                    .message(chain.join(" -> "))
                    .emit();
                continue;
            }
            if let Some(base) = self.read(&base_path, extends_span) {
                layer = layer.overlay(base);
            }
        }
        self.stack.pop();

        let section = key_span("compilerOptions", 0).map_or(0, |span| usize::from(span.range.end()));
        let mut own_options = Map::new();
        for (name, value) in raw.compiler_options.unwrap_or_default() {
            let span = key_span(&name, section);
            match options::lookup(&name) {
                Lookup::Known(ty) => match ty.read(&value, &dir) {
                    Some(value) => {
                        own_options.insert(name, value);
                    }
                    None => self
                        .report(DiagnosticKind::CompilerOptionType, span)
                        .args(&[name.as_str(), ty.name()])
                        .emit(),
                },
                Lookup::Ignored => debug!(option = %name, "compiler option has no effect on declarations"),
                Lookup::Unknown => self
                    .report(DiagnosticKind::UnknownCompilerOption, span)
                    .message(&name)
                    .emit(),
            }
        }

        let own = ConfigLayer {
            options: own_options,
            files: raw
                .files
                .map(|files| files.iter().map(|f| paths::resolve(&dir, Path::new(f))).collect()),
            include: raw.include.map(|p| PatternList::new(&dir, p)),
            exclude: raw.exclude.map(|p| PatternList::new(&dir, p)),
        };
        Some(layer.overlay(own))
    }

    fn finish(&mut self, config_path: &Path, layer: ConfigLayer) -> Option<Project> {
        let mut options = match options::into_compiler_options(layer.options) {
            Ok(options) => options,
            Err(err) => {
                self.diagnostics
                    .report_global(DiagnosticKind::ConfigSyntax)
                    .message(err.to_string())
                    .emit();
                return None;
            }
        };
        options::force_declaration_only(&mut options);

        let dir = config_path.parent().unwrap_or(Path::new("/"));
        let explicit_files = layer.files.clone().unwrap_or_default();
        // Only `files` given: nothing is globbed.
        let include = match (&layer.include, &layer.files) {
            (Some(include), _) => Some(include.clone()),
            (None, Some(_)) => None,
            (None, None) => Some(PatternList::new(dir, vec![DEFAULT_INCLUDE.to_string()])),
        };
        let exclude = layer.exclude.clone().unwrap_or_else(|| {
            let mut defaults: Vec<String> = DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect();
            for out in [&options.out_dir, &options.declaration_dir].into_iter().flatten() {
                defaults.push(out.to_string_lossy().replace('\\', "/"));
            }
            PatternList::new(dir, defaults)
        });

        let mut root_names = explicit_files;
        if let Some(include) = &include {
            match files::discover(&include.absolute(), &exclude.absolute()) {
                Ok(found) => {
                    for file in found {
                        if !root_names.contains(&file) {
                            root_names.push(file);
                        }
                    }
                }
                Err(err) => {
                    self.diagnostics
                        .report_global(DiagnosticKind::ConfigSyntax)
                        .message(err.to_string())
                        .emit();
                    return None;
                }
            }
        }

        if root_names.is_empty() {
            let include_text = pattern_json(include.as_ref());
            let exclude_text = pattern_json(layer.exclude.as_ref());
            self.diagnostics
                .report_global(DiagnosticKind::NoInputs)
                .args(&[display(config_path).as_str(), include_text.as_str(), exclude_text.as_str()])
                .emit();
            return None;
        }

        Some(Project {
            config_path: config_path.to_path_buf(),
            options,
            root_names,
            sources: std::mem::take(&mut self.sources),
        })
    }
}

/// Finds the file an `extends` entry names.
///
/// Paths are taken relative to the extending config, with `.json` appended
/// when the bare name does not exist. Anything else is looked up in
/// `node_modules` directories from `dir` upward.
fn resolve_extends(dir: &Path, spec: &str) -> Option<PathBuf> {
    let is_path = spec.starts_with("./") || spec.starts_with("../") || Path::new(spec).is_absolute();
    if is_path {
        let path = paths::resolve(dir, Path::new(spec));
        return [path.clone(), with_json_extension(&path)]
            .into_iter()
            .find(|p| p.is_file());
    }
    dir.ancestors()
        .map(|ancestor| ancestor.join("node_modules").join(spec))
        .find_map(|path| {
            [
                path.clone(),
                with_json_extension(&path),
                path.join(CONFIG_FILE_NAME),
            ]
            .into_iter()
            .find(|p| p.is_file())
        })
}

fn with_json_extension(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".json");
    PathBuf::from(name)
}

fn pattern_json(list: Option<&PatternList>) -> String {
    let patterns = list.map(|l| l.patterns.as_slice()).unwrap_or_default();
    serde_json::to_string(patterns).unwrap_or_default()
}

fn display(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
