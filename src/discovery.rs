//! Discovery Module
//!
//! Finds stylesheets under the build context and compiles them against one
//! registry. Loading (reading files, inlining imports) runs in parallel;
//! scoping runs in path order so tokens come out the same on every build.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{render_filename, BuildConfig};
use crate::error::ScopeError;
use crate::imports::inline_imports;
use crate::registry::{NameEntry, ScopedNameRegistry};
use crate::stylesheet::scope_stylesheet;

pub const STYLESHEET_EXTENSIONS: [&str; 3] = ["css", "scss", "sass"];

pub const NAMES_MANIFEST: &str = "scoped-names.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledStylesheet {
    pub source_path: String,
    /// Path relative to the context, without extension.
    pub name: String,
    /// Output file name rendered from `output.cssFilename`.
    pub filename: String,
    pub css: String,
    pub exports: Vec<NameEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileFailure {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOutput {
    pub stylesheets: Vec<CompiledStylesheet>,
    /// Every assignment made during the build, oldest first.
    pub names: Vec<NameEntry>,
    pub errors: Vec<CompileFailure>,
}

impl ProjectOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Writes each stylesheet under `out_dir` plus the name manifest.
    pub fn write_to(&self, out_dir: &Path) -> Result<(), ScopeError> {
        for sheet in &self.stylesheets {
            let target = out_dir.join(&sheet.filename);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| ScopeError::io(parent, e))?;
            }
            fs::write(&target, &sheet.css).map_err(|e| ScopeError::io(&target, e))?;
        }

        fs::create_dir_all(out_dir).map_err(|e| ScopeError::io(out_dir, e))?;
        let manifest = out_dir.join(NAMES_MANIFEST);
        let json = serde_json::to_string_pretty(&self.names).map_err(|e| ScopeError::Json {
            what: "name manifest".to_string(),
            source: e,
        })?;
        fs::write(&manifest, json).map_err(|e| ScopeError::io(&manifest, e))
    }
}

/// Recursively find stylesheet entry points in a directory, sorted by path.
/// SCSS partials (`_name.scss`) are only reachable through imports.
pub fn discover_stylesheets(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && is_stylesheet(path) && !is_partial(path))
        .collect();
    files.sort();
    files
}

fn is_stylesheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| STYLESHEET_EXTENSIONS.contains(&ext))
}

fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'))
}

/// Compile every stylesheet under the config's context directory.
pub fn compile_project(config: &BuildConfig, root: &Path) -> Result<ProjectOutput, ScopeError> {
    config.validate()?;
    let context = config.context_dir(root);
    let files = discover_stylesheets(&context);
    let mut registry = ScopedNameRegistry::with_options(&config.scoped_names)?;

    Ok(compile_stylesheets(&files, &context, config, &mut registry))
}

/// Compile `files` against an existing registry. A file that fails to load or
/// scope is reported in `errors` and the rest still compile. So is a file
/// whose rendered output name is already taken (`a.css` and `a.scss` under
/// `[name].css`): the first one in path order keeps it.
pub fn compile_stylesheets(
    files: &[PathBuf],
    context: &Path,
    config: &BuildConfig,
    registry: &mut ScopedNameRegistry,
) -> ProjectOutput {
    let loaded: Vec<(&PathBuf, Result<String, ScopeError>)> = files
        .par_iter()
        .map(|path| (path, load_stylesheet(path)))
        .collect();

    let mut output = ProjectOutput::default();
    let mut written: HashMap<String, String> = HashMap::new();
    for (index, (path, source)) in loaded.into_iter().enumerate() {
        let source_path = path.to_string_lossy().to_string();
        let result = source
            .and_then(|css| scope_stylesheet(&css, registry))
            .and_then(|scoped| {
                let name = chunk_name(path, context);
                let filename = render_filename(
                    &config.output.css_filename,
                    &name,
                    &index.to_string(),
                    &scoped.css,
                );
                if let Some(first) = written.get(&filename) {
                    return Err(ScopeError::OutputCollision {
                        filename,
                        first: first.clone(),
                    });
                }
                written.insert(filename.clone(), source_path.clone());
                Ok(CompiledStylesheet {
                    source_path: source_path.clone(),
                    name,
                    filename,
                    css: scoped.css,
                    exports: scoped.exports,
                })
            });
        match result {
            Ok(sheet) => output.stylesheets.push(sheet),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to compile stylesheet");
                output.errors.push(CompileFailure {
                    path: source_path,
                    message: e.to_string(),
                });
            }
        }
    }
    output.names = registry.entries().to_vec();
    output
}

/// Reads a stylesheet with its imports inlined. Indented `.sass` files are
/// discovered so they get reported, but only brace syntax can be scoped.
fn load_stylesheet(path: &Path) -> Result<String, ScopeError> {
    if path.extension().is_some_and(|ext| ext == "sass") {
        return Err(ScopeError::UnsupportedSyntax(path.to_path_buf()));
    }
    inline_imports(path)
}

fn chunk_name(path: &Path, context: &Path) -> String {
    let relative = path.strip_prefix(context).unwrap_or(path);
    relative
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
