//! Synchronous `@import` inlining.
//!
//! Local imports are replaced by the imported file's contents so the scoper
//! sees one flat sheet. Remote imports stay as written. Each file is inlined at
//! most once per entry sheet.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ScopeError;

lazy_static! {
    static ref IMPORT_RE: Regex = Regex::new(r"(?m)^[ \t]*@import\s+([^;]+);").unwrap();
}

/// Resolves an import id against the directory of the importing file. A
/// leading `./` is dropped before joining.
pub fn resolve_import(id: &str, basedir: &Path) -> PathBuf {
    let id = id.strip_prefix("./").unwrap_or(id);
    basedir.join(id)
}

/// Reads `entry` and recursively inlines its local imports.
pub fn inline_imports(entry: &Path) -> Result<String, ScopeError> {
    ImportInliner::default().inline_file(entry)
}

#[derive(Default)]
struct ImportInliner {
    stack: Vec<PathBuf>,
    inlined: HashSet<PathBuf>,
}

impl ImportInliner {
    fn inline_file(&mut self, path: &Path) -> Result<String, ScopeError> {
        let canonical = fs::canonicalize(path).map_err(|e| ScopeError::io(path, e))?;
        let source = fs::read_to_string(&canonical).map_err(|e| ScopeError::io(path, e))?;
        let basedir = canonical
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        self.stack.push(canonical.clone());
        self.inlined.insert(canonical);

        let mut out = String::with_capacity(source.len());
        let mut last = 0;
        for caps in IMPORT_RE.captures_iter(&source) {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            out.push_str(&source[last..whole.start]);
            last = whole.end;

            let statement = &source[whole.clone()];
            let Some((targets, media)) = parse_import_args(&caps[1]) else {
                out.push_str(statement);
                continue;
            };
            if targets.iter().any(|t| is_remote(t)) {
                out.push_str(statement);
                continue;
            }

            // Keep the statement's leading indentation.
            let indent_len = statement.len() - statement.trim_start().len();
            out.push_str(&statement[..indent_len]);

            for target in targets {
                let file = find_import_file(&resolve_import(&target, &basedir))?;
                let canonical = fs::canonicalize(&file).map_err(|e| ScopeError::io(&file, e))?;

                if self.stack.contains(&canonical) {
                    let mut chain = self.stack.clone();
                    chain.push(canonical);
                    return Err(ScopeError::ImportCycle(chain));
                }
                if self.inlined.contains(&canonical) {
                    tracing::debug!(path = %canonical.display(), "import already inlined");
                    continue;
                }

                tracing::debug!(path = %canonical.display(), "inlining import");
                let inlined = self.inline_file(&canonical)?;
                if media.is_empty() {
                    out.push_str(&inlined);
                } else {
                    out.push_str(&format!("@media {} {{\n{}\n}}", media, inlined));
                }
            }
        }
        out.push_str(&source[last..]);

        self.stack.pop();
        Ok(out)
    }
}

/// Tries the path as written, then the SCSS conventions for extension-less
/// ids: `x.scss`, `_x.scss`, `x.css`.
fn find_import_file(resolved: &Path) -> Result<PathBuf, ScopeError> {
    if resolved.is_file() {
        return Ok(resolved.to_path_buf());
    }

    if resolved.extension().is_none() {
        if let Some(name) = resolved.file_name().and_then(|n| n.to_str()) {
            let candidates = [
                resolved.with_file_name(format!("{}.scss", name)),
                resolved.with_file_name(format!("_{}.scss", name)),
                resolved.with_file_name(format!("{}.css", name)),
            ];
            if let Some(found) = candidates.into_iter().find(|c| c.is_file()) {
                return Ok(found);
            }
        }
    }

    Err(ScopeError::io(
        resolved,
        io::Error::new(io::ErrorKind::NotFound, "imported stylesheet not found"),
    ))
}

fn is_remote(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://") || target.starts_with("//")
}

/// Splits `"a", 'b', url(c) screen` into the import targets and the trailing
/// media query. Returns `None` when the arguments are not understood.
fn parse_import_args(args: &str) -> Option<(Vec<String>, String)> {
    let mut targets = Vec::new();
    let mut rest = args.trim();

    loop {
        let (target, after) = parse_import_target(rest)?;
        targets.push(target);
        rest = after.trim_start();
        match rest.strip_prefix(',') {
            Some(more) => rest = more.trim_start(),
            None => break,
        }
    }

    Some((targets, rest.trim().to_string()))
}

fn parse_import_target(input: &str) -> Option<(String, &str)> {
    if let Some(inner) = input.strip_prefix("url(") {
        let close = inner.find(')')?;
        let target = inner[..close].trim().trim_matches(|c| c == '"' || c == '\'');
        return Some((target.to_string(), &inner[close + 1..]));
    }

    let quote = input.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let body = &input[1..];
    let close = body.find(quote)?;
    Some((body[..close].to_string(), &body[close + 1..]))
}
