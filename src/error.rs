use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while scoping names, loading stylesheets or
/// reading the build configuration.
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("local class name must not be empty")]
    EmptyName,

    #[error("invalid alphabet {alphabet:?}: {reason}")]
    InvalidAlphabet { alphabet: String, reason: String },

    #[error("invalid prefix {0:?}: must start with a letter, '_' or '-'")]
    InvalidPrefix(String),

    #[error("invalid build config: {0}")]
    InvalidConfig(String),

    #[error("import cycle detected: {}", format_chain(.0))]
    ImportCycle(Vec<PathBuf>),

    #[error("parent-suffix selector {0:?} cannot be scoped; write the full class name instead")]
    ParentSuffix(String),

    #[error("{0}: indented .sass syntax is not supported, use .scss")]
    UnsupportedSyntax(PathBuf),

    #[error("output {filename:?} is already written by {first}")]
    OutputCollision { filename: String, first: String },

    #[error("unbalanced braces in {0}")]
    UnbalancedBlock(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {what}: {source}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ScopeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScopeError::Io {
            path: path.into(),
            source,
        }
    }
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(feature = "napi")]
impl From<ScopeError> for napi::Error {
    fn from(err: ScopeError) -> Self {
        napi::Error::from_reason(err.to_string())
    }
}
