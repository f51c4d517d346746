//! Build configuration.
//!
//! Declarative settings for the host build tool plus the scoped-name options
//! this crate uses. Every field has a default, so a partial JSON document (or
//! `{}`) is a valid config.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ScopeError;
use crate::idgen::IdOptions;

/// Hex digits kept from the content hash in `[hash]` placeholders.
pub const HASH_LENGTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Development,
    Production,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputConfig {
    pub filename: String,
    pub path: PathBuf,
    pub css_filename: String,
    pub css_chunk_filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename: "[name].[hash].js".to_string(),
            path: PathBuf::from("build"),
            css_filename: "[name].css".to_string(),
            css_chunk_filename: "[id].css".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevServerConfig {
    pub open: bool,
    pub port: u16,
    pub hot: bool,
    pub history_api_fallback: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            open: false,
            port: 8088,
            hot: true,
            history_api_fallback: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildConfig {
    pub mode: BuildMode,
    pub devtool: Option<String>,
    pub entry: PathBuf,
    pub context: PathBuf,
    pub html_template: Option<PathBuf>,
    pub output: OutputConfig,
    pub dev_server: DevServerConfig,
    pub scoped_names: IdOptions,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            mode: BuildMode::Development,
            devtool: Some("source-map".to_string()),
            entry: PathBuf::from("src/app.js"),
            context: PathBuf::from("src"),
            html_template: Some(PathBuf::from("src/index.html")),
            output: OutputConfig::default(),
            dev_server: DevServerConfig::default(),
            scoped_names: IdOptions::default(),
        }
    }
}

impl BuildConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ScopeError> {
        let config: BuildConfig = serde_json::from_str(json).map_err(|e| ScopeError::Json {
            what: "build config".to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ScopeError> {
        let json = fs::read_to_string(path).map_err(|e| ScopeError::io(path, e))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ScopeError> {
        if self.dev_server.port == 0 {
            return Err(ScopeError::InvalidConfig(
                "devServer.port must be non-zero".to_string(),
            ));
        }
        if self.entry.as_os_str().is_empty() {
            return Err(ScopeError::InvalidConfig("entry must not be empty".to_string()));
        }
        if self.output.css_filename.is_empty() {
            return Err(ScopeError::InvalidConfig(
                "output.cssFilename must not be empty".to_string(),
            ));
        }
        self.scoped_names.validate()
    }

    /// `context` resolved against the project root.
    pub fn context_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.context)
    }

    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.output.path)
    }
}

/// Fills `[name]`, `[id]`, `[hash]` and `[contenthash]` in a filename
/// template. Both hash forms are the truncated SHA-256 of `content`.
pub fn render_filename(template: &str, name: &str, id: &str, content: &str) -> String {
    let mut rendered = template.replace("[name]", name).replace("[id]", id);
    if rendered.contains("[hash]") || rendered.contains("[contenthash]") {
        let hash = content_hash(content);
        rendered = rendered
            .replace("[contenthash]", &hash)
            .replace("[hash]", &hash);
    }
    rendered
}

pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(HASH_LENGTH);
    hex
}
