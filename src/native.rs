//! Node bindings.
//!
//! The registry is exposed as a JS class so the host build tool creates one
//! per build and hands it to its css and markup hooks, e.g. css-loader's
//! `getLocalIdent: (_ctx, _ident, local) => registry.resolve(local)`.

use napi_derive::napi;
use std::path::Path;

use crate::config::BuildConfig;
use crate::discovery::compile_project;
use crate::idgen::IdOptions;
use crate::markup::{rewrite_jsx, rewrite_markup};
use crate::registry::ScopedNameRegistry;
use crate::stylesheet::scope_stylesheet;

#[napi(js_name = "ScopedNameRegistry")]
pub struct NativeScopedNameRegistry {
    inner: ScopedNameRegistry,
}

#[napi]
impl NativeScopedNameRegistry {
    #[napi(constructor)]
    pub fn new(prefix: Option<String>, alphabet: Option<String>) -> napi::Result<Self> {
        let defaults = IdOptions::default();
        let options = IdOptions {
            prefix: prefix.unwrap_or(defaults.prefix),
            alphabet: alphabet.unwrap_or(defaults.alphabet),
            suffix: defaults.suffix,
        };
        Ok(Self {
            inner: ScopedNameRegistry::with_options(&options)?,
        })
    }

    #[napi]
    pub fn resolve(&mut self, local_name: String) -> napi::Result<String> {
        Ok(self.inner.resolve(&local_name)?)
    }

    #[napi(getter)]
    pub fn size(&self) -> u32 {
        self.inner.len() as u32
    }

    #[napi]
    pub fn scope_stylesheet(&mut self, source: String) -> napi::Result<serde_json::Value> {
        let scoped = scope_stylesheet(&source, &mut self.inner)?;
        serde_json::to_value(scoped).map_err(|e| napi::Error::from_reason(e.to_string()))
    }

    #[napi]
    pub fn rewrite_markup(&mut self, source: String) -> napi::Result<String> {
        Ok(rewrite_markup(&source, &mut self.inner)?)
    }

    #[napi]
    pub fn rewrite_jsx(&mut self, source: String) -> napi::Result<String> {
        Ok(rewrite_jsx(&source, &mut self.inner)?)
    }

    #[napi(js_name = "toJSON")]
    pub fn to_json(&self) -> napi::Result<serde_json::Value> {
        Ok(self.inner.to_json()?)
    }
}

#[napi]
pub fn default_build_config_native() -> napi::Result<serde_json::Value> {
    serde_json::to_value(BuildConfig::default())
        .map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[napi]
pub fn compile_project_native(
    root: String,
    config_json: Option<String>,
) -> napi::Result<serde_json::Value> {
    let config = match config_json {
        Some(json) => BuildConfig::from_json_str(&json)?,
        None => BuildConfig::default(),
    };
    let output = compile_project(&config, Path::new(&root))?;
    serde_json::to_value(output).map_err(|e| napi::Error::from_reason(e.to_string()))
}
