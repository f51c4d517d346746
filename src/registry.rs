//! Scoped-name registry.
//!
//! Maps every local class name seen during a build to a short token. The
//! mapping only grows: a name keeps its first token for the lifetime of the
//! registry, and two different names never share one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::ScopeError;
use crate::idgen::{IdGenerator, IdOptions};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameEntry {
    pub local: String,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct ScopedNameRegistry {
    index: HashMap<String, usize>,
    entries: Vec<NameEntry>,
    ids: IdGenerator,
}

impl ScopedNameRegistry {
    /// Registry with the default `pp_` prefix and decimal alphabet.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
            ids: IdGenerator::default(),
        }
    }

    pub fn with_options(options: &IdOptions) -> Result<Self, ScopeError> {
        Ok(Self {
            index: HashMap::new(),
            entries: Vec::new(),
            ids: IdGenerator::new(options)?,
        })
    }

    /// Returns the token for `local`, assigning the next one on first sight.
    pub fn resolve(&mut self, local: &str) -> Result<String, ScopeError> {
        if local.is_empty() {
            return Err(ScopeError::EmptyName);
        }
        if let Some(&slot) = self.index.get(local) {
            return Ok(self.entries[slot].token.clone());
        }

        let token = self.ids.next_id();
        tracing::debug!(local, token = %token, "assigned scoped name");
        let slot = self.entries.len();
        self.entries.push(NameEntry {
            local: local.to_string(),
            token: token.clone(),
        });
        self.index.insert(local.to_string(), slot);
        Ok(token)
    }

    /// Lookup without assignment.
    pub fn get(&self, local: &str) -> Option<&str> {
        self.index
            .get(local)
            .map(|&slot| self.entries[slot].token.as_str())
    }

    pub fn prefix(&self) -> &str {
        self.ids.prefix()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All assignments, oldest first.
    pub fn entries(&self) -> &[NameEntry] {
        &self.entries
    }

    pub fn to_json(&self) -> Result<serde_json::Value, ScopeError> {
        serde_json::to_value(&self.entries).map_err(|source| ScopeError::Json {
            what: "name registry".to_string(),
            source,
        })
    }
}

impl Default for ScopedNameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry handle for hosts that scope stylesheets from several threads.
/// Lookup-or-insert happens under one lock, so a name still gets exactly one
/// token.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<ScopedNameRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: ScopedNameRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    pub fn resolve(&self, local: &str) -> Result<String, ScopeError> {
        self.lock().resolve(local)
    }

    pub fn get(&self, local: &str) -> Option<String> {
        self.lock().get(local).map(str::to_string)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<NameEntry> {
        self.lock().entries().to_vec()
    }

    /// Runs `f` with exclusive access, e.g. to scope a whole stylesheet
    /// without interleaving with other threads.
    pub fn with<R>(&self, f: impl FnOnce(&mut ScopedNameRegistry) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, ScopedNameRegistry> {
        // `resolve` indexes an entry only after pushing it, so a poisoned
        // registry never points past `entries`.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
