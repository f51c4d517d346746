//! # Scoped Names Native
//!
//! Short, stable replacement names for CSS-module class names.
//!
//! ## Name Assignment Invariants
//!
//! 1. **One token per name**: a local class name resolves to the same token for
//!    the lifetime of its [`ScopedNameRegistry`]; distinct names never share one.
//! 2. **First-seen order**: tokens are a base-N counter over the configured
//!    alphabet, so with the defaults the first names become `pp_0`, `pp_1`, ...
//!    `pp_9`, `pp_10`.
//! 3. **No ambient state**: a registry is an explicit value owned by one build.
//!    Use [`SharedRegistry`] when several threads scope at once.
//! 4. **Empty names are rejected** with [`ScopeError::EmptyName`].
//!
//! The stylesheet, markup and discovery passes all resolve through the same
//! registry, so a class gets the same token in CSS and in the markup using it.

mod config;
mod discovery;
mod error;
mod idgen;
mod imports;
mod markup;
mod registry;
mod stylesheet;

#[cfg(feature = "napi")]
mod native;

#[cfg(test)]
mod idgen_tests;
#[cfg(test)]
mod imports_tests;
#[cfg(test)]
mod markup_tests;

pub use config::{
    content_hash, render_filename, BuildConfig, BuildMode, DevServerConfig, OutputConfig,
};
pub use discovery::{
    compile_project, compile_stylesheets, discover_stylesheets, CompileFailure,
    CompiledStylesheet, ProjectOutput, NAMES_MANIFEST,
};
pub use error::ScopeError;
pub use idgen::{IdGenerator, IdOptions, DEFAULT_ALPHABET, DEFAULT_PREFIX};
pub use imports::{inline_imports, resolve_import};
pub use markup::{rewrite, rewrite_jsx, rewrite_markup, scope_class_list, MarkupFlavor};
pub use registry::{NameEntry, ScopedNameRegistry, SharedRegistry};
pub use stylesheet::{scope_stylesheet, ScopedStylesheet};

#[cfg(feature = "napi")]
pub use native::{compile_project_native, default_build_config_native, NativeScopedNameRegistry};
