//! Core support for catsync
//!
//! This crate provides the pieces every other catsync crate builds on:
//!
//! - **Error handling**: errors with codes, context and recovery suggestions
//! - **Configuration**: TOML run configuration with validation
//! - **Catalogs**: the ordered catalog model and the catalog store
//! - **Logging**: `tracing` subscriber setup
//!
//! # Example
//!
//! ```rust,no_run
//! use catsync_core::catalog::{CatalogStore, JsonFileStore};
//! use catsync_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid configuration");
//! let store = JsonFileStore::new(&config.schema.store.root, &config.schema.store.file_name);
//! let canonical = store
//!     .load(&config.schema.sync.canonical_locale)
//!     .expect("unreadable catalog");
//! println!("canonical catalog present: {}", canonical.is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;

pub use error::{exit_codes, Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{Catalog, CatalogStore, JsonFileStore, MemoryStore, Message, StoreError};
    pub use crate::config::{effective_base_locale, Config, ConfigSchema, LocaleDescriptor};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::logging::{LogConfig, LogFormat};
}
