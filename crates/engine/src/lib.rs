//! Incremental catalog translation
//!
//! Given a canonical message catalog and a set of locales, the engine finds
//! the keys each locale is missing, sends them to a [`TranslationProvider`]
//! in bounded chunks, repairs whatever the provider answers, and persists a
//! catalog that follows the base catalog's key order.
//!
//! - [`diff`] and [`batch`] decide what to send
//! - [`extract`], [`repair`] and [`response`] turn untrusted output into a
//!   translation result
//! - [`merge`] builds the catalog to persist
//! - [`orchestrator`] runs one locale through its phases
//! - [`scheduler`] runs many locales on a bounded worker pool
//!
//! # Example
//!
//! ```rust,no_run
//! use catsync_core::catalog::{CatalogStore, JsonFileStore};
//! use catsync_core::config::LocaleDescriptor;
//! use catsync_engine::{shutdown, Orchestrator, Scheduler, SyncSettings};
//! use catsync_provider::{ChatClient, ProviderConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store: Arc<dyn CatalogStore> = Arc::new(JsonFileStore::new("resources/translations", "translation.json"));
//!     let provider = Arc::new(ChatClient::new(ProviderConfig::default().with_api_key("sk-..."))?);
//!     let orchestrator = Orchestrator::new(store, provider, SyncSettings::default());
//!
//!     let (_trigger, shutdown) = shutdown::channel();
//!     let report = Scheduler::new(orchestrator, 2)
//!         .run(vec![LocaleDescriptor::new("fr", "French")], shutdown)
//!         .await?;
//!     println!("{} keys translated", report.total_translated());
//!     Ok(())
//! }
//! ```
//!
//! [`TranslationProvider`]: catsync_provider::TranslationProvider

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod diff;
pub mod error;
pub mod extract;
pub mod merge;
pub mod orchestrator;
pub mod outcome;
pub mod prompt;
pub mod repair;
pub mod response;
pub mod scheduler;
pub mod settings;
pub mod shutdown;
pub mod territory;

#[cfg(test)]
mod testing;

pub use error::{ExtractionError, RepairError, SyncError, SyncResult};
pub use orchestrator::{audit_locale, load_canonical, Orchestrator};
pub use outcome::{LocaleOutcome, LocalePhase, LocaleStatus, SyncReport, UnresolvedKeys};
pub use scheduler::Scheduler;
pub use settings::SyncSettings;
pub use shutdown::{Shutdown, ShutdownTrigger};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::diff::{CoverageAudit, ReservedKeys};
    pub use crate::error::{SyncError, SyncResult};
    pub use crate::orchestrator::{audit_locale, load_canonical, Orchestrator};
    pub use crate::outcome::{LocaleOutcome, LocaleStatus, SyncReport};
    pub use crate::scheduler::Scheduler;
    pub use crate::settings::SyncSettings;
    pub use crate::shutdown::{self, Shutdown, ShutdownTrigger};
    pub use crate::territory::{CldrTerritoryFile, TerritorySource};
}
