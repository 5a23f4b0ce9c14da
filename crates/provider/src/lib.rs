//! Translation providers for catsync
//!
//! The sync engine talks to machine translation through the
//! [`TranslationProvider`] trait. A provider receives one chunk of a catalog,
//! the display name of the target language and the system instructions, and
//! returns whatever raw text the backend produced. The engine treats that text
//! as untrusted and does its own extraction and repair.
//!
//! [`ChatClient`] implements the trait against OpenAI-compatible
//! `/chat/completions` endpoints.
//!
//! # Example
//!
//! ```rust,no_run
//! use catsync_provider::{ChatClient, ProviderConfig, TranslationProvider};
//! use catsync_core::catalog::catalog_from_pairs;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ChatClient::new(ProviderConfig::default().with_api_key("sk-..."))?;
//!     let chunk = catalog_from_pairs([("greeting", "Hello")]);
//!     let raw = client
//!         .translate(&chunk, "French", "Return only a JSON object.")
//!         .await?;
//!     println!("{raw}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;

use catsync_core::catalog::Catalog;
use std::future::Future;
use std::sync::Arc;

pub use client::ChatClient;
pub use config::ProviderConfig;
pub use error::{ProviderError, ProviderResult};

/// A machine translation backend
///
/// Implementations must tolerate concurrent independent calls; the engine
/// shares one provider across all locale workers.
pub trait TranslationProvider: Send + Sync {
    /// Translate one chunk, returning the backend's raw text
    fn translate(
        &self,
        chunk: &Catalog,
        target_locale_name: &str,
        system_instructions: &str,
    ) -> impl Future<Output = ProviderResult<String>> + Send;
}

impl<P: TranslationProvider> TranslationProvider for Arc<P> {
    fn translate(
        &self,
        chunk: &Catalog,
        target_locale_name: &str,
        system_instructions: &str,
    ) -> impl Future<Output = ProviderResult<String>> + Send {
        (**self).translate(chunk, target_locale_name, system_instructions)
    }
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::ChatClient;
    pub use crate::config::ProviderConfig;
    pub use crate::error::{ProviderError, ProviderResult};
    pub use crate::TranslationProvider;
}

#[cfg(test)]
mod tests {
    use super::*;
    use catsync_core::catalog::catalog_from_pairs;

    struct Echo;

    impl TranslationProvider for Echo {
        async fn translate(
            &self,
            chunk: &Catalog,
            target_locale_name: &str,
            _system_instructions: &str,
        ) -> ProviderResult<String> {
            Ok(format!("{target_locale_name}:{}", chunk.len()))
        }
    }

    #[test]
    fn test_arc_forwards_to_inner() {
        let provider = Arc::new(Echo);
        let chunk = catalog_from_pairs([("a", "A"), ("b", "B")]);
        let raw = tokio_test::block_on(provider.translate(&chunk, "German", "")).unwrap();
        assert_eq!(raw, "German:2");
    }
}
