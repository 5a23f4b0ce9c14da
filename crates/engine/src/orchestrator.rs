//! Per-locale sync state machine
//!
//! A locale moves through `Init → Diffing → (NoWork | Translating) →
//! Merging → Done | Failed`. Chunk failures end translation early but still
//! merge and persist what was translated; store failures fail the locale.
//! A target lacking only reserved keys skips the provider and goes straight
//! to merging.

use crate::batch::chunk;
use crate::diff::{audit, missing_keys, CoverageAudit};
use crate::error::{SyncError, SyncResult};
use crate::merge::{merge_chunk, normalize};
use crate::outcome::{LocaleOutcome, LocalePhase, LocaleStatus};
use crate::response::parse_translation;
use crate::settings::SyncSettings;
use crate::shutdown::Shutdown;
use crate::territory::{territory_entries, TerritorySource};
use catsync_core::catalog::{Catalog, CatalogStore};
use catsync_core::config::{effective_base_locale, LocaleDescriptor};
use catsync_provider::{ProviderError, TranslationProvider};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Drives one locale at a time against a shared store and provider
pub struct Orchestrator<P> {
    store: Arc<dyn CatalogStore>,
    provider: Arc<P>,
    territories: Option<Arc<dyn TerritorySource>>,
    settings: Arc<SyncSettings>,
}

impl<P> Clone for Orchestrator<P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            provider: Arc::clone(&self.provider),
            territories: self.territories.clone(),
            settings: Arc::clone(&self.settings),
        }
    }
}

#[derive(Debug, Default)]
struct Progress {
    translated: usize,
    chunks_total: usize,
    chunks_done: usize,
    unresolved: Vec<String>,
}

impl<P: TranslationProvider> Orchestrator<P> {
    /// Create an orchestrator without a territory source
    pub fn new(store: Arc<dyn CatalogStore>, provider: Arc<P>, settings: SyncSettings) -> Self {
        Self {
            store,
            provider,
            territories: None,
            settings: Arc::new(settings),
        }
    }

    /// Builder-style method to inject territory names
    #[must_use]
    pub fn with_territories(mut self, source: Arc<dyn TerritorySource>) -> Self {
        self.territories = Some(source);
        self
    }

    /// Run settings
    #[must_use]
    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Load the canonical catalog this run diffs against
    pub fn load_canonical(&self) -> SyncResult<Catalog> {
        load_canonical(self.store.as_ref(), &self.settings)
    }

    /// Bring one locale up to date with its base catalog
    ///
    /// Never returns an error: every failure is folded into the outcome.
    #[instrument(skip_all, fields(locale = %descriptor.id))]
    pub async fn sync_locale(
        &self,
        descriptor: &LocaleDescriptor,
        canonical: &Catalog,
        shutdown: &Shutdown,
    ) -> LocaleOutcome {
        let started = Instant::now();
        let mut progress = Progress::default();

        let status = match self.run(descriptor, canonical, shutdown, &mut progress).await {
            Ok(status) => status,
            Err(err) => {
                enter(LocalePhase::Failed);
                if err.is_write_failure() {
                    error!(error = %err, "Catalog save failed, translated content may be lost");
                } else {
                    error!(error = %err, "Locale sync failed");
                }
                LocaleStatus::Failed {
                    cause: err.to_string(),
                    code: err.code(),
                }
            }
        };

        LocaleOutcome {
            locale: descriptor.id.clone(),
            status,
            translated: progress.translated,
            unresolved: progress.unresolved,
            chunks_total: progress.chunks_total,
            chunks_done: progress.chunks_done,
            elapsed: started.elapsed(),
        }
    }

    async fn run(
        &self,
        descriptor: &LocaleDescriptor,
        canonical: &Catalog,
        shutdown: &Shutdown,
        progress: &mut Progress,
    ) -> SyncResult<LocaleStatus> {
        let locale = descriptor.id.as_str();
        let settings = &self.settings;

        enter(LocalePhase::Init);
        let base_locale = effective_base_locale(descriptor, &settings.canonical_locale);
        let base = load_base(self.store.as_ref(), settings, base_locale, canonical)?;
        let target = self
            .store
            .load(locale)
            .map_err(SyncError::StoreRead)?
            .unwrap_or_default();
        let territories = territory_names(self.territories.as_deref(), descriptor, &base)?;

        enter(LocalePhase::Diffing);
        let missing = missing_keys(&base, &target, &settings.reserved);
        let reserved_absent = base
            .keys()
            .any(|key| settings.reserved.is_reserved(key) && !target.contains_key(key));
        if missing.is_empty() && !reserved_absent {
            enter(LocalePhase::NoWork);
            enter(LocalePhase::Done);
            info!("Already up to date");
            return Ok(LocaleStatus::UpToDate);
        }

        // Territory names come from CLDR, never from the provider.
        let translatable: Catalog = missing
            .into_iter()
            .filter(|(key, _)| !territories.contains_key(key))
            .collect();
        let chunks = chunk(&translatable, settings.chunk_size);
        progress.chunks_total = chunks.len();

        enter(LocalePhase::Translating);
        info!(
            base = base_locale,
            missing = translatable.len(),
            chunks = chunks.len(),
            "Translating missing keys"
        );

        let mut working = target;
        let mut persisted: Option<Catalog> = None;
        let mut stopped: Option<(usize, String)> = None;

        for (index, batch) in chunks.iter().enumerate() {
            if shutdown.is_triggered() {
                warn!(chunk = index, "Shutdown requested, stopping before next chunk");
                stopped = Some((index, "cancelled".to_string()));
                break;
            }

            let applied = self.translate_chunk(descriptor, batch).await.and_then(|translated| {
                let count = translated.len();
                merge_chunk(&mut working, translated);
                let output = normalize(&base, &working, &settings.reserved, &territories).catalog;
                self.store.save(locale, &output).map_err(SyncError::StoreWrite)?;
                Ok((count, output))
            });

            match applied {
                Ok((count, output)) => {
                    progress.translated += count;
                    persisted = Some(output);
                    progress.chunks_done += 1;
                    debug!(chunk = index + 1, of = chunks.len(), "Chunk merged");
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    error!(
                        chunk = index,
                        code = err.code().code(),
                        error = %err,
                        "Chunk failed, keeping earlier chunks"
                    );
                    stopped = Some((index, err.to_string()));
                    break;
                }
            }
        }

        enter(LocalePhase::Merging);
        let normalized = normalize(&base, &working, &settings.reserved, &territories);
        if persisted.as_ref() != Some(&normalized.catalog) {
            self.store
                .save(locale, &normalized.catalog)
                .map_err(SyncError::StoreWrite)?;
        }

        if !normalized.unresolved.is_empty() {
            warn!(
                count = normalized.unresolved.len(),
                keys = ?normalized.unresolved,
                "Unresolved translations"
            );
        }
        progress.unresolved = normalized.unresolved;

        enter(LocalePhase::Done);
        Ok(match stopped {
            Some((chunk, cause)) => LocaleStatus::Partial { chunk, cause },
            None => LocaleStatus::Synced,
        })
    }

    async fn translate_chunk(&self, descriptor: &LocaleDescriptor, batch: &Catalog) -> SyncResult<Catalog> {
        let timeout = self.settings.request_timeout;
        let call = self
            .provider
            .translate(batch, &descriptor.name, &self.settings.system_prompt);

        let raw = tokio::time::timeout(timeout, call)
            .await
            .map_err(|_| ProviderError::Timeout(timeout))??;

        parse_translation(&raw, batch)
    }
}

fn enter(phase: LocalePhase) {
    debug!(%phase, "Phase");
}

fn load_required(store: &dyn CatalogStore, locale: &str) -> SyncResult<Catalog> {
    store
        .load(locale)
        .map_err(SyncError::StoreRead)?
        .ok_or_else(|| SyncError::MissingCatalog(locale.to_string()))
}

fn load_base<'a>(
    store: &dyn CatalogStore,
    settings: &SyncSettings,
    base_locale: &str,
    canonical: &'a Catalog,
) -> SyncResult<Cow<'a, Catalog>> {
    if base_locale == settings.canonical_locale {
        Ok(Cow::Borrowed(canonical))
    } else {
        load_required(store, base_locale).map(Cow::Owned)
    }
}

/// Territory entries to inject, restricted to keys the base catalog has
fn territory_names(
    source: Option<&dyn TerritorySource>,
    descriptor: &LocaleDescriptor,
    base: &Catalog,
) -> SyncResult<IndexMap<String, String>> {
    let (Some(source), Some(taxonomy)) = (source, descriptor.taxonomy.as_deref()) else {
        return Ok(IndexMap::new());
    };

    let names = source.lookup(taxonomy)?;
    Ok(territory_entries(&names)
        .into_iter()
        .filter(|(key, _)| base.contains_key(key))
        .collect())
}

/// Coverage of one locale without calling the provider
///
/// Keys supplied by territory data count as reserved.
pub fn audit_locale(
    store: &dyn CatalogStore,
    settings: &SyncSettings,
    territories: Option<&dyn TerritorySource>,
    descriptor: &LocaleDescriptor,
    canonical: &Catalog,
) -> SyncResult<CoverageAudit> {
    let base_locale = effective_base_locale(descriptor, &settings.canonical_locale);
    let base = load_base(store, settings, base_locale, canonical)?;
    let target = store
        .load(&descriptor.id)
        .map_err(SyncError::StoreRead)?
        .unwrap_or_default();

    let supplied = territory_names(territories, descriptor, &base)?;
    let reserved = settings.reserved.clone().with_keys(supplied.into_keys());
    Ok(audit(&base, &target, &reserved))
}

/// Load the canonical catalog named in `settings`
pub fn load_canonical(store: &dyn CatalogStore, settings: &SyncSettings) -> SyncResult<Catalog> {
    load_required(store, &settings.canonical_locale)
}
