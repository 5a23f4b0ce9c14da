//! Run setup shared by the commands

use anyhow::Result;
use catsync_core::catalog::{Catalog, JsonFileStore};
use catsync_core::config::{Config, LocaleDescriptor};
use catsync_core::{Error, ResultExt};
use catsync_engine::territory::CldrTerritoryFile;
use catsync_engine::{load_canonical, SyncSettings};
use std::sync::Arc;
use tracing::debug;

/// Command-line overrides for the `[sync]` table
#[derive(Debug, Default)]
pub struct Overrides {
    pub locales: Vec<String>,
    pub chunk_size: Option<usize>,
    pub concurrency: Option<usize>,
}

/// Loaded configuration plus the collaborators built from it
pub struct RunContext {
    pub config: Config,
    pub store: Arc<JsonFileStore>,
    pub territories: Option<Arc<CldrTerritoryFile>>,
    pub settings: SyncSettings,
}

impl RunContext {
    /// Load and validate configuration, applying `overrides`
    pub fn load(path: Option<&str>, overrides: &Overrides) -> Result<Self> {
        let mut config = Config::load(path)?;
        if overrides.chunk_size.is_some() || overrides.concurrency.is_some() {
            if let Some(chunk_size) = overrides.chunk_size {
                config.schema.sync.chunk_size = chunk_size;
            }
            if let Some(concurrency) = overrides.concurrency {
                config.schema.sync.concurrency = concurrency;
            }
            config
                .validate()
                .context("While applying command-line overrides")?;
        }

        debug!(path = ?config.path, locales = config.schema.locales.len(), "Configuration loaded");

        let store = Arc::new(JsonFileStore::new(
            &config.schema.store.root,
            &config.schema.store.file_name,
        ));
        let territories = config
            .schema
            .territories
            .as_ref()
            .map(|t| Arc::new(CldrTerritoryFile::new(&t.root)));
        let settings = SyncSettings::from_config(&config.schema.sync);

        Ok(Self {
            config,
            store,
            territories,
            settings,
        })
    }

    /// Configured locales, optionally restricted to `filter`
    pub fn select_locales(&self, filter: &[String]) -> Result<Vec<LocaleDescriptor>> {
        let configured = &self.config.schema.locales;

        if let Some(unknown) = filter.iter().find(|id| !configured.iter().any(|l| &l.id == *id)) {
            return Err(Error::config_validation(format!("Unknown locale '{unknown}'"))
                .with_suggestion("Run `catsync locales` to list configured locales")
                .into());
        }

        Ok(configured
            .iter()
            .filter(|l| filter.is_empty() || filter.contains(&l.id))
            .cloned()
            .collect())
    }

    /// Load the canonical catalog
    pub fn canonical(&self) -> Result<Catalog> {
        Ok(load_canonical(self.store.as_ref(), &self.settings).map_err(Error::from)?)
    }
}
