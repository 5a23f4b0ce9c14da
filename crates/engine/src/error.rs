//! Error types for the sync engine

use catsync_core::catalog::StoreError;
use catsync_core::ErrorCode;
use catsync_provider::ProviderError;
use thiserror::Error;

/// No balanced JSON object could be located in provider output
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// No `{` in the text opens an object
    #[error("no JSON object found in provider output")]
    NoObject,

    /// An object starts at `start` but never closes, and no later one does
    #[error("JSON object starting at byte {start} is not balanced")]
    Unbalanced {
        /// Byte offset of the opening brace
        start: usize,
    },
}

/// The extracted object could not be parsed even after repair
#[derive(Error, Debug)]
#[error("unrepairable JSON in provider output: {source}")]
pub struct RepairError {
    #[source]
    source: serde_json::Error,
}

impl RepairError {
    pub(crate) fn new(source: serde_json::Error) -> Self {
        Self { source }
    }
}

/// Result type alias for engine operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Everything that can go wrong while syncing a locale
#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Repair(#[from] RepairError),

    #[error("provider call failed: {0}")]
    Provider(#[from] ProviderError),

    /// Loading a catalog failed
    #[error("catalog load failed: {0}")]
    StoreRead(#[source] StoreError),

    /// Persisting a catalog failed
    #[error("catalog save failed: {0}")]
    StoreWrite(#[source] StoreError),

    /// A required catalog does not exist
    #[error("catalog for {0} does not exist")]
    MissingCatalog(String),

    /// Territory names could not be loaded
    #[error("territory data unavailable for {taxonomy}: {message}")]
    Territory {
        /// Taxonomy identifier that was looked up
        taxonomy: String,
        /// What went wrong
        message: String,
    },
}

impl From<StoreError> for SyncError {
    fn from(err: StoreError) -> Self {
        if err.is_write() {
            Self::StoreWrite(err)
        } else {
            Self::StoreRead(err)
        }
    }
}

impl SyncError {
    /// Map to the shared error code
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Extraction(_) => ErrorCode::ExtractionError,
            Self::Repair(_) => ErrorCode::RepairError,
            Self::Provider(e) => e.code(),
            Self::StoreRead(e) | Self::StoreWrite(e) => e.code(),
            Self::MissingCatalog(_) => ErrorCode::StoreReadError,
            Self::Territory { .. } => ErrorCode::TerritoryDataError,
        }
    }

    /// Whether the error aborts the whole locale rather than one chunk
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::StoreRead(_) | Self::StoreWrite(_) | Self::MissingCatalog(_) | Self::Territory { .. }
        )
    }

    /// Whether the error risks losing already translated content
    #[must_use]
    pub fn is_write_failure(&self) -> bool {
        matches!(self, Self::StoreWrite(_))
    }
}

impl From<SyncError> for catsync_core::Error {
    fn from(err: SyncError) -> Self {
        Self::new(err.code(), err.to_string()).with_source(err)
    }
}
