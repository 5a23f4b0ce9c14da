//! Per-locale outcomes and the run report

use catsync_core::ErrorCode;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Phases a locale moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalePhase {
    Init,
    Diffing,
    NoWork,
    Translating,
    Merging,
    Done,
    Failed,
}

impl fmt::Display for LocalePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Diffing => "diffing",
            Self::NoWork => "no-work",
            Self::Translating => "translating",
            Self::Merging => "merging",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How a locale ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocaleStatus {
    /// Nothing was missing; no provider call and no write
    UpToDate,
    /// Every chunk was translated and merged
    Synced,
    /// Stopped early at `chunk`; earlier chunks were kept
    Partial { chunk: usize, cause: String },
    /// The locale could not be processed
    Failed { cause: String, code: ErrorCode },
}

impl LocaleStatus {
    /// `UpToDate` or `Synced`
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::UpToDate | Self::Synced)
    }

    /// Short label for tables
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::UpToDate => "up-to-date",
            Self::Synced => "synced",
            Self::Partial { .. } => "partial",
            Self::Failed { .. } => "failed",
        }
    }

    /// Human-readable cause for non-success statuses
    #[must_use]
    pub fn cause(&self) -> Option<&str> {
        match self {
            Self::Partial { cause, .. } | Self::Failed { cause, .. } => Some(cause),
            Self::UpToDate | Self::Synced => None,
        }
    }
}

/// Result of syncing one locale
#[derive(Debug, Clone, Serialize)]
pub struct LocaleOutcome {
    pub locale: String,
    #[serde(flatten)]
    pub status: LocaleStatus,
    /// Keys translated during this run
    pub translated: usize,
    /// Keys still missing after the run
    pub unresolved: Vec<String>,
    pub chunks_total: usize,
    pub chunks_done: usize,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Keys a locale still lacks after its run; a warning, never an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedKeys {
    pub locale: String,
    pub keys: Vec<String>,
}

impl fmt::Display for UnresolvedKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} untranslated key(s) in {}: {}",
            self.keys.len(),
            self.locale,
            self.keys.join(", ")
        )
    }
}

impl LocaleOutcome {
    /// Unresolved-keys warning, if any keys are left
    #[must_use]
    pub fn unresolved_keys(&self) -> Option<UnresolvedKeys> {
        (!self.unresolved.is_empty()).then(|| UnresolvedKeys {
            locale: self.locale.clone(),
            keys: self.unresolved.clone(),
        })
    }

    /// Outcome for a locale that never got going
    pub fn failed(locale: &str, cause: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            locale: locale.to_string(),
            status: LocaleStatus::Failed {
                cause: cause.into(),
                code,
            },
            translated: 0,
            unresolved: Vec::new(),
            chunks_total: 0,
            chunks_done: 0,
            elapsed: Duration::ZERO,
        }
    }
}

/// Outcomes of one scheduler run
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub run_id: String,
    pub outcomes: Vec<LocaleOutcome>,
}

impl SyncReport {
    /// Build a report; outcomes are sorted by locale for stable output
    #[must_use]
    pub fn new(run_id: String, mut outcomes: Vec<LocaleOutcome>) -> Self {
        outcomes.sort_by(|a, b| a.locale.cmp(&b.locale));
        Self { run_id, outcomes }
    }

    /// Outcome for one locale
    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&LocaleOutcome> {
        self.outcomes.iter().find(|o| o.locale == locale)
    }

    /// Locales that failed outright
    pub fn failed(&self) -> impl Iterator<Item = &LocaleOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, LocaleStatus::Failed { .. }))
    }

    /// Locales that stopped early
    pub fn partial(&self) -> impl Iterator<Item = &LocaleOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, LocaleStatus::Partial { .. }))
    }

    /// Whether every locale succeeded
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.status.is_success())
    }

    /// Keys translated across all locales
    #[must_use]
    pub fn total_translated(&self) -> usize {
        self.outcomes.iter().map(|o| o.translated).sum()
    }

    /// Keys left unresolved across all locales
    #[must_use]
    pub fn total_unresolved(&self) -> usize {
        self.outcomes.iter().map(|o| o.unresolved.len()).sum()
    }
}
