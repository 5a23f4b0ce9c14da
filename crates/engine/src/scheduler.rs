//! Bounded worker pool running one orchestrator task per locale

use crate::error::SyncResult;
use crate::orchestrator::Orchestrator;
use crate::outcome::{LocaleOutcome, LocaleStatus, SyncReport};
use crate::shutdown::Shutdown;
use catsync_core::catalog::Catalog;
use catsync_core::config::{effective_base_locale, LocaleDescriptor};
use catsync_core::ErrorCode;
use catsync_provider::TranslationProvider;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tracing::{debug, error, info, instrument, Instrument, Span};
use uuid::Uuid;

type LocaleQueue = Arc<Mutex<VecDeque<LocaleDescriptor>>>;

/// Runs locales concurrently with at most `concurrency` in flight
pub struct Scheduler<P> {
    orchestrator: Orchestrator<P>,
    concurrency: usize,
}

impl<P: TranslationProvider + 'static> Scheduler<P> {
    /// Create a scheduler; a concurrency of zero is treated as one
    pub fn new(orchestrator: Orchestrator<P>, concurrency: usize) -> Self {
        Self {
            orchestrator,
            concurrency: concurrency.max(1),
        }
    }

    /// Sync every locale and collect one outcome per locale
    ///
    /// Fails only when the canonical catalog cannot be loaded. Anything that
    /// goes wrong inside a locale, panics included, becomes that locale's
    /// outcome. A locale whose base is also being synced starts only after
    /// that base has finished.
    #[instrument(skip_all, fields(run_id))]
    pub async fn run(&self, locales: Vec<LocaleDescriptor>, shutdown: Shutdown) -> SyncResult<SyncReport> {
        let run_id = Uuid::new_v4().to_string();
        Span::current().record("run_id", run_id.as_str());

        let canonical = Arc::new(self.orchestrator.load_canonical()?);
        let total = locales.len();
        let waves = dependency_waves(locales, &self.orchestrator.settings().canonical_locale);
        info!(
            locales = total,
            workers = self.concurrency.min(total),
            waves = waves.len(),
            keys = canonical.len(),
            "Starting sync run"
        );

        let mut outcomes = Vec::with_capacity(total);
        for wave in waves {
            outcomes.extend(self.run_wave(wave, &canonical, &shutdown).await);
        }

        let report = SyncReport::new(run_id, outcomes);
        info!(
            translated = report.total_translated(),
            unresolved = report.total_unresolved(),
            failed = report.failed().count(),
            "Sync run finished"
        );
        Ok(report)
    }

    async fn run_wave(
        &self,
        locales: Vec<LocaleDescriptor>,
        canonical: &Arc<Catalog>,
        shutdown: &Shutdown,
    ) -> Vec<LocaleOutcome> {
        let total = locales.len();
        let workers = self.concurrency.min(total);
        let queue: LocaleQueue = Arc::new(Mutex::new(locales.into()));
        let (tx, mut rx) = mpsc::unbounded_channel::<LocaleOutcome>();

        for worker in 0..workers {
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            let orchestrator = self.orchestrator.clone();
            let canonical = Arc::clone(canonical);
            let shutdown = shutdown.clone();

            tokio::spawn(
                async move {
                    while let Some(descriptor) = next_locale(&queue) {
                        let outcome = if shutdown.is_triggered() {
                            LocaleOutcome::failed(&descriptor.id, "cancelled before start", ErrorCode::Cancelled)
                        } else {
                            run_isolated(&orchestrator, descriptor, &canonical, &shutdown).await
                        };
                        if tx.send(outcome).is_err() {
                            break;
                        }
                    }
                    debug!(worker, "Worker idle");
                }
                .in_current_span(),
            );
        }
        drop(tx);

        let mut outcomes = Vec::with_capacity(total);
        while let Some(outcome) = rx.recv().await {
            log_outcome(&outcome);
            outcomes.push(outcome);
        }
        outcomes
    }
}

/// Group locales so each one runs in a later wave than the locale it
/// translates from, when that locale is part of the run
///
/// Order within a wave follows the input. Base cycles cannot be ordered and
/// fall into the last wave.
fn dependency_waves(locales: Vec<LocaleDescriptor>, canonical: &str) -> Vec<Vec<LocaleDescriptor>> {
    let ids: Vec<&str> = locales.iter().map(|l| l.id.as_str()).collect();
    let depths: Vec<usize> = locales
        .iter()
        .map(|locale| {
            let mut depth = 0;
            let mut current = locale;
            while depth < locales.len() {
                let base = effective_base_locale(current, canonical);
                let Some(position) = ids.iter().position(|id| *id == base) else {
                    break;
                };
                depth += 1;
                current = &locales[position];
            }
            depth
        })
        .collect();

    let mut waves: Vec<Vec<LocaleDescriptor>> = Vec::new();
    for (locale, depth) in locales.into_iter().zip(depths) {
        if waves.len() <= depth {
            waves.resize_with(depth + 1, Vec::new);
        }
        waves[depth].push(locale);
    }
    waves.retain(|wave| !wave.is_empty());
    waves
}

fn next_locale(queue: &LocaleQueue) -> Option<LocaleDescriptor> {
    queue.lock().unwrap_or_else(PoisonError::into_inner).pop_front()
}

/// Run one locale on its own task so a panic cannot take the worker down
async fn run_isolated<P: TranslationProvider + 'static>(
    orchestrator: &Orchestrator<P>,
    descriptor: LocaleDescriptor,
    canonical: &Arc<Catalog>,
    shutdown: &Shutdown,
) -> LocaleOutcome {
    let locale = descriptor.id.clone();
    let orchestrator = orchestrator.clone();
    let canonical = Arc::clone(canonical);
    let shutdown = shutdown.clone();

    let task = tokio::spawn(
        async move { orchestrator.sync_locale(&descriptor, &canonical, &shutdown).await }.in_current_span(),
    );

    match task.await {
        Ok(outcome) => outcome,
        Err(err) => {
            let cause = join_failure(err);
            error!(locale = %locale, cause = %cause, "Locale task aborted");
            LocaleOutcome::failed(&locale, cause, ErrorCode::Internal)
        }
    }
}

fn join_failure(err: JoinError) -> String {
    if !err.is_panic() {
        return "locale task was cancelled".to_string();
    }
    let payload = err.into_panic();
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("locale task panicked: {detail}")
}

fn log_outcome(outcome: &LocaleOutcome) {
    match &outcome.status {
        LocaleStatus::UpToDate | LocaleStatus::Synced => info!(
            locale = %outcome.locale,
            status = outcome.status.label(),
            translated = outcome.translated,
            elapsed_ms = u64::try_from(outcome.elapsed.as_millis()).unwrap_or(u64::MAX),
            "Locale finished"
        ),
        LocaleStatus::Partial { chunk, cause } => info!(
            locale = %outcome.locale,
            chunk,
            cause = %cause,
            translated = outcome.translated,
            "Locale partially synced"
        ),
        LocaleStatus::Failed { cause, code } => info!(
            locale = %outcome.locale,
            code = code.code(),
            cause = %cause,
            "Locale failed"
        ),
    }
}
