//! Sync command - translate missing keys for the configured locales

use crate::context::{Overrides, RunContext};
use crate::output;
use crate::Format;
use anyhow::Result;
use catsync_core::catalog::CatalogStore;
use catsync_core::{exit_codes, Error, ErrorCode};
use catsync_engine::{shutdown, LocaleOutcome, LocaleStatus, Orchestrator, Scheduler, SyncReport};
use catsync_provider::{ChatClient, ProviderConfig};
use chrono::Utc;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Unresolved keys shown per locale in text output
const UNRESOLVED_PREVIEW: usize = 8;

#[derive(Debug, Serialize)]
struct JsonSyncOutput<'a> {
    run_id: &'a str,
    started_at: String,
    finished_at: String,
    interrupted: bool,
    translated: usize,
    unresolved: usize,
    failed: usize,
    partial: usize,
    outcomes: &'a [LocaleOutcome],
}

/// Run the sync
pub async fn run(config: Option<&str>, overrides: Overrides, format: Format) -> Result<i32> {
    let ctx = RunContext::load(config, &overrides)?;
    let locales = ctx.select_locales(&overrides.locales)?;
    let schema = &ctx.config.schema;

    let provider_config = ProviderConfig::from_settings(&schema.provider, ctx.settings.request_timeout)
        .map_err(Error::from)?;
    let settings = ctx.settings.clone().with_request_timeout(provider_config.timeout);
    let provider = Arc::new(ChatClient::new(provider_config).map_err(Error::from)?);

    let store: Arc<dyn CatalogStore> = ctx.store.clone();
    let mut orchestrator = Orchestrator::new(store, provider, settings);
    if let Some(territories) = &ctx.territories {
        orchestrator = orchestrator.with_territories(territories.clone());
    }

    let (trigger, shutdown) = shutdown::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing in-flight chunks");
            trigger.trigger();
        }
    });

    let started_at = Utc::now();
    let report = Scheduler::new(orchestrator, schema.sync.concurrency)
        .run(locales, shutdown.clone())
        .await
        .map_err(Error::from)?;
    let finished_at = Utc::now();
    let interrupted = shutdown.is_triggered();

    let code = run_exit_code(&report, interrupted);

    if format == Format::Json {
        output::json(&JsonSyncOutput {
            run_id: &report.run_id,
            started_at: started_at.to_rfc3339(),
            finished_at: finished_at.to_rfc3339(),
            interrupted,
            translated: report.total_translated(),
            unresolved: report.total_unresolved(),
            failed: report.failed().count(),
            partial: report.partial().count(),
            outcomes: &report.outcomes,
        })?;
        return Ok(code);
    }

    output::banner("🔄 Catalog Sync");
    for outcome in &report.outcomes {
        print_outcome(outcome);
    }
    print_summary(&report, (finished_at - started_at).num_milliseconds(), interrupted);
    Ok(code)
}

/// Exit code for a finished run; lost writes outrank other locale failures
fn run_exit_code(report: &SyncReport, interrupted: bool) -> i32 {
    let write_failed = report
        .failed()
        .any(|o| matches!(o.status, LocaleStatus::Failed { code: ErrorCode::StoreWriteError, .. }));

    if interrupted {
        exit_codes::INTERRUPTED
    } else if write_failed {
        exit_codes::STORE_ERROR
    } else if report.all_succeeded() {
        exit_codes::SUCCESS
    } else {
        exit_codes::PARTIAL
    }
}

fn print_outcome(outcome: &LocaleOutcome) {
    let label = match &outcome.status {
        LocaleStatus::UpToDate => "✓ up to date".dimmed().to_string(),
        LocaleStatus::Synced => "✓ synced".green().to_string(),
        LocaleStatus::Partial { .. } => "◐ partial".yellow().to_string(),
        LocaleStatus::Failed { .. } => "✗ failed".red().to_string(),
    };

    println!(
        "  {:<8} {:<14} {} keys, {}/{} chunks, {} ms",
        outcome.locale,
        label,
        outcome.translated,
        outcome.chunks_done,
        outcome.chunks_total,
        outcome.elapsed.as_millis()
    );

    match &outcome.status {
        LocaleStatus::Partial { chunk, cause } => {
            println!("           stopped at chunk {}: {}", chunk + 1, cause.yellow());
        }
        LocaleStatus::Failed { cause, code } => {
            println!("           [{}] {}", code, cause.red());
        }
        LocaleStatus::UpToDate | LocaleStatus::Synced => {}
    }

    if let Some(warning) = outcome.unresolved_keys() {
        let preview: Vec<&str> = warning.keys.iter().take(UNRESOLVED_PREVIEW).map(String::as_str).collect();
        let more = warning.keys.len().saturating_sub(preview.len());
        let suffix = if more > 0 { format!(" (+{more} more)") } else { String::new() };
        println!(
            "           {} untranslated: {}{}",
            warning.keys.len().to_string().yellow(),
            preview.join(", ").dimmed(),
            suffix
        );
    }
}

fn print_summary(report: &SyncReport, elapsed_ms: i64, interrupted: bool) {
    println!();
    println!(
        "  Translated {} keys across {} locales in {} ms",
        report.total_translated().to_string().green(),
        report.outcomes.len(),
        elapsed_ms
    );

    let failed = report.failed().count();
    let partial = report.partial().count();
    if failed > 0 || partial > 0 {
        println!(
            "  {} failed, {} partial",
            failed.to_string().red(),
            partial.to_string().yellow()
        );
    }
    if interrupted {
        println!("  {}", "Interrupted: remaining chunks were skipped".yellow());
    }
    println!();
}
