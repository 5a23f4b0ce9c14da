//! Audit command - check translation coverage without calling the provider

use crate::context::{Overrides, RunContext};
use crate::output;
use crate::Format;
use anyhow::Result;
use catsync_core::{exit_codes, Error};
use catsync_engine::audit_locale;
use catsync_engine::territory::TerritorySource;
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct JsonAuditOutput {
    canonical: String,
    locales: Vec<LocaleAudit>,
    total_locales: usize,
    average_coverage: f64,
}

#[derive(Debug, Serialize)]
struct LocaleAudit {
    locale: String,
    total_keys: usize,
    translated: usize,
    untranslated: usize,
    coverage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing_keys: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stale_keys: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run translation audit
pub fn run(config: Option<&str>, locale: Option<&str>, show_missing: bool, limit: usize, format: Format) -> Result<i32> {
    let ctx = RunContext::load(config, &Overrides::default())?;
    let filter: Vec<String> = locale.map(str::to_string).into_iter().collect();
    let locales = ctx.select_locales(&filter)?;
    let canonical = ctx.canonical()?;
    let territories = ctx.territories.as_deref().map(|t| t as &dyn TerritorySource);

    let audits: Vec<LocaleAudit> = locales
        .iter()
        .map(|descriptor| {
            match audit_locale(ctx.store.as_ref(), &ctx.settings, territories, descriptor, &canonical) {
                Ok(audit) => LocaleAudit {
                    locale: descriptor.id.clone(),
                    total_keys: audit.total,
                    translated: audit.translated,
                    untranslated: audit.missing.len(),
                    coverage: audit.coverage(),
                    missing_keys: show_missing.then(|| audit.missing.iter().take(limit).cloned().collect()),
                    stale_keys: show_missing.then(|| audit.stale.clone()),
                    error: None,
                },
                Err(e) => LocaleAudit {
                    locale: descriptor.id.clone(),
                    total_keys: 0,
                    translated: 0,
                    untranslated: 0,
                    coverage: 0.0,
                    missing_keys: None,
                    stale_keys: None,
                    error: Some(Error::from(e).to_string()),
                },
            }
        })
        .collect();

    let failures = audits.iter().filter(|a| a.error.is_some()).count();
    let code = if failures == 0 {
        exit_codes::SUCCESS
    } else {
        exit_codes::PARTIAL
    };

    if format == Format::Json {
        let audited: Vec<f64> = audits.iter().filter(|a| a.error.is_none()).map(|a| a.coverage).collect();
        #[allow(clippy::cast_precision_loss)]
        let average_coverage = if audited.is_empty() {
            0.0
        } else {
            audited.iter().sum::<f64>() / audited.len() as f64
        };
        output::json(&JsonAuditOutput {
            canonical: ctx.settings.canonical_locale.clone(),
            total_locales: audits.len(),
            locales: audits,
            average_coverage,
        })?;
        return Ok(code);
    }

    output::banner("🔍 Translation Coverage Audit");
    println!(
        "Reference: {} has {} keys",
        ctx.settings.canonical_locale.cyan(),
        canonical.len().to_string().green()
    );
    println!();

    for audit in &audits {
        if let Some(error) = &audit.error {
            println!("  {:<8}: {}", audit.locale, error.red());
            continue;
        }

        println!(
            "  {:<8}: {} coverage ({}/{} keys)",
            audit.locale,
            output::coverage(audit.coverage),
            audit.translated,
            audit.total_keys
        );

        if let Some(missing) = audit.missing_keys.as_ref().filter(|m| !m.is_empty()) {
            println!("           Missing: {}", missing.join(", ").dimmed());
        }
        if let Some(stale) = audit.stale_keys.as_ref().filter(|s| !s.is_empty()) {
            println!("           Stale:   {}", stale.join(", ").dimmed());
        }
    }

    println!();
    Ok(code)
}
