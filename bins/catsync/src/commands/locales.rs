//! Locales command - list configured locales

use crate::context::{Overrides, RunContext};
use crate::output;
use crate::Format;
use anyhow::Result;
use catsync_core::config::effective_base_locale;
use catsync_core::exit_codes;
use owo_colors::OwoColorize;
use serde::Serialize;

/// JSON output for locales
#[derive(Debug, Serialize)]
struct JsonLocalesOutput {
    canonical: String,
    total: usize,
    locales: Vec<LocaleDetail>,
}

#[derive(Debug, Serialize)]
struct LocaleDetail {
    id: String,
    name: String,
    base: String,
    taxonomy: Option<String>,
    has_catalog: bool,
}

/// Run locales command
pub fn run(config: Option<&str>, format: Format) -> Result<i32> {
    let ctx = RunContext::load(config, &Overrides::default())?;
    let canonical = &ctx.settings.canonical_locale;

    let details: Vec<LocaleDetail> = ctx
        .config
        .schema
        .locales
        .iter()
        .map(|l| LocaleDetail {
            id: l.id.clone(),
            name: l.name.clone(),
            base: effective_base_locale(l, canonical).to_string(),
            taxonomy: l.taxonomy.clone(),
            has_catalog: ctx.store.path_for(&l.id).exists(),
        })
        .collect();

    if format == Format::Json {
        output::json(&JsonLocalesOutput {
            canonical: canonical.clone(),
            total: details.len(),
            locales: details,
        })?;
        return Ok(exit_codes::SUCCESS);
    }

    output::banner("🌍 Configured Locales");

    println!(
        "  {:<10} {:<36} {:<10} {}",
        "Id".dimmed(),
        "Name".dimmed(),
        "Base".dimmed(),
        "Territories".dimmed()
    );
    println!("  {}", "─".repeat(70).dimmed());

    for detail in &details {
        let id = if detail.has_catalog {
            detail.id.green().to_string()
        } else {
            detail.id.dimmed().to_string()
        };
        println!(
            "  {:<10} {:<36} {:<10} {}",
            id,
            detail.name,
            detail.base,
            detail.taxonomy.as_deref().unwrap_or("-")
        );
    }

    println!();
    println!("  Total: {} locales", details.len().to_string().green());
    println!("  Canonical: {}", canonical.cyan());
    println!();
    Ok(exit_codes::SUCCESS)
}
