//! Terminal output helpers

use owo_colors::OwoColorize;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Print a section banner
pub fn banner(title: &str) {
    println!();
    println!("{}", RULE.blue());
    println!("  {}", title.blue().bold());
    println!("{}", RULE.blue());
    println!();
}

/// Color a coverage percentage by how close it is to complete
pub fn coverage(percent: f64) -> String {
    let text = format!("{percent:5.1}%");
    if percent >= 90.0 {
        text.green().to_string()
    } else if percent >= 70.0 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

/// Print a value as pretty JSON on stdout
pub fn json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
