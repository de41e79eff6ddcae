//! Text sections of the report. Every section is split into an `analyze_*` function that computes
//! plain values from a [UsageExport](crate::export::entities::UsageExport) and a `print_*` function
//! that writes them out.

pub mod correlation;
pub mod summary;
pub mod wellness;

use std::io::Write;

use anyhow::Result;

const SEPARATOR_WIDTH: usize = 50;

/// Application identifiers are usually reverse domain names. Only the last segment is shown.
pub fn clean_app_name(value: &str) -> &str {
    value.rsplit('.').next().unwrap_or(value)
}

fn write_title(out: &mut impl Write, title: &str) -> Result<()> {
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(SEPARATOR_WIDTH))?;
    Ok(())
}

fn format_average(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "n/a".into(),
    }
}
