use std::{io::Write, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use crate::{export::load_export, utils::clock::Clock};

use super::output::{
    correlation::print_correlation_report, summary::print_usage_summary,
    wellness::print_wellness_report,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Wellness,
    Correlations,
}

#[derive(Debug, Parser)]
pub struct ReportCommand {
    #[arg(help = "Path to the exported JSON file")]
    pub file: PathBuf,
    #[arg(long, help = "Show summary only. Reserved, currently has no effect")]
    pub summary: bool,
    #[arg(long = "wellness-only", help = "Print only the wellness report")]
    pub wellness_only: bool,
    #[arg(long, help = "Print only the productivity correlations")]
    pub correlations: bool,
    #[arg(
        long,
        value_name = "N",
        help = "Only analyze days from the last N days, counting from today"
    )]
    pub days: Option<u32>,
}

impl ReportCommand {
    /// Sections in the order they are printed. Without any selection everything is printed.
    pub fn sections(&self) -> Vec<Section> {
        match (self.wellness_only, self.correlations) {
            (false, false) => vec![Section::Summary, Section::Wellness, Section::Correlations],
            (true, false) => vec![Section::Wellness],
            (false, true) => vec![Section::Correlations],
            (true, true) => vec![Section::Wellness, Section::Correlations],
        }
    }
}

/// Command to produce the report. Loads the export, applies the `--days` window and writes the
/// selected sections to `out`.
pub fn process_report_command(
    command: &ReportCommand,
    clock: &impl Clock,
    out: &mut impl Write,
) -> Result<()> {
    let mut export = load_export(&command.file)?;
    if let Some(days) = command.days {
        export.retain_recent(clock.today(), days);
    }
    info!(
        "Analyzing {} days from {}",
        export.daily_data.len(),
        command.file.display()
    );

    if export.is_empty() {
        writeln!(out, "No usage data found in the file.")?;
        return Ok(());
    }

    for section in command.sections() {
        debug!("Printing {section:?}");
        match section {
            Section::Summary => print_usage_summary(&export, out)?,
            Section::Wellness => print_wellness_report(&export, out)?,
            Section::Correlations => print_correlation_report(&export, out)?,
        }
    }
    out.flush()?;
    Ok(())
}
