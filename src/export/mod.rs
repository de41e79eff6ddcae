pub mod entities;

use std::{fs, io, path::Path};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{error::ReportError, utils::time::cutoff_record_name};

use self::entities::UsageExport;

/// Reads an export from disk. Syntax errors and type errors are reported separately: a file that
/// isn't JSON is [ReportError::InvalidJson], JSON with wrongly typed records is
/// [ReportError::Malformed].
#[instrument]
pub fn load_export(path: &Path) -> Result<UsageExport, ReportError> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ReportError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ReportError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let export = parse_export(&content).map_err(|e| match e {
        ParseFailure::Syntax(source) => ReportError::InvalidJson {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::Shape(source) => ReportError::Malformed(source),
    })?;
    debug!("Loaded {} days", export.daily_data.len());
    Ok(export)
}

enum ParseFailure {
    Syntax(serde_json::Error),
    Shape(serde_json::Error),
}

fn parse_export(content: &str) -> Result<UsageExport, ParseFailure> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(ParseFailure::Syntax)?;
    UsageExport::deserialize(value).map_err(ParseFailure::Shape)
}

impl UsageExport {
    pub fn is_empty(&self) -> bool {
        self.daily_data.is_empty()
    }

    /// Keeps only the days that are at most `days` days older than `today`. Keys are compared as
    /// strings, which matches chronological order for `YYYY-MM-DD`. A window reaching past the
    /// calendar keeps everything.
    pub fn retain_recent(&mut self, today: NaiveDate, days: u32) {
        let Some(cutoff) = cutoff_record_name(today, days) else {
            debug!("Window of {days} days covers the whole calendar, keeping every day");
            return;
        };
        let before = self.daily_data.len();
        self.daily_data.retain(|date, _| date.as_str() >= cutoff.as_str());
        debug!(
            "Kept {} of {before} days starting from {cutoff}",
            self.daily_data.len()
        );
    }
}
