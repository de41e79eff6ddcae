use chrono::{Datelike, Days, NaiveDate};

use crate::error::ReportError;

const RECORD_NAME_FORMAT: &str = "%Y-%m-%d";

/// This is the standard way of converting a date to a `dailyData` key.
pub fn date_to_record_name(date: NaiveDate) -> String {
    date.format(RECORD_NAME_FORMAT).to_string()
}

/// Parses a `dailyData` key back into a date.
pub fn record_name_to_date(name: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(name, RECORD_NAME_FORMAT)
        .map_err(|_| ReportError::InvalidDate(name.to_string()))
}

/// First record name that is still inside a window of `days` days ending at `today`. `None` when
/// the window reaches past the earliest representable date.
pub fn cutoff_record_name(today: NaiveDate, days: u32) -> Option<String> {
    today
        .checked_sub_days(Days::new(days as u64))
        .map(date_to_record_name)
}

/// `YYYY-MM` key used for monthly grouping.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Formats seconds as `"{h}h {m}m"`, or just `"{m}m"` under an hour. Seconds are dropped.
pub fn format_duration(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.) } else { 0. };
    let hours = (seconds / 3600.).floor() as u64;
    let minutes = ((seconds % 3600.) / 60.).floor() as u64;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
