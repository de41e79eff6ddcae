use std::{
    collections::{BTreeMap, HashMap},
    io::Write,
};

use anyhow::Result;
use chrono::{Datelike, Weekday};
use tracing::warn;

use crate::{
    error::ReportError,
    export::entities::{SessionRecord, UsageExport},
    utils::{
        percentage::ratio_percentage,
        time::{format_duration, month_key, record_name_to_date},
    },
};

use super::{clean_app_name, write_title};

const TOP_APPLICATIONS: usize = 10;
const WEEKLY_PATTERN_MIN_DAYS: usize = 7;

#[derive(Debug)]
pub struct AppUsage {
    pub app_id: String,
    pub duration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionStats {
    pub count: usize,
    pub total: f64,
    pub average: f64,
    pub longest: f64,
}

impl SessionStats {
    fn from_sessions<'a>(sessions: impl Iterator<Item = &'a SessionRecord>) -> Option<Self> {
        let mut count = 0;
        let mut total = 0.;
        let mut longest = f64::MIN;
        for session in sessions {
            count += 1;
            total += session.duration;
            longest = longest.max(session.duration);
        }
        (count > 0).then(|| SessionStats {
            count,
            total,
            average: total / count as f64,
            longest,
        })
    }
}

#[derive(Debug, PartialEq)]
pub struct WeekdayAverage {
    pub weekday: Weekday,
    pub average: f64,
}

#[derive(Debug, PartialEq)]
pub struct MonthTotal {
    pub month: String,
    pub days: usize,
    pub total: f64,
}

#[derive(Debug)]
pub struct UsageSummary {
    pub total_days: usize,
    pub total_session_time: f64,
    pub total_break_time: f64,
    pub total_call_time: f64,
    pub average_daily_work: f64,
    /// Sorted from the most used application, at most [TOP_APPLICATIONS] entries.
    pub top_apps: Vec<AppUsage>,
    pub deep_focus: Option<SessionStats>,
    pub continuous_work: Option<SessionStats>,
    /// Only present with at least a week of data.
    pub weekly: Option<Vec<WeekdayAverage>>,
    /// Empty unless the data covers more than one month.
    pub monthly: Vec<MonthTotal>,
}

/// Returns `None` for an export without days.
pub fn analyze_usage(export: &UsageExport) -> Result<Option<UsageSummary>, ReportError> {
    let days = &export.daily_data;
    if days.is_empty() {
        return Ok(None);
    }

    let total_days = days.len();
    let total_session_time = days.values().map(|d| d.total_session_time).sum::<f64>();
    let total_break_time = days.values().map(|d| d.total_break_time).sum::<f64>();
    let total_call_time = days.values().map(|d| d.call_time).sum::<f64>();

    let mut apps = HashMap::<&str, f64>::new();
    for day in days.values() {
        for (app, time) in &day.app_usage {
            *apps.entry(app.as_str()).or_default() += time;
        }
    }
    let mut top_apps = apps
        .into_iter()
        .map(|(app_id, duration)| AppUsage {
            app_id: app_id.to_string(),
            duration,
        })
        .collect::<Vec<_>>();
    top_apps.sort_by(|a, b| {
        b.duration
            .total_cmp(&a.duration)
            .then_with(|| a.app_id.cmp(&b.app_id))
    });
    top_apps.truncate(TOP_APPLICATIONS);

    let deep_focus =
        SessionStats::from_sessions(days.values().flat_map(|d| d.deep_focus_sessions.iter()));
    let continuous_work =
        SessionStats::from_sessions(days.values().flat_map(|d| d.continuous_work_sessions.iter()));

    let weekly = if total_days >= WEEKLY_PATTERN_MIN_DAYS {
        Some(weekly_pattern(export)?)
    } else {
        None
    };

    Ok(Some(UsageSummary {
        total_days,
        total_session_time,
        total_break_time,
        total_call_time,
        average_daily_work: total_session_time / total_days as f64,
        top_apps,
        deep_focus,
        continuous_work,
        weekly,
        monthly: monthly_breakdown(export),
    }))
}

/// Average work per weekday. The number of occurrences of a weekday is approximated from the
/// number of days: every weekday gets `days / 7`, and the first `days % 7` weekdays counting from
/// Monday get one more.
fn weekly_pattern(export: &UsageExport) -> Result<Vec<WeekdayAverage>, ReportError> {
    let total_days = export.daily_data.len();
    let mut totals: [Option<f64>; 7] = [None; 7];
    for (date, day) in &export.daily_data {
        let index = record_name_to_date(date)?.weekday().num_days_from_monday() as usize;
        *totals[index].get_or_insert(0.) += day.total_session_time;
    }

    let mut weekday = Weekday::Mon;
    let mut result = vec![];
    for (index, total) in totals.into_iter().enumerate() {
        if let Some(total) = total {
            let occurrences = total_days / 7 + usize::from(total_days % 7 > index);
            result.push(WeekdayAverage {
                weekday,
                average: total / occurrences as f64,
            });
        }
        weekday = weekday.succ();
    }
    Ok(result)
}

/// Calendar months covered by the data. Monthly grouping is optional, so keys that aren't
/// `YYYY-MM-DD` disable it instead of failing the summary.
fn monthly_breakdown(export: &UsageExport) -> Vec<MonthTotal> {
    let mut months = BTreeMap::<String, MonthTotal>::new();
    for (date, day) in &export.daily_data {
        let month = match record_name_to_date(date) {
            Ok(date) => month_key(date),
            Err(e) => {
                warn!("Skipping monthly breakdown: {e}");
                return vec![];
            }
        };
        let entry = months.entry(month.clone()).or_insert_with(|| MonthTotal {
            month,
            days: 0,
            total: 0.,
        });
        entry.days += 1;
        entry.total += day.total_session_time;
    }
    if months.len() < 2 {
        return vec![];
    }
    months.into_values().collect()
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn print_usage_summary(export: &UsageExport, out: &mut impl Write) -> Result<()> {
    let Some(summary) = analyze_usage(export)? else {
        writeln!(out, "No usage data found in the file.")?;
        return Ok(());
    };

    write_title(out, "📊 Usage Analysis")?;

    writeln!(out, "\n📅 Data Range: {} days", summary.total_days)?;
    writeln!(
        out,
        "⏰ Total Work Time: {}",
        format_duration(summary.total_session_time)
    )?;
    writeln!(
        out,
        "☕ Total Break Time: {}",
        format_duration(summary.total_break_time)
    )?;
    writeln!(
        out,
        "📞 Total Call Time: {}",
        format_duration(summary.total_call_time)
    )?;
    writeln!(
        out,
        "📈 Average Daily Work: {}",
        format_duration(summary.average_daily_work)
    )?;

    if !summary.top_apps.is_empty() {
        writeln!(out, "\n📱 Top Applications:")?;
        for (i, app) in summary.top_apps.iter().enumerate() {
            writeln!(
                out,
                "  {:2}. {:20}: {:>8} ({:4.1})",
                i + 1,
                clean_app_name(&app.app_id),
                format_duration(app.duration),
                ratio_percentage(app.duration, summary.total_session_time),
            )?;
        }
    }

    if let Some(stats) = summary.deep_focus {
        writeln!(out, "\n🧘 Deep Focus Statistics:")?;
        writeln!(out, "   Sessions: {}", stats.count)?;
        writeln!(out, "   Total Time: {}", format_duration(stats.total))?;
        writeln!(out, "   Average Session: {}", format_duration(stats.average))?;
        writeln!(out, "   Longest Session: {}", format_duration(stats.longest))?;
    }

    if let Some(stats) = summary.continuous_work {
        writeln!(out, "\n💪 Work Patterns:")?;
        writeln!(out, "   Continuous Sessions: {}", stats.count)?;
        writeln!(out, "   Total Time: {}", format_duration(stats.total))?;
        writeln!(out, "   Longest Session: {}", format_duration(stats.longest))?;
        writeln!(out, "   Average Session: {}", format_duration(stats.average))?;
    }

    if let Some(weekly) = &summary.weekly {
        writeln!(out, "\n📅 Weekly Patterns:")?;
        for entry in weekly {
            writeln!(
                out,
                "   {:9}: {}",
                weekday_name(entry.weekday),
                format_duration(entry.average)
            )?;
        }
    }

    if !summary.monthly.is_empty() {
        writeln!(out, "\n🗓️ Monthly Breakdown:")?;
        for month in &summary.monthly {
            writeln!(
                out,
                "   {}: {} over {} days (avg {}/day)",
                month.month,
                format_duration(month.total),
                month.days,
                format_duration(month.total / month.days as f64)
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{NaiveDate, Weekday};

    use super::*;
    use crate::{
        export::entities::DayRecord,
        utils::{logging::TEST_LOGGING, time::date_to_record_name},
    };

    fn day(session: f64) -> DayRecord {
        DayRecord {
            total_session_time: session,
            ..Default::default()
        }
    }

    fn export_of(days: impl IntoIterator<Item = (&'static str, DayRecord)>) -> UsageExport {
        UsageExport {
            daily_data: days
                .into_iter()
                .map(|(date, record)| (date.to_string(), record))
                .collect(),
        }
    }

    fn render(export: &UsageExport) -> Result<String> {
        let mut out = vec![];
        print_usage_summary(export, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_empty_export() -> Result<()> {
        *TEST_LOGGING;
        let output = render(&UsageExport::default())?;
        assert_eq!(output, "No usage data found in the file.\n");
        Ok(())
    }

    #[test]
    fn test_single_day_average() -> Result<()> {
        let export = export_of([("2024-08-14", day(3600.))]);
        let summary = analyze_usage(&export)?.unwrap();
        assert_eq!(summary.average_daily_work, 3600.);
        assert!(summary.weekly.is_none());
        assert!(summary.monthly.is_empty());

        let output = render(&export)?;
        assert!(output.contains("📈 Average Daily Work: 1h 0m"));
        Ok(())
    }

    #[test]
    fn test_top_app_percentage() -> Result<()> {
        let mut record = day(7200.);
        record.app_usage.insert("com.acme.Tool".into(), 7200.);
        let output = render(&export_of([("2024-08-14", record)]))?;
        assert!(output.contains(&format!(
            "   1. {:20}: {:>8} (100.0%)",
            "Tool", "2h 0m"
        )));
        Ok(())
    }

    #[test]
    fn test_app_usage_exceeding_session_time() -> Result<()> {
        let mut record = day(100.);
        record.app_usage.insert("com.acme.Editor".into(), 3600.);
        record.app_usage.insert("com.acme.Browser".into(), 3600.);
        let output = render(&export_of([("2024-08-14", record)]))?;
        assert!(output.contains("3600.0%"));
        Ok(())
    }

    #[test]
    fn test_top_apps_sorted_and_truncated() -> Result<()> {
        let mut first = day(0.);
        let mut second = day(0.);
        for i in 0..12 {
            first.app_usage.insert(format!("app.n{i:02}"), i as f64);
            second.app_usage.insert(format!("app.n{i:02}"), 100.);
        }
        let summary =
            analyze_usage(&export_of([("2024-08-14", first), ("2024-08-15", second)]))?.unwrap();
        assert_eq!(summary.top_apps.len(), 10);
        assert_eq!(summary.top_apps[0].app_id, "app.n11");
        assert_eq!(summary.top_apps[0].duration, 111.);
        assert_eq!(summary.top_apps[9].app_id, "app.n02");
        // Zero session time never divides by zero.
        assert!(render(&export_of([("2024-08-14", day(0.))]))?.contains("Total Work Time: 0m"));
        Ok(())
    }

    #[test]
    fn test_session_stats() -> Result<()> {
        let mut first = day(0.);
        first.deep_focus_sessions = vec![
            SessionRecord { duration: 1800. },
            SessionRecord { duration: 3600. },
        ];
        first.continuous_work_sessions = vec![SessionRecord { duration: 600. }];
        let mut second = day(0.);
        second.deep_focus_sessions = vec![SessionRecord { duration: 2700. }];

        let summary =
            analyze_usage(&export_of([("2024-08-14", first), ("2024-08-15", second)]))?.unwrap();
        assert_eq!(
            summary.deep_focus,
            Some(SessionStats {
                count: 3,
                total: 8100.,
                average: 2700.,
                longest: 3600.,
            })
        );
        assert_eq!(summary.continuous_work.map(|s| s.longest), Some(600.));
        Ok(())
    }

    #[test]
    fn test_weekly_pattern() -> Result<()> {
        // 2024-07-01 is a Monday. Ten days: Monday through Wednesday appear twice.
        let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let export = UsageExport {
            daily_data: start
                .iter_days()
                .take(10)
                .map(|d| (date_to_record_name(d), day(3600.)))
                .collect(),
        };
        let weekly = analyze_usage(&export)?.unwrap().weekly.unwrap();
        assert_eq!(weekly.len(), 7);
        assert_eq!(
            weekly[0],
            WeekdayAverage {
                weekday: Weekday::Mon,
                average: 3600.
            }
        );
        // Thursday is seen once, the divisor is 10 / 7 + (3 > 3) = 1.
        assert_eq!(weekly[3].average, 3600.);

        let output = render(&export)?;
        assert!(output.contains("   Wednesday: 1h 0m"));
        assert!(output.contains("   Monday   : 1h 0m"));
        Ok(())
    }

    #[test]
    fn test_weekly_pattern_rejects_bad_dates() {
        let export = UsageExport {
            daily_data: (0..7)
                .map(|i| (format!("day {i}"), day(60.)))
                .collect(),
        };
        assert!(matches!(
            analyze_usage(&export),
            Err(ReportError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_short_export_with_free_form_keys() -> Result<()> {
        let export = export_of([("today", day(3600.))]);
        let summary = analyze_usage(&export)?.unwrap();
        assert!(summary.monthly.is_empty());
        assert!(render(&export)?.contains("⏰ Total Work Time: 1h 0m"));
        Ok(())
    }

    #[test]
    fn test_monthly_breakdown() -> Result<()> {
        let export = export_of([
            ("2024-07-30", day(3600.)),
            ("2024-07-31", day(7200.)),
            ("2024-08-01", day(1800.)),
        ]);
        let summary = analyze_usage(&export)?.unwrap();
        assert_eq!(
            summary.monthly,
            vec![
                MonthTotal {
                    month: "2024-07".into(),
                    days: 2,
                    total: 10800.
                },
                MonthTotal {
                    month: "2024-08".into(),
                    days: 1,
                    total: 1800.
                },
            ]
        );
        assert!(render(&export)?.contains("   2024-07: 3h 0m over 2 days (avg 1h 30m/day)"));
        Ok(())
    }
}
