use std::{fmt::Display, io::Write};

use anyhow::Result;

use crate::{
    export::entities::{Mood, UsageExport},
    utils::{
        percentage::{count_percentage, Percentage},
        stats::mean,
        time::format_duration,
    },
};

use super::{format_average, write_title};

const MIN_WELLNESS_DAYS: usize = 3;
/// Days under this share of the average session time count as low productivity.
const LOW_PRODUCTIVITY_RATIO: f64 = 0.7;

const ENERGY_GAP: f64 = 1.;
const EXERCISE_RATE_GAP: f64 = 20.;
const MATE_GAP: f64 = 1.;

/// Values of a single day that has wellness data.
#[derive(Debug, Clone, PartialEq)]
pub struct DayWellness {
    pub session_time: f64,
    pub mate_total: f64,
    pub exercised: bool,
    /// Mean of the energy checks, `None` without checks.
    pub energy: Option<f64>,
    pub mood_score: u8,
}

#[derive(Debug, PartialEq)]
pub struct GroupAverages {
    pub days: usize,
    pub mate: Option<f64>,
    pub energy: Option<f64>,
    pub exercise_rate: Percentage,
    pub mood_score: Option<f64>,
}

impl GroupAverages {
    fn from_days<'a>(days: impl Iterator<Item = &'a DayWellness>) -> Self {
        let days = days.collect::<Vec<_>>();
        GroupAverages {
            days: days.len(),
            mate: mean(days.iter().map(|d| d.mate_total)),
            energy: mean(days.iter().filter_map(|d| d.energy)),
            exercise_rate: count_percentage(
                days.iter().filter(|d| d.exercised).count(),
                days.len(),
            ),
            mood_score: mean(days.iter().map(|d| d.mood_score as f64)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insight {
    Energy,
    Exercise,
    Mate,
}

impl Display for Insight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insight::Energy => write!(f, "Higher energy levels go together with more productive days"),
            Insight::Exercise => write!(f, "Days with exercise tend to be more productive"),
            Insight::Mate => write!(f, "More mate is consumed on productive days"),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct CorrelationReport {
    pub days: usize,
    pub average_session_time: f64,
    /// Days with session time above the average.
    pub high: GroupAverages,
    /// Days with session time under [LOW_PRODUCTIVITY_RATIO] of the average.
    pub low: GroupAverages,
    pub insights: Vec<Insight>,
}

pub fn day_wellness(export: &UsageExport) -> Vec<DayWellness> {
    export
        .daily_data
        .values()
        .filter_map(|day| {
            let wellness = day.wellness_metrics.as_ref()?;
            Some(DayWellness {
                session_time: day.total_session_time,
                mate_total: wellness.mate_total(),
                exercised: wellness.exercised(),
                energy: wellness.mean_energy(),
                mood_score: wellness
                    .daily_reflection
                    .as_ref()
                    .and_then(|r| r.mood)
                    .map_or(Mood::DEFAULT_SCORE, |m| m.score()),
            })
        })
        .collect()
}

/// Splits days into high and low productivity by session time and compares their wellness values.
/// The two groups don't cover every day, days between 70% and 100% of the average belong to
/// neither. Returns `None` with fewer than 3 days of wellness data.
pub fn analyze_correlations(export: &UsageExport) -> Option<CorrelationReport> {
    let days = day_wellness(export);
    if days.len() < MIN_WELLNESS_DAYS {
        return None;
    }

    let average_session_time = mean(days.iter().map(|d| d.session_time))?;
    let high = GroupAverages::from_days(
        days.iter()
            .filter(|d| d.session_time > average_session_time),
    );
    let low = GroupAverages::from_days(
        days.iter()
            .filter(|d| d.session_time < average_session_time * LOW_PRODUCTIVITY_RATIO),
    );
    let insights = insights(&high, &low);

    Some(CorrelationReport {
        days: days.len(),
        average_session_time,
        high,
        low,
        insights,
    })
}

fn insights(high: &GroupAverages, low: &GroupAverages) -> Vec<Insight> {
    if high.days == 0 || low.days == 0 {
        return vec![];
    }
    let exceeds = |high: Option<f64>, low: Option<f64>, gap: f64| {
        matches!(high.zip(low), Some((high, low)) if high - low > gap)
    };

    let mut result = vec![];
    if exceeds(high.energy, low.energy, ENERGY_GAP) {
        result.push(Insight::Energy);
    }
    if *high.exercise_rate - *low.exercise_rate > EXERCISE_RATE_GAP {
        result.push(Insight::Exercise);
    }
    if exceeds(high.mate, low.mate, MATE_GAP) {
        result.push(Insight::Mate);
    }
    result
}

fn write_group(out: &mut impl Write, title: &str, group: &GroupAverages) -> Result<()> {
    writeln!(out, "\n{title} ({} days):", group.days)?;
    if group.days == 0 {
        writeln!(out, "   No days in this group")?;
        return Ok(());
    }
    writeln!(out, "   Average Mate: {}", format_average(group.mate))?;
    writeln!(out, "   Average Energy: {}", format_average(group.energy))?;
    writeln!(out, "   Exercise Rate: {:.1}", group.exercise_rate)?;
    writeln!(out, "   Average Mood Score: {}", format_average(group.mood_score))?;
    Ok(())
}

/// Writes nothing at all when there isn't enough wellness data.
pub fn print_correlation_report(export: &UsageExport, out: &mut impl Write) -> Result<()> {
    let Some(report) = analyze_correlations(export) else {
        return Ok(());
    };

    writeln!(out)?;
    write_title(out, "🔗 Productivity Correlations")?;
    writeln!(
        out,
        "Days analyzed: {} (average work {})",
        report.days,
        format_duration(report.average_session_time)
    )?;

    write_group(out, "🚀 High productivity days", &report.high)?;
    write_group(out, "🐢 Low productivity days", &report.low)?;

    if !report.insights.is_empty() {
        writeln!(out, "\n💡 Insights:")?;
        for insight in &report.insights {
            writeln!(out, "   • {insight}")?;
        }
    }
    Ok(())
}
