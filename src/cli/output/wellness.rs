use std::{collections::BTreeMap, io::Write};

use anyhow::Result;
use tracing::warn;

use crate::{
    export::entities::{
        ExerciseIntensity, ExerciseRecord, Mood, UsageExport, WellnessMetrics, WorkQuality,
    },
    utils::{
        percentage::{count_percentage, Percentage},
        stats::mean,
    },
};

use super::{format_average, write_title};

const LOW_ENERGY: f64 = 4.;
const HIGH_ENERGY: f64 = 7.;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// Comparison of the mate consumed on the first and on the last day that has any records.
#[derive(Debug, PartialEq)]
pub struct MateTrend {
    pub first_date: String,
    pub first_total: f64,
    pub last_date: String,
    pub last_total: f64,
}

impl MateTrend {
    pub fn direction(&self) -> TrendDirection {
        if self.last_total > self.first_total {
            TrendDirection::Increasing
        } else if self.last_total < self.first_total {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct MateStats {
    pub checks: usize,
    pub average_mate: f64,
    pub average_sugar: f64,
    pub trend: Option<MateTrend>,
}

#[derive(Debug, PartialEq)]
pub struct ExerciseStats {
    pub records: usize,
    pub successful: usize,
    pub success_rate: Percentage,
    /// Minutes, averaged over successful records only.
    pub average_duration: Option<f64>,
    pub intensity: [(ExerciseIntensity, usize); 4],
}

#[derive(Debug, PartialEq)]
pub struct EnergyStats {
    pub checks: usize,
    pub average: f64,
    pub low_days: usize,
    pub high_days: usize,
}

#[derive(Debug, PartialEq)]
pub struct ReflectionStats {
    pub days: usize,
    pub moods: BTreeMap<Mood, usize>,
    pub work_quality: BTreeMap<WorkQuality, usize>,
    pub average_energy: Option<f64>,
    pub average_stress: Option<f64>,
}

#[derive(Debug, PartialEq)]
pub struct WellnessReport {
    pub mate: Option<MateStats>,
    pub exercise: Option<ExerciseStats>,
    pub energy: Option<EnergyStats>,
    pub reflections: Option<ReflectionStats>,
}

impl WellnessReport {
    pub fn is_empty(&self) -> bool {
        self.mate.is_none()
            && self.exercise.is_none()
            && self.energy.is_none()
            && self.reflections.is_none()
    }
}

pub fn analyze_wellness(export: &UsageExport) -> WellnessReport {
    let days = export
        .daily_data
        .iter()
        .filter_map(|(date, day)| day.wellness_metrics.as_ref().map(|w| (date.as_str(), w)))
        .collect::<Vec<_>>();

    WellnessReport {
        mate: analyze_mate(&days),
        exercise: analyze_exercise(days.iter().flat_map(|(_, w)| w.exercise_records.iter())),
        energy: analyze_energy(&days),
        reflections: analyze_reflections(&days),
    }
}

fn analyze_mate(days: &[(&str, &WellnessMetrics)]) -> Option<MateStats> {
    let records = days
        .iter()
        .flat_map(|(_, w)| w.mate_and_sugar_records.iter())
        .collect::<Vec<_>>();
    let average_mate = mean(records.iter().map(|r| r.mate_amount))?;
    let average_sugar = mean(records.iter().map(|r| r.sugar_level)).unwrap_or_default();

    let mut with_mate = days
        .iter()
        .filter(|(_, w)| !w.mate_and_sugar_records.is_empty());
    let first = with_mate.next();
    let last = with_mate.last();
    let trend = first.zip(last).map(|((first_date, first), (last_date, last))| MateTrend {
        first_date: first_date.to_string(),
        first_total: first.mate_total(),
        last_date: last_date.to_string(),
        last_total: last.mate_total(),
    });

    Some(MateStats {
        checks: records.len(),
        average_mate,
        average_sugar,
        trend,
    })
}

fn analyze_exercise<'a>(records: impl Iterator<Item = &'a ExerciseRecord>) -> Option<ExerciseStats> {
    let records = records.collect::<Vec<_>>();
    if records.is_empty() {
        return None;
    }
    let successful = records.iter().filter(|r| r.done).collect::<Vec<_>>();

    let mut intensity = ExerciseIntensity::BUCKETS.map(|bucket| (bucket, 0));
    for record in &records {
        match intensity
            .iter_mut()
            .find(|(bucket, _)| *bucket == record.intensity)
        {
            Some((_, count)) => *count += 1,
            None => warn!("Skipping unrecognized exercise intensity"),
        }
    }

    Some(ExerciseStats {
        records: records.len(),
        successful: successful.len(),
        success_rate: count_percentage(successful.len(), records.len()),
        average_duration: mean(successful.iter().map(|r| r.duration)),
        intensity,
    })
}

fn analyze_energy(days: &[(&str, &WellnessMetrics)]) -> Option<EnergyStats> {
    let checks = days
        .iter()
        .flat_map(|(_, w)| w.energy_checks.iter())
        .map(|c| c.energy_level)
        .collect::<Vec<_>>();
    let average = mean(checks.iter().copied())?;

    let daily = days
        .iter()
        .filter_map(|(_, w)| w.mean_energy())
        .collect::<Vec<_>>();

    Some(EnergyStats {
        checks: checks.len(),
        average,
        low_days: daily.iter().filter(|v| **v <= LOW_ENERGY).count(),
        high_days: daily.iter().filter(|v| **v >= HIGH_ENERGY).count(),
    })
}

fn analyze_reflections(days: &[(&str, &WellnessMetrics)]) -> Option<ReflectionStats> {
    let reflections = days
        .iter()
        .filter_map(|(date, w)| w.daily_reflection.as_ref().map(|r| (*date, r)))
        .collect::<Vec<_>>();
    if reflections.is_empty() {
        return None;
    }

    let mut moods = BTreeMap::new();
    let mut work_quality = BTreeMap::new();
    for (date, reflection) in &reflections {
        if let Some(mood) = reflection.mood {
            if mood == Mood::Unrecognized {
                warn!("Unrecognized mood in reflection for {date}");
            }
            *moods.entry(mood).or_insert(0) += 1;
        }
        if let Some(quality) = &reflection.work_quality {
            *work_quality.entry(quality.clone()).or_insert(0) += 1;
        }
    }

    Some(ReflectionStats {
        days: reflections.len(),
        moods,
        work_quality,
        average_energy: mean(reflections.iter().filter_map(|(_, r)| r.energy_level)),
        average_stress: mean(reflections.iter().filter_map(|(_, r)| r.stress_level)),
    })
}

pub fn print_wellness_report(export: &UsageExport, out: &mut impl Write) -> Result<()> {
    let report = analyze_wellness(export);
    if report.is_empty() {
        writeln!(out, "No wellness data found in the file.")?;
        return Ok(());
    }

    writeln!(out)?;
    write_title(out, "🌿 Wellness Report")?;

    if let Some(mate) = &report.mate {
        writeln!(out, "\n🧉 Mate & Sugar:")?;
        writeln!(out, "   Checks: {}", mate.checks)?;
        writeln!(out, "   Average Mate: {:.1} per check", mate.average_mate)?;
        writeln!(out, "   Average Sugar Level: {:.1}", mate.average_sugar)?;
        if let Some(trend) = &mate.trend {
            let direction = match trend.direction() {
                TrendDirection::Increasing => "increasing",
                TrendDirection::Decreasing => "decreasing",
                TrendDirection::Stable => "stable",
            };
            writeln!(
                out,
                "   Trend: {direction} ({}: {:.1} → {}: {:.1})",
                trend.first_date, trend.first_total, trend.last_date, trend.last_total
            )?;
        }
    }

    if let Some(exercise) = &report.exercise {
        writeln!(out, "\n🏃 Exercise:")?;
        writeln!(out, "   Records: {}", exercise.records)?;
        writeln!(out, "   Success Rate: {:.1}", exercise.success_rate)?;
        writeln!(
            out,
            "   Average Duration: {} min",
            format_average(exercise.average_duration)
        )?;
        writeln!(out, "   Intensity:")?;
        for (bucket, count) in exercise.intensity {
            writeln!(
                out,
                "     {bucket:8}: {count} ({:.1})",
                count_percentage(count, exercise.records)
            )?;
        }
    }

    if let Some(energy) = &report.energy {
        writeln!(out, "\n⚡ Energy:")?;
        writeln!(out, "   Checks: {}", energy.checks)?;
        writeln!(out, "   Average Level: {:.1}/10", energy.average)?;
        writeln!(out, "   Low Energy Days (≤4): {}", energy.low_days)?;
        writeln!(out, "   High Energy Days (≥7): {}", energy.high_days)?;
    }

    if let Some(reflections) = &report.reflections {
        writeln!(out, "\n📝 Daily Reflections:")?;
        writeln!(out, "   Days: {}", reflections.days)?;
        if !reflections.moods.is_empty() {
            writeln!(out, "   Mood:")?;
            for (mood, count) in &reflections.moods {
                writeln!(out, "     {mood:12}: {count}")?;
            }
        }
        if !reflections.work_quality.is_empty() {
            writeln!(out, "   Work Quality:")?;
            for (quality, count) in &reflections.work_quality {
                writeln!(out, "     {quality:12}: {count}")?;
            }
        }
        writeln!(
            out,
            "   Average Energy: {}",
            format_average(reflections.average_energy)
        )?;
        writeln!(
            out,
            "   Average Stress: {}",
            format_average(reflections.average_stress)
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::*;

    fn export_from_json(json: &str) -> Result<UsageExport> {
        Ok(serde_json::from_str(json)?)
    }

    fn render(export: &UsageExport) -> Result<String> {
        let mut out = vec![];
        print_wellness_report(export, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_no_wellness_data() -> Result<()> {
        let export = export_from_json(r#"{"dailyData": {"2024-08-14": {"totalSessionTime": 60}}}"#)?;
        assert!(analyze_wellness(&export).is_empty());
        assert_eq!(render(&export)?, "No wellness data found in the file.\n");
        Ok(())
    }

    #[test]
    fn test_exercise_success_rate() -> Result<()> {
        let export = export_from_json(
            r#"{"dailyData": {"2024-08-14": {"wellnessMetrics": {
                "exerciseRecords": [{"done": true, "duration": 30, "type": "moderate"}, {"done": false}]
            }}}}"#,
        )?;
        let exercise = analyze_wellness(&export).exercise.unwrap();
        assert_eq!(exercise.records, 2);
        assert_eq!(exercise.successful, 1);
        assert_eq!(*exercise.success_rate, 50.);
        assert_eq!(exercise.average_duration, Some(30.));
        assert_eq!(
            exercise.intensity,
            [
                (ExerciseIntensity::None, 1),
                (ExerciseIntensity::Light, 0),
                (ExerciseIntensity::Moderate, 1),
                (ExerciseIntensity::Intense, 0),
            ]
        );

        let output = render(&export)?;
        assert!(output.contains("   Success Rate: 50.0%"));
        assert!(output.contains("   Average Duration: 30.0 min"));
        assert!(output.contains("     moderate: 1 (50.0%)"));
        Ok(())
    }

    #[test]
    fn test_unrecognized_intensity_is_not_bucketed() -> Result<()> {
        let export = export_from_json(
            r#"{"dailyData": {"2024-08-14": {"wellnessMetrics": {
                "exerciseRecords": [{"done": true, "duration": 10, "type": "extreme"}]
            }}}}"#,
        )?;
        let exercise = analyze_wellness(&export).exercise.unwrap();
        assert_eq!(exercise.records, 1);
        assert!(exercise.intensity.iter().all(|(_, count)| *count == 0));
        Ok(())
    }

    #[test]
    fn test_mate_trend() -> Result<()> {
        let export = export_from_json(
            r#"{"dailyData": {
                "2024-08-14": {"wellnessMetrics": {"mateAndSugarRecords": [
                    {"mateAmount": 1, "sugarLevel": 2, "timestamp": "2024-08-14T09:00:00Z"},
                    {"mateAmount": 1, "sugarLevel": 0}
                ]}},
                "2024-08-15": {"wellnessMetrics": {"energyChecks": [{"energyLevel": 5}]}},
                "2024-08-16": {"wellnessMetrics": {"mateAndSugarRecords": [
                    {"mateAmount": 3, "sugarLevel": 1}
                ]}}
            }}"#,
        )?;
        let mate = analyze_wellness(&export).mate.unwrap();
        assert_eq!(mate.checks, 3);
        assert!((mate.average_mate - 5. / 3.).abs() < 1e-9);
        assert_eq!(mate.average_sugar, 1.);
        let trend = mate.trend.unwrap();
        assert_eq!(trend.first_date, "2024-08-14");
        assert_eq!(trend.last_date, "2024-08-16");
        assert_eq!(trend.direction(), TrendDirection::Increasing);

        assert!(render(&export)?.contains("   Trend: increasing (2024-08-14: 2.0 → 2024-08-16: 3.0)"));
        Ok(())
    }

    #[test]
    fn test_single_mate_day_has_no_trend() -> Result<()> {
        let export = export_from_json(
            r#"{"dailyData": {"2024-08-14": {"wellnessMetrics": {"mateAndSugarRecords": [{"mateAmount": 2}]}}}}"#,
        )?;
        assert!(analyze_wellness(&export).mate.unwrap().trend.is_none());
        Ok(())
    }

    #[test]
    fn test_energy_days() -> Result<()> {
        let export = export_from_json(
            r#"{"dailyData": {
                "2024-08-14": {"wellnessMetrics": {"energyChecks": [{"energyLevel": 3}, {"energyLevel": 5}]}},
                "2024-08-15": {"wellnessMetrics": {"energyChecks": [{"energyLevel": 8}]}},
                "2024-08-16": {"wellnessMetrics": {"energyChecks": [{"energyLevel": 6}]}}
            }}"#,
        )?;
        let energy = analyze_wellness(&export).energy.unwrap();
        assert_eq!(
            energy,
            EnergyStats {
                checks: 4,
                average: 5.5,
                low_days: 1,
                high_days: 1,
            }
        );
        Ok(())
    }

    #[test]
    fn test_reflections() -> Result<()> {
        let export = export_from_json(
            r#"{"dailyData": {
                "2024-08-14": {"wellnessMetrics": {"dailyReflection": {"mood": "tired", "energyLevel": 4, "stressLevel": 6, "workQuality": 3}}},
                "2024-08-15": {"wellnessMetrics": {"dailyReflection": {"mood": "productive", "energyLevel": 8, "workQuality": 3}}},
                "2024-08-16": {"wellnessMetrics": {"dailyReflection": {"mood": "tired"}}}
            }}"#,
        )?;
        let reflections = analyze_wellness(&export).reflections.unwrap();
        assert_eq!(reflections.days, 3);
        assert_eq!(reflections.moods.get(&Mood::Tired), Some(&2));
        assert_eq!(reflections.moods.get(&Mood::Productive), Some(&1));
        assert_eq!(reflections.work_quality.get(&WorkQuality("3".into())), Some(&2));
        assert_eq!(reflections.average_energy, Some(6.));
        assert_eq!(reflections.average_stress, Some(6.));

        let output = render(&export)?;
        assert!(output.contains("     productive  : 1"));
        assert!(output.contains("     tired       : 2"));
        Ok(())
    }
}
