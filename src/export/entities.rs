use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

use serde::{Deserialize, Deserializer};

use crate::utils::stats::mean;

/// Top level of an exported file. Days are kept sorted by their `YYYY-MM-DD` key, which also makes
/// them sorted chronologically.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageExport {
    #[serde(default, deserialize_with = "nullable")]
    pub daily_data: BTreeMap<String, DayRecord>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub total_session_time: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub total_break_time: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub call_time: f64,
    /// Seconds per application identifier, e.g. `com.apple.Safari`.
    #[serde(default, deserialize_with = "nullable")]
    pub app_usage: HashMap<String, f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub deep_focus_sessions: Vec<SessionRecord>,
    #[serde(default, deserialize_with = "nullable")]
    pub continuous_work_sessions: Vec<SessionRecord>,
    #[serde(default)]
    pub wellness_metrics: Option<WellnessMetrics>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct SessionRecord {
    /// Seconds.
    #[serde(default, deserialize_with = "nullable")]
    pub duration: f64,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessMetrics {
    #[serde(default, deserialize_with = "nullable")]
    pub mate_and_sugar_records: Vec<MateRecord>,
    #[serde(default, deserialize_with = "nullable")]
    pub exercise_records: Vec<ExerciseRecord>,
    #[serde(default, deserialize_with = "nullable")]
    pub energy_checks: Vec<EnergyCheck>,
    #[serde(default)]
    pub daily_reflection: Option<DailyReflection>,
}

impl WellnessMetrics {
    pub fn mate_total(&self) -> f64 {
        self.mate_and_sugar_records
            .iter()
            .map(|v| v.mate_amount)
            .sum()
    }

    pub fn exercised(&self) -> bool {
        self.exercise_records.iter().any(|v| v.done)
    }

    /// Mean of the day's energy checks, `None` when nothing was checked.
    pub fn mean_energy(&self) -> Option<f64> {
        mean(self.energy_checks.iter().map(|v| v.energy_level))
    }
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MateRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub mate_amount: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub sugar_level: f64,
    /// Kept as raw JSON, exports write it either as a date string or as a number.
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct ExerciseRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub done: bool,
    /// Minutes.
    #[serde(default, deserialize_with = "nullable")]
    pub duration: f64,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub intensity: ExerciseIntensity,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseIntensity {
    #[default]
    None,
    Light,
    Moderate,
    Intense,
    #[serde(other)]
    Unrecognized,
}

impl ExerciseIntensity {
    /// Buckets of the intensity distribution, in display order.
    pub const BUCKETS: [ExerciseIntensity; 4] = [
        ExerciseIntensity::None,
        ExerciseIntensity::Light,
        ExerciseIntensity::Moderate,
        ExerciseIntensity::Intense,
    ];
}

impl Display for ExerciseIntensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExerciseIntensity::None => "none",
            ExerciseIntensity::Light => "light",
            ExerciseIntensity::Moderate => "moderate",
            ExerciseIntensity::Intense => "intense",
            ExerciseIntensity::Unrecognized => "unrecognized",
        };
        f.pad(name)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyCheck {
    #[serde(default, deserialize_with = "nullable")]
    pub energy_level: f64,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReflection {
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub energy_level: Option<f64>,
    #[serde(default)]
    pub stress_level: Option<f64>,
    #[serde(default)]
    pub work_quality: Option<WorkQuality>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Productive,
    Balanced,
    Tired,
    Stressed,
    #[serde(other)]
    Unrecognized,
}

impl Mood {
    pub const DEFAULT_SCORE: u8 = 3;

    /// Ordinal used when comparing productive and unproductive days.
    pub fn score(&self) -> u8 {
        match self {
            Mood::Productive => 4,
            Mood::Balanced => 3,
            Mood::Tired => 2,
            Mood::Stressed => 1,
            Mood::Unrecognized => Self::DEFAULT_SCORE,
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Mood::Productive => "productive",
            Mood::Balanced => "balanced",
            Mood::Tired => "tired",
            Mood::Stressed => "stressed",
            Mood::Unrecognized => "unrecognized",
        };
        f.pad(name)
    }
}

/// Self-assessed work quality. Exports carry a numeric score, possibly fractional, or a label.
/// Ratings are compared and tallied by their printed form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(from = "serde_json::Value")]
pub struct WorkQuality(pub String);

impl From<serde_json::Value> for WorkQuality {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(label) => WorkQuality(label),
            other => WorkQuality(other.to_string()),
        }
    }
}

impl Display for WorkQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// Treats an explicit `null` the same way as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
