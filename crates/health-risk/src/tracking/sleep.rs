use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::source::{read_json, SourceError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectiveQuality {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
    #[serde(rename = "very poor")]
    VeryPoor,
}

impl SubjectiveQuality {
    pub const fn is_poor(self) -> bool {
        matches!(self, Self::Poor | Self::VeryPoor)
    }

    /// Accepts any case with spaces, underscores or hyphens between words.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "excellent" => Some(Self::Excellent),
            "good" => Some(Self::Good),
            "fair" => Some(Self::Fair),
            "poor" => Some(Self::Poor),
            "very poor" => Some(Self::VeryPoor),
            _ => None,
        }
    }
}

/// Resolves a logged quality label. Blank or unrecognised labels read as the
/// default in every export format.
fn quality_or_default(raw: Option<&str>) -> SubjectiveQuality {
    let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
        return SubjectiveQuality::default();
    };
    SubjectiveQuality::parse(raw).unwrap_or_else(|| {
        warn!(quality = raw, "unrecognised sleep quality, treating as good");
        SubjectiveQuality::default()
    })
}

fn lenient_quality<'de, D>(deserializer: D) -> Result<SubjectiveQuality, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(quality_or_default(raw.as_deref()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepQuality {
    #[serde(default, deserialize_with = "lenient_quality")]
    pub subjective_quality: SubjectiveQuality,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepMetrics {
    /// A night without a logged duration counts as zero hours.
    #[serde(default)]
    pub sleep_duration_hours: f64,
    /// Percentage, 0–100. Unlogged efficiency counts as perfect.
    #[serde(default = "full_efficiency")]
    pub sleep_efficiency: f64,
}

impl Default for SleepMetrics {
    fn default() -> Self {
        Self {
            sleep_duration_hours: 0.0,
            sleep_efficiency: full_efficiency(),
        }
    }
}

fn full_efficiency() -> f64 {
    100.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SleepRecord {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub sleep_quality: SleepQuality,
    #[serde(default)]
    pub sleep_metrics: SleepMetrics,
}

/// Chronological sleep tracker export; the last record is the most recent
/// night.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SleepLog {
    #[serde(default)]
    pub sleep_records: Vec<SleepRecord>,
}

impl SleepLog {
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        read_json(path)
    }

    /// Reads a flat CSV export with `date`, `subjective_quality`,
    /// `sleep_duration_hours` and `sleep_efficiency` columns. Blank cells take
    /// the same defaults as missing JSON fields.
    pub fn from_csv_path(path: &Path) -> Result<Self, SourceError> {
        let file = std::fs::File::open(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_reader(file).map_err(|source| SourceError::Csv {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut sleep_records = Vec::new();

        for row in csv_reader.deserialize::<SleepCsvRow>() {
            sleep_records.push(row?.into_record());
        }

        Ok(Self { sleep_records })
    }

    pub fn len(&self) -> usize {
        self.sleep_records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sleep_records.is_empty()
    }

    /// The trailing `days` records, or `None` when fewer exist.
    pub fn recent(&self, days: usize) -> Option<&[SleepRecord]> {
        let len = self.sleep_records.len();
        if len < days {
            return None;
        }
        Some(&self.sleep_records[len - days..])
    }
}

#[derive(Debug, Deserialize)]
struct SleepCsvRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    subjective_quality: Option<String>,
    #[serde(default)]
    sleep_duration_hours: Option<f64>,
    #[serde(default)]
    sleep_efficiency: Option<f64>,
}

impl SleepCsvRow {
    fn into_record(self) -> SleepRecord {
        let subjective_quality = quality_or_default(self.subjective_quality.as_deref());

        SleepRecord {
            date: self
                .date
                .as_deref()
                .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()),
            sleep_quality: SleepQuality { subjective_quality },
            sleep_metrics: SleepMetrics {
                sleep_duration_hours: self.sleep_duration_hours.unwrap_or(0.0),
                sleep_efficiency: self.sleep_efficiency.unwrap_or_else(full_efficiency),
            },
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
