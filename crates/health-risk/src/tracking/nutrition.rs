use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::source::{read_json, SourceError};

/// Nutrients screened for deficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    VitaminD,
    Calcium,
    Iron,
}

impl Nutrient {
    /// Key used in tracker records.
    pub const fn key(self) -> &'static str {
        match self {
            Self::VitaminD => "vitamin_d",
            Self::Calcium => "calcium",
            Self::Iron => "iron",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::VitaminD => "Vitamin D",
            Self::Calcium => "Calcium",
            Self::Iron => "Iron",
        }
    }
}

/// One day of intake, expressed as the fraction of the RDA reached per
/// nutrient key. Trackers log more nutrients than are screened; unknown keys
/// are kept and ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyIntake {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub rda_achievement: BTreeMap<String, f64>,
}

/// Chronological nutrition tracker export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionLog {
    #[serde(default)]
    pub daily_records: Vec<DailyIntake>,
}

impl NutritionLog {
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        read_json(path)
    }

    pub fn len(&self) -> usize {
        self.daily_records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.daily_records.is_empty()
    }

    /// Mean RDA achievement over the most recent `window` records that carry
    /// the nutrient. `None` when none of them do.
    pub fn average_rda(&self, nutrient: Nutrient, window: usize) -> Option<f64> {
        let ratios: Vec<f64> = self
            .daily_records
            .iter()
            .rev()
            .take(window)
            .filter_map(|record| record.rda_achievement.get(nutrient.key()).copied())
            .filter(|ratio| ratio.is_finite() && *ratio >= 0.0)
            .collect();

        if ratios.is_empty() {
            None
        } else {
            Some(ratios.iter().sum::<f64>() / ratios.len() as f64)
        }
    }
}
