mod loader;

pub use loader::{load_observations, load_profile};

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Immutable snapshot of the person being assessed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub basic_info: BasicInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub calculated: CalculatedMetrics,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lifestyle: Lifestyle,
    #[serde(default, deserialize_with = "nullable_flags")]
    pub family_history: BTreeMap<String, bool>,
    #[serde(default, deserialize_with = "nullable_flags")]
    pub medical_history: BTreeMap<String, bool>,
}

impl Profile {
    /// Birth date in `YYYY-MM-DD` form, if present and parseable.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.basic_info
            .birth_date
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
    }

    pub fn has_family_history(&self, condition: &str) -> bool {
        self.family_history.get(condition).copied().unwrap_or(false)
    }

    pub fn has_medical_history(&self, condition: &str) -> bool {
        self.medical_history.get(condition).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicInfo {
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gender: Gender,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculatedMetrics {
    #[serde(default)]
    pub bmi: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifestyle {
    #[serde(default)]
    pub activity_level: Option<ActivityLevel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub smoking: bool,
}

/// Treats an explicit JSON `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// History maps where a `null` entry means "not reported", i.e. false.
fn nullable_flags<'de, D>(deserializer: D) -> Result<BTreeMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Option<bool>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(condition, flag)| (condition, flag.unwrap_or(false)))
        .collect())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::VeryActive => "very_active",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietQuality {
    Poor,
    Moderate,
    Good,
}

impl DietQuality {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Poor => "poor",
            Self::Moderate => "moderate",
            Self::Good => "good",
        }
    }
}

/// Latest clinical readings fed alongside the profile.
///
/// Every field is optional; extraction substitutes population defaults for
/// whatever the feed does not carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observations {
    #[serde(default)]
    pub systolic_bp: Option<f64>,
    #[serde(default)]
    pub diastolic_bp: Option<f64>,
    /// mmol/L
    #[serde(default)]
    pub fasting_glucose: Option<f64>,
    /// mg/dL
    #[serde(default)]
    pub total_cholesterol: Option<f64>,
    /// mg/dL
    #[serde(default)]
    pub hdl_cholesterol: Option<f64>,
    #[serde(default)]
    pub diet_quality: Option<DietQuality>,
}
