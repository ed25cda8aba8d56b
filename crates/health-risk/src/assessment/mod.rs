mod classify;
mod factors;
mod models;
mod nutrition;
mod recommendations;
mod rules;
mod sleep;

#[cfg(test)]
mod tests;

pub use classify::{percent_label, round_probability, Breakpoints, Normalized, RiskTier, ScoreScale};
pub use factors::{
    age_on, default_for, extract, key_factors, FactorKind, FactorSet, FactorValue, KeyFactor,
    DEFAULT_POLICY, MAX_KEY_FACTORS,
};
pub use models::{RiskModel, CARDIOVASCULAR, DIABETES, HYPERTENSION};
pub use nutrition::{
    deficiency_probability, find_deficiencies, tracked_nutrients, Deficiency, NutritionDetail,
    DEFICIENCY_THRESHOLD, SEVERE_DEFICIENCY_THRESHOLD,
};
pub use recommendations::{
    merge, synthesize, Recommendation, RecommendationCategory, Severity, MEDICAL_DISCLAIMER,
};
pub use rules::{
    band, band_points, factor_points, score_factors, Band, FactorRule, ScoreBreakdown,
    ScoreComponent, ScoringRule,
};
pub use sleep::{SleepDetail, SleepWindowMetrics, SLEEP_SCALE, SLEEP_WINDOW_DAYS};

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{load_settings, DataConfig, PredictionSettings};
use crate::profile::{load_observations, load_profile, Observations, Profile};
use crate::source::DataSourceKind;
use crate::tracking::{NutritionLog, SleepLog};

/// Conditions the engine can assess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Hypertension,
    Diabetes,
    Cardiovascular,
    NutritionalDeficiency,
    SleepDisorder,
}

impl Condition {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Hypertension,
            Self::Diabetes,
            Self::Cardiovascular,
            Self::NutritionalDeficiency,
            Self::SleepDisorder,
        ]
    }

    /// Conditions scored by a static risk model.
    pub const fn chronic() -> [Self; 3] {
        [Self::Hypertension, Self::Diabetes, Self::Cardiovascular]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Hypertension => "hypertension",
            Self::Diabetes => "diabetes",
            Self::Cardiovascular => "cardiovascular",
            Self::NutritionalDeficiency => "nutritional_deficiency",
            Self::SleepDisorder => "sleep_disorder",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Hypertension => "Hypertension",
            Self::Diabetes => "Type 2 diabetes",
            Self::Cardiovascular => "Cardiovascular disease",
            Self::NutritionalDeficiency => "Nutritional deficiency",
            Self::SleepDisorder => "Sleep disorder",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown condition '{0}'")]
pub struct UnknownCondition(pub String);

impl FromStr for Condition {
    type Err = UnknownCondition;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ordered()
            .into_iter()
            .find(|condition| condition.key() == normalized)
            .ok_or_else(|| UnknownCondition(value.to_string()))
    }
}

/// Reasons an assessment could not be produced. Always recoverable; the
/// report layer records them and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssessmentError {
    #[error("user profile not found")]
    ProfileUnavailable,
    #[error("{data_source} data not found")]
    DataSourceUnavailable { data_source: DataSourceKind },
    #[error("not enough {data_source} data: need {required} records, found {found}")]
    InsufficientData {
        data_source: DataSourceKind,
        required: usize,
        found: usize,
    },
}

/// Everything an assessment reads. Built once and never mutated, so one
/// context can be shared by concurrent assessments.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentContext {
    pub profile: Option<Profile>,
    pub observations: Observations,
    pub nutrition: Option<NutritionLog>,
    pub sleep: Option<SleepLog>,
    pub settings: PredictionSettings,
    /// Reference date for age calculation.
    pub as_of: NaiveDate,
}

impl AssessmentContext {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            profile: None,
            observations: Observations::default(),
            nutrition: None,
            sleep: None,
            settings: PredictionSettings::default(),
            as_of,
        }
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_observations(mut self, observations: Observations) -> Self {
        self.observations = observations;
        self
    }

    pub fn with_nutrition(mut self, nutrition: NutritionLog) -> Self {
        self.nutrition = Some(nutrition);
        self
    }

    pub fn with_sleep(mut self, sleep: SleepLog) -> Self {
        self.sleep = Some(sleep);
        self
    }

    pub fn with_settings(mut self, settings: PredictionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Reads every input under the data directory once. Unreadable sources
    /// degrade to absent with a warning; loading itself never fails.
    pub fn load(data: &DataConfig, as_of: NaiveDate) -> Self {
        let settings = load_settings(&data.settings_path());
        let profile = load_profile(&data.profile_path());
        let observations = load_observations(&data.observations_path());

        let nutrition = match NutritionLog::from_path(&data.nutrition_path()) {
            Ok(log) => Some(log),
            Err(err) => {
                warn!(data_source = %DataSourceKind::NutritionTracker, %err, "tracker unavailable");
                None
            }
        };

        let sleep_result = match data.sleep_csv() {
            Some(path) => SleepLog::from_csv_path(path),
            None => SleepLog::from_path(&data.sleep_path()),
        };
        let sleep = match sleep_result {
            Ok(log) => Some(log),
            Err(err) => {
                warn!(data_source = %DataSourceKind::SleepTracker, %err, "tracker unavailable");
                None
            }
        };

        info!(
            data_dir = %data.data_dir.display(),
            profile = profile.is_some(),
            nutrition_records = nutrition.as_ref().map_or(0, NutritionLog::len),
            sleep_records = sleep.as_ref().map_or(0, SleepLog::len),
            predictions_enabled = settings.enabled,
            "assessment context loaded"
        );

        Self {
            profile,
            observations,
            nutrition,
            sleep,
            settings,
            as_of,
        }
    }
}

/// Condition-specific part of an assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssessmentDetail {
    Scored(ScoredDetail),
    Nutrition(NutritionDetail),
    Sleep(SleepDetail),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDetail {
    pub model: &'static str,
    pub time_horizon_years: u8,
    pub score: u32,
    pub max_score: u32,
    pub factors: FactorSet,
    pub score_components: Vec<ScoreComponent>,
    pub key_factors: Vec<KeyFactor>,
    pub modifiable_factors: &'static [FactorKind],
    pub prevention_measures: &'static [&'static str],
}

/// Result of assessing one condition. A pure value; serializes with fixed
/// snake_case field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub condition: Condition,
    pub name: &'static str,
    /// Capped probability rounded to three decimals.
    pub probability: f64,
    pub probability_percent: String,
    pub tier: RiskTier,
    pub tier_label: &'static str,
    #[serde(flatten)]
    pub detail: AssessmentDetail,
    pub recommendations: Vec<Recommendation>,
}

impl Assessment {
    pub(crate) fn new(
        condition: Condition,
        normalized: Normalized,
        detail: AssessmentDetail,
        recommendations: Vec<Recommendation>,
    ) -> Self {
        Self {
            condition,
            name: condition.display_name(),
            probability: normalized.rounded(),
            probability_percent: normalized.percent_label(),
            tier: normalized.tier,
            tier_label: normalized.tier.label(),
            detail,
            recommendations,
        }
    }

    pub fn scored(&self) -> Option<&ScoredDetail> {
        match &self.detail {
            AssessmentDetail::Scored(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Assesses one condition against an immutable context.
pub fn assess(
    context: &AssessmentContext,
    condition: Condition,
) -> Result<Assessment, AssessmentError> {
    match condition {
        Condition::NutritionalDeficiency => nutrition::assess(context),
        Condition::SleepDisorder => sleep::assess(context),
        Condition::Hypertension => assess_scored(&HYPERTENSION, context),
        Condition::Diabetes => assess_scored(&DIABETES, context),
        Condition::Cardiovascular => assess_scored(&CARDIOVASCULAR, context),
    }
}

fn assess_scored(
    model: &'static RiskModel,
    context: &AssessmentContext,
) -> Result<Assessment, AssessmentError> {
    let factors = extract(model, context)?;
    let breakdown = score_factors(model.rules, &factors);
    let normalized = model.scale.normalize(breakdown.total);

    debug!(
        condition = %model.condition,
        score = breakdown.total,
        probability = normalized.probability,
        tier = normalized.tier.key(),
        "scored condition"
    );

    let recommendations = synthesize(
        model,
        normalized.probability,
        &factors,
        context.settings.medical_consultation_threshold,
    );
    let key_factors = key_factors(&factors, &breakdown.components);

    Ok(Assessment::new(
        model.condition,
        normalized,
        AssessmentDetail::Scored(ScoredDetail {
            model: model.model_name,
            time_horizon_years: model.time_horizon_years,
            score: breakdown.total,
            max_score: model.scale.max_score,
            factors,
            score_components: breakdown.components,
            key_factors,
            modifiable_factors: model.modifiable_factors,
            prevention_measures: model.prevention_measures,
        }),
        recommendations,
    ))
}

/// Thin owner of an [`AssessmentContext`]. Holds no mutable state, so it is
/// `Send + Sync` and may be shared across threads.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    context: AssessmentContext,
}

impl RiskEngine {
    pub fn new(context: AssessmentContext) -> Self {
        Self { context }
    }

    pub fn load(data: &DataConfig, as_of: NaiveDate) -> Self {
        Self::new(AssessmentContext::load(data, as_of))
    }

    pub fn context(&self) -> &AssessmentContext {
        &self.context
    }

    pub fn settings(&self) -> &PredictionSettings {
        &self.context.settings
    }

    pub fn assess(&self, condition: Condition) -> Result<Assessment, AssessmentError> {
        assess(&self.context, condition)
    }

    /// Assesses each condition in order, keeping failures alongside results.
    pub fn assess_many<I>(
        &self,
        conditions: I,
    ) -> Vec<(Condition, Result<Assessment, AssessmentError>)>
    where
        I: IntoIterator<Item = Condition>,
    {
        conditions
            .into_iter()
            .map(|condition| (condition, self.assess(condition)))
            .collect()
    }
}
