use serde::Serialize;
use tracing::debug;

use super::classify::{percent_label, round_probability, Breakpoints, Normalized, RiskTier};
use super::recommendations::{Recommendation, RecommendationCategory, Severity};
use super::{Assessment, AssessmentContext, AssessmentDetail, AssessmentError, Condition};
use crate::profile::Gender;
use crate::source::DataSourceKind;
use crate::tracking::{Nutrient, NutritionLog};

/// Ratio of the RDA below which intake counts as deficient.
pub const DEFICIENCY_THRESHOLD: f64 = 0.8;
/// Ratio below which a deficiency is rated high rather than moderate.
pub const SEVERE_DEFICIENCY_THRESHOLD: f64 = 0.5;

const BREAKPOINTS: Breakpoints = Breakpoints {
    high: 0.30,
    moderate: 0.15,
};

/// Nutrients screened for a given gender. Iron is only tracked for women.
pub fn tracked_nutrients(gender: Gender) -> Vec<Nutrient> {
    let mut nutrients = vec![Nutrient::VitaminD, Nutrient::Calcium];
    if gender == Gender::Female {
        nutrients.push(Nutrient::Iron);
    }
    nutrients
}

/// Step function from the number of flagged nutrients to a probability.
pub fn deficiency_probability(flagged: usize) -> f64 {
    match flagged {
        0 => 0.05,
        1 => 0.20,
        _ => 0.40,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deficiency {
    pub nutrient: Nutrient,
    pub nutrient_name: &'static str,
    pub rda_achievement: f64,
    pub rda_percent: String,
    pub tier: RiskTier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionDetail {
    pub window_days: usize,
    pub deficiencies: Vec<Deficiency>,
}

/// Flags every tracked nutrient whose average RDA achievement over the
/// window is below [`DEFICIENCY_THRESHOLD`]. Nutrients with no logged data
/// are skipped.
pub fn find_deficiencies(log: &NutritionLog, gender: Gender, window: usize) -> Vec<Deficiency> {
    tracked_nutrients(gender)
        .into_iter()
        .filter_map(|nutrient| {
            let Some(ratio) = log.average_rda(nutrient, window) else {
                debug!(nutrient = nutrient.key(), "no intake data for nutrient");
                return None;
            };
            if ratio >= DEFICIENCY_THRESHOLD {
                return None;
            }
            let tier = if ratio < SEVERE_DEFICIENCY_THRESHOLD {
                RiskTier::High
            } else {
                RiskTier::Moderate
            };
            Some(Deficiency {
                nutrient,
                nutrient_name: nutrient.label(),
                rda_achievement: round_probability(ratio),
                rda_percent: percent_label(ratio),
                tier,
            })
        })
        .collect()
}

pub(crate) fn assess(context: &AssessmentContext) -> Result<Assessment, AssessmentError> {
    let log = context
        .nutrition
        .as_ref()
        .ok_or(AssessmentError::DataSourceUnavailable {
            data_source: DataSourceKind::NutritionTracker,
        })?;
    if log.is_empty() {
        return Err(AssessmentError::InsufficientData {
            data_source: DataSourceKind::NutritionTracker,
            required: 1,
            found: 0,
        });
    }

    let gender = context
        .profile
        .as_ref()
        .map(|profile| profile.basic_info.gender)
        .unwrap_or_default();
    let window_days = context.settings.nutrition_window_days;
    let deficiencies = find_deficiencies(log, gender, window_days);

    let probability = deficiency_probability(deficiencies.len());
    let normalized = Normalized {
        probability,
        tier: BREAKPOINTS.classify(probability),
    };
    let recommendations = deficiencies.iter().map(recommend).collect();

    Ok(Assessment::new(
        Condition::NutritionalDeficiency,
        normalized,
        AssessmentDetail::Nutrition(NutritionDetail {
            window_days,
            deficiencies,
        }),
        recommendations,
    ))
}

fn recommend(deficiency: &Deficiency) -> Recommendation {
    let name = deficiency.nutrient_name;
    let mut recommendation = Recommendation::new(
        Severity::Targeted,
        RecommendationCategory::Nutrition,
        format!("Increase {} intake", name.to_lowercase()),
        format!(
            "Your {} intake is low ({} of the recommended daily allowance).",
            name.to_lowercase(),
            deficiency.rda_percent
        ),
        &[],
    );
    recommendation.actionable_steps = vec![
        format!("Eat more foods rich in {}", name.to_lowercase()),
        "Consider a supplement after talking to your doctor".to_string(),
        "Recheck your nutritional status periodically".to_string(),
    ];
    recommendation.nutrient = Some(deficiency.nutrient);
    recommendation
}
