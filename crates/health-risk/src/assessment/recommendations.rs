use serde::Serialize;

use super::factors::{FactorKind, FactorSet};
use super::models::RiskModel;
use super::rules::factor_points;
use crate::tracking::Nutrient;

/// Urgency of an advisory. Serialized as its numeric level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Severity {
    Lifestyle = 1,
    Targeted = 2,
    MedicalConsultation = 3,
}

impl From<Severity> for u8 {
    fn from(value: Severity) -> Self {
        value as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    MedicalConsultation,
    Lifestyle,
    RiskFactor,
    Nutrition,
    SleepHygiene,
    SleepEvaluation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub level: Severity,
    pub category: RecommendationCategory,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actionable_steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
    pub requires_medical_supervision: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrient: Option<Nutrient>,
}

impl Recommendation {
    pub(crate) fn new(
        level: Severity,
        category: RecommendationCategory,
        title: impl Into<String>,
        content: impl Into<String>,
        steps: &[&str],
    ) -> Self {
        Self {
            level,
            category,
            title: title.into(),
            content: content.into(),
            actionable_steps: steps.iter().map(|step| step.to_string()).collect(),
            disclaimer: None,
            requires_medical_supervision: false,
            nutrient: None,
        }
    }
}

pub const MEDICAL_DISCLAIMER: &str =
    "This advice is for reference only and does not replace a diagnosis by a physician.";

const LIFESTYLE_STEPS: &[&str] = &[
    "Exercise regularly",
    "Eat a healthy diet",
    "Control body weight",
    "Quit smoking and limit alcohol",
];

/// Advisories for one scored condition, most urgent first: an optional
/// consultation, targeted advice per modifiable factor currently adding
/// points, then the general lifestyle advisory.
///
/// `consultation_threshold` is absolute and independent of the model's own
/// breakpoints.
pub fn synthesize(
    model: &RiskModel,
    probability: f64,
    factors: &FactorSet,
    consultation_threshold: f64,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if probability > consultation_threshold {
        recommendations.push(consultation(model.condition.display_name(), probability));
    }

    for &factor in model.modifiable_factors {
        if factor_points(model.rules, factor, factors) == 0 {
            continue;
        }
        if let Some(recommendation) = targeted(factor, factors) {
            recommendations.push(recommendation);
        }
    }

    recommendations.push(lifestyle());
    recommendations
}

fn consultation(condition_name: &str, probability: f64) -> Recommendation {
    let mut recommendation = Recommendation::new(
        Severity::MedicalConsultation,
        RecommendationCategory::MedicalConsultation,
        "Consult a physician",
        format!(
            "Your estimated {} risk is elevated ({}); consider a professional evaluation.",
            condition_name.to_lowercase(),
            super::classify::percent_label(probability)
        ),
        &[],
    );
    recommendation.disclaimer = Some(MEDICAL_DISCLAIMER.to_string());
    recommendation.requires_medical_supervision = true;
    recommendation
}

fn lifestyle() -> Recommendation {
    Recommendation::new(
        Severity::Lifestyle,
        RecommendationCategory::Lifestyle,
        "Lifestyle changes",
        "A healthy lifestyle lowers risk across conditions.",
        LIFESTYLE_STEPS,
    )
}

fn targeted(factor: FactorKind, factors: &FactorSet) -> Option<Recommendation> {
    let value = factors.get(factor)?;
    let recommendation = match factor {
        FactorKind::Bmi => risk_factor(
            "Work toward a healthy weight",
            format!("A BMI of {value} adds to your risk."),
            &[
                "Aim for gradual, sustained weight loss",
                "Reduce portion sizes and energy-dense snacks",
            ],
        ),
        FactorKind::ActivityLevel => risk_factor(
            "Increase physical activity",
            format!("An activity level of {value} adds to your risk."),
            &[
                "Build up to 150 minutes of moderate activity a week",
                "Break up long periods of sitting",
            ],
        ),
        FactorKind::Smoking => risk_factor(
            "Stop smoking",
            "Smoking adds to your risk.",
            &[
                "Set a quit date",
                "Ask about cessation support and nicotine replacement",
            ],
        ),
        FactorKind::DietQuality => risk_factor(
            "Improve diet quality",
            format!("A {value} diet adds to your risk."),
            &[
                "Favour whole grains, vegetables and legumes",
                "Cut back on sugary drinks and refined carbohydrates",
            ],
        ),
        FactorKind::SystolicBp => risk_factor(
            "Bring blood pressure down",
            format!("A systolic reading of {value} mmHg adds to your risk."),
            &["Monitor blood pressure at home", "Reduce salt intake"],
        ),
        FactorKind::TotalCholesterol => risk_factor(
            "Lower cholesterol",
            format!("A total cholesterol of {value} mg/dL adds to your risk."),
            &["Limit saturated and trans fats", "Recheck your lipid panel"],
        ),
        FactorKind::Diabetes => {
            let mut recommendation = risk_factor(
                "Keep diabetes well controlled",
                "Diagnosed diabetes adds to your risk.",
                &[
                    "Keep glucose within the targets agreed with your care team",
                    "Attend regular diabetes reviews",
                ],
            );
            recommendation.requires_medical_supervision = true;
            recommendation
        }
        _ => return None,
    };
    Some(recommendation)
}

fn risk_factor(title: &str, content: impl Into<String>, steps: &[&str]) -> Recommendation {
    Recommendation::new(
        Severity::Targeted,
        RecommendationCategory::RiskFactor,
        title,
        content,
        steps,
    )
}

/// Combines advisories from several assessments: every consultation, then
/// every lifestyle advisory, then at most `max_targeted` targeted items.
/// Relative order within each level is preserved.
pub fn merge<I>(recommendations: I, max_targeted: usize) -> Vec<Recommendation>
where
    I: IntoIterator<Item = Recommendation>,
{
    let mut consultations = Vec::new();
    let mut lifestyle = Vec::new();
    let mut targeted = Vec::new();

    for recommendation in recommendations {
        match recommendation.level {
            Severity::MedicalConsultation => consultations.push(recommendation),
            Severity::Lifestyle => lifestyle.push(recommendation),
            Severity::Targeted => targeted.push(recommendation),
        }
    }

    targeted.truncate(max_targeted);
    consultations
        .into_iter()
        .chain(lifestyle)
        .chain(targeted)
        .collect()
}
