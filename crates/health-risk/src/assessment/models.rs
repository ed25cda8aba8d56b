use super::classify::{Breakpoints, ScoreScale};
use super::factors::{FactorKind, FactorValue};
use super::rules::{band, rule, Band, FactorRule, ScoringRule};
use super::Condition;
use crate::profile::{ActivityLevel, DietQuality};

/// Static scoring configuration for one chronic condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskModel {
    pub condition: Condition,
    pub model_name: &'static str,
    /// Factors extracted for this model, in snapshot order.
    pub factors: &'static [FactorKind],
    pub rules: &'static [FactorRule],
    pub scale: ScoreScale,
    pub time_horizon_years: u8,
    pub modifiable_factors: &'static [FactorKind],
    pub prevention_measures: &'static [&'static str],
}

impl RiskModel {
    pub fn all() -> [&'static RiskModel; 3] {
        [&HYPERTENSION, &DIABETES, &CARDIOVASCULAR]
    }

    /// Sum of every rule's best case. Never exceeds `scale.max_score`.
    pub fn attainable_score(&self) -> u32 {
        self.rules.iter().map(|rule| rule.rule.max_points()).sum()
    }
}

const SEDENTARY: ScoringRule = ScoringRule::Equals {
    value: FactorValue::Activity(ActivityLevel::Sedentary),
    points: 1,
};

const HYPERTENSION_AGE: &[Band] = &[band(65.0, 3), band(55.0, 2), band(45.0, 1)];
const HYPERTENSION_BMI: &[Band] = &[band(30.0, 3), band(25.0, 2), band(24.0, 1)];
const HYPERTENSION_SYSTOLIC: &[Band] = &[band(140.0, 3), band(130.0, 2), band(120.0, 1)];

/// Simplified Framingham-style hypertension score.
pub const HYPERTENSION: RiskModel = RiskModel {
    condition: Condition::Hypertension,
    model_name: "Framingham risk score (simplified)",
    factors: &[
        FactorKind::Age,
        FactorKind::Bmi,
        FactorKind::SystolicBp,
        FactorKind::DiastolicBp,
        FactorKind::FamilyHistory,
        FactorKind::Smoking,
        FactorKind::ActivityLevel,
    ],
    rules: &[
        rule(FactorKind::Age, ScoringRule::Banded(HYPERTENSION_AGE)),
        rule(FactorKind::Bmi, ScoringRule::Banded(HYPERTENSION_BMI)),
        rule(
            FactorKind::SystolicBp,
            ScoringRule::Banded(HYPERTENSION_SYSTOLIC),
        ),
        rule(FactorKind::FamilyHistory, ScoringRule::Flag(2)),
        rule(FactorKind::Smoking, ScoringRule::Flag(2)),
        rule(FactorKind::ActivityLevel, SEDENTARY),
    ],
    scale: ScoreScale {
        max_score: 15,
        cap: 0.95,
        breakpoints: Breakpoints {
            high: 0.30,
            moderate: 0.15,
        },
    },
    time_horizon_years: 10,
    modifiable_factors: &[
        FactorKind::Bmi,
        FactorKind::ActivityLevel,
        FactorKind::Smoking,
    ],
    prevention_measures: &[
        "Keep body weight in the healthy range",
        "Follow a DASH-style eating pattern",
        "Limit sodium intake",
        "Exercise regularly",
        "Limit alcohol",
        "Manage stress",
    ],
};

const DIABETES_AGE: &[Band] = &[band(60.0, 3), band(50.0, 2), band(40.0, 1)];
const DIABETES_BMI: &[Band] = &[band(35.0, 3), band(30.0, 2), band(25.0, 1)];
/// mmol/L
const DIABETES_GLUCOSE: &[Band] = &[band(7.0, 5), band(5.6, 3)];

/// ADA-style type-2 diabetes score.
pub const DIABETES: RiskModel = RiskModel {
    condition: Condition::Diabetes,
    model_name: "ADA diabetes risk score",
    factors: &[
        FactorKind::Age,
        FactorKind::Bmi,
        FactorKind::FastingGlucose,
        FactorKind::FamilyHistory,
        FactorKind::ActivityLevel,
        FactorKind::DietQuality,
    ],
    rules: &[
        rule(FactorKind::Age, ScoringRule::Banded(DIABETES_AGE)),
        rule(FactorKind::Bmi, ScoringRule::Banded(DIABETES_BMI)),
        rule(
            FactorKind::FastingGlucose,
            ScoringRule::Banded(DIABETES_GLUCOSE),
        ),
        rule(FactorKind::FamilyHistory, ScoringRule::Flag(2)),
        rule(FactorKind::ActivityLevel, SEDENTARY),
        rule(
            FactorKind::DietQuality,
            ScoringRule::Equals {
                value: FactorValue::Diet(DietQuality::Poor),
                points: 1,
            },
        ),
    ],
    scale: ScoreScale {
        max_score: 18,
        cap: 0.90,
        breakpoints: Breakpoints {
            high: 0.25,
            moderate: 0.12,
        },
    },
    time_horizon_years: 10,
    modifiable_factors: &[
        FactorKind::Bmi,
        FactorKind::ActivityLevel,
        FactorKind::DietQuality,
    ],
    prevention_measures: &[
        "Control body weight",
        "Eat a low-sugar, high-fibre diet",
        "Exercise regularly",
        "Monitor blood glucose periodically",
        "Quit smoking",
    ],
};

const CARDIOVASCULAR_AGE_MALE: &[Band] =
    &[band(65.0, 4), band(55.0, 3), band(45.0, 2), band(35.0, 1)];
const CARDIOVASCULAR_AGE_OTHER: &[Band] = &[band(65.0, 3), band(55.0, 2), band(45.0, 1)];
const CARDIOVASCULAR_SYSTOLIC: &[Band] = &[band(160.0, 3), band(140.0, 2), band(120.0, 1)];
/// mg/dL
const CARDIOVASCULAR_CHOLESTEROL: &[Band] = &[band(240.0, 2), band(200.0, 1)];

/// Simplified ACC/AHA ASCVD-style estimate.
pub const CARDIOVASCULAR: RiskModel = RiskModel {
    condition: Condition::Cardiovascular,
    model_name: "ACC/AHA ASCVD risk estimator (simplified)",
    factors: &[
        FactorKind::Age,
        FactorKind::Gender,
        FactorKind::SystolicBp,
        FactorKind::TotalCholesterol,
        FactorKind::HdlCholesterol,
        FactorKind::Smoking,
        FactorKind::Diabetes,
    ],
    rules: &[
        rule(
            FactorKind::Age,
            ScoringRule::BandedByGender {
                male: CARDIOVASCULAR_AGE_MALE,
                otherwise: CARDIOVASCULAR_AGE_OTHER,
            },
        ),
        rule(
            FactorKind::SystolicBp,
            ScoringRule::Banded(CARDIOVASCULAR_SYSTOLIC),
        ),
        rule(
            FactorKind::TotalCholesterol,
            ScoringRule::Banded(CARDIOVASCULAR_CHOLESTEROL),
        ),
        rule(FactorKind::Smoking, ScoringRule::Flag(2)),
        rule(FactorKind::Diabetes, ScoringRule::Flag(2)),
    ],
    scale: ScoreScale {
        max_score: 14,
        cap: 0.50,
        breakpoints: Breakpoints {
            high: 0.10,
            moderate: 0.05,
        },
    },
    time_horizon_years: 10,
    modifiable_factors: &[
        FactorKind::SystolicBp,
        FactorKind::TotalCholesterol,
        FactorKind::Smoking,
        FactorKind::Diabetes,
    ],
    prevention_measures: &[
        "Control blood pressure, lipids and glucose",
        "Quit smoking",
        "Exercise regularly",
        "Eat a Mediterranean-style diet",
        "Control body weight",
        "Manage stress",
    ],
};
