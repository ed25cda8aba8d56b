use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::models::RiskModel;
use super::rules::ScoreComponent;
use super::{AssessmentContext, AssessmentError};
use crate::profile::{ActivityLevel, DietQuality, Gender, Observations, Profile};

/// Inputs a risk model may score. Declaration order is the snapshot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Age,
    Gender,
    Bmi,
    SystolicBp,
    DiastolicBp,
    FastingGlucose,
    TotalCholesterol,
    HdlCholesterol,
    FamilyHistory,
    Smoking,
    ActivityLevel,
    DietQuality,
    /// Diagnosed diabetes in the medical history.
    Diabetes,
}

impl FactorKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Gender => "gender",
            Self::Bmi => "BMI",
            Self::SystolicBp => "systolic blood pressure",
            Self::DiastolicBp => "diastolic blood pressure",
            Self::FastingGlucose => "fasting glucose",
            Self::TotalCholesterol => "total cholesterol",
            Self::HdlCholesterol => "HDL cholesterol",
            Self::FamilyHistory => "family history",
            Self::Smoking => "smoking",
            Self::ActivityLevel => "activity level",
            Self::DietQuality => "diet quality",
            Self::Diabetes => "diabetes history",
        }
    }
}

/// Typed value of one factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FactorValue {
    Integer(u32),
    Decimal(f64),
    Flag(bool),
    Gender(Gender),
    Activity(ActivityLevel),
    Diet(DietQuality),
}

impl FactorValue {
    pub fn as_number(self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(f64::from(value)),
            Self::Decimal(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_flag(self) -> Option<bool> {
        match self {
            Self::Flag(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_gender(self) -> Option<Gender> {
        match self {
            Self::Gender(value) => Some(value),
            _ => None,
        }
    }

    /// Values surfaced as key factors: raised flags, adverse categories and
    /// any positive measurement.
    fn is_notable(self) -> bool {
        match self {
            Self::Flag(value) => value,
            Self::Activity(level) => level == ActivityLevel::Sedentary,
            Self::Diet(quality) => quality == DietQuality::Poor,
            Self::Gender(_) => false,
            Self::Integer(_) | Self::Decimal(_) => self.as_number().map_or(false, |v| v > 0.0),
        }
    }
}

impl fmt::Display for FactorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Decimal(value) => write!(f, "{value}"),
            Self::Flag(true) => f.write_str("yes"),
            Self::Flag(false) => f.write_str("no"),
            Self::Gender(gender) => f.write_str(gender.label()),
            Self::Activity(level) => f.write_str(level.label()),
            Self::Diet(quality) => f.write_str(quality.label()),
        }
    }
}

/// Fully populated, typed factors for one condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FactorSet(BTreeMap<FactorKind, FactorValue>);

impl FactorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: FactorKind, value: FactorValue) -> Self {
        self.insert(kind, value);
        self
    }

    pub fn insert(&mut self, kind: FactorKind, value: FactorValue) {
        self.0.insert(kind, value);
    }

    pub fn get(&self, kind: FactorKind) -> Option<FactorValue> {
        self.0.get(&kind).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FactorKind, FactorValue)> + '_ {
        self.0.iter().map(|(kind, value)| (*kind, *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Substitutes for values absent from the profile or observation feed. The
/// clinical entries are population averages standing in for a measurement
/// feed, not imputations from the profile.
pub const DEFAULT_POLICY: [(FactorKind, FactorValue); 13] = [
    (FactorKind::Age, FactorValue::Integer(45)),
    (FactorKind::Gender, FactorValue::Gender(Gender::Unknown)),
    (FactorKind::Bmi, FactorValue::Decimal(24.0)),
    (FactorKind::SystolicBp, FactorValue::Decimal(120.0)),
    (FactorKind::DiastolicBp, FactorValue::Decimal(80.0)),
    (FactorKind::FastingGlucose, FactorValue::Decimal(5.4)),
    (FactorKind::TotalCholesterol, FactorValue::Decimal(200.0)),
    (FactorKind::HdlCholesterol, FactorValue::Decimal(50.0)),
    (FactorKind::FamilyHistory, FactorValue::Flag(false)),
    (FactorKind::Smoking, FactorValue::Flag(false)),
    (
        FactorKind::ActivityLevel,
        FactorValue::Activity(ActivityLevel::Moderate),
    ),
    (FactorKind::DietQuality, FactorValue::Diet(DietQuality::Moderate)),
    (FactorKind::Diabetes, FactorValue::Flag(false)),
];

pub fn default_for(kind: FactorKind) -> FactorValue {
    DEFAULT_POLICY
        .iter()
        .find(|(candidate, _)| *candidate == kind)
        .map(|(_, value)| *value)
        .unwrap_or(FactorValue::Flag(false))
}

/// Builds the factor set a model scores. Fails only when no profile is
/// loaded; every missing field takes its default.
pub fn extract(
    model: &RiskModel,
    context: &AssessmentContext,
) -> Result<FactorSet, AssessmentError> {
    let profile = context
        .profile
        .as_ref()
        .ok_or(AssessmentError::ProfileUnavailable)?;

    let mut factors = FactorSet::new();
    for &kind in model.factors {
        let value = observed(kind, model, profile, &context.observations, context.as_of)
            .unwrap_or_else(|| default_for(kind));
        factors.insert(kind, value);
    }
    Ok(factors)
}

fn observed(
    kind: FactorKind,
    model: &RiskModel,
    profile: &Profile,
    observations: &Observations,
    as_of: NaiveDate,
) -> Option<FactorValue> {
    let reading = |value: Option<f64>| {
        value
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(FactorValue::Decimal)
    };

    match kind {
        FactorKind::Age => profile
            .birth_date()
            .and_then(|birth| age_on(birth, as_of))
            .map(FactorValue::Integer),
        FactorKind::Gender => Some(FactorValue::Gender(profile.basic_info.gender)),
        FactorKind::Bmi => profile
            .calculated
            .bmi
            .filter(|bmi| bmi.is_finite() && *bmi > 0.0)
            .map(FactorValue::Decimal),
        FactorKind::SystolicBp => reading(observations.systolic_bp),
        FactorKind::DiastolicBp => reading(observations.diastolic_bp),
        FactorKind::FastingGlucose => reading(observations.fasting_glucose),
        FactorKind::TotalCholesterol => reading(observations.total_cholesterol),
        FactorKind::HdlCholesterol => reading(observations.hdl_cholesterol),
        FactorKind::FamilyHistory => Some(FactorValue::Flag(
            profile.has_family_history(model.condition.key()),
        )),
        FactorKind::Smoking => Some(FactorValue::Flag(profile.lifestyle.smoking)),
        FactorKind::ActivityLevel => profile.lifestyle.activity_level.map(FactorValue::Activity),
        FactorKind::DietQuality => observations.diet_quality.map(FactorValue::Diet),
        FactorKind::Diabetes => Some(FactorValue::Flag(profile.has_medical_history("diabetes"))),
    }
}

/// Whole years between `birth` and `as_of`; `None` for birth dates after
/// `as_of`.
pub fn age_on(birth: NaiveDate, as_of: NaiveDate) -> Option<u32> {
    if birth > as_of {
        return None;
    }
    let before_birthday = (as_of.month(), as_of.day()) < (birth.month(), birth.day());
    let years = as_of.year() - birth.year() - i32::from(before_birthday);
    u32::try_from(years).ok()
}

/// A factor worth calling out in an assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyFactor {
    pub name: FactorKind,
    pub value: FactorValue,
    /// Points this factor added to the score.
    pub points: u32,
}

pub const MAX_KEY_FACTORS: usize = 5;

/// Notable factors, highest-scoring first. Ties keep snapshot order, so
/// zero-point readings only fill slots the scoring factors leave free.
pub fn key_factors(factors: &FactorSet, components: &[ScoreComponent]) -> Vec<KeyFactor> {
    let mut notable: Vec<KeyFactor> = factors
        .iter()
        .filter(|(_, value)| value.is_notable())
        .map(|(name, value)| KeyFactor {
            name,
            value,
            points: components
                .iter()
                .find(|component| component.factor == name)
                .map_or(0, |component| component.points),
        })
        .collect();
    notable.sort_by_key(|factor| Reverse(factor.points));
    notable.truncate(MAX_KEY_FACTORS);
    notable
}
