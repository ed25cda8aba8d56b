use serde::Serialize;

use super::factors::{FactorKind, FactorSet, FactorValue};
use crate::profile::Gender;

/// Points awarded when a value is strictly above `above`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub above: f64,
    pub points: u32,
}

pub const fn band(above: f64, points: u32) -> Band {
    Band { above, points }
}

/// Points of the first band, scanned most severe first, that `value`
/// exceeds. Bands are mutually exclusive: lower bands never accrue once a
/// higher one matched.
pub fn band_points(bands: &[Band], value: f64) -> u32 {
    bands
        .iter()
        .find(|band| value > band.above)
        .map_or(0, |band| band.points)
}

/// How one factor turns into points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoringRule {
    /// Descending threshold bands over a numeric factor.
    Banded(&'static [Band]),
    /// Fixed points when a boolean factor is true.
    Flag(u32),
    /// Fixed points when a categorical factor equals `value`.
    Equals { value: FactorValue, points: u32 },
    /// Numeric bands picked by the `gender` factor; anything other than male
    /// uses `otherwise`.
    BandedByGender {
        male: &'static [Band],
        otherwise: &'static [Band],
    },
}

impl ScoringRule {
    /// Threshold bands in force for this rule, given the rest of the factors.
    fn bands(&self, factors: &FactorSet) -> Option<&'static [Band]> {
        match *self {
            ScoringRule::Banded(bands) => Some(bands),
            ScoringRule::BandedByGender { male, otherwise } => {
                let gender = factors
                    .get(FactorKind::Gender)
                    .and_then(FactorValue::as_gender)
                    .unwrap_or_default();
                Some(if gender == Gender::Male { male } else { otherwise })
            }
            ScoringRule::Flag(_) | ScoringRule::Equals { .. } => None,
        }
    }

    pub fn points(&self, value: FactorValue, factors: &FactorSet) -> u32 {
        if let Some(bands) = self.bands(factors) {
            return value.as_number().map_or(0, |v| band_points(bands, v));
        }
        match *self {
            ScoringRule::Flag(points) if value.as_flag() == Some(true) => points,
            ScoringRule::Equals {
                value: expected,
                points,
            } if value == expected => points,
            _ => 0,
        }
    }

    /// Highest contribution the rule can make.
    pub fn max_points(&self) -> u32 {
        let top = |bands: &[Band]| bands.iter().map(|band| band.points).max().unwrap_or(0);
        match *self {
            ScoringRule::Banded(bands) => top(bands),
            ScoringRule::Flag(points) | ScoringRule::Equals { points, .. } => points,
            ScoringRule::BandedByGender { male, otherwise } => top(male).max(top(otherwise)),
        }
    }

    fn describe(
        &self,
        factor: FactorKind,
        value: FactorValue,
        points: u32,
        factors: &FactorSet,
    ) -> String {
        if points == 0 {
            return format!("{} {} adds no risk", factor.label(), value);
        }
        match self.bands(factors) {
            Some(bands) => threshold_note(factor, value, bands),
            None if matches!(self, ScoringRule::Flag(_)) => {
                format!("{} reported", factor.label())
            }
            None => format!("{} is {}", factor.label(), value),
        }
    }
}

fn threshold_note(factor: FactorKind, value: FactorValue, bands: &[Band]) -> String {
    let threshold = value
        .as_number()
        .and_then(|v| bands.iter().find(|band| v > band.above));
    match threshold {
        Some(band) => format!("{} {} above {}", factor.label(), value, band.above),
        None => format!("{} {}", factor.label(), value),
    }
}

/// Binds a scoring rule to the factor it reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorRule {
    pub factor: FactorKind,
    pub rule: ScoringRule,
}

pub const fn rule(factor: FactorKind, rule: ScoringRule) -> FactorRule {
    FactorRule { factor, rule }
}

/// Discrete contribution to a score, kept for audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub factor: FactorKind,
    pub points: u32,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub total: u32,
    pub components: Vec<ScoreComponent>,
}

/// Evaluates every rule against the factor set. Factors missing from the set
/// contribute nothing.
pub fn score_factors(rules: &[FactorRule], factors: &FactorSet) -> ScoreBreakdown {
    let mut components = Vec::with_capacity(rules.len());
    let mut total = 0;

    for rule in rules {
        let Some(value) = factors.get(rule.factor) else {
            continue;
        };
        let points = rule.rule.points(value, factors);
        total += points;
        components.push(ScoreComponent {
            factor: rule.factor,
            points,
            notes: rule.rule.describe(rule.factor, value, points, factors),
        });
    }

    ScoreBreakdown { total, components }
}

/// Points a single factor contributes under `rules`.
pub fn factor_points(rules: &[FactorRule], factor: FactorKind, factors: &FactorSet) -> u32 {
    rules
        .iter()
        .filter(|rule| rule.factor == factor)
        .filter_map(|rule| {
            factors
                .get(rule.factor)
                .map(|value| rule.rule.points(value, factors))
        })
        .sum()
}
