use serde::Serialize;

use super::classify::{Breakpoints, RiskTier, ScoreScale};
use super::recommendations::{Recommendation, RecommendationCategory, Severity};
use super::rules::{band, band_points, Band};
use super::{Assessment, AssessmentContext, AssessmentDetail, AssessmentError, Condition};
use crate::source::DataSourceKind;
use crate::tracking::SleepRecord;

/// Nights analysed; fewer records is an error rather than a partial window.
pub const SLEEP_WINDOW_DAYS: usize = 7;
pub const SHORT_SLEEP_HOURS: f64 = 6.0;
pub const LOW_EFFICIENCY_PERCENT: f64 = 85.0;

// Day counts are integers, so `> n` reads as `>= n + 1`.
const POOR_QUALITY_BANDS: &[Band] = &[band(3.0, 3), band(1.0, 1)];
const SHORT_SLEEP_BANDS: &[Band] = &[band(4.0, 3), band(2.0, 2)];
const LOW_EFFICIENCY_BANDS: &[Band] = &[band(3.0, 2)];

pub const SLEEP_SCALE: ScoreScale = ScoreScale {
    max_score: 8,
    cap: 0.60,
    breakpoints: Breakpoints {
        high: 0.30,
        moderate: 0.15,
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SleepWindowMetrics {
    pub poor_sleep_days: usize,
    pub short_sleep_days: usize,
    pub low_efficiency_days: usize,
}

impl SleepWindowMetrics {
    pub fn from_records(records: &[SleepRecord]) -> Self {
        records.iter().fold(Self::default(), |mut metrics, record| {
            if record.sleep_quality.subjective_quality.is_poor() {
                metrics.poor_sleep_days += 1;
            }
            if record.sleep_metrics.sleep_duration_hours < SHORT_SLEEP_HOURS {
                metrics.short_sleep_days += 1;
            }
            if record.sleep_metrics.sleep_efficiency < LOW_EFFICIENCY_PERCENT {
                metrics.low_efficiency_days += 1;
            }
            metrics
        })
    }

    pub fn score(&self) -> u32 {
        let count = |days: usize| days as f64;
        band_points(POOR_QUALITY_BANDS, count(self.poor_sleep_days))
            + band_points(SHORT_SLEEP_BANDS, count(self.short_sleep_days))
            + band_points(LOW_EFFICIENCY_BANDS, count(self.low_efficiency_days))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepDetail {
    pub score: u32,
    pub max_score: u32,
    pub window_days: usize,
    pub sleep_metrics: SleepWindowMetrics,
}

pub(crate) fn assess(context: &AssessmentContext) -> Result<Assessment, AssessmentError> {
    let log = context
        .sleep
        .as_ref()
        .ok_or(AssessmentError::DataSourceUnavailable {
            data_source: DataSourceKind::SleepTracker,
        })?;
    let window = log
        .recent(SLEEP_WINDOW_DAYS)
        .ok_or(AssessmentError::InsufficientData {
            data_source: DataSourceKind::SleepTracker,
            required: SLEEP_WINDOW_DAYS,
            found: log.len(),
        })?;

    let metrics = SleepWindowMetrics::from_records(window);
    let score = metrics.score();
    let normalized = SLEEP_SCALE.normalize(score);

    Ok(Assessment::new(
        Condition::SleepDisorder,
        normalized,
        AssessmentDetail::Sleep(SleepDetail {
            score,
            max_score: SLEEP_SCALE.max_score,
            window_days: SLEEP_WINDOW_DAYS,
            sleep_metrics: metrics,
        }),
        recommendations(normalized.tier),
    ))
}

fn recommendations(tier: RiskTier) -> Vec<Recommendation> {
    let evaluation_level = if tier == RiskTier::High {
        Severity::Targeted
    } else {
        Severity::Lifestyle
    };

    vec![
        Recommendation::new(
            Severity::Lifestyle,
            RecommendationCategory::SleepHygiene,
            "Improve sleep hygiene",
            "Consistent sleep habits improve sleep quality.",
            &[
                "Keep a regular sleep schedule",
                "Avoid screens before bed",
                "Keep the bedroom comfortable, dark and quiet",
                "Avoid caffeine and heavy meals late in the day",
            ],
        ),
        Recommendation::new(
            evaluation_level,
            RecommendationCategory::SleepEvaluation,
            "See a doctor if problems persist",
            "Long-running sleep problems may need a professional evaluation.",
            &[
                "Keep a sleep diary",
                "Consult a sleep specialist",
                "Ask about a sleep study",
            ],
        ),
    ]
}
