mod summary;

pub use summary::{OverallAssessment, RiskSummary};

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::assessment::{merge, Assessment, Condition, Recommendation, RiskEngine};
use crate::profile::Profile;

/// Scope of a generated report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    #[default]
    Comprehensive,
    QuickSummary,
    RiskAssessment,
    TrendAnalysis,
}

impl ReportType {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Comprehensive,
            Self::QuickSummary,
            Self::RiskAssessment,
            Self::TrendAnalysis,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Comprehensive => "comprehensive",
            Self::QuickSummary => "quick_summary",
            Self::RiskAssessment => "risk_assessment",
            Self::TrendAnalysis => "trend_analysis",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Comprehensive => "Comprehensive health report",
            Self::QuickSummary => "Quick summary",
            Self::RiskAssessment => "Risk assessment",
            Self::TrendAnalysis => "Trend analysis",
        }
    }

    /// Conditions assessed for this report type.
    pub fn conditions(self) -> Vec<Condition> {
        match self {
            Self::Comprehensive => Condition::ordered().to_vec(),
            Self::RiskAssessment => Condition::chronic().to_vec(),
            Self::QuickSummary | Self::TrendAnalysis => Vec::new(),
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown report type '{0}'")]
pub struct UnknownReportType(pub String);

impl FromStr for ReportType {
    type Err = UnknownReportType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ordered()
            .into_iter()
            .find(|report_type| report_type.key() == normalized)
            .ok_or_else(|| UnknownReportType(value.to_string()))
    }
}

/// Caller-supplied parameters. The timestamp is passed in so reports are
/// reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub report_type: ReportType,
    pub time_range: String,
    pub generated_at: NaiveDateTime,
}

impl ReportRequest {
    pub fn new(report_type: ReportType, generated_at: NaiveDateTime) -> Self {
        Self {
            report_type,
            time_range: "1y".to_string(),
            generated_at,
        }
    }

    pub fn with_time_range(mut self, time_range: impl Into<String>) -> Self {
        self.time_range = time_range.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportMetadata {
    pub generated_at: NaiveDateTime,
    pub report_type: ReportType,
    pub report_label: &'static str,
    pub time_range: String,
    pub version: &'static str,
}

/// An assessment that could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentFailure {
    pub condition: Condition,
    pub name: &'static str,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub metadata: ReportMetadata,
    pub user_profile: Option<Profile>,
    pub assessments: Vec<Assessment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<AssessmentFailure>,
    pub summary: RiskSummary,
    pub recommendations: Vec<Recommendation>,
}

/// Runs the assessments a report type calls for and folds them into a
/// summary and a merged recommendation list. Failures are recorded, never
/// propagated.
pub fn build_report(engine: &RiskEngine, request: &ReportRequest) -> HealthReport {
    let settings = engine.settings();
    let conditions = if settings.enabled {
        request.report_type.conditions()
    } else {
        info!("predictions disabled; report carries no assessments");
        Vec::new()
    };

    let mut assessments = Vec::new();
    let mut failures = Vec::new();
    for (condition, result) in engine.assess_many(conditions) {
        match result {
            Ok(assessment) => assessments.push(assessment),
            Err(err) => {
                warn!(%condition, %err, "assessment skipped");
                failures.push(AssessmentFailure {
                    condition,
                    name: condition.display_name(),
                    error: err.to_string(),
                });
            }
        }
    }

    let summary = RiskSummary::from_assessments(&assessments);
    let recommendations = merge(
        assessments
            .iter()
            .flat_map(|assessment| assessment.recommendations.iter().cloned()),
        settings.max_targeted_recommendations,
    );

    info!(
        report_type = %request.report_type,
        assessed = assessments.len(),
        failed = failures.len(),
        overall = summary.overall_label,
        "report built"
    );

    HealthReport {
        metadata: ReportMetadata {
            generated_at: request.generated_at,
            report_type: request.report_type,
            report_label: request.report_type.label(),
            time_range: request.time_range.clone(),
            version: env!("CARGO_PKG_VERSION"),
        },
        user_profile: engine.context().profile.clone(),
        assessments,
        failures,
        summary,
        recommendations,
    }
}
