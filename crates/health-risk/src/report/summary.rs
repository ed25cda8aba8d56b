use serde::Serialize;

use crate::assessment::{Assessment, RiskTier};

/// Overall verdict derived from the tier counts of successful assessments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallAssessment {
    NeedsAttention,
    Fair,
    Good,
    Excellent,
}

impl OverallAssessment {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NeedsAttention => "Needs attention",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }

    pub fn from_counts(high: usize, moderate: usize) -> Self {
        if high >= 2 {
            Self::NeedsAttention
        } else if high == 1 || moderate >= 2 {
            Self::Fair
        } else if moderate == 1 {
            Self::Good
        } else {
            Self::Excellent
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskSummary {
    pub high_risks: Vec<&'static str>,
    pub moderate_risks: Vec<&'static str>,
    pub low_risks: Vec<&'static str>,
    pub overall_assessment: OverallAssessment,
    pub overall_label: &'static str,
}

impl RiskSummary {
    pub fn from_assessments<'a, I>(assessments: I) -> Self
    where
        I: IntoIterator<Item = &'a Assessment>,
    {
        let mut high_risks = Vec::new();
        let mut moderate_risks = Vec::new();
        let mut low_risks = Vec::new();

        for assessment in assessments {
            match assessment.tier {
                RiskTier::High => high_risks.push(assessment.name),
                RiskTier::Moderate => moderate_risks.push(assessment.name),
                RiskTier::Low => low_risks.push(assessment.name),
            }
        }

        let overall_assessment =
            OverallAssessment::from_counts(high_risks.len(), moderate_risks.len());

        Self {
            high_risks,
            moderate_risks,
            low_risks,
            overall_assessment,
            overall_label: overall_assessment.label(),
        }
    }

    pub fn names_for(&self, tier: RiskTier) -> &[&'static str] {
        match tier {
            RiskTier::High => &self.high_risks,
            RiskTier::Moderate => &self.moderate_risks,
            RiskTier::Low => &self.low_risks,
        }
    }
}
