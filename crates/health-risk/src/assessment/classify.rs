use serde::Serialize;

/// Ordered discretization of a probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub const fn ordered() -> [Self; 3] {
        [Self::High, Self::Moderate, Self::Low]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low risk",
            Self::Moderate => "Moderate risk",
            Self::High => "High risk",
        }
    }
}

/// Exclusive lower bounds of the high and moderate tiers. A probability equal
/// to a breakpoint falls into the tier below it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Breakpoints {
    pub high: f64,
    pub moderate: f64,
}

impl Breakpoints {
    pub fn classify(&self, probability: f64) -> RiskTier {
        if probability > self.high {
            RiskTier::High
        } else if probability > self.moderate {
            RiskTier::Moderate
        } else {
            RiskTier::Low
        }
    }
}

/// Maps an integer score onto a capped probability and a tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreScale {
    pub max_score: u32,
    pub cap: f64,
    pub breakpoints: Breakpoints,
}

impl ScoreScale {
    pub fn probability(&self, score: u32) -> f64 {
        (f64::from(score) / f64::from(self.max_score)).min(self.cap)
    }

    pub fn normalize(&self, score: u32) -> Normalized {
        let probability = self.probability(score);
        Normalized {
            probability,
            tier: self.breakpoints.classify(probability),
        }
    }
}

/// Capped probability and its tier. `probability` keeps full precision;
/// rounding happens only for storage and display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalized {
    pub probability: f64,
    pub tier: RiskTier,
}

impl Normalized {
    pub fn rounded(&self) -> f64 {
        round_probability(self.probability)
    }

    pub fn percent_label(&self) -> String {
        percent_label(self.probability)
    }
}

/// Three decimals, ties to even.
pub fn round_probability(probability: f64) -> f64 {
    (probability * 1000.0).round_ties_even() / 1000.0
}

/// Whole percent, ties to even, e.g. `0.125` renders as `12%`.
pub fn percent_label(probability: f64) -> String {
    format!("{}%", (probability * 100.0).round_ties_even() as i64)
}
