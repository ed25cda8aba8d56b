//! Deterministic multi-factor health risk scoring.
//!
//! A [`Profile`](profile::Profile) plus optional tracker feeds are loaded once
//! into an immutable [`AssessmentContext`](assessment::AssessmentContext);
//! every assessment is computed from scratch from that context.

pub mod assessment;
pub mod config;
pub mod error;
pub mod profile;
pub mod report;
pub mod source;
pub mod telemetry;
pub mod tracking;

pub use assessment::{
    Assessment, AssessmentContext, AssessmentError, Condition, RiskEngine, RiskTier,
};
pub use report::{HealthReport, ReportRequest, ReportType};
