use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use health_risk::assessment::{AssessmentError, Severity};
use health_risk::config::DataConfig;
use health_risk::report::{build_report, OverallAssessment};
use health_risk::{Condition, ReportRequest, ReportType, RiskEngine, RiskTier};

const PROFILE: &str = r#"{
    "basic_info": {"birth_date": "1955-01-01", "gender": "male"},
    "calculated": {"bmi": 32.0},
    "lifestyle": {"activity_level": "sedentary", "smoking": true},
    "family_history": {"hypertension": true},
    "medical_history": {}
}"#;

const OBSERVATIONS: &str = r#"{"systolic_bp": 145, "fasting_glucose": 6.0}"#;

const NUTRITION: &str = r#"{"daily_records": [
    {"date": "2025-06-13", "rda_achievement": {"vitamin_d": 0.5, "calcium": 0.9, "protein": 1.2}},
    {"date": "2025-06-14", "rda_achievement": {"vitamin_d": 0.6, "calcium": 1.0}}
]}"#;

const SLEEP_CSV: &str = "date,subjective_quality,sleep_duration_hours,sleep_efficiency
2025-06-08,poor,5.0,80
2025-06-09,very poor,5.5,82
2025-06-10,poor,4.5,70
2025-06-11,poor,5.0,84
2025-06-12,good,5.8,90
2025-06-13,fair,7.0,92
2025-06-14,excellent,8.0,95
";

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

fn request(report_type: ReportType) -> ReportRequest {
    let generated_at = as_of().and_hms_opt(9, 30, 0).expect("valid time");
    ReportRequest::new(report_type, generated_at)
}

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write fixture");
}

fn populated_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tmpdir");
    write(dir.path(), "profile.json", PROFILE);
    write(dir.path(), "observations.json", OBSERVATIONS);
    write(dir.path(), "nutrition-tracker.json", NUTRITION);
    write(dir.path(), "sleep.csv", SLEEP_CSV);
    dir
}

fn engine_for(dir: &Path) -> RiskEngine {
    let mut data = DataConfig::new(dir);
    data.sleep_csv = Some(dir.join("sleep.csv"));
    RiskEngine::load(&data, as_of())
}

#[test]
fn comprehensive_report_assesses_every_condition() {
    let dir = populated_dir();
    let engine = engine_for(dir.path());

    let report = build_report(&engine, &request(ReportType::Comprehensive));

    assert!(report.failures.is_empty(), "failures: {:?}", report.failures);
    let conditions: Vec<Condition> = report
        .assessments
        .iter()
        .map(|assessment| assessment.condition)
        .collect();
    assert_eq!(conditions, Condition::ordered().to_vec());
    assert_eq!(
        report.summary.overall_assessment,
        OverallAssessment::NeedsAttention
    );
    assert!(report
        .summary
        .high_risks
        .contains(&Condition::SleepDisorder.display_name()));
    assert_eq!(report.metadata.version, env!("CARGO_PKG_VERSION"));
    assert!(report.user_profile.is_some());
}

#[test]
fn merged_recommendations_put_consultations_first() {
    let dir = populated_dir();
    let engine = engine_for(dir.path());

    let report = build_report(&engine, &request(ReportType::Comprehensive));
    let levels: Vec<Severity> = report
        .recommendations
        .iter()
        .map(|item| item.level)
        .collect();

    let first_lifestyle = levels
        .iter()
        .position(|level| *level == Severity::Lifestyle)
        .expect("lifestyle advice present");
    assert!(levels[..first_lifestyle]
        .iter()
        .all(|level| *level == Severity::MedicalConsultation));
    assert!(first_lifestyle > 0);
    assert!(levels.windows(2).all(|pair| pair[0] >= pair[1]
        || (pair[0] == Severity::Lifestyle && pair[1] == Severity::Targeted)));
    assert_eq!(
        levels
            .iter()
            .filter(|level| **level == Severity::Targeted)
            .count(),
        5
    );
}

#[test]
fn risk_assessment_report_skips_trackers() {
    let dir = populated_dir();
    let engine = engine_for(dir.path());

    let report = build_report(&engine, &request(ReportType::RiskAssessment));

    assert_eq!(report.assessments.len(), 3);
    assert!(report
        .assessments
        .iter()
        .all(|assessment| Condition::chronic().contains(&assessment.condition)));
}

#[test]
fn quick_summary_runs_no_assessments() {
    let dir = populated_dir();
    let engine = engine_for(dir.path());

    let report = build_report(
        &engine,
        &request(ReportType::QuickSummary).with_time_range("3m"),
    );

    assert!(report.assessments.is_empty());
    assert!(report.recommendations.is_empty());
    assert_eq!(report.summary.overall_assessment, OverallAssessment::Excellent);
    assert_eq!(report.metadata.time_range, "3m");
}

#[test]
fn disabled_predictions_produce_an_empty_report() {
    let dir = populated_dir();
    write(
        dir.path(),
        "ai-config.json",
        r#"{"ai_features": {"predictions": {"enabled": false}}}"#,
    );
    let engine = engine_for(dir.path());

    let report = build_report(&engine, &request(ReportType::Comprehensive));

    assert!(!engine.settings().enabled);
    assert!(report.assessments.is_empty());
    assert!(report.failures.is_empty());
}

#[test]
fn missing_inputs_are_recorded_as_failures() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let engine = RiskEngine::load(&DataConfig::new(dir.path()), as_of());

    let report = build_report(&engine, &request(ReportType::Comprehensive));

    assert!(report.assessments.is_empty());
    assert_eq!(report.failures.len(), 5);
    assert_eq!(report.failures[0].error, "user profile not found");
    assert_eq!(report.failures[4].error, "sleep tracker data not found");
    assert_eq!(report.summary.overall_assessment, OverallAssessment::Excellent);
    assert_eq!(
        engine.assess(Condition::Diabetes),
        Err(AssessmentError::ProfileUnavailable)
    );
}

#[test]
fn null_profile_values_still_score() {
    let dir = populated_dir();
    write(
        dir.path(),
        "profile.json",
        r#"{
            "basic_info": {"birth_date": "1955-01-01", "gender": null},
            "calculated": {"bmi": 32.0},
            "lifestyle": {"activity_level": "sedentary", "smoking": null},
            "family_history": {"hypertension": true, "diabetes": null}
        }"#,
    );
    let engine = engine_for(dir.path());

    let assessment = engine
        .assess(Condition::Hypertension)
        .expect("hypertension assessed");
    let scored = assessment.scored().expect("scored detail");

    // Age 3, BMI 3, systolic 3, family history 2, sedentary 1; smoking counts as no.
    assert_eq!(scored.score, 12);
    assert_eq!(assessment.probability, 0.8);
    assert!(engine.assess(Condition::Cardiovascular).is_ok());
}

#[test]
fn malformed_settings_fall_back_to_defaults() {
    let dir = populated_dir();
    write(dir.path(), "ai-config.json", "{not json");
    let engine = engine_for(dir.path());

    assert!(engine.settings().enabled);
    assert_eq!(engine.settings().medical_consultation_threshold, 0.30);
}

#[test]
fn json_sleep_tracker_is_used_without_csv_override() {
    let dir = populated_dir();
    write(
        dir.path(),
        "sleep-tracker.json",
        r#"{"sleep_records": [
            {}, {}, {}, {}, {}, {}, {}
        ]}"#,
    );
    let engine = RiskEngine::load(&DataConfig::new(dir.path()), as_of());

    let sleep = engine
        .assess(Condition::SleepDisorder)
        .expect("sleep assessment succeeds");

    // Default records log zero hours, so every night counts as short.
    assert_eq!(sleep.probability, 0.375);
    assert_eq!(sleep.tier, RiskTier::High);
}

#[test]
fn report_serializes_metadata_and_summary() {
    let dir = populated_dir();
    let engine = engine_for(dir.path());

    let report = build_report(&engine, &request(ReportType::RiskAssessment));
    let json = serde_json::to_value(&report).expect("serializes");

    assert_eq!(json["metadata"]["report_type"], "risk_assessment");
    assert_eq!(json["metadata"]["generated_at"], "2025-06-15T09:30:00");
    assert_eq!(json["summary"]["overall_assessment"], "needs_attention");
    assert!(json.get("failures").is_none());
}

#[test]
fn unrecognised_sleep_quality_reads_as_good_in_both_formats() {
    let dir = populated_dir();
    let night = r#"{"sleep_quality": {"subjective_quality": "average"},
        "sleep_metrics": {"sleep_duration_hours": 7.5, "sleep_efficiency": 90}}"#;
    let records = vec![night; 7].join(",");
    write(
        dir.path(),
        "sleep-tracker.json",
        &format!(r#"{{"sleep_records": [{records}]}}"#),
    );
    let mut csv = String::from("date,subjective_quality,sleep_duration_hours,sleep_efficiency\n");
    for day in 8..15 {
        csv.push_str(&format!("2025-06-{day:02},average,7.5,90\n"));
    }
    write(dir.path(), "sleep.csv", &csv);

    let from_json = RiskEngine::load(&DataConfig::new(dir.path()), as_of())
        .assess(Condition::SleepDisorder)
        .expect("json sleep assessed");
    let from_csv = engine_for(dir.path())
        .assess(Condition::SleepDisorder)
        .expect("csv sleep assessed");

    assert_eq!(from_json.probability, 0.0);
    assert_eq!(from_json.tier, RiskTier::Low);
    assert_eq!(from_json, from_csv);
}
