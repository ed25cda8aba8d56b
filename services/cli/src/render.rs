use std::io::{self, Write};

use health_risk::assessment::{AssessmentDetail, Recommendation, RiskTier};
use health_risk::error::AppError;
use health_risk::{Assessment, HealthReport};
use serde::Serialize;

use crate::cli::OutputFormat;

pub(crate) fn assessment(assessment: &Assessment, format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => json(assessment),
        OutputFormat::Text => {
            print_assessment(assessment);
            println!("\nRecommendations");
            print_recommendations(&assessment.recommendations);
            Ok(())
        }
    }
}

pub(crate) fn report(report: &HealthReport, format: OutputFormat) -> Result<(), AppError> {
    if format == OutputFormat::Json {
        return json(report);
    }

    let metadata = &report.metadata;
    println!("{}", metadata.report_label);
    println!(
        "Generated {} | period {} | version {}",
        metadata.generated_at.format("%Y-%m-%d %H:%M"),
        metadata.time_range,
        metadata.version
    );

    let summary = &report.summary;
    println!("\nOverall: {}", summary.overall_label);
    for tier in RiskTier::ordered() {
        let names = summary.names_for(tier);
        if !names.is_empty() {
            println!("- {}: {}", tier.label(), names.join(", "));
        }
    }

    for assessment in &report.assessments {
        println!();
        print_assessment(assessment);
    }

    if !report.failures.is_empty() {
        println!("\nNot assessed");
        for failure in &report.failures {
            println!("- {}: {}", failure.name, failure.error);
        }
    }

    println!("\nRecommendations");
    print_recommendations(&report.recommendations);
    Ok(())
}

fn json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn print_assessment(assessment: &Assessment) {
    println!(
        "{}: {} ({})",
        assessment.name, assessment.tier_label, assessment.probability_percent
    );

    match &assessment.detail {
        AssessmentDetail::Scored(detail) => {
            println!(
                "  {} | {}-year horizon | score {}/{}",
                detail.model, detail.time_horizon_years, detail.score, detail.max_score
            );
            for component in detail.score_components.iter().filter(|c| c.points > 0) {
                println!("  +{} {}", component.points, component.notes);
            }
        }
        AssessmentDetail::Nutrition(detail) => {
            if detail.deficiencies.is_empty() {
                println!("  No deficiencies over the last {} records", detail.window_days);
            }
            for deficiency in &detail.deficiencies {
                println!(
                    "  {} at {} of RDA ({})",
                    deficiency.nutrient_name,
                    deficiency.rda_percent,
                    deficiency.tier.label()
                );
            }
        }
        AssessmentDetail::Sleep(detail) => {
            let metrics = &detail.sleep_metrics;
            println!(
                "  last {} nights: {} poor, {} short, {} low efficiency | score {}/{}",
                detail.window_days,
                metrics.poor_sleep_days,
                metrics.short_sleep_days,
                metrics.low_efficiency_days,
                detail.score,
                detail.max_score
            );
        }
    }
}

fn print_recommendations(recommendations: &[Recommendation]) {
    if recommendations.is_empty() {
        println!("- none");
        return;
    }
    for item in recommendations {
        println!("- [{}] {}: {}", u8::from(item.level), item.title, item.content);
        for step in &item.actionable_steps {
            println!("    * {step}");
        }
        if let Some(disclaimer) = &item.disclaimer {
            println!("    ({disclaimer})");
        }
    }
}
