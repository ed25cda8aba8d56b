use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use health_risk::config::AppConfig;
use health_risk::error::AppError;
use health_risk::report::build_report;
use health_risk::telemetry;
use health_risk::{AssessmentContext, Condition, ReportRequest, ReportType, RiskEngine};
use tracing::info;

use crate::render;

#[derive(Parser, Debug)]
#[command(
    name = "health-risk",
    about = "Score chronic disease, nutrition and sleep risk from local health records",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assess a single condition
    Assess(AssessArgs),
    /// Build a multi-condition health report
    Report(ReportArgs),
}

#[derive(Args, Debug)]
struct AssessArgs {
    /// hypertension, diabetes, cardiovascular, nutritional_deficiency or sleep_disorder
    condition: Condition,
    #[command(flatten)]
    data: DataArgs,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// comprehensive, quick_summary, risk_assessment or trend_analysis
    #[arg(long = "type", default_value = "comprehensive")]
    report_type: ReportType,
    /// Free-form label for the period the report covers
    #[arg(long, default_value = "1y")]
    time_range: String,
    #[command(flatten)]
    data: DataArgs,
}

#[derive(Args, Debug)]
struct DataArgs {
    /// Override the configured data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Read sleep records from a CSV export instead of sleep-tracker.json
    #[arg(long)]
    sleep_csv: Option<PathBuf>,
    /// Reference date for age calculation (defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(
        environment = config.environment.label(),
        data_dir = %config.data.data_dir.display(),
        "health-risk starting"
    );

    match cli.command {
        Command::Assess(args) => {
            let engine = load_engine(&mut config, &args.data);
            let assessment = engine.assess(args.condition)?;
            render::assessment(&assessment, args.data.format)
        }
        Command::Report(args) => {
            let engine = load_engine(&mut config, &args.data);
            let request = ReportRequest::new(args.report_type, Local::now().naive_local())
                .with_time_range(args.time_range);
            let report = build_report(&engine, &request);
            render::report(&report, args.data.format)
        }
    }
}

fn load_engine(config: &mut AppConfig, args: &DataArgs) -> RiskEngine {
    if let Some(dir) = &args.data_dir {
        config.data.data_dir = dir.clone();
    }
    if let Some(csv) = &args.sleep_csv {
        config.data.sleep_csv = Some(csv.clone());
    }

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let mut context = AssessmentContext::load(&config.data, today);
    if let Some(days) = config.nutrition_window_days {
        info!(days, "nutrition window overridden from environment");
        context.settings.nutrition_window_days = days;
    }

    RiskEngine::new(context)
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_assess_arguments() {
        let cli = Cli::try_parse_from([
            "health-risk",
            "assess",
            "sleep-disorder",
            "--data-dir",
            "/tmp/health",
            "--today",
            "2025-06-15",
            "--format",
            "json",
        ])
        .expect("arguments parse");

        match cli.command {
            Command::Assess(args) => {
                assert_eq!(args.condition, Condition::SleepDisorder);
                assert_eq!(args.data.data_dir, Some(PathBuf::from("/tmp/health")));
                assert_eq!(args.data.today, NaiveDate::from_ymd_opt(2025, 6, 15));
                assert_eq!(args.data.format, OutputFormat::Json);
            }
            other => panic!("expected assess command, got {other:?}"),
        }
    }

    #[test]
    fn report_defaults_to_comprehensive_text() {
        let cli = Cli::try_parse_from(["health-risk", "report"]).expect("arguments parse");

        match cli.command {
            Command::Report(args) => {
                assert_eq!(args.report_type, ReportType::Comprehensive);
                assert_eq!(args.time_range, "1y");
                assert_eq!(args.data.format, OutputFormat::Text);
            }
            other => panic!("expected report command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_condition_and_bad_dates() {
        assert!(Cli::try_parse_from(["health-risk", "assess", "asthma"]).is_err());
        assert!(
            Cli::try_parse_from(["health-risk", "assess", "diabetes", "--today", "15/06/2025"])
                .is_err()
        );
    }
}
