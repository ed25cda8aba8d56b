mod settings;

pub use settings::{load_settings, PredictionSettings};

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Distinguishes runtime behavior for different stages of deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

/// Top-level configuration for the engine host.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub data: DataConfig,
    pub telemetry: TelemetryConfig,
    /// Overrides `nutrition_window_days` from the settings file when set.
    pub nutrition_window_days: Option<usize>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let data_dir = match env::var("HEALTH_DATA_DIR") {
            Ok(value) if value.trim().is_empty() => {
                return Err(ConfigError::EmptyValue {
                    variable: "HEALTH_DATA_DIR",
                })
            }
            Ok(value) => PathBuf::from(value.trim()),
            Err(_) => PathBuf::from("data"),
        };

        let sleep_csv = match env::var("HEALTH_SLEEP_CSV") {
            Ok(value) if value.trim().is_empty() => {
                return Err(ConfigError::EmptyValue {
                    variable: "HEALTH_SLEEP_CSV",
                })
            }
            Ok(value) => Some(PathBuf::from(value.trim())),
            Err(_) => None,
        };

        let nutrition_window_days = match env::var("HEALTH_NUTRITION_WINDOW_DAYS") {
            Ok(value) => Some(parse_window(&value)?),
            Err(_) => None,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            data: DataConfig {
                data_dir,
                sleep_csv,
            },
            telemetry: TelemetryConfig { log_level },
            nutrition_window_days,
        })
    }
}

fn parse_window(value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(days) if days > 0 => Ok(days),
        _ => Err(ConfigError::InvalidValue {
            variable: "HEALTH_NUTRITION_WINDOW_DAYS",
            value: value.to_string(),
        }),
    }
}

/// Locations of the input files the engine reads at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    pub data_dir: PathBuf,
    /// CSV sleep export used in place of `sleep-tracker.json` when set.
    pub sleep_csv: Option<PathBuf>,
}

impl DataConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            sleep_csv: None,
        }
    }

    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join("profile.json")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("ai-config.json")
    }

    pub fn observations_path(&self) -> PathBuf {
        self.data_dir.join("observations.json")
    }

    pub fn nutrition_path(&self) -> PathBuf {
        self.data_dir.join("nutrition-tracker.json")
    }

    pub fn sleep_path(&self) -> PathBuf {
        self.data_dir.join("sleep-tracker.json")
    }

    pub fn sleep_csv(&self) -> Option<&Path> {
        self.sleep_csv.as_deref()
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyValue { variable: &'static str },
    InvalidValue {
        variable: &'static str,
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyValue { variable } => {
                write!(f, "{variable} is set but empty")
            }
            ConfigError::InvalidValue { variable, value } => {
                write!(f, "{variable} must be a positive integer, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
