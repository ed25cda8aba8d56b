use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::source::{read_json, DataSourceKind};

/// Tunables read from `ai-config.json` under `ai_features.predictions`.
///
/// The risk models themselves are static; these only gate and shape the
/// output around them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionSettings {
    pub enabled: bool,
    /// Absolute probability above which a consultation advisory is emitted,
    /// regardless of the model's own breakpoints.
    pub medical_consultation_threshold: f64,
    /// Severity-2 items kept when recommendations are merged across conditions.
    pub max_targeted_recommendations: usize,
    /// Most recent nutrition records averaged per nutrient.
    pub nutrition_window_days: usize,
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            medical_consultation_threshold: 0.30,
            max_targeted_recommendations: 5,
            nutrition_window_days: 7,
        }
    }
}

impl PredictionSettings {
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.medical_consultation_threshold) {
            return Err(format!(
                "medical_consultation_threshold {} outside [0, 1]",
                self.medical_consultation_threshold
            ));
        }
        if self.nutrition_window_days == 0 {
            return Err("nutrition_window_days must be at least 1".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    ai_features: AiFeatures,
}

#[derive(Debug, Default, Deserialize)]
struct AiFeatures {
    #[serde(default)]
    predictions: PredictionSettings,
}

/// Reads prediction settings, falling back to built-in defaults on any
/// read, decode or validation failure. Never fails.
pub fn load_settings(path: &Path) -> PredictionSettings {
    let settings = match read_json::<SettingsFile>(path) {
        Ok(file) => file.ai_features.predictions,
        Err(err) => {
            warn!(data_source = %DataSourceKind::Settings, %err, "using default prediction settings");
            return PredictionSettings::default();
        }
    };

    match settings.validate() {
        Ok(()) => settings,
        Err(reason) => {
            warn!(path = %path.display(), %reason, "using default prediction settings");
            PredictionSettings::default()
        }
    }
}
