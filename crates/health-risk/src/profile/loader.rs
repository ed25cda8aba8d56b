use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use super::{Observations, Profile};
use crate::source::{read_json, DataSourceKind};

/// Loads the profile snapshot, degrading to `None` when the file is missing,
/// unreadable, malformed, or an empty object.
pub fn load_profile(path: &Path) -> Option<Profile> {
    let raw: Value = match read_json(path) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(data_source = %DataSourceKind::Profile, %err, "profile unavailable");
            return None;
        }
    };

    let is_empty = raw.as_object().map_or(true, |fields| fields.is_empty());
    if is_empty {
        warn!(path = %path.display(), "profile is empty");
        return None;
    }

    match serde_json::from_value::<Profile>(raw) {
        Ok(profile) => Some(profile),
        Err(err) => {
            warn!(path = %path.display(), %err, "profile failed validation");
            None
        }
    }
}

/// Loads the optional observation feed; absent or broken feeds fall back to
/// an empty set so extraction applies population defaults.
pub fn load_observations(path: &Path) -> Observations {
    if !path.exists() {
        debug!(path = %path.display(), "no observation feed, using defaults");
        return Observations::default();
    }

    match read_json(path) {
        Ok(observations) => observations,
        Err(err) => {
            warn!(data_source = %DataSourceKind::Observations, %err, "ignoring observation feed");
            Observations::default()
        }
    }
}
