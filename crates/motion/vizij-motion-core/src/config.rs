//! Core configuration for vizij-motion-core.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MotionError;

/// Parser and playback defaults for one engine instance.
/// Every field is optional in JSON; missing fields take their default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Field separator for motion rows.
    pub delimiter: char,
    /// Lines starting with this prefix (after trimming) are ignored.
    pub comment_prefix: String,

    /// Speed multiplier of a freshly created engine.
    pub initial_speed: f64,
    /// Loop flag of a freshly created engine.
    pub initial_loop: bool,

    /// Frame delta (ms) used by `advance_frame` when the host has no clock.
    pub fallback_frame_ms: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: ',',
            comment_prefix: "#".to_string(),
            initial_speed: 1.0,
            initial_loop: true,
            fallback_frame_ms: 16.67,
        }
    }
}

impl Config {
    pub fn from_json_str(s: &str) -> Result<Self, MotionError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MotionError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| MotionError::io(path, e))?;
        Self::from_json_str(&text)
    }

    /// Load a config file, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::from_json_file(path.as_ref()) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("[motion] unable to load config, using defaults: {err}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json_str(r#"{ "delimiter": ";", "initial_loop": false }"#).unwrap();
        assert_eq!(cfg.delimiter, ';');
        assert!(!cfg.initial_loop);
        assert_eq!(cfg.comment_prefix, "#");
        assert_eq!(cfg.initial_speed, 1.0);
    }

    #[test]
    fn missing_file_falls_back() {
        let cfg = Config::load_or_default("/definitely/not/here/motion.json");
        assert_eq!(cfg, Config::default());
    }
}
