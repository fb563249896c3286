//! Error types for the motion engine.
//!
//! Only control inputs and I/O can fail. Malformed motion data never produces
//! an error; it is dropped row by row during parsing.

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MotionError {
    /// Speed must be a positive finite multiplier
    #[error("Invalid speed: {speed} (must be positive and finite)")]
    InvalidSpeed { speed: f64 },

    /// Scrub progress must be a finite number
    #[error("Invalid progress: {progress} (must be finite)")]
    InvalidProgress { progress: f64 },

    /// Reading a motion or config file failed
    #[error("IO error reading '{path}': {reason}")]
    Io { path: String, reason: String },

    /// Config JSON could not be parsed
    #[error("Config error: {reason}")]
    Config { reason: String },
}

impl MotionError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidSpeed { .. } | Self::InvalidProgress { .. } => "control",
            Self::Io { .. } => "io",
            Self::Config { .. } => "config",
        }
    }

    pub(crate) fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for MotionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config {
            reason: err.to_string(),
        }
    }
}
