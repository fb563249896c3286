//! Output contracts from the motion engine.
//!
//! `Outputs` describes what the most recent state-mutating call did: the pose
//! deltas it sampled (if it resampled) and the semantic events it raised.
//! Adapters read it after each call; it is rebuilt by the next one.

use serde::{Deserialize, Serialize};

use crate::pose::Poses;

/// Discrete semantic signals emitted by engine operations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MotionEvent {
    TimelineLoaded { duration_ms: f64, tracks: usize },
    PlaybackStarted,
    PlaybackPaused,
    PlaybackStopped,
    /// Reached the end with loop off; the final pose is held.
    PlaybackEnded { time_ms: f64 },
    /// Wrapped past the end with loop on.
    Looped { time_ms: f64 },
    Seeked { time_ms: f64 },
    /// A sampled target has no node in the resolver; it was skipped.
    TargetUnresolved { target: String },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    /// Pose deltas from the last resample, keyed by target.
    #[serde(default)]
    pub poses: Poses,
    #[serde(default)]
    pub events: Vec<MotionEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.poses.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: MotionEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty() && self.events.is_empty()
    }
}
