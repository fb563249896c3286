//! Vizij Motion Core (engine-agnostic)
//!
//! Plays long-form CSV motion data (`time_ms,target,channel,axis,value`) onto a
//! set of named scene nodes. The pipeline is:
//!
//! raw text → [`parse_rows`] → [`compile`] → [`CompiledTimeline`] →
//! [`Scheduler`] (playhead) → [`accumulate`] + [`sample_track`] → [`PoseDelta`]s
//! applied through a [`TargetResolver`].
//!
//! [`MotionEngine`] ties the pieces together behind the control surface the
//! viewer drives once per frame. Rendering, asset loading and UI stay with the
//! host.

pub mod binding;
pub mod channel;
pub mod config;
pub mod engine;
pub mod error;
pub mod outputs;
pub mod parse;
pub mod playback;
pub mod pose;
pub mod sampling;
pub mod timeline;

// Re-exports for consumers (adapters)
pub use binding::{NodeIndex, NodeTransform, SceneNode, TargetResolver};
pub use channel::{Axis, Channel, TrackKey};
pub use config::Config;
pub use engine::{MotionEngine, StateListener};
pub use error::MotionError;
pub use outputs::{MotionEvent, Outputs};
pub use parse::{parse_rows, ParseReport, ParsedRows, SampleRow};
pub use playback::{PlaybackState, Scheduler, StateSnapshot};
pub use pose::{accumulate, PartialVec3, PoseDelta, Poses};
pub use sampling::sample_track;
pub use timeline::{compile, CompiledTimeline, Keyframe, Track};
