//! Track compiler: groups sample rows into time-sorted tracks.

use std::collections::BTreeSet;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::channel::TrackKey;
use crate::config::Config;
use crate::parse::{parse_rows, SampleRow};

/// Duration floor so playback math never divides by zero.
pub const MIN_DURATION_MS: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time_ms: f64,
    pub value: f64,
}

/// Keyframes for one (target, channel, axis), sorted by time (non-decreasing).
/// Equal times keep their input order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub keys: Vec<Keyframe>,
}

impl Track {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn first(&self) -> Option<&Keyframe> {
        self.keys.first()
    }

    pub fn last(&self) -> Option<&Keyframe> {
        self.keys.last()
    }
}

/// Immutable result of one load. Reloading builds a new value and swaps it in whole.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledTimeline {
    tracks: HashMap<TrackKey, Track>,
    duration_ms: f64,
}

impl Default for CompiledTimeline {
    fn default() -> Self {
        Self {
            tracks: HashMap::new(),
            duration_ms: MIN_DURATION_MS,
        }
    }
}

impl CompiledTimeline {
    /// Parse and compile raw motion text in one step.
    pub fn from_text(text: &str, cfg: &Config) -> Self {
        compile(parse_rows(text, cfg).rows)
    }

    pub fn track(&self, key: &TrackKey) -> Option<&Track> {
        self.tracks.get(key)
    }

    pub fn tracks(&self) -> impl Iterator<Item = (&TrackKey, &Track)> {
        self.tracks.iter()
    }

    #[inline]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Distinct target names, sorted.
    pub fn targets(&self) -> Vec<&str> {
        self.tracks
            .keys()
            .map(|k| k.target.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Group rows by exact (target, channel, axis) and sort each track once all rows are in.
pub fn compile<I>(rows: I) -> CompiledTimeline
where
    I: IntoIterator<Item = SampleRow>,
{
    let mut tracks: HashMap<TrackKey, Track> = HashMap::new();
    let mut duration = 0.0f64;

    for row in rows {
        duration = duration.max(row.time_ms);
        tracks
            .entry(TrackKey::new(row.target, row.channel, row.axis))
            .or_default()
            .keys
            .push(Keyframe {
                time_ms: row.time_ms,
                value: row.value,
            });
    }

    // Stable sort: ties stay in input order.
    for track in tracks.values_mut() {
        track.keys.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
    }

    CompiledTimeline {
        tracks,
        duration_ms: duration.max(MIN_DURATION_MS),
    }
}
