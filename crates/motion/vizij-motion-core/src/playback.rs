//! Playback scheduler: play/pause/stop, loop, speed and scrub over one timeline.
//!
//! There are two states, Playing and Paused. "Stop" is Paused at time zero.
//! The scheduler knows nothing about tracks; it only needs the timeline
//! duration, which the owner passes in on every call that moves the playhead.

use serde::{Deserialize, Serialize};

use crate::error::MotionError;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub playing: bool,
    #[serde(rename = "loop")]
    pub loop_enabled: bool,
    /// Always positive and finite.
    pub speed: f64,
    pub current_time_ms: f64,
    /// `current_time_ms / duration_ms`, refreshed after every time update.
    pub scrub_fraction: f64,
}

/// Read-only view of playback for UI binding.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub playing: bool,
    #[serde(rename = "loop")]
    pub loop_enabled: bool,
    pub speed: f64,
    pub progress: f64,
    pub time_ms: f64,
    pub duration_ms: f64,
}

/// What a tick did to the playhead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// Paused, or a zero-length advance; nothing to resample.
    Idle,
    Advanced,
    /// Passed the end with loop on and wrapped around.
    Wrapped,
    /// Reached the end with loop off and paused there.
    Ended,
}

#[derive(Debug)]
pub struct Scheduler {
    state: PlaybackState,
}

impl Scheduler {
    pub fn new(speed: f64, loop_enabled: bool) -> Self {
        let speed = if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            1.0
        };
        Self {
            state: PlaybackState {
                playing: false,
                loop_enabled,
                speed,
                current_time_ms: 0.0,
                scrub_fraction: 0.0,
            },
        }
    }

    #[inline]
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    #[inline]
    pub fn time_ms(&self) -> f64 {
        self.state.current_time_ms
    }

    pub fn snapshot(&self, duration_ms: f64) -> StateSnapshot {
        StateSnapshot {
            playing: self.state.playing,
            loop_enabled: self.state.loop_enabled,
            speed: self.state.speed,
            progress: self.state.scrub_fraction,
            time_ms: self.state.current_time_ms,
            duration_ms,
        }
    }

    fn set_time(&mut self, t_ms: f64, duration_ms: f64) {
        self.state.current_time_ms = t_ms;
        self.state.scrub_fraction = if duration_ms > 0.0 {
            (t_ms / duration_ms).clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Returns true if the state changed.
    pub fn play(&mut self) -> bool {
        !std::mem::replace(&mut self.state.playing, true)
    }

    /// Returns true if the state changed.
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.state.playing, false)
    }

    pub fn stop(&mut self, duration_ms: f64) {
        self.state.playing = false;
        self.set_time(0.0, duration_ms);
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<(), MotionError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(MotionError::InvalidSpeed { speed });
        }
        self.state.speed = speed;
        Ok(())
    }

    pub fn set_loop(&mut self, loop_enabled: bool) {
        self.state.loop_enabled = loop_enabled;
    }

    /// Scrub to `fraction` of the duration while paused. Finite values are
    /// clamped to [0,1]. Returns `Ok(false)` when ignored because playing.
    pub fn set_progress(&mut self, fraction: f64, duration_ms: f64) -> Result<bool, MotionError> {
        if !fraction.is_finite() {
            return Err(MotionError::InvalidProgress { progress: fraction });
        }
        if self.state.playing {
            return Ok(false);
        }
        self.set_time(fraction.clamp(0.0, 1.0) * duration_ms, duration_ms);
        Ok(true)
    }

    /// Pause at zero; used whenever a new timeline is installed.
    pub fn reset(&mut self, duration_ms: f64) {
        self.stop(duration_ms);
    }

    /// Advance by `dt_ms` of wall-clock time. Negative or non-finite deltas count as zero.
    pub fn tick(&mut self, dt_ms: f64, duration_ms: f64) -> TickOutcome {
        if !self.state.playing {
            return TickOutcome::Idle;
        }
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        if dt_ms == 0.0 {
            return TickOutcome::Idle;
        }

        // A huge speed can overflow the step; saturate so the wrap stays finite.
        let step = (dt_ms * self.state.speed).min(f64::MAX);
        let mut t = (self.state.current_time_ms + step).min(f64::MAX);
        let mut outcome = TickOutcome::Advanced;
        if t > duration_ms {
            if self.state.loop_enabled {
                t %= duration_ms;
                outcome = TickOutcome::Wrapped;
            } else {
                t = duration_ms;
                self.state.playing = false;
                outcome = TickOutcome::Ended;
            }
        }
        self.set_time(t, duration_ms);
        outcome
    }
}
