//! Engine: owns one compiled timeline, one playhead and the target resolver.
//!
//! Methods:
//! - new, load_timeline / load_timeline_file / install_timeline
//! - play, pause, stop, set_speed, set_loop, set_progress
//! - tick (per frame), advance_frame (no host clock)
//! - state, set_listener / clear_listener, outputs
//!
//! Every call that changes the playhead or playback flags resamples all tracks,
//! applies the poses through the resolver and then notifies the listener, all
//! before returning. Engines share no state; run one per dataset.

use std::fmt;
use std::path::Path;

use crate::binding::TargetResolver;
use crate::config::Config;
use crate::error::MotionError;
use crate::outputs::{MotionEvent, Outputs};
use crate::parse::{parse_rows, ParseReport};
use crate::playback::{PlaybackState, Scheduler, StateSnapshot, TickOutcome};
use crate::pose::{accumulate, accumulate_into, Poses};
use crate::timeline::{compile, CompiledTimeline};

/// Synchronous state-change callback. Invoked at the end of each mutating call.
pub type StateListener = Box<dyn FnMut(&StateSnapshot)>;

pub struct MotionEngine<R: TargetResolver> {
    cfg: Config,
    timeline: CompiledTimeline,
    scheduler: Scheduler,
    resolver: R,
    listener: Option<StateListener>,

    // Result of the most recent mutating call
    outputs: Outputs,
}

impl<R: TargetResolver> MotionEngine<R> {
    /// Create an engine over `resolver` with an empty timeline, paused at zero.
    pub fn new(resolver: R, cfg: Config) -> Self {
        Self {
            scheduler: Scheduler::new(cfg.initial_speed, cfg.initial_loop),
            cfg,
            timeline: CompiledTimeline::default(),
            resolver,
            listener: None,
            outputs: Outputs::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    #[inline]
    pub fn timeline(&self) -> &CompiledTimeline {
        &self.timeline
    }

    #[inline]
    pub fn playback(&self) -> &PlaybackState {
        self.scheduler.state()
    }

    #[inline]
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    #[inline]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    #[inline]
    pub fn resolver_mut(&mut self) -> &mut R {
        &mut self.resolver
    }

    pub fn into_resolver(self) -> R {
        self.resolver
    }

    /// Pull-style state export for UI binding.
    pub fn state(&self) -> StateSnapshot {
        self.scheduler.snapshot(self.timeline.duration_ms())
    }

    pub fn set_listener(&mut self, listener: impl FnMut(&StateSnapshot) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Pose deltas at an arbitrary time, without touching playback or nodes.
    pub fn poses_at(&self, t_ms: f64) -> Poses {
        accumulate(&self.timeline, t_ms)
    }

    /// Parse and compile raw motion text, then install it.
    pub fn load_timeline(&mut self, text: &str) -> ParseReport {
        let parsed = parse_rows(text, &self.cfg);
        self.install_timeline(compile(parsed.rows));
        parsed.report
    }

    pub fn load_timeline_file(&mut self, path: impl AsRef<Path>) -> Result<ParseReport, MotionError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| MotionError::io(path, e))?;
        Ok(self.load_timeline(&text))
    }

    /// Replace the current timeline wholesale and pause at zero.
    pub fn install_timeline(&mut self, timeline: CompiledTimeline) {
        self.outputs.clear();
        self.timeline = timeline;
        let duration = self.timeline.duration_ms();
        self.scheduler.reset(duration);
        log::info!(
            "[motion] loaded timeline: duration {} ms, tracks {}",
            duration,
            self.timeline.track_count()
        );
        self.outputs.push_event(MotionEvent::TimelineLoaded {
            duration_ms: duration,
            tracks: self.timeline.track_count(),
        });
        self.commit();
    }

    pub fn play(&mut self) {
        self.outputs.clear();
        if self.scheduler.play() {
            self.outputs.push_event(MotionEvent::PlaybackStarted);
            self.commit();
        }
    }

    pub fn pause(&mut self) {
        self.outputs.clear();
        if self.scheduler.pause() {
            self.outputs.push_event(MotionEvent::PlaybackPaused);
            self.commit();
        }
    }

    pub fn stop(&mut self) {
        self.outputs.clear();
        self.scheduler.stop(self.timeline.duration_ms());
        self.outputs.push_event(MotionEvent::PlaybackStopped);
        self.commit();
    }

    /// Set the speed multiplier. Non-positive or non-finite values are rejected
    /// and the previous speed stays in effect.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), MotionError> {
        self.outputs.clear();
        if let Err(err) = self.scheduler.set_speed(speed) {
            log::warn!("[motion] {err}");
            return Err(err);
        }
        self.commit();
        Ok(())
    }

    pub fn set_loop(&mut self, loop_enabled: bool) {
        self.outputs.clear();
        self.scheduler.set_loop(loop_enabled);
        self.commit();
    }

    /// Scrub to `fraction` of the duration (clamped to [0,1]). Only takes
    /// effect while paused; while playing the next tick owns the playhead.
    pub fn set_progress(&mut self, fraction: f64) -> Result<(), MotionError> {
        self.outputs.clear();
        let moved = match self
            .scheduler
            .set_progress(fraction, self.timeline.duration_ms())
        {
            Ok(moved) => moved,
            Err(err) => {
                log::warn!("[motion] {err}");
                return Err(err);
            }
        };
        if !moved {
            log::debug!("[motion] scrub to {fraction} ignored while playing");
            return Ok(());
        }
        self.outputs.push_event(MotionEvent::Seeked {
            time_ms: self.scheduler.time_ms(),
        });
        self.commit();
        Ok(())
    }

    /// Advance by `dt_ms` of wall-clock time. Only moves while playing.
    pub fn tick(&mut self, dt_ms: f64) -> &Outputs {
        self.outputs.clear();
        let outcome = self.scheduler.tick(dt_ms, self.timeline.duration_ms());
        let time_ms = self.scheduler.time_ms();
        match outcome {
            TickOutcome::Idle => return &self.outputs,
            TickOutcome::Advanced => {}
            TickOutcome::Wrapped => self.outputs.push_event(MotionEvent::Looped { time_ms }),
            TickOutcome::Ended => {
                log::debug!("[motion] reached end of timeline at {time_ms} ms; pausing");
                self.outputs.push_event(MotionEvent::PlaybackEnded { time_ms });
            }
        }
        self.commit();
        &self.outputs
    }

    /// Tick by the configured fallback frame time, for hosts without a clock.
    pub fn advance_frame(&mut self) -> &Outputs {
        self.tick(self.cfg.fallback_frame_ms)
    }

    /// Resample at the playhead, apply to nodes, notify.
    fn commit(&mut self) {
        self.resample();
        self.notify();
    }

    fn resample(&mut self) {
        accumulate_into(
            &self.timeline,
            self.scheduler.time_ms(),
            &mut self.outputs.poses,
        );
        for (target, delta) in self.outputs.poses.iter() {
            match self.resolver.resolve(target) {
                Some(node) => delta.apply_to(node),
                None => {
                    log::trace!("[motion] no node named '{target}'; skipping");
                    self.outputs.events.push(MotionEvent::TargetUnresolved {
                        target: target.clone(),
                    });
                }
            }
        }
    }

    fn notify(&mut self) {
        let snapshot = self.state();
        if let Some(listener) = self.listener.as_mut() {
            listener(&snapshot);
        }
    }
}

impl<R: TargetResolver + fmt::Debug> fmt::Debug for MotionEngine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionEngine")
            .field("cfg", &self.cfg)
            .field("timeline", &self.timeline)
            .field("scheduler", &self.scheduler)
            .field("resolver", &self.resolver)
            .field("listener", &self.listener.is_some())
            .field("outputs", &self.outputs)
            .finish()
    }
}
