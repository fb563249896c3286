//! Track sampling.
//!
//! Model:
//! - Boundary clamp: at or before the first key returns the first value, at or
//!   after the last key returns the last value. No extrapolation.
//! - Between keys: piecewise-linear, so authored keys reproduce exactly.
//! - An empty track has no value (`None`), which callers must not read as zero.

use crate::timeline::{Keyframe, Track};

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Index pair `(a, b)` with `keys[a].time_ms <= t_ms < keys[b].time_ms`.
/// Caller guarantees `t_ms` lies strictly inside the key range.
#[inline]
fn bracket(keys: &[Keyframe], t_ms: f64) -> (usize, usize) {
    let hi = keys.partition_point(|k| k.time_ms <= t_ms);
    (hi - 1, hi)
}

/// Sample a track at `t_ms` (milliseconds).
pub fn sample_track(track: &Track, t_ms: f64) -> Option<f64> {
    sample_keys(&track.keys, t_ms)
}

/// Sample a sorted keyframe slice at `t_ms`.
pub fn sample_keys(keys: &[Keyframe], t_ms: f64) -> Option<f64> {
    let first = keys.first()?;
    let last = keys.last()?;
    if t_ms <= first.time_ms || t_ms.is_nan() {
        return Some(first.value);
    }
    if t_ms >= last.time_ms {
        return Some(last.value);
    }
    let (i0, i1) = bracket(keys, t_ms);
    let (a, b) = (&keys[i0], &keys[i1]);
    let t = (t_ms - a.time_ms) / (b.time_ms - a.time_ms);
    Some(lerp(a.value, b.value, t))
}
