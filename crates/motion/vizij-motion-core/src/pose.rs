//! Accumulation of sampled channel values into sparse per-target pose deltas,
//! and carry-forward application onto node transforms.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::binding::NodeTransform;
use crate::channel::Channel;
use crate::sampling::sample_track;
use crate::timeline::CompiledTimeline;

/// 3-vector whose components are independently set or unset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialVec3(pub [Option<f64>; 3]);

impl PartialVec3 {
    #[inline]
    pub fn x(&self) -> Option<f64> {
        self.0[0]
    }

    #[inline]
    pub fn y(&self) -> Option<f64> {
        self.0[1]
    }

    #[inline]
    pub fn z(&self) -> Option<f64> {
        self.0[2]
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: f64) {
        self.0[index] = Some(value);
    }

    #[inline]
    pub fn any_set(&self) -> bool {
        self.0.iter().any(Option::is_some)
    }

    /// Fill unset components from `current`, mapping set ones through `map`.
    fn resolve(&self, current: [f32; 3], map: impl Fn(f64) -> f32) -> [f32; 3] {
        let mut out = current;
        for (slot, value) in out.iter_mut().zip(self.0) {
            if let Some(v) = value {
                *slot = map(v);
            }
        }
        out
    }
}

/// Sparse pose for one target at one instant. Rotation is in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseDelta {
    pub position: PartialVec3,
    pub rotation_deg: PartialVec3,
    pub scale: PartialVec3,
}

impl PoseDelta {
    #[inline]
    pub fn channel(&self, channel: Channel) -> &PartialVec3 {
        match channel {
            Channel::Position => &self.position,
            Channel::RotationDeg => &self.rotation_deg,
            Channel::Scale => &self.scale,
        }
    }

    #[inline]
    pub fn channel_mut(&mut self, channel: Channel) -> &mut PartialVec3 {
        match channel {
            Channel::Position => &mut self.position,
            Channel::RotationDeg => &mut self.rotation_deg,
            Channel::Scale => &mut self.scale,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.position.any_set() || self.rotation_deg.any_set() || self.scale.any_set())
    }

    /// Write this delta onto `node`.
    ///
    /// A channel with any component set is written as a whole vector; its
    /// unset components keep the node's current value. Channels with nothing
    /// set are left alone. Degrees become radians here.
    pub fn apply_to(&self, node: &mut NodeTransform) {
        if self.position.any_set() {
            node.position = self.position.resolve(node.position, |v| v as f32);
        }
        if self.rotation_deg.any_set() {
            node.rotation = self
                .rotation_deg
                .resolve(node.rotation, |deg| deg.to_radians() as f32);
        }
        if self.scale.any_set() {
            node.scale = self.scale.resolve(node.scale, |v| v as f32);
        }
    }
}

/// Pose deltas keyed by target name.
pub type Poses = HashMap<String, PoseDelta>;

/// Sample every track at `t_ms` into a fresh set of pose deltas.
pub fn accumulate(timeline: &CompiledTimeline, t_ms: f64) -> Poses {
    let mut poses = Poses::new();
    accumulate_into(timeline, t_ms, &mut poses);
    poses
}

/// Like [`accumulate`] but reuses `out`'s allocation. `out` is cleared first.
pub fn accumulate_into(timeline: &CompiledTimeline, t_ms: f64, out: &mut Poses) {
    out.clear();
    for (key, track) in timeline.tracks() {
        let Some(value) = sample_track(track, t_ms) else {
            continue;
        };
        // entry_ref only allocates the name for a new target.
        out.entry_ref(key.target.as_str())
            .or_default()
            .channel_mut(key.channel)
            .set(key.axis.index(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn timeline(text: &str) -> CompiledTimeline {
        CompiledTimeline::from_text(text, &Config::default())
    }

    #[test]
    fn sparse_axes_stay_unset() {
        let tl = timeline("0,Head,rotation_deg,x,0\n1000,Head,rotation_deg,x,90\n");
        let poses = accumulate(&tl, 500.0);
        let head = poses.get("Head").unwrap();
        assert_eq!(head.rotation_deg.x(), Some(45.0));
        assert_eq!(head.rotation_deg.y(), None);
        assert_eq!(head.rotation_deg.z(), None);
        assert!(!head.position.any_set());
        assert!(!head.scale.any_set());
    }

    #[test]
    fn targets_without_tracks_produce_no_entry() {
        let tl = timeline("0,Arm,position,x,1\n");
        let poses = accumulate(&tl, 0.0);
        assert_eq!(poses.len(), 1);
        assert!(poses.get("Leg").is_none());
        assert!(accumulate(&CompiledTimeline::default(), 0.0).is_empty());
    }

    #[test]
    fn channels_compose_per_target() {
        let tl = timeline(
            "0,Arm,position,x,1\n0,Arm,position,z,3\n0,Arm,scale,y,2\n0,Leg,rotation_deg,y,10\n",
        );
        let poses = accumulate(&tl, 0.0);
        let arm = poses["Arm"];
        assert_eq!(arm.position, PartialVec3([Some(1.0), None, Some(3.0)]));
        assert_eq!(arm.scale, PartialVec3([None, Some(2.0), None]));
        assert!(!arm.rotation_deg.any_set());
        assert_eq!(poses["Leg"].rotation_deg.y(), Some(10.0));
    }

    #[test]
    fn apply_carries_forward_unset_components() {
        let mut node = NodeTransform {
            position: [1.0, 2.0, 3.0],
            rotation: [0.1, 0.2, 0.3],
            scale: [4.0, 5.0, 6.0],
        };
        let delta = PoseDelta {
            position: PartialVec3([None, Some(9.0), None]),
            rotation_deg: PartialVec3([Some(180.0), None, None]),
            scale: PartialVec3::default(),
        };
        delta.apply_to(&mut node);
        assert_eq!(node.position, [1.0, 9.0, 3.0]);
        assert!((node.rotation[0] - std::f32::consts::PI).abs() < 1e-6);
        assert_eq!(node.rotation[1], 0.2);
        assert_eq!(node.rotation[2], 0.3);
        assert_eq!(node.scale, [4.0, 5.0, 6.0]);
    }

    #[test]
    fn accumulate_into_clears_previous_frame() {
        let tl = timeline("0,Arm,position,x,1\n");
        let mut poses = Poses::new();
        poses.insert("Stale".into(), PoseDelta::default());
        accumulate_into(&tl, 0.0, &mut poses);
        assert!(poses.get("Stale").is_none());
        assert!(poses.contains_key("Arm"));
    }
}
