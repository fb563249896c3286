//! Closed channel/axis enumeration and the track grouping key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Transform component a track drives.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "position")]
    Position,
    /// Euler rotation, authored in degrees.
    #[serde(rename = "rotation_deg")]
    RotationDeg,
    #[serde(rename = "scale")]
    Scale,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Position, Channel::RotationDeg, Channel::Scale];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Position => "position",
            Channel::RotationDeg => "rotation_deg",
            Channel::Scale => "scale",
        }
    }
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Slot index into a 3-vector.
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl FromStr for Channel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "position" => Ok(Channel::Position),
            "rotation_deg" => Ok(Channel::RotationDeg),
            "scale" => Ok(Channel::Scale),
            _ => Err(()),
        }
    }
}

impl FromStr for Axis {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grouping key for tracks: (target, channel, axis).
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TrackKey {
    pub target: String,
    pub channel: Channel,
    pub axis: Axis,
}

impl TrackKey {
    pub fn new(target: impl Into<String>, channel: Channel, axis: Axis) -> Self {
        Self {
            target: target.into(),
            channel,
            axis,
        }
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.target, self.channel, self.axis)
    }
}
