//! Hand landmarks to force points.
//!
//! The landmark detector reports each hand as 21 points in normalized image
//! space (x, y in `[0, 1]`, z a relative depth). Only the first hand is used:
//! its five fingertips become force points in world space, and the gap
//! between thumb and index tip decides whether the hand is pinching.
//!
//! ```text
//!   landmark   finger   role (default table)
//!      4       thumb    Pull
//!      8       index    Push
//!     12       middle   Push
//!     16       ring     Pull
//!     20       pinky    Push
//! ```

use crate::shapes::ShapeId;
use crate::Vec3;
use serde::{Deserialize, Serialize};

/// Landmarks per hand reported by the detector.
pub const LANDMARK_COUNT: usize = 21;

pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

/// Fingertip landmark indices, in force-point order.
pub const FINGERTIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// One detector landmark in normalized image space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Map into world space: centered on the origin, y up, depth toward the
    /// viewer, scaled by `scale`.
    #[inline]
    pub fn to_world(&self, scale: f32) -> Vec3 {
        Vec3::new(
            (self.x - 0.5) * scale,
            -(self.y - 0.5) * scale,
            -self.z * scale,
        )
    }
}

/// One tracked hand.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    pub landmarks: Vec<Landmark>,
}

impl Hand {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// A hand is usable when it has every landmark and all of them are finite.
    pub fn is_well_formed(&self) -> bool {
        self.landmarks.len() >= LANDMARK_COUNT && self.landmarks.iter().all(Landmark::is_finite)
    }

    /// Distance between thumb and index tip in the image plane, ignoring depth.
    ///
    /// Returns `None` if the hand is missing either landmark.
    pub fn pinch_distance(&self) -> Option<f32> {
        let thumb = self.landmarks.get(THUMB_TIP)?;
        let index = self.landmarks.get(INDEX_TIP)?;
        Some((thumb.x - index.x).hypot(thumb.y - index.y))
    }
}

/// Everything the detector reported for one camera frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectorFrame {
    #[serde(default)]
    pub hands: Vec<Hand>,
}

impl DetectorFrame {
    pub fn new(hands: Vec<Hand>) -> Self {
        Self { hands }
    }

    /// A frame in which nothing was detected.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Whether a force point draws particles in or drives them away.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForceRole {
    Push,
    Pull,
}

/// A transient point that pushes or pulls nearby particles for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForcePoint {
    pub position: Vec3,
    pub role: ForceRole,
}

impl ForcePoint {
    pub fn new(position: Vec3, role: ForceRole) -> Self {
        Self { position, role }
    }

    pub fn push(position: Vec3) -> Self {
        Self::new(position, ForceRole::Push)
    }

    pub fn pull(position: Vec3) -> Self {
        Self::new(position, ForceRole::Pull)
    }
}

/// Role of each fingertip, indexed by position in [`FINGERTIPS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleTable(pub [ForceRole; 5]);

impl RoleTable {
    /// Role for fingertip slot `slot` (0 = thumb .. 4 = pinky).
    #[inline]
    pub fn role(&self, slot: usize) -> ForceRole {
        self.0[slot]
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        use ForceRole::*;
        Self([Pull, Push, Push, Pull, Push])
    }
}

/// Result of normalizing one detector frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedInput {
    /// Fingertip force points: empty, or exactly one per fingertip in
    /// [`FINGERTIPS`] order.
    pub force_points: Vec<ForcePoint>,
    /// Thumb-index gap of the tracked hand, if there is one.
    pub pinch_distance: Option<f32>,
    /// Whether that gap is under the pinch threshold.
    pub pinching: bool,
}

impl NormalizedInput {
    /// Whether a usable hand was found.
    #[inline]
    pub fn has_input(&self) -> bool {
        self.pinch_distance.is_some()
    }

    /// Shape the gesture asks for: cube while pinching, sphere otherwise,
    /// nothing without a hand.
    pub fn gesture_shape(&self) -> Option<ShapeId> {
        self.pinch_distance.map(|_| {
            if self.pinching {
                ShapeId::Cube
            } else {
                ShapeId::Sphere
            }
        })
    }
}

/// Turns raw detector frames into force points and a pinch reading.
#[derive(Clone, Debug, PartialEq)]
pub struct Normalizer {
    /// World units spanned by the full image width.
    pub world_scale: f32,
    /// Thumb-index distance (normalized image units) below which a hand pinches.
    pub pinch_threshold: f32,
    pub roles: RoleTable,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            world_scale: 10.0,
            pinch_threshold: 0.05,
            roles: RoleTable::default(),
        }
    }
}

impl Normalizer {
    /// Normalize a frame. `None` means the detector delivered nothing.
    ///
    /// A malformed first hand counts as no hand at all.
    pub fn normalize(&self, frame: Option<&DetectorFrame>) -> NormalizedInput {
        let Some(hand) = frame.and_then(|f| f.hands.first()) else {
            return NormalizedInput::default();
        };

        if !hand.is_well_formed() {
            log::debug!(
                "Ignoring malformed hand ({} landmarks, {} required)",
                hand.landmarks.len(),
                LANDMARK_COUNT
            );
            return NormalizedInput::default();
        }

        let force_points = FINGERTIPS
            .iter()
            .enumerate()
            .map(|(slot, &tip)| {
                ForcePoint::new(
                    hand.landmarks[tip].to_world(self.world_scale),
                    self.roles.role(slot),
                )
            })
            .collect();

        let pinch_distance = hand.pinch_distance();
        let pinching = pinch_distance.is_some_and(|d| d < self.pinch_threshold);

        NormalizedInput {
            force_points,
            pinch_distance,
            pinching,
        }
    }
}
