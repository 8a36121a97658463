//! Hand landmark frames as delivered by the external detector
//!
//! A frame is the 21-point hand skeleton for one video frame. Coordinates are
//! normalized to the camera image: x and y in [0, 1], z is relative depth.

use serde::{Deserialize, Serialize};

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// (base, intermediate, tip) joints per digit, thumb first
pub const DIGIT_JOINTS: [(usize, usize, usize); 5] = [
    (THUMB_MCP, THUMB_IP, THUMB_TIP),
    (INDEX_MCP, INDEX_PIP, INDEX_TIP),
    (MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP),
    (RING_MCP, RING_PIP, RING_TIP),
    (PINKY_MCP, PINKY_PIP, PINKY_TIP),
];

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawPoint")]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl LandmarkPoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

/// Recordings carry points either as objects or as `[x, y, z]` triples
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPoint {
    Object {
        x: f32,
        y: f32,
        #[serde(default)]
        z: f32,
    },
    Triple([f32; 3]),
}

impl From<RawPoint> for LandmarkPoint {
    fn from(raw: RawPoint) -> Self {
        match raw {
            RawPoint::Object { x, y, z } => Self { x, y, z },
            RawPoint::Triple([x, y, z]) => Self { x, y, z },
        }
    }
}

/// The points of one detected hand. May be incomplete when the hand is
/// partially out of frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkFrame {
    points: Vec<LandmarkPoint>,
}

impl LandmarkFrame {
    pub fn new(points: Vec<LandmarkPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Exactly the 21 points the classifier needs, all finite
    pub fn is_complete(&self) -> bool {
        self.points.len() == LANDMARK_COUNT && self.points.iter().all(LandmarkPoint::is_finite)
    }

    /// Mean (x, y) of all finite points
    pub fn centroid(&self) -> Option<(f32, f32)> {
        let (sum_x, sum_y, n) = self
            .points
            .iter()
            .filter(|p| p.is_finite())
            .fold((0.0f32, 0.0f32, 0usize), |(sx, sy, n), p| {
                (sx + p.x, sy + p.y, n + 1)
            });
        if n == 0 {
            return None;
        }
        Some((sum_x / n as f32, sum_y / n as f32))
    }

    /// Finite points as `[x, y, z]`
    pub fn to_triples(&self) -> Vec<[f32; 3]> {
        self.points
            .iter()
            .filter(|p| p.is_finite())
            .map(|p| p.to_array())
            .collect()
    }
}

impl From<Vec<LandmarkPoint>> for LandmarkFrame {
    fn from(points: Vec<LandmarkPoint>) -> Self {
        Self::new(points)
    }
}
