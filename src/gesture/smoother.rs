//! Hand position smoothing
//!
//! Exponential smoothing of the hand centroid and skeleton with an adaptive
//! factor: snap quickly when the hand re-enters or jumps, damp small jitter.

use serde::Serialize;

/// Smoothed hand position in normalized camera coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandPosition {
    pub x: f32,
    pub y: f32,
    /// Smoothed skeleton; empty while no hand is detected
    pub landmarks: Vec<[f32; 3]>,
}

impl Default for HandPosition {
    fn default() -> Self {
        Self {
            x: 0.5,
            y: 0.5,
            landmarks: Vec::new(),
        }
    }
}

impl HandPosition {
    pub fn is_tracking(&self) -> bool {
        !self.landmarks.is_empty()
    }
}

/// Factor used for a given frame-to-frame jump
pub fn adaptive_factor(base: f32, delta: f32, reentry: bool) -> f32 {
    if reentry {
        if delta >= 0.3 {
            0.95
        } else if delta >= 0.15 {
            0.8
        } else {
            0.6
        }
    } else if delta > 0.1 {
        0.9
    } else {
        base
    }
}

fn blend(current: f32, raw: f32, factor: f32) -> f32 {
    current + (raw - current) * factor
}

pub struct HandSmoother {
    base_factor: f32,
    position: HandPosition,
}

impl HandSmoother {
    pub fn new(base_factor: f32) -> Self {
        Self {
            base_factor,
            position: HandPosition::default(),
        }
    }

    pub fn set_base_factor(&mut self, factor: f32) {
        self.base_factor = factor;
    }

    pub fn position(&self) -> &HandPosition {
        &self.position
    }

    /// Blend in one detected hand. `points` must be finite.
    pub fn update(&mut self, centroid: (f32, f32), points: &[[f32; 3]]) -> &HandPosition {
        let (raw_x, raw_y) = centroid;
        let pos = &mut self.position;

        let delta = (raw_x - pos.x).abs().max((raw_y - pos.y).abs());
        let factor = adaptive_factor(self.base_factor, delta, pos.landmarks.is_empty());

        pos.x = blend(pos.x, raw_x, factor);
        pos.y = blend(pos.y, raw_y, factor);

        if pos.landmarks.len() == points.len() {
            for (smoothed, raw) in pos.landmarks.iter_mut().zip(points) {
                for axis in 0..3 {
                    smoothed[axis] = blend(smoothed[axis], raw[axis], factor);
                }
            }
        } else {
            pos.landmarks = points.to_vec();
        }

        &self.position
    }

    /// Detection lost: hold x/y, drop the skeleton
    pub fn mark_lost(&mut self) {
        self.position.landmarks.clear();
    }

    pub fn reset(&mut self) {
        self.position = HandPosition::default();
    }
}
