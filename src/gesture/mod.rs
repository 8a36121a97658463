//! Gesture pipeline: landmark classification, stabilization and hand smoothing

pub mod classifier;
pub mod landmarks;
pub mod pipeline;
pub mod smoother;
pub mod stabilizer;

pub use classifier::{classify, Classification};
pub use landmarks::{LandmarkFrame, LandmarkPoint, LANDMARK_COUNT};
pub use pipeline::{ControlSnapshot, GesturePipeline, SessionStatus};
pub use smoother::{HandPosition, HandSmoother};
pub use stabilizer::{GestureStabilizer, StabilizerPhase};

use serde::{Deserialize, Serialize};

/// Hand gestures the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureLabel {
    /// No actionable gesture
    #[default]
    None,
    /// Closed hand - shoot
    Fist,
    /// Open hand - move
    OpenPalm,
    /// Index finger raised - pause
    One,
    /// Index and middle raised - reserved
    Peace,
}

impl GestureLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fist => "fist",
            Self::OpenPalm => "open_palm",
            Self::One => "one",
            Self::Peace => "peace",
        }
    }

    /// Gestures that steer the ship
    pub fn is_movement(&self) -> bool {
        matches!(self, Self::OpenPalm | Self::Fist)
    }
}

/// One classified observation, stamped with the frame time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GestureEvent {
    pub label: GestureLabel,
    pub confidence: f32,
    /// Monotonic milliseconds
    pub timestamp: u64,
}

impl GestureEvent {
    pub fn new(label: GestureLabel, confidence: f32, timestamp: u64) -> Self {
        Self {
            label,
            confidence,
            timestamp,
        }
    }

    /// Neutral event used on detection loss and camera stop
    pub fn neutral(timestamp: u64) -> Self {
        Self::new(GestureLabel::None, 0.0, timestamp)
    }
}
