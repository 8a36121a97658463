//! Application state shared with whoever drives the runtime

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::camera::CameraHandle;
use crate::config::{Config, ControlConfig, GestureConfig};
use crate::game::GameSnapshot;
use crate::gesture::{ControlSnapshot, LandmarkFrame};
use crate::util::time::MonotonicClock;

/// Explicit session transitions requested by the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Pause,
    Resume,
    Restart,
    End,
    Reset,
}

/// Gesture pipeline controls
#[derive(Debug, Clone, PartialEq)]
pub enum GestureCommand {
    StartCamera,
    StopCamera,
    ToggleGesture,
    SetSensitivity(f32),
    /// Threshold, debounce, smoothing and the enable flag
    UpdateGesture(GestureConfig),
    /// Sensitivity and movement bounds
    UpdateControl(ControlConfig),
}

/// One detector callback; `None` means no hand in view
pub type DetectorFrame = Option<LandmarkFrame>;

/// What a renderer draws each frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub game: Arc<GameSnapshot>,
    pub control: Arc<ControlSnapshot>,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub clock: MonotonicClock,
    pub camera: CameraHandle,
    pub frames: mpsc::Sender<DetectorFrame>,
    pub session_commands: mpsc::Sender<SessionCommand>,
    pub gesture_commands: mpsc::Sender<GestureCommand>,
    pub game: watch::Receiver<Arc<GameSnapshot>>,
    pub control: watch::Receiver<Arc<ControlSnapshot>>,
}

impl AppState {
    /// Hand a detector result to the pipeline. Frames are dropped rather than
    /// queued when the pipeline falls behind.
    pub fn push_frame(&self, frame: DetectorFrame) -> bool {
        match self.frames.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!("Frame dropped, pipeline busy");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    pub async fn session(&self, command: SessionCommand) {
        if self.session_commands.send(command).await.is_err() {
            warn!(?command, "Game loop is not running");
        }
    }

    pub async fn gesture(&self, command: GestureCommand) {
        if let Err(e) = self.gesture_commands.send(command).await {
            warn!(command = ?e.0, "Gesture loop is not running");
        }
    }

    pub fn game_snapshot(&self) -> Arc<GameSnapshot> {
        self.game.borrow().clone()
    }

    pub fn control_snapshot(&self) -> Arc<ControlSnapshot> {
        self.control.borrow().clone()
    }

    pub fn render_snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            game: self.game_snapshot(),
            control: self.control_snapshot(),
        }
    }
}
