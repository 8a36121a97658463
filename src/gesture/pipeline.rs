//! Per-frame gesture pipeline
//!
//! `on_frame` is the single entry point for detector output. Each call runs
//! classify -> smooth -> stabilize -> map synchronously and leaves the latest
//! control intent ready for the game loop.

use serde::Serialize;
use tracing::{info, trace};

use super::classifier::classify;
use super::smoother::{HandPosition, HandSmoother};
use super::stabilizer::GestureStabilizer;
use super::{GestureEvent, GestureLabel, LandmarkFrame};
use crate::camera::{CameraError, CameraHandle};
use crate::config::{ControlConfig, GestureConfig};
use crate::control::{ControlIntent, ControlMapper};

pub use crate::control::SessionStatus;

/// Everything a renderer or the game loop reads from the pipeline
#[derive(Debug, Clone, Serialize)]
pub struct ControlSnapshot {
    /// Current stable gesture
    pub gesture: GestureLabel,
    /// Latest unfiltered classification
    pub raw: GestureEvent,
    pub hand: HandPosition,
    pub intent: ControlIntent,
    pub player: (f32, f32),
    pub enabled: bool,
    pub camera_active: bool,
}

pub struct GesturePipeline {
    config: GestureConfig,
    camera: CameraHandle,
    stabilizer: GestureStabilizer,
    smoother: HandSmoother,
    mapper: ControlMapper,
    last_event: GestureEvent,
    run_id: u64,
}

impl GesturePipeline {
    pub fn new(config: GestureConfig, control: ControlConfig, camera: CameraHandle) -> Self {
        let config = config.normalized();
        Self {
            stabilizer: GestureStabilizer::new(&config),
            smoother: HandSmoother::new(config.smoothing_factor),
            mapper: ControlMapper::new(control),
            camera,
            config,
            last_event: GestureEvent::neutral(0),
            run_id: 0,
        }
    }

    pub fn camera(&self) -> &CameraHandle {
        &self.camera
    }

    pub fn start(&mut self) -> Result<(), CameraError> {
        self.camera.start()
    }

    /// Stop the camera and drop every gesture and intent immediately
    pub fn stop(&mut self, now: u64) {
        self.camera.stop();
        self.release_input(now);
    }

    /// The camera may be stopped through any clone of the handle; whoever
    /// notices first drops the gesture state
    fn release_input(&mut self, now: u64) {
        self.stabilizer.clear();
        self.smoother.mark_lost();
        self.mapper.clear();
        self.last_event = GestureEvent::neutral(now);
    }

    /// Process one detector callback. `None` means no hand in view.
    pub fn on_frame(
        &mut self,
        frame: Option<&LandmarkFrame>,
        now: u64,
        status: SessionStatus,
    ) -> GestureEvent {
        if !self.camera.is_active() {
            self.release_input(now);
            return self.last_event;
        }

        if status.run_id != self.run_id {
            self.run_id = status.run_id;
            self.mapper.reset_player_position();
        }

        let event = match frame.filter(|f| !f.is_empty()) {
            Some(frame) => self.process_hand(frame, now, status),
            None => {
                self.stabilizer.reset();
                self.smoother.mark_lost();
                self.mapper.neutralize();
                GestureEvent::neutral(now)
            }
        };

        self.last_event = event;
        event
    }

    fn process_hand(
        &mut self,
        frame: &LandmarkFrame,
        now: u64,
        status: SessionStatus,
    ) -> GestureEvent {
        let classification = classify(frame);
        let event = GestureEvent::new(classification.label, classification.confidence, now);
        trace!(
            label = event.label.as_str(),
            confidence = event.confidence,
            points = frame.len(),
            "Frame classified"
        );

        match frame.centroid() {
            Some(centroid) => {
                self.smoother.update(centroid, &frame.to_triples());
            }
            None => self.smoother.mark_lost(),
        }

        let transition = self.stabilizer.process(event);
        self.mapper.update(
            now,
            transition.as_ref(),
            self.stabilizer.current_label(),
            self.smoother.position(),
            status,
            self.config.enabled,
        );

        event
    }

    /// Age out pulses when no frame arrived for a while
    pub fn expire(&mut self, now: u64) -> ControlIntent {
        if !self.camera.is_active() {
            self.release_input(now);
        }
        self.mapper.expire(now)
    }

    pub fn intent(&self) -> ControlIntent {
        self.mapper.intent()
    }

    pub fn current_label(&self) -> GestureLabel {
        self.stabilizer.current_label()
    }

    pub fn hand(&self) -> &HandPosition {
        self.smoother.position()
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.config.enabled != enabled {
            info!(enabled, "Gesture control toggled");
        }
        self.config.enabled = enabled;
        if !enabled {
            self.mapper.neutralize();
        }
    }

    /// Flip gesture control and return the new setting
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.config.enabled);
        self.config.enabled
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.mapper.set_sensitivity(sensitivity);
        info!(
            sensitivity = self.mapper.config().sensitivity,
            "Movement sensitivity updated"
        );
    }

    pub fn update_config(&mut self, config: GestureConfig) {
        let config = config.normalized();
        self.stabilizer.update_config(&config);
        self.smoother.set_base_factor(config.smoothing_factor);
        self.set_enabled(config.enabled);
        self.config = config;
    }

    pub fn set_control_config(&mut self, control: ControlConfig) {
        self.mapper.set_config(control);
        let config = self.mapper.config();
        info!(
            sensitivity = config.sensitivity,
            bounds = ?config.bounds,
            "Control config updated"
        );
    }

    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            gesture: self.stabilizer.current_label(),
            raw: self.last_event,
            hand: self.smoother.position().clone(),
            intent: self.mapper.intent(),
            player: self.mapper.player_position(),
            enabled: self.config.enabled,
            camera_active: self.camera.is_active(),
        }
    }
}
