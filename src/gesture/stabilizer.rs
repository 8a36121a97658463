//! Gesture stabilizer - turns per-frame classifications into committed transitions
//!
//! Every event first passes the confidence gate. The pause gesture then needs a
//! stability track (3 agreeing frames spanning 800 ms) followed by a long
//! debounce; every other label only needs its per-label debounce window.

use tracing::{debug, info};

use super::{GestureEvent, GestureLabel};
use crate::config::GestureConfig;
use crate::util::debounce::Debouncer;

/// Minimum frames agreeing on the pause gesture
pub const PAUSE_STABLE_FRAMES: u32 = 3;
/// Minimum time the pause gesture must be held (ms)
pub const PAUSE_STABLE_MS: u64 = 800;
/// Minimum time between two emitted pause gestures (ms)
pub const PAUSE_DEBOUNCE_MS: u64 = 1_500;
/// Movement must feel continuous
pub const OPEN_PALM_DEBOUNCE_MS: u64 = 50;
/// Long enough to avoid a double shot from one grip
pub const FIST_DEBOUNCE_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilizerPhase {
    Idle,
    TrackingPauseCandidate,
}

#[derive(Debug, Clone, Copy)]
struct PauseTrack {
    started_at: u64,
    count: u32,
}

pub struct GestureStabilizer {
    confidence_threshold: f32,
    general_debounce_ms: u64,
    current: GestureLabel,
    emitted: Debouncer<GestureLabel>,
    pause_track: Option<PauseTrack>,
}

impl GestureStabilizer {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            confidence_threshold: config.confidence_threshold,
            general_debounce_ms: config.general_debounce_ms,
            current: GestureLabel::None,
            emitted: Debouncer::new(),
            pause_track: None,
        }
    }

    pub fn update_config(&mut self, config: &GestureConfig) {
        self.confidence_threshold = config.confidence_threshold;
        self.general_debounce_ms = config.general_debounce_ms;
    }

    pub fn current_label(&self) -> GestureLabel {
        self.current
    }

    pub fn phase(&self) -> StabilizerPhase {
        match self.pause_track {
            Some(_) => StabilizerPhase::TrackingPauseCandidate,
            None => StabilizerPhase::Idle,
        }
    }

    /// Feed one classified event. Returns the event if it commits a transition.
    pub fn process(&mut self, event: GestureEvent) -> Option<GestureEvent> {
        if event.confidence < self.confidence_threshold {
            return None;
        }

        if event.label == GestureLabel::One {
            return self.process_pause(event);
        }

        self.pause_track = None;

        let window = self.debounce_window(event.label);
        if !self.emitted.try_fire(event.label, event.timestamp, window) {
            return None;
        }

        if self.current != event.label {
            debug!(
                from = self.current.as_str(),
                to = event.label.as_str(),
                confidence = event.confidence,
                "Gesture changed"
            );
        }
        self.current = event.label;
        Some(event)
    }

    fn process_pause(&mut self, event: GestureEvent) -> Option<GestureEvent> {
        let now = event.timestamp;
        let track = match self.pause_track.as_mut() {
            Some(track) => {
                track.count += 1;
                *track
            }
            None => {
                self.pause_track = Some(PauseTrack {
                    started_at: now,
                    count: 1,
                });
                return None;
            }
        };

        let held_ms = now.saturating_sub(track.started_at);
        if track.count < PAUSE_STABLE_FRAMES || held_ms < PAUSE_STABLE_MS {
            return None;
        }

        self.pause_track = None;

        if !self
            .emitted
            .try_fire(GestureLabel::One, now, PAUSE_DEBOUNCE_MS)
        {
            debug!(held_ms, "Pause gesture suppressed by debounce");
            return None;
        }

        info!(held_ms, frames = track.count, "Pause gesture committed");
        self.current = GestureLabel::One;
        Some(event)
    }

    fn debounce_window(&self, label: GestureLabel) -> u64 {
        match label {
            GestureLabel::OpenPalm => OPEN_PALM_DEBOUNCE_MS,
            GestureLabel::Fist => FIST_DEBOUNCE_MS,
            _ => self.general_debounce_ms,
        }
    }

    /// Neutralize after detection loss. Emission history is kept so a
    /// flickering hand cannot bypass the debounce windows.
    pub fn reset(&mut self) {
        self.current = GestureLabel::None;
        self.pause_track = None;
    }

    /// Forget everything, used when the camera stops
    pub fn clear(&mut self) {
        self.reset();
        self.emitted.clear();
    }
}
