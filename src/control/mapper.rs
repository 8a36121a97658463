//! Control mapper - stable gestures and hand position to control intents
//!
//! Movement follows the current stable label on every frame. Shoot and pause
//! are raised only by committed transitions. Every field clears itself
//! `PULSE_WINDOW_MS` after it was last set, so the game loop sees pulses.

use serde::Serialize;
use tracing::debug;

use super::ControlIntent;
use crate::config::{clamp_sensitivity, ControlConfig};
use crate::gesture::{GestureEvent, GestureLabel, HandPosition};
use crate::util::debounce::Debouncer;

/// Lifetime of every intent field after it was last set (ms)
pub const PULSE_WINDOW_MS: u64 = 100;
/// Minimum spacing of shoot and pause actions at this layer (ms)
pub const ACTION_DEBOUNCE_MS: u64 = 100;
/// Where the player starts, in game-space percent
pub const PLAYER_START: (f32, f32) = (50.0, 80.0);

/// What the mapper needs to know about the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SessionStatus {
    pub playing: bool,
    pub paused: bool,
    /// Changes every time the session is reset or restarted
    pub run_id: u64,
}

impl SessionStatus {
    pub fn running(&self) -> bool {
        self.playing && !self.paused
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Action {
    Shoot,
    Pause,
}

#[derive(Debug, Default, Clone, Copy)]
struct SetTimes {
    move_target: Option<u64>,
    shoot: Option<u64>,
    pause: Option<u64>,
}

/// Blend factor toward the target. A fist damps harder so aim holds steady
/// while firing.
pub fn follow_factor(label: GestureLabel, delta: f32) -> f32 {
    match label {
        GestureLabel::Fist if delta > 15.0 => 0.7,
        GestureLabel::Fist => 0.4,
        _ if delta > 10.0 => 0.9,
        _ => 0.6,
    }
}

pub struct ControlMapper {
    config: ControlConfig,
    player: (f32, f32),
    actions: Debouncer<Action>,
    intent: ControlIntent,
    set_at: SetTimes,
}

impl ControlMapper {
    pub fn new(config: ControlConfig) -> Self {
        Self {
            config,
            player: PLAYER_START,
            actions: Debouncer::new(),
            intent: ControlIntent::NEUTRAL,
            set_at: SetTimes::default(),
        }
    }

    pub fn intent(&self) -> ControlIntent {
        self.intent
    }

    pub fn player_position(&self) -> (f32, f32) {
        self.player
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn set_config(&mut self, mut config: ControlConfig) {
        config.sensitivity = clamp_sensitivity(config.sensitivity);
        self.config = config;
        self.player = self.config.bounds.clamp(self.player.0, self.player.1);
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.config.sensitivity = clamp_sensitivity(sensitivity);
    }

    /// Map one processed frame to the current intent
    pub fn update(
        &mut self,
        now: u64,
        transition: Option<&GestureEvent>,
        current: GestureLabel,
        hand: &HandPosition,
        status: SessionStatus,
        enabled: bool,
    ) -> ControlIntent {
        if !enabled {
            self.neutralize();
            return self.intent;
        }

        self.expire(now);

        if current.is_movement() && status.running() && hand.is_tracking() {
            self.follow_hand(now, current, hand);
        }

        if let Some(event) = transition {
            if status.playing {
                self.apply_action(now, event.label, status);
            }
        }

        self.intent
    }

    fn follow_hand(&mut self, now: u64, label: GestureLabel, hand: &HandPosition) {
        let bounds = self.config.bounds;
        let (target_x, target_y) = bounds.clamp((1.0 - hand.x) * 100.0, hand.y * 100.0);
        let (x, y) = self.player;

        let delta = (target_x - x).abs().max((target_y - y).abs());
        let factor = (follow_factor(label, delta) * self.config.sensitivity).clamp(0.0, 1.0);

        self.player = bounds.clamp(x + (target_x - x) * factor, y + (target_y - y) * factor);
        self.intent.move_target = Some(self.player);
        self.set_at.move_target = Some(now);
    }

    fn apply_action(&mut self, now: u64, label: GestureLabel, status: SessionStatus) {
        match label {
            GestureLabel::Fist if !status.paused => {
                if self.actions.try_fire(Action::Shoot, now, ACTION_DEBOUNCE_MS) {
                    self.intent.shoot = true;
                    self.set_at.shoot = Some(now);
                }
            }
            GestureLabel::One => {
                if self.actions.try_fire(Action::Pause, now, ACTION_DEBOUNCE_MS) {
                    debug!(paused = status.paused, "Pause pulse raised");
                    self.intent.pause = true;
                    self.set_at.pause = Some(now);
                }
            }
            _ => {}
        }
    }

    /// Clear every field whose pulse window has elapsed
    pub fn expire(&mut self, now: u64) -> ControlIntent {
        let elapsed = |at: Option<u64>| at.is_some_and(|t| now.saturating_sub(t) >= PULSE_WINDOW_MS);

        if elapsed(self.set_at.move_target) {
            self.intent.move_target = None;
            self.set_at.move_target = None;
        }
        if elapsed(self.set_at.shoot) {
            self.intent.shoot = false;
            self.set_at.shoot = None;
        }
        if elapsed(self.set_at.pause) {
            self.intent.pause = false;
            self.set_at.pause = None;
        }
        self.intent
    }

    /// Zero every intent field immediately
    pub fn neutralize(&mut self) {
        self.intent = ControlIntent::NEUTRAL;
        self.set_at = SetTimes::default();
    }

    /// Neutralize and forget action history
    pub fn clear(&mut self) {
        self.neutralize();
        self.actions.clear();
    }

    pub fn reset_player_position(&mut self) {
        self.player = PLAYER_START;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYING: SessionStatus = SessionStatus {
        playing: true,
        paused: false,
        run_id: 1,
    };

    fn hand(x: f32, y: f32) -> HandPosition {
        HandPosition {
            x,
            y,
            landmarks: vec![[x, y, 0.0]; 21],
        }
    }

    fn fist(ts: u64) -> GestureEvent {
        GestureEvent::new(GestureLabel::Fist, 0.95, ts)
    }

    #[test]
    fn open_palm_moves_toward_mirrored_hand() {
        let mut m = ControlMapper::new(ControlConfig::default());
        // Hand on the camera's left is the player's right
        let intent = m.update(0, None, GestureLabel::OpenPalm, &hand(0.2, 0.8), PLAYING, true);
        let (x, y) = intent.move_target.unwrap();
        assert!((x - 77.0).abs() < 1e-3, "x = {x}");
        assert!((y - 80.0).abs() < 1e-3);
    }

    #[test]
    fn target_is_clamped_to_bounds() {
        let mut m = ControlMapper::new(ControlConfig::default());
        for ts in 0..20 {
            m.update(ts * 33, None, GestureLabel::OpenPalm, &hand(0.0, 0.0), PLAYING, true);
        }
        let (x, y) = m.player_position();
        assert!((x - 95.0).abs() < 1e-3);
        assert!((y - 10.0).abs() < 1e-3);
    }

    #[test]
    fn fist_damps_harder_than_open_palm() {
        assert_eq!(follow_factor(GestureLabel::Fist, 5.0), 0.4);
        assert_eq!(follow_factor(GestureLabel::Fist, 20.0), 0.7);
        assert_eq!(follow_factor(GestureLabel::OpenPalm, 5.0), 0.6);
        assert_eq!(follow_factor(GestureLabel::OpenPalm, 20.0), 0.9);
    }

    #[test]
    fn no_movement_while_paused_or_not_playing() {
        let mut m = ControlMapper::new(ControlConfig::default());
        let paused = SessionStatus {
            paused: true,
            ..PLAYING
        };
        let intent = m.update(0, None, GestureLabel::OpenPalm, &hand(0.0, 0.5), paused, true);
        assert!(intent.move_target.is_none());
        let intent = m.update(0, None, GestureLabel::OpenPalm, &hand(0.0, 0.5), SessionStatus::default(), true);
        assert!(intent.move_target.is_none());
        assert_eq!(m.player_position(), PLAYER_START);
    }

    #[test]
    fn shoot_pulse_expires_after_window() {
        let mut m = ControlMapper::new(ControlConfig::default());
        let h = hand(0.5, 0.8);
        let intent = m.update(0, Some(&fist(0)), GestureLabel::Fist, &h, PLAYING, true);
        assert!(intent.shoot);
        assert!(m.update(99, None, GestureLabel::Fist, &h, PLAYING, true).shoot);
        assert!(!m.update(100, None, GestureLabel::Fist, &h, PLAYING, true).shoot);
    }

    #[test]
    fn reasserted_shoot_stays_high() {
        let mut m = ControlMapper::new(ControlConfig::default());
        let h = hand(0.5, 0.8);
        m.update(0, Some(&fist(0)), GestureLabel::Fist, &h, PLAYING, true);
        let intent = m.update(132, Some(&fist(132)), GestureLabel::Fist, &h, PLAYING, true);
        assert!(intent.shoot);
    }

    #[test]
    fn pause_pulse_allowed_while_paused() {
        let mut m = ControlMapper::new(ControlConfig::default());
        let paused = SessionStatus {
            paused: true,
            ..PLAYING
        };
        let one = GestureEvent::new(GestureLabel::One, 0.9, 0);
        let intent = m.update(0, Some(&one), GestureLabel::One, &hand(0.5, 0.5), paused, true);
        assert!(intent.pause);

        let intent = m.update(10, Some(&fist(10)), GestureLabel::Fist, &hand(0.5, 0.5), paused, true);
        assert!(!intent.shoot);
    }

    #[test]
    fn disabled_gestures_yield_neutral_intent() {
        let mut m = ControlMapper::new(ControlConfig::default());
        let intent = m.update(0, Some(&fist(0)), GestureLabel::Fist, &hand(0.1, 0.1), PLAYING, false);
        assert!(intent.is_neutral());
    }

    #[test]
    fn sensitivity_scales_follow_speed() {
        let mut slow = ControlMapper::new(ControlConfig::default());
        slow.set_sensitivity(0.5);
        let mut fast = ControlMapper::new(ControlConfig::default());
        fast.set_sensitivity(10.0);
        assert_eq!(fast.config().sensitivity, crate::config::MAX_SENSITIVITY);

        let h = hand(0.3, 0.8);
        slow.update(0, None, GestureLabel::OpenPalm, &h, PLAYING, true);
        fast.update(0, None, GestureLabel::OpenPalm, &h, PLAYING, true);
        // Target x = 70; slow blends half of 0.9, fast snaps
        assert!((slow.player_position().0 - 59.0).abs() < 1e-3);
        assert!((fast.player_position().0 - 70.0).abs() < 1e-3);
    }
}
