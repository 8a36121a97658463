//! Game session state machine and fixed-tick simulation
//!
//! NotStarted -> Playing <-> Paused -> Ended. `Ended` only leaves through
//! `reset` (back to NotStarted) or `restart` (straight to Playing).
//!
//! Time is injected: every call takes monotonic milliseconds, so a session can
//! be driven by the runtime interval or stepped directly in tests.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::combat::{BulletSystem, CombatSystem};
use super::entities::{Bullet, Enemy, EnemyKind, SEED_WAVE};
use super::physics::PhysicsSystem;
use super::tuning::{
    SessionTuning, BOSS_CHANCE, BULLET_SPAWN_OFFSET, DIFFICULTY_INTERVAL_MS, KILL_SCORE,
    REPEAT_FIRE_INTERVAL_MS, SPAWN_X_RANGE, SPAWN_Y, STARTING_LIVES,
};
use super::GameEvent;
use crate::control::{ControlIntent, SessionStatus, PLAYER_START};
use crate::util::time::{elapsed_since, format_elapsed};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    NotStarted,
    Playing,
    Paused,
    Ended,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scoreboard state, owned by the session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameState {
    /// Play time excluding pauses
    pub elapsed_ms: u64,
    pub score: u64,
    pub lives: u32,
    pub combo: u32,
    pub is_playing: bool,
    pub is_paused: bool,
    pub difficulty_level: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            elapsed_ms: 0,
            score: 0,
            lives: STARTING_LIVES,
            combo: 0,
            is_playing: false,
            is_paused: false,
            difficulty_level: 0,
        }
    }
}

/// Per-session counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub shots_fired: u32,
    pub kills: u32,
    pub enemies_spawned: u32,
    pub enemies_escaped: u32,
    pub hits_taken: u32,
    pub max_combo: u32,
}

/// Produced exactly once when a session ends
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub session_id: Uuid,
    pub score: u64,
    pub elapsed_ms: u64,
    pub difficulty_level: u32,
    pub stats: SessionStats,
}

/// Explicit transition requested from a phase that does not allow it
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot {action} a session that is {phase}")]
pub struct TransitionError {
    pub action: &'static str,
    pub phase: SessionPhase,
}

/// Result of one tick
#[derive(Debug, Default)]
pub struct TickOutcome {
    pub events: Vec<GameEvent>,
    /// Set on the tick the session ended
    pub game_over: Option<ScoreReport>,
}

pub struct GameSession {
    id: Uuid,
    seed: u64,
    rng: ChaCha8Rng,
    tuning: SessionTuning,
    phase: SessionPhase,
    state: GameState,
    stats: SessionStats,
    tick: u64,
    run_id: u64,

    player: (f32, f32),
    enemies: Vec<Enemy>,
    bullets: BulletSystem,
    next_enemy_id: u64,

    started_at: Option<u64>,
    paused_at: Option<u64>,
    ended_at: Option<u64>,
    paused_total: u64,

    /// Next repeat-fire time while the shoot pulse is held
    next_fire_at: Option<u64>,
    /// Previous pause pulse, for edge detection
    pause_latch: bool,
    /// One-shot game-over guard
    finished: bool,
}

impl GameSession {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, SessionTuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: SessionTuning) -> Self {
        Self {
            id: Uuid::new_v4(),
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tuning,
            phase: SessionPhase::NotStarted,
            state: GameState::default(),
            stats: SessionStats::default(),
            tick: 0,
            run_id: 1,
            player: PLAYER_START,
            enemies: Vec::new(),
            bullets: BulletSystem::new(),
            next_enemy_id: 0,
            started_at: None,
            paused_at: None,
            ended_at: None,
            paused_total: 0,
            next_fire_at: None,
            pause_latch: false,
            finished: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn player(&self) -> (f32, f32) {
        self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn bullets(&self) -> &[Bullet] {
        self.bullets.bullets()
    }

    pub fn tuning(&self) -> &SessionTuning {
        &self.tuning
    }

    /// What the gesture pipeline needs to know about this session
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            playing: matches!(self.phase, SessionPhase::Playing | SessionPhase::Paused),
            paused: self.phase == SessionPhase::Paused,
            run_id: self.run_id,
        }
    }

    /// Play time excluding pauses, as of `now`
    pub fn elapsed_ms(&self, now: u64) -> u64 {
        let Some(started) = self.started_at else {
            return 0;
        };
        let until = self.ended_at.or(self.paused_at).unwrap_or(now);
        elapsed_since(until, started).saturating_sub(self.paused_total)
    }

    pub fn start(&mut self, now: u64) -> Result<(), TransitionError> {
        if self.phase != SessionPhase::NotStarted {
            return Err(self.refuse("start"));
        }

        self.phase = SessionPhase::Playing;
        self.started_at = Some(now);
        self.state.is_playing = true;

        if self.tuning.seed_wave {
            for (x, y, kind) in SEED_WAVE {
                self.spawn_enemy(x, y, kind);
            }
        }

        info!(session_id = %self.id, seed = self.seed, enemies = self.enemies.len(), "Session started");
        Ok(())
    }

    pub fn pause(&mut self, now: u64) -> Result<(), TransitionError> {
        if self.phase != SessionPhase::Playing {
            return Err(self.refuse("pause"));
        }

        self.phase = SessionPhase::Paused;
        self.paused_at = Some(now);
        self.state.is_paused = true;
        self.next_fire_at = None;

        info!(session_id = %self.id, elapsed = %format_elapsed(self.elapsed_ms(now)), "Session paused");
        Ok(())
    }

    pub fn resume(&mut self, now: u64) -> Result<(), TransitionError> {
        if self.phase != SessionPhase::Paused {
            return Err(self.refuse("resume"));
        }

        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += elapsed_since(now, paused_at);
        }
        self.phase = SessionPhase::Playing;
        self.state.is_paused = false;

        info!(session_id = %self.id, paused_total_ms = self.paused_total, "Session resumed");
        Ok(())
    }

    /// End the session early. Returns the score report unless one was
    /// already produced.
    pub fn end(&mut self, now: u64) -> Result<Option<ScoreReport>, TransitionError> {
        if !matches!(self.phase, SessionPhase::Playing | SessionPhase::Paused) {
            return Err(self.refuse("end"));
        }
        Ok(self.finish(now))
    }

    /// Wipe everything and return to NotStarted
    pub fn reset(&mut self) {
        let run_id = self.run_id + 1;
        *self = Self::with_tuning(self.seed, self.tuning.clone());
        // Each run draws a different wave from the same seed
        self.rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(run_id));
        self.run_id = run_id;
        info!(session_id = %self.id, run_id, "Session reset");
    }

    /// Reset and immediately start playing
    pub fn restart(&mut self, now: u64) {
        self.reset();
        if let Err(e) = self.start(now) {
            warn!(session_id = %self.id, error = %e, "Restart could not start the session");
        }
    }

    /// Insert a scripted enemy
    pub fn add_enemy(&mut self, enemy: Enemy) {
        self.next_enemy_id = self.next_enemy_id.max(enemy.id);
        self.enemies.push(enemy);
    }

    /// Advance the simulation by one tick
    pub fn tick(&mut self, now: u64, intent: &ControlIntent) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        self.apply_pause_pulse(now, intent.pause, &mut outcome.events);
        if self.phase != SessionPhase::Playing {
            return outcome;
        }

        self.tick += 1;
        self.state.elapsed_ms = self.elapsed_ms(now);
        self.update_difficulty(&mut outcome.events);

        if let Some(target) = intent.move_target {
            self.player = target;
        }
        self.update_fire(now, intent.shoot, &mut outcome.events);

        self.stats.enemies_escaped += PhysicsSystem::advance_enemies(&mut self.enemies) as u32;

        let (px, py) = self.player;
        let collided = CombatSystem::player_collisions(px, py, &mut self.enemies);
        if !collided.is_empty() {
            self.state.lives = self.state.lives.saturating_sub(collided.len() as u32);
            self.state.combo = 0;
            self.stats.hits_taken += collided.len() as u32;
            warn!(
                session_id = %self.id,
                collisions = collided.len(),
                lives = self.state.lives,
                "Player hit"
            );
            for enemy in &collided {
                outcome.events.push(GameEvent::PlayerHit {
                    enemy_id: enemy.id,
                    lives: self.state.lives,
                });
            }
        }

        let report = self.bullets.update_bullets(&mut self.enemies);
        for (enemy_id, health) in report.damaged {
            outcome.events.push(GameEvent::EnemyDamaged { enemy_id, health });
        }
        for enemy in report.kills {
            self.state.score += KILL_SCORE;
            self.state.combo += 1;
            self.stats.kills += 1;
            self.stats.max_combo = self.stats.max_combo.max(self.state.combo);
            outcome.events.push(GameEvent::EnemyKilled {
                enemy_id: enemy.id,
                x: enemy.x,
                y: enemy.y,
                score: self.state.score,
                combo: self.state.combo,
            });
        }

        if self.state.lives == 0 {
            outcome.game_over = self.finish(now);
            if let Some(report) = &outcome.game_over {
                outcome.events.push(GameEvent::GameOver {
                    score: report.score,
                    elapsed_ms: report.elapsed_ms,
                });
            }
            return outcome;
        }

        self.maybe_spawn(&mut outcome.events);
        outcome
    }

    fn apply_pause_pulse(&mut self, now: u64, pause: bool, events: &mut Vec<GameEvent>) {
        let rising = pause && !self.pause_latch;
        self.pause_latch = pause;
        if !rising {
            return;
        }

        match self.phase {
            SessionPhase::Playing => {
                if self.pause(now).is_ok() {
                    events.push(GameEvent::Paused);
                }
            }
            SessionPhase::Paused => {
                if self.resume(now).is_ok() {
                    events.push(GameEvent::Resumed);
                }
            }
            _ => debug!(phase = %self.phase, "Pause pulse ignored"),
        }
    }

    fn update_difficulty(&mut self, events: &mut Vec<GameEvent>) {
        let level = (self.state.elapsed_ms / DIFFICULTY_INTERVAL_MS) as u32;
        if level > self.state.difficulty_level {
            self.state.difficulty_level = level;
            info!(session_id = %self.id, level, "Difficulty increased");
            events.push(GameEvent::DifficultyUp { level });
        }
    }

    /// Fire at once on a fresh shoot pulse, then on a fixed cadence while held
    fn update_fire(&mut self, now: u64, shoot: bool, events: &mut Vec<GameEvent>) {
        if !shoot {
            self.next_fire_at = None;
            return;
        }

        let due = match self.next_fire_at {
            None => true,
            Some(at) => now >= at,
        };
        if !due {
            return;
        }

        let mut next = self.next_fire_at.unwrap_or(now) + REPEAT_FIRE_INTERVAL_MS;
        if next <= now {
            next = now + REPEAT_FIRE_INTERVAL_MS;
        }
        self.next_fire_at = Some(next);

        let (x, y) = (self.player.0, self.player.1 - BULLET_SPAWN_OFFSET);
        let bullet_id = self.bullets.create_bullet(x, y);
        self.stats.shots_fired += 1;
        events.push(GameEvent::Shot { bullet_id, x, y });
    }

    fn maybe_spawn(&mut self, events: &mut Vec<GameEvent>) {
        let chance = self.tuning.spawn_chance(self.state.difficulty_level);
        if !self.rng.gen_bool(chance) {
            return;
        }

        let kind = if self.rng.gen_bool(BOSS_CHANCE) {
            EnemyKind::Boss
        } else {
            EnemyKind::Normal
        };
        let x = self.rng.gen::<f32>() * SPAWN_X_RANGE;
        let enemy_id = self.spawn_enemy(x, SPAWN_Y, kind);
        events.push(GameEvent::EnemySpawned { enemy_id, kind });
    }

    fn spawn_enemy(&mut self, x: f32, y: f32, kind: EnemyKind) -> u64 {
        self.next_enemy_id += 1;
        let id = self.next_enemy_id;
        let enemy = Enemy::spawn(&mut self.rng, id, x, y, kind, self.state.difficulty_level);
        self.enemies.push(enemy);
        self.stats.enemies_spawned += 1;
        id
    }

    fn finish(&mut self, now: u64) -> Option<ScoreReport> {
        if self.finished {
            return None;
        }
        self.finished = true;

        self.state.elapsed_ms = self.elapsed_ms(now);
        self.ended_at = Some(now);
        self.phase = SessionPhase::Ended;
        self.state.is_playing = false;
        self.state.is_paused = false;
        self.next_fire_at = None;

        info!(
            session_id = %self.id,
            score = self.state.score,
            elapsed = %format_elapsed(self.state.elapsed_ms),
            kills = self.stats.kills,
            "Game over"
        );

        Some(ScoreReport {
            session_id: self.id,
            score: self.state.score,
            elapsed_ms: self.state.elapsed_ms,
            difficulty_level: self.state.difficulty_level,
            stats: self.stats.clone(),
        })
    }

    fn refuse(&self, action: &'static str) -> TransitionError {
        TransitionError {
            action,
            phase: self.phase,
        }
    }
}
