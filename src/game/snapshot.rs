//! Immutable views of a session for renderers

use serde::Serialize;
use uuid::Uuid;

use super::entities::{Bullet, Enemy};
use super::session::{GameSession, GameState, SessionPhase};
use super::GameEvent;
use crate::util::time::format_elapsed;

/// Everything needed to draw one frame of the game
#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub session_id: Uuid,
    pub tick: u64,
    pub phase: SessionPhase,
    pub state: GameState,
    /// `HH:MM:SS.cc` of `state.elapsed_ms`
    pub elapsed: String,
    pub player: (f32, f32),
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    /// Events of the tick that produced this snapshot
    pub events: Vec<GameEvent>,
}

impl GameSnapshot {
    pub fn capture(session: &GameSession, events: Vec<GameEvent>) -> Self {
        let state = session.state().clone();
        Self {
            session_id: session.id(),
            tick: session.tick_count(),
            phase: session.phase(),
            elapsed: format_elapsed(state.elapsed_ms),
            state,
            player: session.player(),
            enemies: session.enemies().to_vec(),
            bullets: session.bullets().to_vec(),
            events,
        }
    }
}

/// Counts published snapshots, for the shutdown summary
#[derive(Debug, Default)]
pub struct SnapshotStats {
    pub total_snapshots: u64,
    pub total_events: u64,
    pub avg_enemies_per_snapshot: f32,
}

impl SnapshotStats {
    pub fn record(&mut self, snapshot: &GameSnapshot) {
        self.total_snapshots += 1;
        self.total_events += snapshot.events.len() as u64;

        // Running average
        let n = self.total_snapshots as f32;
        self.avg_enemies_per_snapshot =
            self.avg_enemies_per_snapshot * ((n - 1.0) / n) + (snapshot.enemies.len() as f32 / n);
    }
}
