//! Game simulation modules

pub mod combat;
pub mod entities;
pub mod physics;
pub mod session;
pub mod snapshot;
pub mod tuning;

pub use entities::{Bullet, Enemy, EnemyKind};
pub use session::{
    GameSession, GameState, ScoreReport, SessionPhase, SessionStats, TickOutcome, TransitionError,
};
pub use snapshot::GameSnapshot;
pub use tuning::SessionTuning;

use serde::Serialize;

/// Something that happened during a tick, for renderers and logs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Bullet fired from the ship's nose
    Shot { bullet_id: u64, x: f32, y: f32 },
    /// Enemy took a hit and survived
    EnemyDamaged { enemy_id: u64, health: u32 },
    EnemyKilled {
        enemy_id: u64,
        x: f32,
        y: f32,
        score: u64,
        combo: u32,
    },
    EnemySpawned { enemy_id: u64, kind: EnemyKind },
    /// Enemy rammed the player
    PlayerHit { enemy_id: u64, lives: u32 },
    DifficultyUp { level: u32 },
    Paused,
    Resumed,
    GameOver { score: u64, elapsed_ms: u64 },
}
