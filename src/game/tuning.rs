//! Gameplay constants
//!
//! Positions are percent of the play field: x grows right, y grows down, the
//! top edge is y = 0 and enemies leave at y = 100.

/// Lives at the start of a session
pub const STARTING_LIVES: u32 = 3;
/// Points per destroyed enemy
pub const KILL_SCORE: u64 = 10;

/// Enemies at or below this y have left the field
pub const FIELD_BOTTOM: f32 = 100.0;
/// Bullets above this y have left the field
pub const FIELD_TOP: f32 = 0.0;

/// Spawned enemies enter just above the field
pub const SPAWN_Y: f32 = -5.0;
/// Spawned enemies get x in [0, SPAWN_X_RANGE)
pub const SPAWN_X_RANGE: f32 = 90.0;
pub const BOSS_CHANCE: f64 = 0.1;

/// Enemy speed is a random base in [MIN, MIN + SPREAD) plus a per-level bonus
pub const ENEMY_SPEED_MIN: f32 = 0.25;
pub const ENEMY_SPEED_SPREAD: f32 = 0.25;
pub const ENEMY_SPEED_PER_LEVEL: f32 = 0.5;
pub const ENEMY_SCALE_MIN: f32 = 1.0;
pub const ENEMY_SCALE_MAX: f32 = 3.0;

/// Collision radius of the player ship
pub const PLAYER_RADIUS: f32 = 4.0;
/// Enemy collision radius per unit of scale
pub const ENEMY_RADIUS_PER_SCALE: f32 = 3.0;

/// Bullets travel this far up per tick
pub const BULLET_SPEED: f32 = 2.0;
/// Bullets spawn this far above the player
pub const BULLET_SPAWN_OFFSET: f32 = 5.0;
/// Bullet hits an enemy when closer than this
pub const BULLET_HIT_DISTANCE: f32 = 5.0;

/// Hold-to-fire cadence (ms)
pub const REPEAT_FIRE_INTERVAL_MS: u64 = 500;
/// Unpaused play time per difficulty level (ms)
pub const DIFFICULTY_INTERVAL_MS: u64 = 20_000;

/// Session parameters an embedder may override
#[derive(Debug, Clone, PartialEq)]
pub struct SessionTuning {
    /// Spawn probability per tick at difficulty 0
    pub spawn_chance_base: f64,
    /// Added spawn probability per difficulty level
    pub spawn_chance_per_level: f64,
    /// Spawn the fixed opening wave on start
    pub seed_wave: bool,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            spawn_chance_base: 0.02,
            spawn_chance_per_level: 0.03,
            seed_wave: true,
        }
    }
}

impl SessionTuning {
    pub fn spawn_chance(&self, difficulty: u32) -> f64 {
        (self.spawn_chance_base + self.spawn_chance_per_level * difficulty as f64).clamp(0.0, 1.0)
    }
}
