//! Enemies and bullets

use rand::Rng;
use serde::Serialize;

use super::tuning::{
    BULLET_SPEED, ENEMY_SCALE_MAX, ENEMY_SCALE_MIN, ENEMY_SPEED_MIN, ENEMY_SPEED_PER_LEVEL,
    ENEMY_SPEED_SPREAD,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Normal,
    Boss,
}

impl EnemyKind {
    /// Health before scaling by size
    pub fn base_health(self) -> u32 {
        match self {
            Self::Normal => 1,
            Self::Boss => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enemy {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    /// Field percent per tick, downward
    pub speed: f32,
    pub kind: EnemyKind,
    /// Which sprite the renderer uses (1 or 2)
    pub visual_variant: u8,
    /// Size multiplier in [1, 3]
    pub scale: f32,
    pub health: u32,
    pub max_health: u32,
}

impl Enemy {
    /// Roll a new enemy at (`x`, `y`) for the given difficulty
    pub fn spawn<R: Rng>(rng: &mut R, id: u64, x: f32, y: f32, kind: EnemyKind, difficulty: u32) -> Self {
        let scale = rng.gen_range(ENEMY_SCALE_MIN..ENEMY_SCALE_MAX);
        let health = (kind.base_health() as f32 * scale).ceil() as u32;
        let speed = ENEMY_SPEED_MIN
            + rng.gen::<f32>() * ENEMY_SPEED_SPREAD
            + difficulty as f32 * ENEMY_SPEED_PER_LEVEL;

        Self {
            id,
            x,
            y,
            speed,
            kind,
            visual_variant: if rng.gen_bool(0.5) { 1 } else { 2 },
            scale,
            health,
            max_health: health,
        }
    }
}

/// Opening wave: (x, y, kind)
pub const SEED_WAVE: [(f32, f32, EnemyKind); 8] = [
    (20.0, 5.0, EnemyKind::Normal),
    (40.0, 8.0, EnemyKind::Normal),
    (60.0, 12.0, EnemyKind::Boss),
    (80.0, 15.0, EnemyKind::Normal),
    (15.0, 18.0, EnemyKind::Boss),
    (35.0, 3.0, EnemyKind::Normal),
    (55.0, 10.0, EnemyKind::Normal),
    (75.0, 6.0, EnemyKind::Normal),
];

/// Player projectile, travelling up
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bullet {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub speed: f32,
}

impl Bullet {
    pub fn new(id: u64, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            speed: BULLET_SPEED,
        }
    }
}
