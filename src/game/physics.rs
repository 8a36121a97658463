//! Movement and overlap tests

use super::entities::{Bullet, Enemy};
use super::tuning::{ENEMY_RADIUS_PER_SCALE, FIELD_BOTTOM, FIELD_TOP, PLAYER_RADIUS};

/// Physics helpers for the play field
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Strict circle overlap: touching circles do not collide
    pub fn overlaps(x1: f32, y1: f32, r1: f32, x2: f32, y2: f32, r2: f32) -> bool {
        Self::distance(x1, y1, x2, y2) < r1 + r2
    }

    pub fn distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
        let dx = x2 - x1;
        let dy = y2 - y1;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn enemy_radius(enemy: &Enemy) -> f32 {
        ENEMY_RADIUS_PER_SCALE * enemy.scale
    }

    /// Whether the player ship at (`x`, `y`) touches `enemy`
    pub fn player_hits(x: f32, y: f32, enemy: &Enemy) -> bool {
        Self::overlaps(x, y, PLAYER_RADIUS, enemy.x, enemy.y, Self::enemy_radius(enemy))
    }

    /// Move every enemy down by its speed and drop the ones that left the
    /// field. Returns how many escaped.
    pub fn advance_enemies(enemies: &mut Vec<Enemy>) -> usize {
        let before = enemies.len();
        for enemy in enemies.iter_mut() {
            enemy.y += enemy.speed;
        }
        enemies.retain(|e| e.y < FIELD_BOTTOM);
        before - enemies.len()
    }

    /// Move every bullet up by its speed and drop the ones that left the field
    pub fn advance_bullets(bullets: &mut Vec<Bullet>) -> usize {
        let before = bullets.len();
        for bullet in bullets.iter_mut() {
            bullet.y -= bullet.speed;
        }
        bullets.retain(|b| b.y >= FIELD_TOP);
        before - bullets.len()
    }
}
