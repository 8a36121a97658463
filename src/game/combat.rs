//! Combat system - bullets, hit detection, player collisions

use super::entities::{Bullet, Enemy};
use super::physics::PhysicsSystem;
use super::tuning::BULLET_HIT_DISTANCE;

/// Outcome of one bullet step
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BulletReport {
    /// Enemies destroyed this step, in hit order
    pub kills: Vec<Enemy>,
    /// (enemy id, remaining health) for enemies hit but not destroyed
    pub damaged: Vec<(u64, u32)>,
    /// Bullets that left the top of the field
    pub expired: usize,
}

impl BulletReport {
    pub fn hits(&self) -> usize {
        self.kills.len() + self.damaged.len()
    }
}

/// Owns every live bullet
#[derive(Debug, Default)]
pub struct BulletSystem {
    bullets: Vec<Bullet>,
    next_id: u64,
}

impl BulletSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn len(&self) -> usize {
        self.bullets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bullets.is_empty()
    }

    /// Fire one bullet from (`x`, `y`); returns its id
    pub fn create_bullet(&mut self, x: f32, y: f32) -> u64 {
        self.next_id += 1;
        self.bullets.push(Bullet::new(self.next_id, x, y));
        self.next_id
    }

    /// Advance all bullets one tick and resolve hits against `enemies`.
    ///
    /// Each bullet hits at most one enemy: the first in list order within
    /// range. A hit costs the enemy one health and consumes the bullet;
    /// enemies at zero health are removed and reported as kills.
    pub fn update_bullets(&mut self, enemies: &mut Vec<Enemy>) -> BulletReport {
        let mut report = BulletReport {
            expired: PhysicsSystem::advance_bullets(&mut self.bullets),
            ..Default::default()
        };

        self.bullets.retain(|bullet| {
            let target = enemies.iter().position(|e| {
                PhysicsSystem::distance(bullet.x, bullet.y, e.x, e.y) < BULLET_HIT_DISTANCE
            });
            let Some(idx) = target else {
                return true;
            };

            let enemy = &mut enemies[idx];
            enemy.health = enemy.health.saturating_sub(1);
            if enemy.health == 0 {
                report.kills.push(enemies.remove(idx));
            } else {
                report.damaged.push((enemy.id, enemy.health));
            }
            false
        });

        report
    }
}

/// Collision rules between the player and enemies
pub struct CombatSystem;

impl CombatSystem {
    /// Remove and return every enemy touching the player at (`x`, `y`)
    pub fn player_collisions(x: f32, y: f32, enemies: &mut Vec<Enemy>) -> Vec<Enemy> {
        let mut hit = Vec::new();
        enemies.retain(|enemy| {
            if PhysicsSystem::player_hits(x, y, enemy) {
                hit.push(enemy.clone());
                false
            } else {
                true
            }
        });
        hit
    }
}
