#![allow(dead_code)]

use gesture_shooter::game::{Enemy, EnemyKind, SessionTuning};
use gesture_shooter::gesture::landmarks::*;
use gesture_shooter::gesture::LandmarkFrame;

/// No random spawns and no opening wave
pub fn quiet_tuning() -> SessionTuning {
    SessionTuning {
        spawn_chance_base: 0.0,
        spawn_chance_per_level: 0.0,
        seed_wave: false,
    }
}

/// Stationary single-scale enemy
pub fn static_enemy(id: u64, x: f32, y: f32, health: u32) -> Enemy {
    Enemy {
        id,
        x,
        y,
        speed: 0.0,
        kind: EnemyKind::Normal,
        visual_variant: 1,
        scale: 1.0,
        health,
        max_health: health,
    }
}

/// Upright hand with the wrist at (`cx`, `cy`); flags extend thumb..pinky
pub fn hand_at(cx: f32, cy: f32, digits: [bool; 5]) -> LandmarkFrame {
    let mut points = vec![LandmarkPoint::new(cx, cy, 0.0); LANDMARK_COUNT];
    let p = |dx: f32, dy: f32| LandmarkPoint::new(cx + dx, cy + dy, 0.0);

    points[THUMB_CMC] = p(-0.05, -0.05);
    points[THUMB_MCP] = p(-0.10, -0.08);
    points[THUMB_IP] = p(-0.15, -0.10);
    points[THUMB_TIP] = if digits[0] { p(-0.22, -0.12) } else { p(-0.05, -0.12) };

    let fingers = [
        (INDEX_MCP, INDEX_PIP, INDEX_DIP, INDEX_TIP, -0.06),
        (MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP, -0.02),
        (RING_MCP, RING_PIP, RING_DIP, RING_TIP, 0.02),
        (PINKY_MCP, PINKY_PIP, PINKY_DIP, PINKY_TIP, 0.06),
    ];
    for (i, &(mcp, pip, dip, tip, dx)) in fingers.iter().enumerate() {
        points[mcp] = p(dx, -0.20);
        points[pip] = p(dx, -0.30);
        let extended = digits[i + 1];
        points[dip] = if extended { p(dx, -0.35) } else { p(dx, -0.22) };
        points[tip] = if extended { p(dx, -0.40) } else { p(dx, -0.15) };
    }
    LandmarkFrame::new(points)
}

pub fn fist() -> LandmarkFrame {
    hand_at(0.5, 0.8, [false; 5])
}

pub fn one() -> LandmarkFrame {
    hand_at(0.5, 0.8, [false, true, false, false, false])
}
