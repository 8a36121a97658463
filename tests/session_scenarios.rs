mod common;

use common::{quiet_tuning, static_enemy};
use gesture_shooter::control::ControlIntent;
use gesture_shooter::game::{GameSession, SessionPhase, SessionTuning};

const TICK: u64 = 16;

fn steer(x: f32, y: f32) -> ControlIntent {
    ControlIntent {
        move_target: Some((x, y)),
        ..ControlIntent::NEUTRAL
    }
}

#[test]
fn seed_wave_drifts_off_screen_without_losses() {
    let tuning = SessionTuning {
        seed_wave: true,
        ..quiet_tuning()
    };
    let mut session = GameSession::with_tuning(11, tuning);
    session.start(0).unwrap();
    assert_eq!(session.enemies().len(), 8);

    let state = session.state();
    assert_eq!((state.lives, state.score, state.difficulty_level), (3, 0, 0));

    // Park the ship in the right margin, clear of every seed column
    let intent = steer(95.0, 80.0);
    let mut now = 0;
    while !session.enemies().is_empty() && now < 20_000 {
        now += TICK;
        session.tick(now, &intent);
    }

    assert!(session.enemies().is_empty());
    assert_eq!(session.state().lives, 3);
    assert_eq!(session.state().score, 0);
    assert_eq!(session.stats().enemies_escaped, 8);
    assert_eq!(session.stats().kills, 0);
}

#[test]
fn ramming_enemy_costs_a_life_and_the_combo() {
    let mut session = GameSession::with_tuning(5, quiet_tuning());
    session.start(0).unwrap();

    // Build a combo first: shoot an enemy straight above the ship
    session.add_enemy(static_enemy(1, 20.0, 41.0, 1));
    let fire = ControlIntent {
        shoot: true,
        ..steer(20.0, 50.0)
    };
    session.tick(TICK, &fire);
    assert_eq!(session.state().combo, 1);
    assert_eq!(session.state().score, 10);

    session.add_enemy(static_enemy(2, 50.0, 80.0, 1));
    session.tick(2 * TICK, &steer(50.0, 80.0));

    let state = session.state();
    assert_eq!(state.lives, 2);
    assert_eq!(state.score, 10);
    assert_eq!(state.combo, 0);
    assert!(session.enemies().is_empty());
    assert_eq!(session.phase(), SessionPhase::Playing);
}

#[test]
fn two_health_enemy_dies_on_second_hit() {
    let mut session = GameSession::with_tuning(5, quiet_tuning());
    session.start(0).unwrap();
    session.add_enemy(static_enemy(1, 50.0, 70.0, 2));

    let hold_fire = ControlIntent {
        shoot: true,
        ..ControlIntent::NEUTRAL
    };

    session.tick(0, &hold_fire);
    assert_eq!(session.enemies().len(), 1);
    assert_eq!(session.enemies()[0].health, 1);
    assert_eq!(session.state().score, 0);

    let mut now = 0;
    while now < 496 {
        now += TICK;
        session.tick(now, &hold_fire);
    }
    assert_eq!(session.enemies().len(), 1, "second shot not due yet");

    session.tick(512, &hold_fire);
    assert!(session.enemies().is_empty());
    assert_eq!(session.state().score, 10);
    assert_eq!(session.stats().shots_fired, 2);
}

#[test]
fn pausing_freezes_clock_and_difficulty() {
    let mut session = GameSession::with_tuning(5, quiet_tuning());
    session.start(0).unwrap();

    let idle = ControlIntent::NEUTRAL;
    session.tick(15_000, &idle);
    session.pause(15_000).unwrap();
    session.tick(40_000, &idle);
    assert_eq!(session.state().difficulty_level, 0);
    assert_eq!(session.elapsed_ms(40_000), 15_000);

    session.resume(40_000).unwrap();
    session.tick(44_000, &idle);
    assert_eq!(session.state().elapsed_ms, 19_000);
    assert_eq!(session.state().difficulty_level, 0);

    session.tick(45_000, &idle);
    assert_eq!(session.state().difficulty_level, 1);
}

#[test]
fn game_over_reports_exactly_once() {
    let mut session = GameSession::with_tuning(5, quiet_tuning());
    session.start(0).unwrap();
    for id in 1..=3 {
        session.add_enemy(static_enemy(id, 50.0, 80.0, 1));
    }

    let idle = ControlIntent::NEUTRAL;
    let first = session.tick(TICK, &idle);
    assert!(first.game_over.is_some());
    assert_eq!(session.state().lives, 0);

    // Conditions stay true but the end sequence does not repeat
    session.add_enemy(static_enemy(9, 50.0, 80.0, 1));
    assert!(session.tick(2 * TICK, &idle).game_over.is_none());
    assert!(session.end(3 * TICK).is_err());
    assert_eq!(session.phase(), SessionPhase::Ended);

    session.restart(100);
    assert_eq!(session.state().lives, 3);
    assert_eq!(session.phase(), SessionPhase::Playing);
}
