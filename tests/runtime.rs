mod common;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{sleep, timeout};
use tokio_test::assert_ok;

use common::{fist, quiet_tuning};
use gesture_shooter::app::{GestureCommand, Runtime, SessionCommand};
use gesture_shooter::camera::CameraHandle;
use gesture_shooter::config::{Config, GestureConfig};
use gesture_shooter::game::{ScoreReport, SessionPhase};
use gesture_shooter::scoring::ScoreSubmitter;

#[derive(Default)]
struct RecordingSubmitter {
    reports: Mutex<Vec<ScoreReport>>,
}

impl ScoreSubmitter for RecordingSubmitter {
    fn submit(&self, report: ScoreReport) {
        self.reports.lock().push(report);
    }
}

fn spawn_runtime() -> (Runtime, Arc<RecordingSubmitter>) {
    let config = Config {
        game_seed: Some(17),
        ..Config::default()
    };
    let submitter = Arc::new(RecordingSubmitter::default());
    let runtime = Runtime::spawn_with_tuning(
        config,
        CameraHandle::null(),
        submitter.clone(),
        quiet_tuning(),
    );
    (runtime, submitter)
}

#[tokio::test]
async fn fist_frames_reach_the_game_loop() {
    let (runtime, submitter) = spawn_runtime();
    let state = runtime.state.clone();

    state.gesture(GestureCommand::StartCamera).await;
    state.session(SessionCommand::Start).await;

    let mut game = state.game.clone();
    let shot = timeout(Duration::from_secs(3), async {
        loop {
            state.push_frame(Some(fist()));
            if !game.borrow_and_update().bullets.is_empty() {
                break;
            }
            sleep(Duration::from_millis(33)).await;
        }
    })
    .await;
    assert_ok!(shot);

    let render = state.render_snapshot();
    assert!(render.control.camera_active);
    assert_eq!(render.game.phase, SessionPhase::Playing);

    state.session(SessionCommand::End).await;
    let ended = timeout(Duration::from_secs(2), async {
        while game.borrow_and_update().phase != SessionPhase::Ended {
            if game.changed().await.is_err() {
                break;
            }
        }
    })
    .await;
    assert_ok!(ended);

    let last = runtime.shutdown().await;
    assert_eq!(last.phase, SessionPhase::Ended);

    let reports = submitter.reports.lock();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].session_id, last.session_id);
    assert!(reports[0].stats.shots_fired >= 1);
}

#[tokio::test]
async fn frames_are_ignored_until_the_camera_starts() {
    let (runtime, submitter) = spawn_runtime();
    let state = runtime.state.clone();
    state.session(SessionCommand::Start).await;

    for _ in 0..10 {
        state.push_frame(Some(fist()));
        sleep(Duration::from_millis(20)).await;
    }

    let control = state.control_snapshot();
    assert!(!control.camera_active);
    assert!(!control.intent.shoot);
    assert!(state.game_snapshot().bullets.is_empty());

    let last = runtime.shutdown().await;
    assert_eq!(last.phase, SessionPhase::Playing);
    assert!(submitter.reports.lock().is_empty());
}

#[tokio::test]
async fn disabling_gestures_at_runtime_keeps_intent_neutral() {
    let (runtime, _submitter) = spawn_runtime();
    let state = runtime.state.clone();

    state
        .gesture(GestureCommand::UpdateGesture(GestureConfig {
            enabled: false,
            ..GestureConfig::default()
        }))
        .await;
    state.gesture(GestureCommand::StartCamera).await;
    state.session(SessionCommand::Start).await;

    let mut control = state.control.clone();
    let disabled = timeout(Duration::from_secs(2), async {
        loop {
            state.push_frame(Some(fist()));
            {
                let snapshot = control.borrow_and_update();
                if snapshot.camera_active && !snapshot.enabled {
                    break;
                }
            }
            sleep(Duration::from_millis(33)).await;
        }
    })
    .await;
    assert_ok!(disabled);

    for _ in 0..5 {
        state.push_frame(Some(fist()));
        sleep(Duration::from_millis(33)).await;
    }
    assert!(state.control_snapshot().intent.is_neutral());
    assert!(state.game_snapshot().bullets.is_empty());

    runtime.shutdown().await;
}

#[tokio::test]
async fn shutdown_before_start_is_clean() {
    let (runtime, submitter) = spawn_runtime();
    let last = runtime.shutdown().await;
    assert_eq!(last.phase, SessionPhase::NotStarted);
    assert_eq!(last.state.lives, 3);
    assert!(submitter.reports.lock().is_empty());
}
