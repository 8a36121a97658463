//! Runtime tasks: the fixed-tick game loop and the frame-driven gesture loop
//!
//! The two loops run on independent clocks and only meet through watch
//! channels: the gesture loop is the single writer of the control snapshot,
//! the game loop reads the latest one once per tick and is the single writer
//! of the session status and game snapshot.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{info, warn};

use super::state::{AppState, DetectorFrame, GestureCommand, SessionCommand};
use crate::camera::CameraHandle;
use crate::config::Config;
use crate::control::mapper::PULSE_WINDOW_MS;
use crate::game::snapshot::SnapshotStats;
use crate::game::{GameEvent, GameSession, GameSnapshot, SessionTuning};
use crate::gesture::{ControlSnapshot, GesturePipeline, SessionStatus};
use crate::scoring::ScoreSubmitter;
use crate::util::time::{format_elapsed, MonotonicClock, TICK_INTERVAL};

const FRAME_QUEUE: usize = 8;
const COMMAND_QUEUE: usize = 32;

/// Owns the session and advances it every tick
pub struct GameLoop {
    session: GameSession,
    clock: MonotonicClock,
    commands: mpsc::Receiver<SessionCommand>,
    control: watch::Receiver<Arc<ControlSnapshot>>,
    status_tx: watch::Sender<SessionStatus>,
    snapshot_tx: watch::Sender<Arc<GameSnapshot>>,
    submitter: Arc<dyn ScoreSubmitter>,
    stats: SnapshotStats,
}

impl GameLoop {
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Arc<GameSnapshot> {
        info!(session_id = %self.session.id(), seed = self.session.seed(), "Game loop started");

        let mut ticker = interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = self.clock.now_ms();
                    // Latest intent wins; intermediate updates are never replayed
                    let intent = self.control.borrow().intent;
                    let outcome = self.session.tick(now, &intent);
                    if let Some(report) = outcome.game_over {
                        self.submitter.submit(report);
                    }
                    self.publish(outcome.events);
                }
                Some(command) = self.commands.recv() => {
                    let events = self.handle_command(command);
                    self.publish(events);
                }
                _ = shutdown.changed() => break,
            }
        }

        let last = self.snapshot_tx.borrow().clone();
        info!(
            session_id = %self.session.id(),
            ticks = self.session.tick_count(),
            snapshots = self.stats.total_snapshots,
            avg_enemies = self.stats.avg_enemies_per_snapshot,
            "Game loop stopped"
        );
        last
    }

    fn handle_command(&mut self, command: SessionCommand) -> Vec<GameEvent> {
        let now = self.clock.now_ms();
        let mut events = Vec::new();

        let result = match command {
            SessionCommand::Start => self.session.start(now),
            SessionCommand::Pause => self.session.pause(now).map(|()| events.push(GameEvent::Paused)),
            SessionCommand::Resume => self.session.resume(now).map(|()| events.push(GameEvent::Resumed)),
            SessionCommand::Restart => {
                self.session.restart(now);
                Ok(())
            }
            SessionCommand::Reset => {
                self.session.reset();
                Ok(())
            }
            SessionCommand::End => self.session.end(now).map(|report| {
                if let Some(report) = report {
                    events.push(GameEvent::GameOver {
                        score: report.score,
                        elapsed_ms: report.elapsed_ms,
                    });
                    self.submitter.submit(report);
                }
            }),
        };

        if let Err(e) = result {
            warn!(?command, error = %e, "Session command rejected");
        }
        events
    }

    fn publish(&mut self, events: Vec<GameEvent>) {
        let snapshot = GameSnapshot::capture(&self.session, events);
        self.stats.record(&snapshot);
        self.status_tx.send_if_modified(|status| {
            let next = self.session.status();
            let changed = *status != next;
            *status = next;
            changed
        });
        self.snapshot_tx.send_replace(Arc::new(snapshot));
    }
}

/// Feeds detector frames through the gesture pipeline
pub struct GestureLoop {
    pipeline: GesturePipeline,
    clock: MonotonicClock,
    frames: mpsc::Receiver<DetectorFrame>,
    commands: mpsc::Receiver<GestureCommand>,
    status: watch::Receiver<SessionStatus>,
    control_tx: watch::Sender<Arc<ControlSnapshot>>,
}

impl GestureLoop {
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("Gesture loop started");
        let drought = Duration::from_millis(PULSE_WINDOW_MS);

        loop {
            tokio::select! {
                frame = self.frames.recv() => {
                    let Some(frame) = frame else { break };
                    let now = self.clock.now_ms();
                    let status = *self.status.borrow();
                    self.pipeline.on_frame(frame.as_ref(), now, status);
                    self.publish();
                }
                Some(command) = self.commands.recv() => {
                    self.handle_command(command);
                    self.publish();
                }
                // No frame for a whole pulse window: let pulses lapse
                _ = sleep(drought) => {
                    let before = self.pipeline.intent();
                    if self.pipeline.expire(self.clock.now_ms()) != before {
                        self.publish();
                    }
                }
                _ = shutdown.changed() => break,
            }
        }

        self.pipeline.stop(self.clock.now_ms());
        self.publish();
        info!("Gesture loop stopped");
    }

    fn handle_command(&mut self, command: GestureCommand) {
        match command {
            GestureCommand::StartCamera => {
                if let Err(e) = self.pipeline.start() {
                    warn!(error = %e, "Gesture control unavailable");
                }
            }
            GestureCommand::StopCamera => self.pipeline.stop(self.clock.now_ms()),
            GestureCommand::ToggleGesture => {
                self.pipeline.toggle();
            }
            GestureCommand::SetSensitivity(value) => self.pipeline.set_sensitivity(value),
            GestureCommand::UpdateGesture(config) => self.pipeline.update_config(config),
            GestureCommand::UpdateControl(control) => self.pipeline.set_control_config(control),
        }
    }

    fn publish(&mut self) {
        self.control_tx.send_replace(Arc::new(self.pipeline.snapshot()));
    }
}

/// Running runtime: shared state plus the task handles
pub struct Runtime {
    pub state: AppState,
    shutdown_tx: watch::Sender<bool>,
    game_task: JoinHandle<Arc<GameSnapshot>>,
    gesture_task: JoinHandle<()>,
}

impl Runtime {
    /// Build both loops and spawn them on the current tokio runtime
    pub fn spawn(config: Config, camera: CameraHandle, submitter: Arc<dyn ScoreSubmitter>) -> Self {
        Self::spawn_with_tuning(config, camera, submitter, SessionTuning::default())
    }

    pub fn spawn_with_tuning(
        config: Config,
        camera: CameraHandle,
        submitter: Arc<dyn ScoreSubmitter>,
        tuning: SessionTuning,
    ) -> Self {
        let config = Arc::new(config);
        let clock = MonotonicClock::new();

        let seed = config.game_seed.unwrap_or_else(rand::random);
        let session = GameSession::with_tuning(seed, tuning);
        let pipeline = GesturePipeline::new(
            config.gesture.clone(),
            config.control.clone(),
            camera.clone(),
        );

        let (frames_tx, frames_rx) = mpsc::channel(FRAME_QUEUE);
        let (session_cmd_tx, session_cmd_rx) = mpsc::channel(COMMAND_QUEUE);
        let (gesture_cmd_tx, gesture_cmd_rx) = mpsc::channel(COMMAND_QUEUE);
        let (status_tx, status_rx) = watch::channel(session.status());
        let (control_tx, control_rx) = watch::channel(Arc::new(pipeline.snapshot()));
        let (snapshot_tx, snapshot_rx) =
            watch::channel(Arc::new(GameSnapshot::capture(&session, Vec::new())));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let game_loop = GameLoop {
            session,
            clock,
            commands: session_cmd_rx,
            control: control_rx.clone(),
            status_tx,
            snapshot_tx,
            submitter,
            stats: SnapshotStats::default(),
        };
        let gesture_loop = GestureLoop {
            pipeline,
            clock,
            frames: frames_rx,
            commands: gesture_cmd_rx,
            status: status_rx,
            control_tx,
        };

        let game_task = tokio::spawn(game_loop.run(shutdown_rx.clone()));
        let gesture_task = tokio::spawn(gesture_loop.run(shutdown_rx));

        let state = AppState {
            config,
            clock,
            camera,
            frames: frames_tx,
            session_commands: session_cmd_tx,
            gesture_commands: gesture_cmd_tx,
            game: snapshot_rx,
            control: control_rx,
        };

        Self {
            state,
            shutdown_tx,
            game_task,
            gesture_task,
        }
    }

    /// Stop both loops and return the last published game snapshot
    pub async fn shutdown(self) -> Arc<GameSnapshot> {
        let _ = self.shutdown_tx.send(true);
        let fallback = self.state.game_snapshot();

        if let Err(e) = self.gesture_task.await {
            warn!(error = %e, "Gesture loop task failed");
        }
        let last = match self.game_task.await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Game loop task failed");
                fallback
            }
        };

        info!(
            score = last.state.score,
            elapsed = %format_elapsed(last.state.elapsed_ms),
            phase = %last.phase,
            "Runtime stopped"
        );
        last
    }
}
