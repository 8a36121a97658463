//! Gesture Shooter - headless driver
//!
//! Runs the game loop and gesture pipeline without a renderer:
//! - optional replay of a recorded landmark stream
//! - fire-and-forget score submission on game over
//! - final snapshot logged on shutdown

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gesture_shooter::app::{replay, GestureCommand, Runtime, SessionCommand};
use gesture_shooter::camera::CameraHandle;
use gesture_shooter::config::Config;
use gesture_shooter::game::{GameSnapshot, SessionPhase};
use gesture_shooter::scoring;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting Gesture Shooter");
    info!(
        threshold = config.gesture.confidence_threshold,
        sensitivity = config.control.sensitivity,
        seed = ?config.game_seed,
        "Configuration loaded"
    );

    let recording = match &config.landmark_replay_path {
        Some(path) => Some(replay::load(path)?),
        None => None,
    };

    let submitter = scoring::submitter_from_config(&config);
    let camera = CameraHandle::null();
    camera.subscribe(|status| info!(?status, "Camera status changed"));

    let runtime = Runtime::spawn(config, camera, submitter);
    let state = runtime.state.clone();

    state.gesture(GestureCommand::StartCamera).await;
    state.session(SessionCommand::Start).await;

    if let Some(frames) = recording {
        tokio::spawn(replay::play(state.clone(), frames));
    } else {
        warn!("No LANDMARK_REPLAY_PATH set, running without gesture input");
    }

    tokio::select! {
        _ = shutdown_signal() => {}
        _ = game_over(state.game.clone()) => {
            info!("Session ended, shutting down");
        }
    }

    let last = runtime.shutdown().await;
    info!(snapshot = %serde_json::to_string(&*last)?, "Final snapshot");

    info!("Shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Resolves once the published session reaches `Ended`
async fn game_over(mut snapshots: watch::Receiver<Arc<GameSnapshot>>) {
    loop {
        if snapshots.borrow_and_update().phase == SessionPhase::Ended {
            return;
        }
        if snapshots.changed().await.is_err() {
            return;
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
