//! Landmark recording playback for headless runs
//!
//! A recording is NDJSON. Each line is either a bare frame (`null` or an array
//! of points), played at the nominal camera cadence, or an object
//! `{"t": <ms>, "landmarks": <frame>}` carrying its own offset.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use super::state::{AppState, DetectorFrame};
use crate::gesture::LandmarkFrame;

/// Cadence for lines without their own timestamp (~30 fps)
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 33;

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayFrame {
    /// Offset from the start of playback
    pub at_ms: u64,
    pub frame: DetectorFrame,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReplayLine {
    Timed {
        t: u64,
        landmarks: Option<LandmarkFrame>,
    },
    Bare(Option<LandmarkFrame>),
}

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("Failed to read recording: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid recording line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub fn parse<R: BufRead>(reader: R) -> Result<Vec<ReplayFrame>, ReplayError> {
    let mut frames: Vec<ReplayFrame> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parsed: ReplayLine = serde_json::from_str(line).map_err(|source| ReplayError::Parse {
            line: idx + 1,
            source,
        })?;

        let next_default = frames
            .last()
            .map(|f| f.at_ms + DEFAULT_FRAME_INTERVAL_MS)
            .unwrap_or(0);
        let frame = match parsed {
            ReplayLine::Timed { t, landmarks } => ReplayFrame {
                at_ms: t,
                frame: landmarks,
            },
            ReplayLine::Bare(frame) => ReplayFrame {
                at_ms: next_default,
                frame,
            },
        };
        frames.push(frame);
    }

    Ok(frames)
}

pub fn load(path: &Path) -> Result<Vec<ReplayFrame>, ReplayError> {
    let frames = parse(BufReader::new(File::open(path)?))?;
    info!(path = %path.display(), frames = frames.len(), "Loaded landmark recording");
    Ok(frames)
}

/// Push every frame into the pipeline at its recorded offset
pub async fn play(state: AppState, frames: Vec<ReplayFrame>) {
    let start = Instant::now();
    let total = frames.len();
    let mut dropped = 0usize;

    for replay in frames {
        sleep_until(start + Duration::from_millis(replay.at_ms)).await;
        if !state.push_frame(replay.frame) {
            dropped += 1;
        }
    }

    debug!(total, dropped, "Recording finished");
    info!(frames = total, "Landmark replay complete");
}
