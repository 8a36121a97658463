//! Configuration module - environment variable parsing and tunables

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Lowest accepted movement sensitivity
pub const MIN_SENSITIVITY: f32 = 0.1;
/// Highest accepted movement sensitivity
pub const MAX_SENSITIVITY: f32 = 3.0;

/// Tunables of the gesture stabilizer and hand smoother
#[derive(Clone, Debug, PartialEq)]
pub struct GestureConfig {
    /// Whether gestures drive the game at all
    pub enabled: bool,
    /// Events below this confidence are dropped
    pub confidence_threshold: f32,
    /// Debounce for labels without a dedicated window (ms)
    pub general_debounce_ms: u64,
    /// Base exponential smoothing factor for steady hand tracking
    pub smoothing_factor: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            confidence_threshold: 0.7,
            general_debounce_ms: 150,
            smoothing_factor: 0.15,
        }
    }
}

impl GestureConfig {
    /// Clamp values into their legal ranges
    pub fn normalized(mut self) -> Self {
        self.confidence_threshold = self.confidence_threshold.clamp(0.0, 1.0);
        self.smoothing_factor = self.smoothing_factor.clamp(0.01, 1.0);
        self
    }
}

/// Rectangle in game-space percent the player may move within
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Default for MovementBounds {
    fn default() -> Self {
        Self {
            min_x: 5.0,
            max_x: 95.0,
            min_y: 10.0,
            max_y: 90.0,
        }
    }
}

impl MovementBounds {
    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Result<Self, ConfigError> {
        let in_range = |v: f32| (0.0..=100.0).contains(&v);
        if !(min_x < max_x && min_y < max_y)
            || ![min_x, max_x, min_y, max_y].into_iter().all(in_range)
        {
            return Err(ConfigError::InvalidBounds);
        }
        Ok(Self {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    pub fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x.clamp(self.min_x, self.max_x),
            y.clamp(self.min_y, self.max_y),
        )
    }
}

/// Tunables of the control mapper
#[derive(Clone, Debug, PartialEq)]
pub struct ControlConfig {
    /// Movement sensitivity, always within [MIN_SENSITIVITY, MAX_SENSITIVITY]
    pub sensitivity: f32,
    pub bounds: MovementBounds,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            bounds: MovementBounds::default(),
        }
    }
}

pub fn clamp_sensitivity(sensitivity: f32) -> f32 {
    if sensitivity.is_nan() {
        return 1.0;
    }
    sensitivity.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY)
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    pub gesture: GestureConfig,
    pub control: ControlConfig,

    /// Seed for the session RNG; random when unset
    pub game_seed: Option<u64>,

    /// Scoring backend base URL; submission disabled when unset
    pub score_api_url: Option<String>,
    /// Timeout for one score submission
    pub score_submit_timeout: Duration,
    /// Where the device identifier is persisted
    pub device_id_path: PathBuf,

    /// NDJSON landmark recording replayed by the headless driver
    pub landmark_replay_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            gesture: GestureConfig::default(),
            control: ControlConfig::default(),
            game_seed: None,
            score_api_url: None,
            score_submit_timeout: Duration::from_millis(10_000),
            device_id_path: PathBuf::from(".device_id"),
            landmark_replay_path: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let gesture = GestureConfig {
            enabled: true,
            confidence_threshold: parse_var(
                "GESTURE_CONFIDENCE_THRESHOLD",
                defaults.gesture.confidence_threshold,
            )?,
            general_debounce_ms: parse_var(
                "GESTURE_DEBOUNCE_MS",
                defaults.gesture.general_debounce_ms,
            )?,
            smoothing_factor: parse_var(
                "GESTURE_SMOOTHING_FACTOR",
                defaults.gesture.smoothing_factor,
            )?,
        }
        .normalized();

        let control = ControlConfig {
            sensitivity: clamp_sensitivity(parse_var(
                "MOVEMENT_SENSITIVITY",
                defaults.control.sensitivity,
            )?),
            bounds: MovementBounds::default(),
        };

        let game_seed = match env::var("GAME_SEED") {
            Ok(raw) => Some(parse_value("GAME_SEED", &raw)?),
            Err(_) => None,
        };

        let timeout_ms: u64 = parse_var("SCORE_SUBMIT_TIMEOUT_MS", 10_000)?;

        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            gesture,
            control,
            game_seed,
            score_api_url: env::var("SCORE_API_URL")
                .ok()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            score_submit_timeout: Duration::from_millis(timeout_ms),
            device_id_path: env::var("DEVICE_ID_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.device_id_path),
            landmark_replay_path: env::var("LANDMARK_REPLAY_PATH").ok().map(PathBuf::from),
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        var: name,
        value: raw.to_string(),
    })
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for environment variable {var}")]
    Invalid { var: &'static str, value: String },

    #[error("Movement bounds must satisfy min < max inside 0..=100")]
    InvalidBounds,
}
