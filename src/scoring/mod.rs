//! Final score submission
//!
//! Submission is fire-and-forget: the game-over transition never waits on the
//! network, and failures are logged then dropped.

pub mod client;
pub mod device;

pub use client::{ScoreClient, ScoreError, SubmitRequest, SubmitResponse};

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::game::ScoreReport;

/// Receives the one score report of each finished session
pub trait ScoreSubmitter: Send + Sync {
    /// Must return immediately
    fn submit(&self, report: ScoreReport);
}

/// Used when no scoring backend is configured
pub struct NoopSubmitter;

impl ScoreSubmitter for NoopSubmitter {
    fn submit(&self, report: ScoreReport) {
        info!(
            session_id = %report.session_id,
            score = report.score,
            "Score submission disabled, result kept local"
        );
    }
}

/// Posts reports to the scoring backend on a spawned task
pub struct HttpScoreSubmitter {
    client: ScoreClient,
    device_id: String,
}

impl HttpScoreSubmitter {
    pub fn new(client: ScoreClient, device_id: String) -> Self {
        Self { client, device_id }
    }
}

impl ScoreSubmitter for HttpScoreSubmitter {
    fn submit(&self, report: ScoreReport) {
        let client = self.client.clone();
        let request = SubmitRequest {
            device_id: self.device_id.clone(),
            score: report.score,
        };

        tokio::spawn(async move {
            match client.submit(&request).await {
                Ok(response) => match response.data {
                    Some(result) if response.success && result.is_new_best => {
                        info!(
                            session_id = %report.session_id,
                            score = request.score,
                            best = result.current_best,
                            message = %result.message,
                            "New personal best"
                        );
                    }
                    Some(result) => {
                        info!(
                            session_id = %report.session_id,
                            record_id = %result.record_id,
                            best = result.current_best,
                            "Score submitted"
                        );
                    }
                    None => {
                        warn!(
                            session_id = %report.session_id,
                            success = response.success,
                            "Score submission returned no data"
                        );
                    }
                },
                Err(e) => {
                    warn!(session_id = %report.session_id, error = %e, "Score submission failed");
                }
            }
        });
    }
}

/// Build the submitter the configuration asks for. Falls back to the no-op
/// submitter when the backend or device id is unavailable.
pub fn submitter_from_config(config: &Config) -> Arc<dyn ScoreSubmitter> {
    let Some(url) = config.score_api_url.as_deref() else {
        return Arc::new(NoopSubmitter);
    };

    let client = match ScoreClient::new(url, config.score_submit_timeout) {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Failed to build score client, submission disabled");
            return Arc::new(NoopSubmitter);
        }
    };

    match device::load_or_create(&config.device_id_path) {
        Ok(device_id) => {
            info!(url = %client.submit_url(), "Score submission enabled");
            Arc::new(HttpScoreSubmitter::new(client, device_id))
        }
        Err(e) => {
            warn!(error = %e, "Failed to load device id, submission disabled");
            Arc::new(NoopSubmitter)
        }
    }
}
