//! Scoring backend REST client

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Path of the submission endpoint under the backend base URL
pub const SUBMIT_PATH: &str = "/api/game/submit";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub device_id: String,
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResult {
    pub record_id: String,
    pub is_new_best: bool,
    pub current_best: u64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<SubmitResult>,
}

/// Client for the scoring backend
#[derive(Clone)]
pub struct ScoreClient {
    client: Client,
    base_url: String,
}

impl ScoreClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ScoreError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn submit_url(&self) -> String {
        format!("{}{}", self.base_url, SUBMIT_PATH)
    }

    /// POST one final score
    pub async fn submit(&self, request: &SubmitRequest) -> Result<SubmitResponse, ScoreError> {
        let response = self
            .client
            .post(self.submit_url())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(ScoreError::Request)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ScoreError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(ScoreError::Parse)
    }
}

/// Score submission errors
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_camel_case() {
        let request = SubmitRequest {
            device_id: "0f".repeat(16),
            score: 120,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["deviceId"], "0f".repeat(16));
        assert_eq!(json["score"], 120);
    }

    #[test]
    fn response_parses_with_and_without_data() {
        let ok: SubmitResponse = serde_json::from_str(
            r#"{"success":true,"data":{"recordId":"r1","isNewBest":true,"currentBest":300,"message":"New record"},"timestamp":1}"#,
        )
        .unwrap();
        let data = ok.data.unwrap();
        assert!(data.is_new_best);
        assert_eq!(data.current_best, 300);

        let bare: SubmitResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!bare.success);
        assert!(bare.data.is_none());
    }

    #[test]
    fn submit_url_joins_base() {
        let client = ScoreClient::new("http://localhost:3000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.submit_url(), "http://localhost:3000/api/game/submit");
    }
}
