//! Publishing snapshots to the upload endpoint.
//!
//! A publish is a single `POST` of `{"data": "<data url>"}` with
//! `Content-Type: application/json`; the endpoint answers with
//! `{"data": "<public url>"}` on success. Exactly one request is made per
//! call, with no retry. Failures are typed: anything that keeps the request
//! from completing is [`Error::Transport`], an answer outside the expected
//! shape (non-2xx status, malformed JSON, missing `data` field) is
//! [`Error::Protocol`].

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;
use crate::{Error, Result};

/// Configuration for the publisher
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Upload endpoint URL
    pub endpoint: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// User agent string to send with requests
    pub user_agent: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:3000/api/upload".to_string(),
            timeout_ms: 30000,
            user_agent: format!("pixpost/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// A public URL naming a stored snapshot, as returned by the endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedLink {
    pub url: String,
}

#[derive(Serialize)]
struct UploadRequest<'a> {
    data: &'a str,
}

#[derive(Deserialize)]
struct UploadResponse {
    data: Option<String>,
}

/// Publishes snapshots to a configured upload endpoint
pub struct Publisher {
    client: Client,
    config: PublishConfig,
}

impl Publisher {
    pub fn new(config: PublishConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// The endpoint this publisher posts to
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Upload a snapshot and return the public URL the endpoint stored it at
    pub fn publish(&self, snapshot: &Snapshot) -> Result<PublishedLink> {
        let body = serde_json::to_string(&UploadRequest {
            data: &snapshot.to_data_url(),
        })
        .map_err(|e| Error::Encode(format!("failed to serialize upload request: {}", e)))?;

        debug!(
            "publishing {}x{} snapshot ({} bytes PNG) to {}",
            snapshot.width,
            snapshot.height,
            snapshot.png_data.len(),
            self.config.endpoint
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json")
            .header("User-Agent", self.config.user_agent.clone())
            .body(body)
            .send()
            .map_err(|e| Error::Transport(format!("upload request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Protocol(format!(
                "upload endpoint returned {}",
                status
            )));
        }

        let text = response
            .text()
            .map_err(|e| Error::Transport(format!("failed to read response body: {}", e)))?;

        let parsed: UploadResponse = serde_json::from_str(&text)
            .map_err(|e| Error::Protocol(format!("malformed upload response: {}", e)))?;

        let url = parsed
            .data
            .ok_or_else(|| Error::Protocol("response missing `data` field".to_string()))?;

        debug!("snapshot published at {}", url);
        Ok(PublishedLink { url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PublishConfig::default();
        assert!(config.endpoint.ends_with("/api/upload"));
        assert_eq!(config.timeout_ms, 30000);
        assert!(config.user_agent.starts_with("pixpost/"));
    }

    #[test]
    fn upload_request_wire_shape() {
        let json = serde_json::to_string(&UploadRequest { data: "data:image/png;base64,AA==" }).unwrap();
        assert_eq!(json, r#"{"data":"data:image/png;base64,AA=="}"#);
    }

    #[test]
    fn upload_response_tolerates_missing_field() {
        let parsed: UploadResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.data.is_none());
    }
}
