use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

#[derive(Deserialize)]
pub struct ProcessVideoResponse {
    pub status: String,
    pub video_id: Option<String>,
    pub chunks: Option<u32>,
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    answer: Option<String>,
}

/// Client for the video-processing backend. Cheap to clone so request tasks
/// can own their own copy.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Ask the backend to fetch and index a video transcript. The response
    /// body carries its own status discriminator: anything but "ok" is an
    /// error, with the server's message when it supplies one.
    pub async fn process_video(&self, url: &str) -> Result<ProcessVideoResponse> {
        let endpoint = format!("{}/process_video", self.base_url);

        let response = self
            .client
            .post(&endpoint)
            .form(&[("url", url)])
            .send()
            .await?;

        let http_status = response.status();
        let body: ProcessVideoResponse = response.json().await?;

        if !http_status.is_success() || body.status != "ok" {
            tracing::warn!(
                "process_video rejected (http {}, status {:?})",
                http_status,
                body.status
            );
            return Err(anyhow!(body
                .message
                .unwrap_or_else(|| "Failed to process video".to_string())));
        }

        Ok(body)
    }

    /// Send a question about the processed video and return the answer text.
    /// The answer may be empty; the caller decides what to show then.
    pub async fn chat(&self, query: &str) -> Result<String> {
        let endpoint = format!("{}/chat", self.base_url);

        let response = self
            .client
            .post(&endpoint)
            .form(&[("query", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Chat request failed with status: {}", response.status()));
        }

        let chat_response: ChatResponse = response.json().await?;
        Ok(chat_response.answer.unwrap_or_default())
    }
}
