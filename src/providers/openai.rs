//! OpenAI-compatible completion and transcription providers.
//!
//! Both speak the widely-cloned OpenAI REST shapes, so any compatible
//! gateway works by pointing the base URL at it.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::providers::{CompletionProvider, Transcript, TranscriptionProvider};

/// Connection settings shared by both provider implementations.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

pub struct OpenAiCompletion {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl OpenAiCompletion {
    pub fn new(config: ProviderConfig) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to build completion HTTP client")?;
        Ok(Self { client, config })
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[async_trait]
impl CompletionProvider for OpenAiCompletion {
    async fn complete(&self, system: &str, user: &str) -> Result<String, anyhow::Error> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&json!({
                "model": self.config.model,
                "messages": [
                    {"role": "system", "content": system},
                    {"role": "user", "content": user},
                ],
            }))
            .send()
            .await
            .with_context(|| format!("Completion request to {url} failed"))?
            .error_for_status()
            .context("Completion provider returned an error status")?;

        let body: ChatResponse = response
            .json()
            .await
            .context("Failed to parse completion response")?;

        let text = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        debug!(model = %self.config.model, chars = text.len(), "completion received");
        Ok(text)
    }
}

pub struct OpenAiTranscription {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl OpenAiTranscription {
    pub fn new(config: ProviderConfig) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to build transcription HTTP client")?;
        Ok(Self { client, config })
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
    #[serde(default)]
    segments: Vec<TranscriptionSegment>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionSegment {
    start: f64,
    end: f64,
    text: String,
}

#[async_trait]
impl TranscriptionProvider for OpenAiTranscription {
    async fn transcribe(
        &self,
        audio_path: &Path,
        file_name: &str,
    ) -> Result<Transcript, anyhow::Error> {
        let url = format!(
            "{}/audio/transcriptions",
            self.config.base_url.trim_end_matches('/')
        );

        let bytes = tokio::fs::read(audio_path)
            .await
            .with_context(|| format!("Failed to read spooled audio at {}", audio_path.display()))?;

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_owned());
        let form = reqwest::multipart::Form::new()
            .text("model", self.config.model.clone())
            .text("response_format", "verbose_json")
            .part("file", part);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("Transcription request to {url} failed"))?
            .error_for_status()
            .context("Transcription provider returned an error status")?;

        let body: TranscriptionResponse = response
            .json()
            .await
            .context("Failed to parse transcription response")?;

        debug!(model = %self.config.model, chars = body.text.len(), "transcription received");

        Ok(Transcript {
            text: body.text,
            segments: body
                .segments
                .into_iter()
                .map(|segment| crate::providers::TranscriptSegment {
                    start: segment.start,
                    end: segment.end,
                    text: segment.text,
                })
                .collect(),
        })
    }
}
