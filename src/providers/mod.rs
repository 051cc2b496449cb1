//! Injected provider interfaces for text completion and transcription.
//!
//! The dispatcher and the transcription endpoint only ever see these
//! traits, so swapping providers (or stubbing them in tests) never touches
//! request handling.

pub mod openai;

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Generates an answer from a system instruction plus a user prompt.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, anyhow::Error>;
}

/// One timed span of transcribed speech.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Transcription result: full text plus optional per-segment timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

/// Converts an uploaded audio file into text.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    async fn transcribe(
        &self,
        audio_path: &Path,
        file_name: &str,
    ) -> Result<Transcript, anyhow::Error>;
}
