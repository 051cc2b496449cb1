//! Application configuration, extracted from the environment via figment.
//!
//! Every provider endpoint and key is explicit configuration owned by the
//! app; nothing reads ambient globals after startup.

use serde::Deserialize;

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_shutdown_timeout() -> u64 {
    10
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_owned()
}

fn default_completion_model() -> String {
    "gpt-4o-mini".to_owned()
}

fn default_transcription_model() -> String {
    "whisper-1".to_owned()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Seconds to wait for in-flight requests on shutdown.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: u64,

    /// Base URL of the spreadsheet-backed query service.
    pub query_base_url: String,
    #[serde(default)]
    pub query_api_key: Option<String>,

    #[serde(default = "default_openai_base")]
    pub completion_base_url: String,
    pub completion_api_key: String,
    #[serde(default = "default_completion_model")]
    pub completion_model: String,

    #[serde(default = "default_openai_base")]
    pub transcription_base_url: String,
    /// Falls back to the completion key when unset.
    #[serde(default)]
    pub transcription_api_key: Option<String>,
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,
}

impl Config {
    pub fn transcription_key(&self) -> &str {
        self.transcription_api_key
            .as_deref()
            .unwrap_or(&self.completion_api_key)
    }
}
