//! Client for the external spreadsheet-backed query service.
//!
//! The service owns question understanding and data lookup; this client
//! only speaks its fixed request/response contract and classifies the
//! envelope into a [`QueryOutcome`] for the dispatcher.

pub mod errors;
pub mod json;
pub mod models;

use std::time::Duration;

use anyhow::Context;
use serde_json::json;
use tracing::debug;

use crate::query::errors::QueryApiError;
use crate::query::json::parse_json_with_context;
use crate::query::models::{QueryOutcome, QueryResponse};

/// HTTP client for the query service.
pub struct QueryApi {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl QueryApi {
    pub fn new(base_url: String, api_key: Option<String>) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build query service HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
        })
    }

    /// Runs one structured query for a natural-language question.
    ///
    /// Exactly one upstream call per invocation; callers make at most one
    /// invocation per incoming request.
    pub async fn run_query(&self, question: &str) -> Result<QueryOutcome, QueryApiError> {
        let url = format!("{}/query", self.base_url);

        let mut request = self.client.post(&url).json(&json!({ "question": question }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Query service request to {url} failed"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read query service response body")?;

        if !status.is_success() {
            return Err(QueryApiError::Rejected(format!(
                "{} returned {status}: {}",
                url,
                body.chars().take(200).collect::<String>()
            )));
        }

        debug!(url = %url, bytes = body.len(), "query service responded");

        let envelope: QueryResponse =
            parse_json_with_context(&body).map_err(|source| QueryApiError::ParseFailed {
                status: status.as_u16(),
                url,
                source,
            })?;

        Ok(envelope.into_outcome())
    }
}
