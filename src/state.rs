//! Application state shared across request handlers.

use std::sync::Arc;
use std::time::Instant;

use crate::dispatch::AnswerDispatcher;
use crate::providers::TranscriptionProvider;
use crate::query::QueryApi;

#[derive(Clone)]
pub struct AppState {
    pub query_api: Arc<QueryApi>,
    pub dispatcher: Arc<AnswerDispatcher>,
    pub transcriber: Arc<dyn TranscriptionProvider>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        query_api: Arc<QueryApi>,
        dispatcher: Arc<AnswerDispatcher>,
        transcriber: Arc<dyn TranscriptionProvider>,
    ) -> Self {
        Self {
            query_api,
            dispatcher,
            transcriber,
            started_at: Instant::now(),
        }
    }
}
