//! Error types for the query service client.

#[derive(Debug, thiserror::Error)]
pub enum QueryApiError {
    #[error("Query service rejected the request: {0}")]
    Rejected(String),
    #[error("Failed to parse query service response")]
    ParseFailed {
        status: u16,
        url: String,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    RequestFailed(#[from] anyhow::Error),
}
