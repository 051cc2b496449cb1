//! Speech-to-text upload handler.

use axum::extract::{Multipart, State};
use axum::response::Json;
use serde::Serialize;
use std::io::Write;
use tracing::info;

use crate::providers::TranscriptSegment;
use crate::state::AppState;
use crate::web::error::{ApiError, ApiErrorCode, provider_error};

#[derive(Serialize)]
pub struct TranscribeResponse {
    pub text: String,
    pub segments: Vec<TranscriptSegment>,
}

/// `POST /api/transcribe`
///
/// Accepts a multipart upload with an `audio` (or `file`) part, spools it
/// to a temp file, and returns the transcription. The temp file lives in a
/// [`tempfile::NamedTempFile`] guard, so it is removed on every exit path.
pub(super) async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let mut audio: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        if name != "audio" && name != "file" {
            continue;
        }
        let file_name = field.file_name().unwrap_or("audio.webm").to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read audio upload: {e}")))?;
        audio = Some((file_name, bytes.to_vec()));
        break;
    }

    let Some((file_name, bytes)) = audio else {
        return Err(ApiError::new(
            ApiErrorCode::MissingAudio,
            "Upload must include an 'audio' file part",
        ));
    };
    if bytes.is_empty() {
        return Err(ApiError::new(
            ApiErrorCode::MissingAudio,
            "Uploaded audio file is empty",
        ));
    }

    // Dropping the guard deletes the file, success or failure.
    let mut temp = tempfile::NamedTempFile::new().map_err(|e| provider_error("Audio spooling", e))?;
    temp.write_all(&bytes)
        .and_then(|_| temp.flush())
        .map_err(|e| provider_error("Audio spooling", e))?;

    let transcript = state
        .transcriber
        .transcribe(temp.path(), &file_name)
        .await
        .map_err(|e| provider_error("Transcription", e))?;

    info!(
        bytes = bytes.len(),
        chars = transcript.text.len(),
        "audio transcribed"
    );

    Ok(Json(TranscribeResponse {
        text: transcript.text,
        segments: transcript.segments,
    }))
}
