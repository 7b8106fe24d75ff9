//! REST client for the Say2Text transcription server.
//!
//! Implements the three calls of the server contract:
//! `POST /transcribe` (multipart upload), `GET /transcriptions`, and
//! `DELETE /transcriptions/{id}`. Server-provided error messages are
//! surfaced to the user when present.

use serde::Deserialize;

use super::progress::chunked_with_progress;
use super::types::{AudioPayload, TranscriptionRecord};
use crate::config::ServerConfig;

/// Error body shape the server uses for failed requests: `{"error": "..."}`.
#[derive(Debug, Deserialize)]
struct ServerError {
    error: String,
}

/// Client for the Say2Text server REST API.
///
/// Cheap to clone; the underlying `reqwest::Client` shares its connection
/// pool across clones. All requests carry the configured timeout so a hung
/// server cannot leave an upload pending forever.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the configured server.
    ///
    /// # Errors
    /// - If the HTTP client cannot be constructed
    pub fn new(server: &ServerConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(server.request_timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            http,
            base_url: server.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Submits audio for transcription and returns the created record.
    ///
    /// The payload is sent as the multipart form field `audio`. In-memory
    /// buffers are wrapped with a synthetic filename and a fixed content
    /// type; files keep their own name. The progress observer receives
    /// upload percentages (0–100) zero or more times before completion.
    ///
    /// # Errors
    /// - If a file payload cannot be read
    /// - If the request fails due to network issues
    /// - If the server rejects the upload (its error message is surfaced)
    /// - If the response cannot be parsed as a transcription record
    pub async fn transcribe<F>(
        &self,
        payload: AudioPayload,
        on_progress: F,
    ) -> anyhow::Result<TranscriptionRecord>
    where
        F: Fn(u8) + Send + 'static,
    {
        let (data, file_name, mime_type) = payload.into_parts()?;
        let total_bytes = data.len() as u64;

        tracing::info!(
            "Uploading '{}' ({} bytes, {}) for transcription",
            file_name,
            total_bytes,
            mime_type
        );

        let body = reqwest::Body::wrap_stream(chunked_with_progress(data, on_progress));
        let part = reqwest::multipart::Part::stream_with_length(body, total_bytes)
            .file_name(file_name)
            .mime_str(&mime_type)
            .map_err(|e| anyhow::anyhow!("Failed to create upload form part: {e}"))?;
        let form = reqwest::multipart::Form::new().part("audio", part);

        let url = format!("{}/transcribe", self.base_url);
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!(describe_network_error(&e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(extract_server_error(
                status.as_u16(),
                &body,
                "Upload/transcription failed",
            )));
        }

        let record: TranscriptionRecord = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse transcription response: {e}"))?;

        tracing::info!(
            "Transcription created: id={}, {} characters",
            record.id,
            record.transcript.len()
        );

        Ok(record)
    }

    /// Fetches all stored transcriptions, in server-defined order.
    ///
    /// # Errors
    /// - If the request fails due to network issues
    /// - If the server returns an error status
    /// - If the response cannot be parsed
    pub async fn list(&self) -> anyhow::Result<Vec<TranscriptionRecord>> {
        let url = format!("{}/transcriptions", self.base_url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!(describe_network_error(&e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(extract_server_error(
                status.as_u16(),
                &body,
                "Failed to load history",
            )));
        }

        let records: Vec<TranscriptionRecord> = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse transcription list: {e}"))?;

        tracing::debug!("Loaded {} transcriptions from server", records.len());
        Ok(records)
    }

    /// Deletes one transcription by id.
    ///
    /// # Errors
    /// - If the request fails due to network issues
    /// - If the server returns an error status
    pub async fn delete(&self, id: &str) -> anyhow::Result<()> {
        let url = format!(
            "{}/transcriptions/{}",
            self.base_url,
            urlencoding::encode(id)
        );

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!(describe_network_error(&e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(extract_server_error(
                status.as_u16(),
                &body,
                "Delete failed",
            )));
        }

        tracing::info!("Deleted transcription {id}");
        Ok(())
    }
}

/// Maps a reqwest transport error to a human-readable message.
fn describe_network_error(e: &reqwest::Error) -> String {
    if e.is_connect() {
        "Failed to connect to the Say2Text server. Is it running and is the base URL correct?"
            .to_string()
    } else if e.is_timeout() {
        "Request to the Say2Text server timed out. The server is not responding.".to_string()
    } else {
        format!("Say2Text server network error: {e}")
    }
}

/// Extracts the server-provided error message from a failed response body,
/// falling back to a generic message with the status code.
fn extract_server_error(status: u16, body: &str, fallback: &str) -> String {
    match serde_json::from_str::<ServerError>(body) {
        Ok(server_error) if !server_error.error.trim().is_empty() => server_error.error,
        _ => format!("{fallback} (server returned status {status})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    #[test]
    fn server_error_message_is_surfaced() {
        let message =
            extract_server_error(422, r#"{"error": "Unsupported audio format"}"#, "Upload failed");
        assert_eq!(message, "Unsupported audio format");
    }

    #[test]
    fn malformed_error_body_falls_back_to_generic_message() {
        let message = extract_server_error(500, "<html>Internal Server Error</html>", "Upload failed");
        assert_eq!(message, "Upload failed (server returned status 500)");
    }

    #[test]
    fn empty_error_field_falls_back_to_generic_message() {
        let message = extract_server_error(400, r#"{"error": "  "}"#, "Delete failed");
        assert_eq!(message, "Delete failed (server returned status 400)");
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new(&ServerConfig {
            base_url: "http://localhost:5000/api/".to_string(),
            request_timeout_secs: 30,
        })
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:5000/api");
    }
}
