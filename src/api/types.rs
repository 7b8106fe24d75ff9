//! Wire types shared between the client and the Say2Text server.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Synthetic filename used when uploading an in-memory recording buffer.
pub const RECORDING_FILE_NAME: &str = "recording.wav";

/// Content type for in-memory recording buffers.
pub const RECORDING_MIME_TYPE: &str = "audio/wav";

/// One stored transcription, as returned by the server.
///
/// Field names follow the server's JSON shape (`_id`, `mimeType`,
/// `createdAt`); serde renames map them to Rust conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionRecord {
    /// Opaque server-assigned identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// The transcribed text
    pub transcript: String,
    /// MIME type of the source audio, if the server recorded one
    #[serde(rename = "mimeType", default)]
    pub mime_type: Option<String>,
    /// Size of the source audio in bytes
    #[serde(default)]
    pub size: Option<u64>,
    /// When the server created this record
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl TranscriptionRecord {
    /// MIME type for display, falling back to "audio" when the server
    /// didn't record one.
    pub fn mime_type_label(&self) -> &str {
        self.mime_type.as_deref().unwrap_or("audio")
    }

    /// Creation timestamp formatted in the user's local time.
    pub fn created_at_local(&self) -> String {
        self.created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }
}

/// Audio to be submitted for transcription.
///
/// A buffer is what microphone capture produces; it is uploaded under the
/// synthetic filename [`RECORDING_FILE_NAME`] with a fixed content type.
/// A file keeps its own name and an extension-derived MIME type.
#[derive(Debug, Clone)]
pub enum AudioPayload {
    /// In-memory audio (WAV-encoded microphone capture)
    Buffer(Vec<u8>),
    /// Existing audio file on disk
    File(PathBuf),
}

impl AudioPayload {
    /// Resolves the payload to raw bytes plus the filename and MIME type
    /// to use in the multipart form.
    ///
    /// # Errors
    /// - If a file payload cannot be read from disk
    pub fn into_parts(self) -> anyhow::Result<(Vec<u8>, String, String)> {
        match self {
            AudioPayload::Buffer(data) => Ok((
                data,
                RECORDING_FILE_NAME.to_string(),
                RECORDING_MIME_TYPE.to_string(),
            )),
            AudioPayload::File(path) => {
                let data = std::fs::read(&path).map_err(|e| {
                    anyhow::anyhow!("Failed to read audio file '{}': {e}", path.display())
                })?;
                let file_name = path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string();
                let mime = mime_for_extension(
                    path.extension().and_then(|e| e.to_str()).unwrap_or(""),
                );
                Ok((data, file_name, mime.to_string()))
            }
        }
    }
}

/// Maps a file extension to the MIME type sent in the multipart form.
///
/// The server only uses this for record metadata, so an imperfect guess is
/// harmless; unknown extensions fall back to a generic binary type.
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "ogg" | "oga" => "audio/ogg",
        "webm" => "audio/webm",
        "flac" => "audio/flac",
        "m4a" | "mp4" => "audio/mp4",
        "aac" => "audio/aac",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_deserializes_server_shape() {
        let json = r#"{
            "_id": "65f1c0ffee",
            "transcript": "hello",
            "mimeType": "audio/webm",
            "size": 3,
            "createdAt": "2026-01-15T10:30:00.000Z"
        }"#;

        let record: TranscriptionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "65f1c0ffee");
        assert_eq!(record.transcript, "hello");
        assert_eq!(record.mime_type.as_deref(), Some("audio/webm"));
        assert_eq!(record.size, Some(3));
        assert_eq!(record.mime_type_label(), "audio/webm");
    }

    #[test]
    fn record_tolerates_missing_optional_fields() {
        let json = r#"{
            "_id": "1",
            "transcript": "hi",
            "createdAt": "2026-01-15T10:30:00Z"
        }"#;

        let record: TranscriptionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.mime_type, None);
        assert_eq!(record.size, None);
        assert_eq!(record.mime_type_label(), "audio");
    }

    #[test]
    fn buffer_payload_gets_synthetic_name_and_type() {
        let (data, name, mime) = AudioPayload::Buffer(vec![1, 2, 3]).into_parts().unwrap();
        assert_eq!(data, vec![1, 2, 3]);
        assert_eq!(name, RECORDING_FILE_NAME);
        assert_eq!(mime, RECORDING_MIME_TYPE);
    }

    #[test]
    fn file_payload_keeps_its_name() {
        let path = std::env::temp_dir().join("say2text_payload_test.mp3");
        std::fs::write(&path, b"abc").unwrap();

        let (data, name, mime) = AudioPayload::File(path.clone()).into_parts().unwrap();
        assert_eq!(data, b"abc");
        assert_eq!(name, "say2text_payload_test.mp3");
        assert_eq!(mime, "audio/mpeg");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_payload_errors() {
        let path = std::env::temp_dir().join("say2text_does_not_exist.wav");
        assert!(AudioPayload::File(path).into_parts().is_err());
    }

    #[test]
    fn mime_guess_covers_common_audio_extensions() {
        assert_eq!(mime_for_extension("WAV"), "audio/wav");
        assert_eq!(mime_for_extension("webm"), "audio/webm");
        assert_eq!(mime_for_extension("xyz"), "application/octet-stream");
    }
}
