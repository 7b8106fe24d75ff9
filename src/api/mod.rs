//! HTTP client for the Say2Text transcription server.
//!
//! Wraps the server's REST contract in three thin operations: submit audio
//! for transcription (multipart upload with a progress observer), list all
//! stored transcriptions, and delete one by id. All persistence is owned by
//! the server; this module holds no state beyond the configured base URL.

pub mod client;
pub mod progress;
pub mod types;

pub use client::ApiClient;
pub use types::{AudioPayload, TranscriptionRecord};
