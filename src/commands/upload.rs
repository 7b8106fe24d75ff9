//! Submit an existing audio file for transcription.

use std::path::PathBuf;

use crate::api::{ApiClient, AudioPayload};
use crate::clipboard::copy_to_clipboard;
use crate::config::Say2TextConfig;

/// Uploads an audio file to the server and prints the transcript.
///
/// Progress is written to stderr so the transcript on stdout stays clean
/// for piping.
///
/// # Errors
/// - If configuration cannot be loaded
/// - If the file does not exist
/// - If the upload or transcription fails
pub async fn handle_upload(file: PathBuf, clipboard: bool) -> Result<(), anyhow::Error> {
    if !file.exists() {
        return Err(anyhow::anyhow!("Audio file not found: {}", file.display()));
    }

    let config_data = Say2TextConfig::load()?;
    let api = ApiClient::new(&config_data.server)?;

    tracing::info!("Uploading file for transcription: {}", file.display());

    let record = api
        .transcribe(AudioPayload::File(file), |percent| {
            eprint!("\rUploading... {percent:>3}%");
        })
        .await;
    eprintln!();

    let record = record?;

    if clipboard {
        if let Err(e) = copy_to_clipboard(&record.transcript) {
            tracing::warn!("Failed to copy to clipboard: {e}");
        }
        eprintln!("Transcript copied to clipboard.");
    } else {
        println!("{}", record.transcript);
    }

    Ok(())
}
