//! Record audio and submit it for transcription.
//!
//! Records with a live input meter, submits the session to the Say2Text
//! server on Enter, and prints the transcript to stdout for piping (or
//! copies it to the clipboard). Supports external stop via SIGUSR1.

use crate::api::{ApiClient, AudioPayload, TranscriptionRecord};
use crate::clipboard::copy_to_clipboard;
use crate::config::Say2TextConfig;
use crate::recording::{AudioRecorder, RecordingCommand, RecordingTui};
use crate::ui::ErrorScreen;

/// Handles audio recording and submission for transcription.
///
/// # Errors
/// - If configuration cannot be loaded
/// - If recording cannot be started (e.g. microphone access denied)
/// - If the upload fails
pub async fn handle_record(clipboard: bool) -> Result<(), anyhow::Error> {
    tracing::info!("=== say2text Recorder Started ===");

    let config_data = match Say2TextConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load configuration: {err}");
            let error_message = format!(
                "Configuration Error:\n\n{err}\n\nPlease check your ~/.config/say2text/say2text.toml file and try again."
            );
            let mut error_screen = ErrorScreen::new()?;
            error_screen.show_error(&error_message)?;
            error_screen.cleanup()?;
            return Err(anyhow::anyhow!("Configuration error: {err}"));
        }
    };

    let api = ApiClient::new(&config_data.server)?;

    let mut recorder = AudioRecorder::new(
        config_data.audio.sample_rate,
        config_data.audio.device.clone(),
    );

    if let Err(e) = recorder.start() {
        tracing::error!("Failed to start recording: {}", e);
        let error_message = format!(
            "Recording Error:\n\n{e}\n\nPlease check your audio configuration and try again."
        );
        let mut error_screen = ErrorScreen::new()?;
        error_screen.show_error(&error_message)?;
        error_screen.cleanup()?;
        return Err(e);
    }

    let mut tui = RecordingTui::new(recorder.sample_rate())?;

    // SIGUSR1 stops the recording and submits it, for hotkey integrations
    let term = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGUSR1, term.clone())
        .map_err(|e| anyhow::anyhow!("Failed to register signal handler: {e}"))?;

    tracing::debug!("Entering recording loop. Press 'Enter' to transcribe or 'Escape'/'q' to cancel.");

    let mut should_transcribe = false;
    loop {
        if term.load(std::sync::atomic::Ordering::Relaxed) {
            tracing::info!("Received SIGUSR1: submitting via external trigger");
            should_transcribe = true;
            break;
        }

        match tui.handle_input()? {
            RecordingCommand::Continue => {
                tui.render_meter(&recorder.samples())?;
            }
            RecordingCommand::Transcribe => {
                should_transcribe = true;
                break;
            }
            RecordingCommand::Cancel => break,
        }
    }

    if !should_transcribe {
        // Drain the session so the device is released
        let _ = recorder.stop_to_wav();
        tui.cleanup()?;
        tracing::info!("Recording canceled");
        return Ok(());
    }

    let wav = match recorder.stop_to_wav() {
        Ok(wav) => wav,
        Err(e) => {
            tui.cleanup()?;
            let mut error_screen = ErrorScreen::new()?;
            error_screen.show_error(&format!("Recording failed:\n\n{e}"))?;
            error_screen.cleanup()?;
            return Err(e);
        }
    };

    match upload_with_gauge(&mut tui, &api, wav).await {
        Ok(record) => {
            tui.cleanup()?;

            if clipboard {
                if let Err(e) = copy_to_clipboard(&record.transcript) {
                    tracing::warn!("Failed to copy to clipboard: {e}");
                }
            } else {
                println!("{}", record.transcript);
            }

            tracing::info!("=== say2text Recorder Exited Successfully ===");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Transcription failed: {e}");
            tui.cleanup()?;
            let mut error_screen = ErrorScreen::new()?;
            error_screen.show_error(&format!("Upload/transcription failed:\n\n{e}"))?;
            error_screen.cleanup()?;
            Err(e)
        }
    }
}

/// Uploads the recording while rendering the progress gauge.
async fn upload_with_gauge(
    tui: &mut RecordingTui,
    api: &ApiClient,
    wav: Vec<u8>,
) -> anyhow::Result<TranscriptionRecord> {
    let (tx, rx) = std::sync::mpsc::channel::<u8>();
    let api = api.clone();

    let handle = tokio::spawn(async move {
        api.transcribe(AudioPayload::Buffer(wav), move |percent| {
            let _ = tx.send(percent);
        })
        .await
    });

    let mut progress = 0u8;
    loop {
        while let Ok(percent) = rx.try_recv() {
            progress = percent;
        }

        if let Err(e) = tui.render_upload(progress) {
            tracing::warn!("Failed to render upload gauge: {e}");
        }

        if handle.is_finished() {
            break;
        }

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    handle
        .await
        .map_err(|e| anyhow::anyhow!("Upload task failed: {e}"))?
}
