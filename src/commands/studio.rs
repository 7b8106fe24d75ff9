//! Interactive studio screen.
//!
//! The controller behind the default command: owns the microphone capture
//! lifecycle and the upload lifecycle, mutates the application state, and
//! drives the studio TUI. At most one upload is in flight at a time; the
//! record key is ignored while uploading.

use std::sync::mpsc::Receiver;
use tokio::task::JoinHandle;

use crate::api::{ApiClient, AudioPayload, TranscriptionRecord};
use crate::clipboard::copy_to_clipboard;
use crate::config::Say2TextConfig;
use crate::recording::AudioRecorder;
use crate::studio::{StudioCommand, StudioState, StudioTui};
use crate::ui::ErrorScreen;

/// An in-flight upload: the transcription task plus its progress channel.
type UploadTask = (
    JoinHandle<anyhow::Result<TranscriptionRecord>>,
    Receiver<u8>,
);

/// Runs the interactive studio screen.
///
/// # Errors
/// - If configuration cannot be loaded
/// - If the terminal UI cannot be initialized
pub async fn handle_studio() -> Result<(), anyhow::Error> {
    tracing::info!("=== say2text Studio Started ===");

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

    tracing::info!(
        "Configuration loaded: server={}, device={}, sample_rate={}Hz",
        config_data.server.base_url,
        config_data.audio.device,
        config_data.audio.sample_rate
    );

    let api = ApiClient::new(&config_data.server)?;
    let mut recorder = AudioRecorder::new(
        config_data.audio.sample_rate,
        config_data.audio.device.clone(),
    );

    let mut state = StudioState::new();
    let mut tui = StudioTui::new()?;

    // Load history from the server once at startup; on failure the history
    // stays empty and the user is told why.
    match api.list().await {
        Ok(records) => state.set_history(records),
        Err(e) => {
            tracing::error!("Failed to load history: {e}");
            tui.show_error(&format!("Failed to load history:\n\n{e}"))?;
        }
    }

    let mut upload: Option<UploadTask> = None;

    loop {
        if state.recording {
            tui.update_meter(&recorder.samples());
        }

        tui.draw(&state)?;

        let upload_finished = match &mut upload {
            Some((handle, progress_rx)) => {
                while let Ok(percent) = progress_rx.try_recv() {
                    state.set_progress(percent);
                }
                handle.is_finished()
            }
            None => false,
        };

        if upload_finished {
            if let Some((handle, _progress_rx)) = upload.take() {
                match handle.await {
                    Ok(Ok(record)) => {
                        tracing::info!("Upload succeeded: record {}", record.id);
                        state.finish_upload_success(record);
                        tui.notify("Transcribed!");
                    }
                    Ok(Err(e)) => {
                        tracing::error!("Upload failed: {e}");
                        state.finish_upload_failure();
                        tui.show_error(&format!("Upload/transcription failed:\n\n{e}"))?;
                    }
                    Err(e) => {
                        tracing::error!("Upload task panicked: {e}");
                        state.finish_upload_failure();
                        tui.show_error(&format!("Upload task failed: {e}"))?;
                    }
                }
            }
        }

        match tui.handle_input()? {
            StudioCommand::Continue => {}
            StudioCommand::ToggleRecord => {
                handle_toggle_record(&mut state, &mut recorder, &mut tui, &api, &mut upload)?;
            }
            StudioCommand::MoveUp => tui.move_up(),
            StudioCommand::MoveDown => tui.move_down(),
            StudioCommand::View => {
                if let Some(index) = tui.highlighted() {
                    if let Some(record) = state.history().get(index) {
                        let id = record.id.clone();
                        state.select(&id);
                    }
                }
            }
            StudioCommand::Copy => {
                if let Err(e) = copy_to_clipboard(state.display_text()) {
                    tracing::warn!("Failed to copy to clipboard: {e}");
                }
                tui.notify("Copied to clipboard!");
            }
            StudioCommand::Delete => {
                if let Some(index) = tui.highlighted() {
                    if let Some(record) = state.history().get(index) {
                        let id = record.id.clone();
                        match api.delete(&id).await {
                            Ok(()) => {
                                state.remove(&id);
                                tui.notify("Deleted");
                            }
                            Err(e) => {
                                // Local list stays unchanged on failure
                                tracing::error!("Delete failed: {e}");
                                tui.show_error(&format!("Delete failed:\n\n{e}"))?;
                            }
                        }
                    }
                }
            }
            StudioCommand::Clear => {
                state.clear();
                tui.notify("History cleared (server records kept)");
            }
            StudioCommand::Quit => {
                if state.upload.uploading {
                    tracing::info!("Exiting with an upload still in flight; it is abandoned");
                }
                break;
            }
        }
    }

    // Release the capture device if a session was still running
    if recorder.is_active() {
        let _ = recorder.stop_to_wav();
    }

    tui.cleanup()?;
    tracing::info!("=== say2text Studio Exited ===");
    Ok(())
}

/// Starts or stops a recording session.
///
/// Stopping a session encodes it as WAV and begins the upload. The key is
/// ignored while an upload is in flight.
fn handle_toggle_record(
    state: &mut StudioState,
    recorder: &mut AudioRecorder,
    tui: &mut StudioTui,
    api: &ApiClient,
    upload: &mut Option<UploadTask>,
) -> anyhow::Result<()> {
    if state.upload.uploading {
        tracing::debug!("Record toggled while uploading; ignored");
        return Ok(());
    }

    if state.recording {
        state.recording = false;
        tui.end_recording_meter();

        match recorder.stop_to_wav() {
            Ok(wav) => {
                if state.begin_upload() {
                    *upload = Some(spawn_upload(api, wav));
                }
            }
            Err(e) => {
                tracing::warn!("Recording produced no audio: {e}");
                tui.show_error(&format!("Recording failed:\n\n{e}"))?;
            }
        }
    } else {
        match recorder.start() {
            Ok(()) => {
                state.recording = true;
                tui.begin_recording_meter(recorder.sample_rate());
            }
            Err(e) => {
                // Mic denial: report and stay idle
                tracing::error!("Failed to start recording: {e}");
                tui.show_error(&format!("Microphone access denied or unavailable:\n\n{e}"))?;
            }
        }
    }

    Ok(())
}

/// Spawns the upload as a background task so the UI stays responsive.
///
/// Progress percentages flow back through a channel drained by the studio
/// loop.
fn spawn_upload(api: &ApiClient, wav: Vec<u8>) -> UploadTask {
    let (tx, rx) = std::sync::mpsc::channel::<u8>();
    let api = api.clone();

    let handle = tokio::spawn(async move {
        api.transcribe(AudioPayload::Buffer(wav), move |percent| {
            let _ = tx.send(percent);
        })
        .await
    });

    (handle, rx)
}
