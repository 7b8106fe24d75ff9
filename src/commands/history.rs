//! Browse server-side transcription history.
//!
//! Fetches the full list from the server and opens the interactive viewer.
//! Copying exits the viewer; deleting round-trips to the server and
//! re-opens the viewer with the updated list.

use crate::api::ApiClient;
use crate::clipboard::copy_to_clipboard;
use crate::config::Say2TextConfig;
use crate::history::{HistoryViewer, ViewerAction};
use crate::ui::ErrorScreen;

/// Displays the transcription history viewer.
///
/// # Errors
/// - If configuration cannot be loaded
/// - If the history cannot be fetched from the server
pub async fn handle_history() -> Result<(), anyhow::Error> {
    tracing::info!("=== say2text History Viewer ===");

    let config_data = Say2TextConfig::load()?;
    let api = ApiClient::new(&config_data.server)?;

    let mut records = api.list().await?;

    if records.is_empty() {
        println!("No transcriptions yet.");
        return Ok(());
    }

    loop {
        let mut viewer = HistoryViewer::new(records.clone())?;

        match viewer.run()? {
            ViewerAction::Copy(text) => {
                copy_to_clipboard(&text)?;
                tracing::info!("Selected transcript copied to clipboard");
                break;
            }
            ViewerAction::Delete(id) => match api.delete(&id).await {
                Ok(()) => {
                    records.retain(|r| r.id != id);
                    if records.is_empty() {
                        println!("History is now empty.");
                        break;
                    }
                }
                Err(e) => {
                    // Local list stays unchanged on failure
                    tracing::error!("Delete failed: {e}");
                    let mut error_screen = ErrorScreen::new()?;
                    error_screen.show_error(&format!("Delete failed:\n\n{e}"))?;
                    error_screen.cleanup()?;
                }
            },
            ViewerAction::Exit => {
                tracing::debug!("History viewer exited without selection");
                break;
            }
        }
    }

    tracing::debug!("History viewer closed");
    Ok(())
}
