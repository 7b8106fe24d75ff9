//! Application state for the studio screen.
//!
//! One explicit state object owns the transcription history, the current
//! selection, the transient upload state, and the transcript viewer text.
//! All mutation goes through methods on [`StudioState`]; the presentation
//! layer only reads it.
//!
//! Invariants upheld here:
//! - the selected id, when set, always references a record in the history;
//! - the upload progress stays within 0–100;
//! - history order is most recent first (new records are prepended).

use crate::api::TranscriptionRecord;

/// Transcript viewer text shown when no transcription is displayed.
pub const PLACEHOLDER_TEXT: &str = "Your transcribed text will appear here...";

/// Transcript viewer text shown while an upload is in flight.
pub const TRANSCRIBING_TEXT: &str = "Transcribing... please wait...";

/// Transient upload status. Reset to idle after every attempt, whatever
/// the outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadState {
    /// Whether an upload is currently in flight
    pub uploading: bool,
    /// Upload progress percentage (0–100), meaningful only while uploading
    pub progress: u8,
}

/// State for the studio screen: history, selection, upload, and viewer text.
#[derive(Debug, Clone)]
pub struct StudioState {
    history: Vec<TranscriptionRecord>,
    selected: Option<String>,
    display_text: String,
    /// Whether a microphone capture session is active
    pub recording: bool,
    /// Transient upload status
    pub upload: UploadState,
}

impl StudioState {
    /// Creates an empty state with the placeholder transcript.
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            selected: None,
            display_text: PLACEHOLDER_TEXT.to_string(),
            recording: false,
            upload: UploadState::default(),
        }
    }

    /// Replaces the history with records loaded from the server.
    ///
    /// Server ordering is kept as-is. Selection is cleared since the old
    /// selected id may no longer exist.
    pub fn set_history(&mut self, records: Vec<TranscriptionRecord>) {
        tracing::debug!("History loaded: {} records", records.len());
        self.history = records;
        self.selected = None;
    }

    /// The history records, most recent first.
    pub fn history(&self) -> &[TranscriptionRecord] {
        &self.history
    }

    /// The id of the record shown in the transcript viewer, if any.
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The current transcript viewer text.
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Marks the start of an upload attempt.
    ///
    /// Returns false (and changes nothing) if an upload is already in
    /// flight; only one upload may be pending at a time.
    pub fn begin_upload(&mut self) -> bool {
        if self.upload.uploading {
            tracing::warn!("Upload requested while another is in flight; ignored");
            return false;
        }
        self.upload = UploadState {
            uploading: true,
            progress: 0,
        };
        self.display_text = TRANSCRIBING_TEXT.to_string();
        true
    }

    /// Updates upload progress. Values above 100 are clamped.
    pub fn set_progress(&mut self, percent: u8) {
        if self.upload.uploading {
            self.upload.progress = percent.min(100);
        }
    }

    /// Applies a successful upload: the new record is prepended to the
    /// history, becomes selected, and its transcript is displayed. Upload
    /// state resets to idle.
    pub fn finish_upload_success(&mut self, record: TranscriptionRecord) {
        self.display_text = record.transcript.clone();
        self.selected = Some(record.id.clone());
        self.history.insert(0, record);
        self.upload = UploadState::default();
    }

    /// Applies a failed upload: the viewer reverts to the placeholder and
    /// upload state resets to idle. History and selection are untouched.
    pub fn finish_upload_failure(&mut self) {
        self.display_text = PLACEHOLDER_TEXT.to_string();
        self.upload = UploadState::default();
    }

    /// Selects a record by id and displays its transcript.
    ///
    /// Returns false if no record with that id exists.
    pub fn select(&mut self, id: &str) -> bool {
        match self.history.iter().find(|r| r.id == id) {
            Some(record) => {
                self.display_text = record.transcript.clone();
                self.selected = Some(record.id.clone());
                true
            }
            None => false,
        }
    }

    /// Removes a record from the local history.
    ///
    /// If the removed record was selected, the selection is cleared and the
    /// viewer reverts to the placeholder; otherwise both are left alone.
    /// The server-side delete happens before this is called.
    pub fn remove(&mut self, id: &str) {
        self.history.retain(|r| r.id != id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
            self.display_text = PLACEHOLDER_TEXT.to_string();
        }
    }

    /// Empties the local history and resets selection and viewer text.
    ///
    /// This is local-only: records stored on the server are not deleted and
    /// will reappear on the next load. Preserved as-is from the original
    /// behavior; see DESIGN.md.
    pub fn clear(&mut self) {
        tracing::debug!("History cleared locally ({} records)", self.history.len());
        self.history.clear();
        self.selected = None;
        self.display_text = PLACEHOLDER_TEXT.to_string();
    }
}

impl Default for StudioState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(id: &str, transcript: &str) -> TranscriptionRecord {
        TranscriptionRecord {
            id: id.to_string(),
            transcript: transcript.to_string(),
            mime_type: Some("audio/webm".to_string()),
            size: Some(3),
            created_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn new_state_shows_placeholder() {
        let state = StudioState::new();
        assert_eq!(state.display_text(), PLACEHOLDER_TEXT);
        assert!(state.history().is_empty());
        assert_eq!(state.selected_id(), None);
        assert!(!state.upload.uploading);
    }

    #[test]
    fn successful_upload_prepends_selects_and_displays() {
        let mut state = StudioState::new();
        state.set_history(vec![record("old", "earlier text")]);

        assert!(state.begin_upload());
        assert_eq!(state.display_text(), TRANSCRIBING_TEXT);

        state.finish_upload_success(record("1", "hello"));

        assert_eq!(state.history().len(), 2);
        assert_eq!(state.history()[0].id, "1");
        assert_eq!(state.selected_id(), Some("1"));
        assert_eq!(state.display_text(), "hello");
        assert!(!state.upload.uploading);
        assert_eq!(state.upload.progress, 0);
    }

    #[test]
    fn failed_upload_reverts_to_placeholder_and_resets() {
        let mut state = StudioState::new();
        state.set_history(vec![record("a", "kept")]);

        assert!(state.begin_upload());
        state.set_progress(40);
        state.finish_upload_failure();

        assert_eq!(state.display_text(), PLACEHOLDER_TEXT);
        assert!(!state.upload.uploading);
        assert_eq!(state.upload.progress, 0);
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn second_upload_is_rejected_while_one_is_pending() {
        let mut state = StudioState::new();
        assert!(state.begin_upload());
        assert!(!state.begin_upload());
        assert!(state.upload.uploading);
    }

    #[test]
    fn progress_is_clamped_and_ignored_when_idle() {
        let mut state = StudioState::new();
        state.set_progress(50);
        assert_eq!(state.upload.progress, 0);

        state.begin_upload();
        state.set_progress(250);
        assert_eq!(state.upload.progress, 100);
    }

    #[test]
    fn deleting_selected_record_resets_viewer() {
        let mut state = StudioState::new();
        state.set_history(vec![record("1", "first"), record("2", "second")]);
        assert!(state.select("1"));
        assert_eq!(state.display_text(), "first");

        state.remove("1");

        assert_eq!(state.selected_id(), None);
        assert_eq!(state.display_text(), PLACEHOLDER_TEXT);
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.history()[0].id, "2");
    }

    #[test]
    fn deleting_non_selected_record_keeps_viewer() {
        let mut state = StudioState::new();
        state.set_history(vec![record("1", "first"), record("2", "second")]);
        assert!(state.select("1"));

        state.remove("2");

        assert_eq!(state.selected_id(), Some("1"));
        assert_eq!(state.display_text(), "first");
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn clear_empties_history_and_resets_selection() {
        let mut state = StudioState::new();
        state.set_history(vec![record("1", "first"), record("2", "second")]);
        assert!(state.select("2"));

        state.clear();

        assert!(state.history().is_empty());
        assert_eq!(state.selected_id(), None);
        assert_eq!(state.display_text(), PLACEHOLDER_TEXT);
    }

    #[test]
    fn selecting_unknown_id_changes_nothing() {
        let mut state = StudioState::new();
        state.set_history(vec![record("1", "first")]);
        assert!(!state.select("missing"));
        assert_eq!(state.selected_id(), None);
        assert_eq!(state.display_text(), PLACEHOLDER_TEXT);
    }

    // Worked example: submit a 3-byte buffer, server answers with id "1"
    // and transcript "hello".
    #[test]
    fn upload_round_trip_example() {
        let mut state = StudioState::new();
        assert!(state.begin_upload());
        state.set_progress(100);

        state.finish_upload_success(record("1", "hello"));

        assert_eq!(state.display_text(), "hello");
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.history()[0].size, Some(3));
        assert_eq!(state.selected_id(), Some("1"));
    }
}
