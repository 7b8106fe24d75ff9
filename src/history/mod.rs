//! Transcription history browsing.
//!
//! The history itself lives on the Say2Text server; this module provides
//! the interactive viewer used by the `history` command. The studio screen
//! has its own history panel.

pub mod ui;

pub use ui::{HistoryViewer, ViewerAction};
