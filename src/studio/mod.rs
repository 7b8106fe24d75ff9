//! Interactive studio screen: record, upload, browse, and manage
//! transcriptions against the Say2Text server.

pub mod state;
pub mod ui;

pub use state::{StudioState, UploadState, PLACEHOLDER_TEXT, TRANSCRIBING_TEXT};
pub use ui::{StudioCommand, StudioTui};
