//! Microphone capture for say2text.
//!
//! Provides audio capture from the system's input devices and in-memory
//! WAV encoding of the captured session, plus the recording TUI used by
//! the standalone `record` command.

pub mod audio;
pub mod ui;

pub use audio::AudioRecorder;
pub use ui::{RecordingCommand, RecordingTui};
