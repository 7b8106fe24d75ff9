//! Application command handlers for say2text.
//!
//! This module organizes command handling into separate submodules, each
//! responsible for a specific application command.
//!
//! # Commands
//! - `studio`: Interactive record/upload/history screen (default)
//! - `record`: Record audio and submit it for transcription
//! - `upload`: Submit an existing audio file for transcription
//! - `history`: Browse server-side transcription history
//! - `config`: Open configuration file in user's preferred editor
//! - `list_devices`: List available audio input devices
//! - `logs`: Display recent log entries

pub mod config;
pub mod history;
pub mod list_devices;
pub mod logs;
pub mod record;
pub mod studio;
pub mod upload;

pub use config::handle_config;
pub use history::handle_history;
pub use list_devices::handle_list_devices;
pub use logs::handle_logs;
pub use record::handle_record;
pub use studio::handle_studio;
pub use upload::handle_upload;
