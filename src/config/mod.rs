//! Configuration management for say2text.
//!
//! This module handles loading and saving application configuration from
//! TOML files. Configuration covers the transcription server address and
//! audio capture settings, and is stored in the user's config directory.

pub mod file;

pub use file::{AudioConfig, Say2TextConfig, ServerConfig};
