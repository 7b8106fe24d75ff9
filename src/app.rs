//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands;
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process;

/// A terminal voice recording and upload client for a Say2Text transcription server
#[derive(Parser)]
#[command(name = "say2text")]
#[command(version)]
#[command(about = "Convert your voice into words with AI precision")]
#[command(
    long_about = "say2text is a terminal client for a Say2Text transcription server.\nRecord from the microphone or upload audio files, watch the upload\nprogress, and browse the transcription history stored on the server.\n\nDEFAULT COMMAND:\n    If no command is specified, 'studio' is used by default.\n\nEXAMPLES:\n    # Open the interactive studio screen\n    $ say2text\n\n    # Record, transcribe, and pipe the transcript\n    $ say2text record | wc -w\n\n    # Record and copy the transcript to the clipboard\n    $ say2text record -c\n\n    # Transcribe an existing audio file\n    $ say2text upload voice-memo.mp3\n\n    # Browse your transcription history\n    $ say2text history\n\n    # Edit configuration file\n    $ say2text config"
)]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/say2text/say2text.toml\n    Logs:               ~/.local/state/say2text/say2text.log.*\n    Server URL:         SAY2TEXT_SERVER_URL overrides the configured base URL"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive studio screen (default)
    ///
    /// Record from the microphone, view transcripts, and manage the
    /// transcription history in one screen. Press 'r' to record, Enter to
    /// view an entry, 'y' to copy, 'd' to delete, 'x' to clear locally.
    #[command(visible_alias = "s")]
    Studio,

    /// Record audio and submit it for transcription
    ///
    /// Press Enter to transcribe, Escape/q to cancel. By default the
    /// transcript is printed to stdout for piping to other commands.
    #[command(visible_alias = "r")]
    Record {
        /// Copy the transcript to clipboard instead of stdout
        #[arg(short, long)]
        clipboard: bool,
    },

    /// Submit an existing audio file for transcription
    ///
    /// Examples:
    ///   say2text upload recording.ogg
    ///   say2text upload voice-memo.mp3 -c
    ///   say2text upload meeting.wav | grep keyword
    #[command(visible_alias = "u")]
    Upload {
        /// Path to the audio file to upload
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Copy the transcript to clipboard instead of stdout
        #[arg(short, long)]
        clipboard: bool,
    },

    /// View and browse transcription history
    ///
    /// Browse transcriptions stored on the server. Use arrow keys to
    /// navigate, Enter to copy, 'd' to delete, Esc to exit.
    #[command(visible_alias = "h")]
    History,

    /// Open configuration file in your preferred editor
    ///
    /// Edit the server base URL and audio settings. Uses the $EDITOR
    /// environment variable or falls back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// List available audio input devices
    ///
    /// Shows device IDs, names, and configurations to help configure
    /// the correct input device in say2text.toml.
    #[command(name = "list-devices")]
    ListDevices,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    /// Useful for troubleshooting issues.
    Logs,

    /// Generate shell completion script
    ///
    /// Generate completion script for your shell. Save the output to your
    /// shell's completion directory or source it directly.
    ///
    /// Examples:
    ///   say2text completions bash > say2text.bash
    ///   say2text completions zsh > _say2text
    ///   say2text completions fish > say2text.fish
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If command execution fails (e.g., recording, upload, history viewing)
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Handle commands that don't need logging or config setup
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "say2text", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => {
            return match commands::handle_list_devices() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        Some(Commands::Logs) => {
            return match commands::handle_logs() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        _ => {}
    }

    // Initialize logging for all other commands
    logging::init_logging()?;

    // Route to appropriate command handler
    match cli.command {
        None | Some(Commands::Studio) => {
            commands::handle_studio().await?;
        }
        Some(Commands::Record { clipboard }) => {
            commands::handle_record(clipboard).await?;
        }
        Some(Commands::Upload { file, clipboard }) => {
            commands::handle_upload(file, clipboard).await?;
        }
        Some(Commands::History) => {
            commands::handle_history().await?;
        }
        Some(Commands::Config) => {
            commands::handle_config()?;
        }
        Some(Commands::Completions { .. }) | Some(Commands::ListDevices) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}
