//! Terminal user interface for the standalone `record` command.
//!
//! Shows a live input level sparkline with the elapsed recording time, and
//! an upload progress gauge once the session has been submitted to the
//! server.

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph, Sparkline},
};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

const BG: Color = Color::Rgb(0, 0, 0);
const METER_FG: Color = Color::Rgb(206, 224, 220);
const HELP_FG: Color = Color::Rgb(100, 100, 100);

/// User input command during recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingCommand {
    /// Continue recording (no key pressed)
    Continue,
    /// Stop recording and submit for transcription (Enter)
    Transcribe,
    /// Exit without submitting (Escape, 'q', or Ctrl+C)
    Cancel,
}

/// Terminal UI for the `record` command.
pub struct RecordingTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    volume_history: Vec<u64>,
    last_sample_time: Instant,
    sample_interval: Duration,
    sample_rate: u32,
    recording_start: Instant,
}

impl RecordingTui {
    /// Creates the recording TUI and enters alternate screen mode.
    ///
    /// # Errors
    /// - If terminal cannot be initialized
    /// - If raw mode cannot be enabled
    pub fn new(sample_rate: u32) -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            volume_history: Vec::new(),
            last_sample_time: Instant::now(),
            sample_interval: Duration::from_millis(50),
            sample_rate,
            recording_start: Instant::now(),
        })
    }

    /// Renders the live input meter from the captured samples.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn render_meter(&mut self, samples: &[i16]) -> anyhow::Result<()> {
        if self.last_sample_time.elapsed() >= self.sample_interval {
            self.volume_history.push(level_percent(samples, self.sample_rate));
            let width = self.terminal.size()?.width as usize;
            while self.volume_history.len() > width {
                self.volume_history.remove(0);
            }
            self.last_sample_time = Instant::now();
        }

        let duration_secs = self.recording_start.elapsed().as_secs();
        let minutes = duration_secs / 60;
        let secs = duration_secs % 60;
        let volume_history = self.volume_history.clone();

        self.terminal.draw(|frame| {
            let area = frame.area();

            let [meter_area, footer_area] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

            let sparkline = Sparkline::default()
                .data(&volume_history)
                .max(100)
                .style(Style::default().bg(BG).fg(METER_FG));
            frame.render_widget(sparkline, meter_area);

            let footer = Line::from(vec![
                Span::styled("● ", Style::default().fg(Color::Red)),
                Span::raw(format!("{minutes}:{secs:02}")),
                Span::styled("   ↵ transcribe, esc/q cancel", Style::default().fg(HELP_FG)),
            ]);
            frame.render_widget(
                Paragraph::new(footer).style(Style::default().bg(BG).fg(METER_FG)),
                footer_area,
            );
        })?;

        Ok(())
    }

    /// Renders the upload progress gauge.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn render_upload(&mut self, progress: u8) -> anyhow::Result<()> {
        self.terminal.draw(|frame| {
            let area = frame.area();

            let gauge_height = 3;
            let gauge_area = Rect {
                x: area.x + area.width / 10,
                y: area.y + (area.height.saturating_sub(gauge_height)) / 2,
                width: (area.width * 80) / 100,
                height: gauge_height,
            };

            frame.render_widget(Block::default().style(Style::default().bg(BG)), area);

            let gauge = Gauge::default()
                .block(
                    Block::default()
                        .title(" Uploading for transcription ")
                        .borders(Borders::ALL),
                )
                .gauge_style(Style::default().fg(METER_FG).bg(BG))
                .percent(progress.min(100) as u16);
            frame.render_widget(gauge, gauge_area);
        })?;

        Ok(())
    }

    /// Processes user input and returns the appropriate recording command.
    ///
    /// # Errors
    /// - If event polling fails
    pub fn handle_input(&mut self) -> anyhow::Result<RecordingCommand> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                return Ok(match key.code {
                    KeyCode::Enter => {
                        tracing::debug!("Enter pressed: submitting recording");
                        RecordingCommand::Transcribe
                    }
                    KeyCode::Char('q') | KeyCode::Esc => {
                        tracing::debug!("Escape or 'q' pressed: canceling recording");
                        RecordingCommand::Cancel
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        tracing::debug!("Ctrl+C pressed: canceling recording");
                        RecordingCommand::Cancel
                    }
                    _ => RecordingCommand::Continue,
                });
            }
        }
        Ok(RecordingCommand::Continue)
    }

    /// Cleans up terminal state and exits alternate screen mode.
    ///
    /// # Errors
    /// - If terminal mode cannot be disabled
    /// - If cursor cannot be shown
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for RecordingTui {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Converts the RMS of the most recent ~50ms of audio into a 0–100 level
/// relative to a -60 dBFS floor.
fn level_percent(samples: &[i16], sample_rate: u32) -> u64 {
    if samples.is_empty() {
        return 0;
    }

    let window = std::cmp::min((sample_rate / 20) as usize, samples.len());
    let recent = &samples[samples.len() - window..];

    let sum_of_squares: i64 = recent.iter().map(|&x| (x as i64).pow(2)).sum();
    let mean_square = sum_of_squares / recent.len() as i64;
    let rms = (mean_square as f32).sqrt();

    let db_fs = if rms > 0.0 {
        20.0 * (rms / 32767.0).log10()
    } else {
        -160.0
    };

    ((db_fs + 60.0) / 60.0 * 100.0).clamp(0.0, 100.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_is_zero_level() {
        assert_eq!(level_percent(&[0; 800], 16000), 0);
    }

    #[test]
    fn full_scale_is_full_level() {
        assert_eq!(level_percent(&[i16::MAX; 800], 16000), 100);
    }

    #[test]
    fn empty_samples_are_zero_level() {
        assert_eq!(level_percent(&[], 16000), 0);
    }
}
