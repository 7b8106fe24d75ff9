//! Terminal user interface for the studio screen.
//!
//! Pure rendering of [`StudioState`]: transcript viewer, upload progress
//! gauge, live input meter while recording, and the history list. User
//! input is translated into [`StudioCommand`] values; all state mutation
//! happens in the controller.

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{
        Block, Borders, Gauge, HighlightSpacing, List, ListItem, ListState, Padding, Paragraph,
        Sparkline, Wrap,
    },
};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use super::state::StudioState;

const BG: Color = Color::Rgb(24, 16, 48);
const FG: Color = Color::Rgb(235, 230, 250);
const ACCENT: Color = Color::Rgb(192, 132, 252);
const TIMESTAMP_FG: Color = Color::Rgb(140, 130, 170);
const HIGHLIGHT_BG: Color = Color::Rgb(56, 38, 96);
const HELP_FG: Color = Color::Rgb(140, 130, 170);
const REC_FG: Color = Color::Rgb(248, 113, 113);

/// User input command on the studio screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudioCommand {
    /// No key pressed, keep running
    Continue,
    /// Start or stop a recording session ('r')
    ToggleRecord,
    /// Move history selection up
    MoveUp,
    /// Move history selection down
    MoveDown,
    /// Display the highlighted history record (Enter)
    View,
    /// Copy the displayed transcript to the clipboard ('y')
    Copy,
    /// Delete the highlighted history record ('d')
    Delete,
    /// Clear the local history ('x')
    Clear,
    /// Leave the studio (Escape, 'q', or Ctrl+C)
    Quit,
}

/// Terminal UI for the studio screen.
pub struct StudioTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    list_state: ListState,
    notification: Option<(String, Instant)>,
    volume_history: Vec<u64>,
    last_meter_sample: Instant,
    meter_interval: Duration,
    recording_started: Option<Instant>,
    sample_rate: u32,
}

impl StudioTui {
    /// Creates the studio TUI and enters alternate screen mode.
    ///
    /// # Errors
    /// - If terminal cannot be initialized
    /// - If raw mode cannot be enabled
    /// - If alternate screen cannot be entered
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            list_state: ListState::default(),
            notification: None,
            volume_history: Vec::new(),
            last_meter_sample: Instant::now(),
            meter_interval: Duration::from_millis(50),
            recording_started: None,
            sample_rate: 16000,
        })
    }

    /// Index of the highlighted history entry, if any.
    pub fn highlighted(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Shows a short transient notification modal.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notification = Some((message.into(), Instant::now()));
    }

    /// Marks the start of a recording session for the input meter.
    pub fn begin_recording_meter(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
        self.volume_history.clear();
        self.recording_started = Some(Instant::now());
    }

    /// Clears the input meter after recording stops.
    pub fn end_recording_meter(&mut self) {
        self.recording_started = None;
        self.volume_history.clear();
    }

    /// Feeds captured samples into the input meter.
    ///
    /// Converts the RMS of the most recent ~50ms of audio to a 0–100 level
    /// relative to a -60 dBFS floor.
    pub fn update_meter(&mut self, samples: &[i16]) {
        if self.last_meter_sample.elapsed() < self.meter_interval {
            return;
        }
        self.last_meter_sample = Instant::now();

        let level = if samples.is_empty() {
            0
        } else {
            let window = std::cmp::min((self.sample_rate / 20) as usize, samples.len());
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
        };

        self.volume_history.push(level);
        let width = self
            .terminal
            .size()
            .map(|s| s.width as usize)
            .unwrap_or(80);
        while self.volume_history.len() > width {
            self.volume_history.remove(0);
        }
    }

    /// Processes user input and returns the resulting command.
    ///
    /// # Errors
    /// - If event polling fails
    pub fn handle_input(&mut self) -> anyhow::Result<StudioCommand> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                return Ok(match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        StudioCommand::Quit
                    }
                    KeyCode::Char('q') | KeyCode::Esc => StudioCommand::Quit,
                    KeyCode::Char('r') => StudioCommand::ToggleRecord,
                    KeyCode::Up => StudioCommand::MoveUp,
                    KeyCode::Down => StudioCommand::MoveDown,
                    KeyCode::Enter => StudioCommand::View,
                    KeyCode::Char('y') => StudioCommand::Copy,
                    KeyCode::Char('d') | KeyCode::Delete => StudioCommand::Delete,
                    KeyCode::Char('x') => StudioCommand::Clear,
                    _ => StudioCommand::Continue,
                });
            }
        }
        Ok(StudioCommand::Continue)
    }

    /// Moves the history highlight up.
    pub fn move_up(&mut self) {
        self.list_state.select_previous();
    }

    /// Moves the history highlight down.
    pub fn move_down(&mut self) {
        self.list_state.select_next();
    }

    /// Keeps the highlight valid after the history changed size.
    fn sync_highlight(&mut self, history_len: usize) {
        match self.list_state.selected() {
            _ if history_len == 0 => self.list_state.select(None),
            None => self.list_state.select(Some(0)),
            Some(i) if i >= history_len => self.list_state.select(Some(history_len - 1)),
            _ => {}
        }
    }

    /// Renders the current application state.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn draw(&mut self, state: &StudioState) -> anyhow::Result<()> {
        self.sync_highlight(state.history().len());

        // Expire the transient notification
        if let Some((_, started)) = self.notification {
            if started.elapsed() >= Duration::from_millis(1200) {
                self.notification = None;
            }
        }

        let notification = self.notification.clone();
        let volume_history = self.volume_history.clone();
        let recording_elapsed = self.recording_started.map(|t| t.elapsed());
        let list_state = &mut self.list_state;

        self.terminal.draw(|frame| {
            let area = frame.area();

            let padding_block = Block::default()
                .padding(Padding::uniform(1))
                .style(Style::default().bg(BG));
            frame.render_widget(&padding_block, area);
            let inner_area = padding_block.inner(area);

            let [header_area, main_area, footer_area] = Layout::vertical([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .areas(inner_area);

            render_header(frame, header_area);

            let [viewer_area, history_area] =
                Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
                    .areas(main_area);

            let [transcript_area, status_area] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(viewer_area);

            render_transcript(frame, transcript_area, state);
            render_status(
                frame,
                status_area,
                state,
                &volume_history,
                recording_elapsed,
            );
            render_history(frame, history_area, state, list_state);
            render_footer(frame, footer_area, state);

            if let Some((message, _)) = notification {
                render_notification(frame, area, &message);
            }
        })?;

        Ok(())
    }

    /// Displays a blocking full-screen error notification.
    ///
    /// The studio screen stays in alternate screen mode; any key dismisses
    /// the error and returns to the normal draw loop.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn show_error(&mut self, error_message: &str) -> anyhow::Result<()> {
        loop {
            self.terminal.draw(|frame| {
                let area = frame.area();

                let backdrop = Block::default().style(Style::default().bg(Color::Rgb(160, 24, 24)));
                frame.render_widget(&backdrop, area);

                let padding_x = area.width / 10;
                let text_width = (area.width * 80) / 100;

                let message_area = Rect {
                    x: area.x + padding_x,
                    y: area.y + area.height / 3,
                    width: text_width.min(area.width),
                    height: area.height / 2,
                };

                let paragraph = Paragraph::new(error_message)
                    .style(
                        Style::default()
                            .fg(Color::Rgb(255, 255, 255))
                            .bg(Color::Rgb(160, 24, 24)),
                    )
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true });
                frame.render_widget(paragraph, message_area);

                let hint_area = Rect {
                    x: area.x,
                    y: area.y + area.height.saturating_sub(2),
                    width: area.width,
                    height: 1,
                };
                let hint = Paragraph::new("press any key to continue")
                    .style(
                        Style::default()
                            .fg(Color::Rgb(255, 200, 200))
                            .bg(Color::Rgb(160, 24, 24)),
                    )
                    .alignment(Alignment::Center);
                frame.render_widget(hint, hint_area);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(_) = event::read()? {
                    break;
                }
            }
        }

        Ok(())
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

impl Drop for StudioTui {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            " say2text ",
            Style::default().fg(BG).bg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  Voice-to-Text Studio",
            Style::default().fg(ACCENT),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_transcript(frame: &mut Frame, area: Rect, state: &StudioState) {
    let block = Block::default()
        .title(" Transcript ")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().fg(FG));

    let paragraph = Paragraph::new(state.display_text())
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_status(
    frame: &mut Frame,
    area: Rect,
    state: &StudioState,
    volume_history: &[u64],
    recording_elapsed: Option<Duration>,
) {
    if state.upload.uploading {
        let gauge = Gauge::default()
            .block(Block::default().title(" Uploading ").borders(Borders::ALL))
            .gauge_style(Style::default().fg(ACCENT).bg(BG))
            .percent(state.upload.progress as u16);
        frame.render_widget(gauge, area);
        return;
    }

    if state.recording {
        let duration_secs = recording_elapsed.map(|d| d.as_secs()).unwrap_or(0);
        let minutes = duration_secs / 60;
        let secs = duration_secs % 60;

        let block = Block::default()
            .title(Line::from(vec![
                Span::styled(" ● REC ", Style::default().fg(REC_FG)),
                Span::styled(format!("{minutes}:{secs:02} "), Style::default().fg(FG)),
            ]))
            .borders(Borders::ALL);
        let meter_area = block.inner(area);
        frame.render_widget(block, area);

        let sparkline = Sparkline::default()
            .data(volume_history)
            .max(100)
            .style(Style::default().fg(REC_FG).bg(BG));
        frame.render_widget(sparkline, meter_area);
        return;
    }

    let idle = Paragraph::new("press 'r' to start recording")
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(HELP_FG))
        .alignment(Alignment::Center);
    frame.render_widget(idle, area);
}

fn render_history(frame: &mut Frame, area: Rect, state: &StudioState, list_state: &mut ListState) {
    let items: Vec<ListItem> = state
        .history()
        .iter()
        .map(|record| {
            let mut meta_spans = vec![
                Span::styled(record.created_at_local(), Style::default().fg(TIMESTAMP_FG)),
                Span::raw("  "),
                Span::styled(
                    record.mime_type_label().to_string(),
                    Style::default().fg(ACCENT),
                ),
            ];
            if let Some(size) = record.size {
                meta_spans.push(Span::styled(
                    format!("  {size} B"),
                    Style::default().fg(TIMESTAMP_FG),
                ));
            }
            if state.selected_id() == Some(record.id.as_str()) {
                meta_spans.push(Span::styled("  ◆", Style::default().fg(ACCENT)));
            }

            let preview = record.transcript.lines().next().unwrap_or("").to_string();
            ListItem::new(vec![
                Line::from(meta_spans),
                Line::styled(preview, Style::default().fg(FG)),
            ])
        })
        .collect();

    let title = format!(" History ({}) ", state.history().len());

    if items.is_empty() {
        let empty = Paragraph::new("No transcriptions yet.")
            .block(Block::default().title(title).borders(Borders::ALL))
            .style(Style::default().fg(HELP_FG))
            .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .padding(Padding::bottom(1)),
        )
        .highlight_style(Style::default().bg(HIGHLIGHT_BG))
        .highlight_symbol("> ")
        .highlight_spacing(HighlightSpacing::Always);

    frame.render_stateful_widget(list, area, list_state);
}

fn render_footer(frame: &mut Frame, area: Rect, state: &StudioState) {
    let help_text = if state.upload.uploading {
        "uploading... ↑↓ select, ↵ view, y copy, esc/q quit"
    } else if state.recording {
        "r stop+transcribe, esc/q quit"
    } else {
        "r record, ↑↓ select, ↵ view, y copy, d delete, x clear (local), esc/q quit"
    };

    let footer = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(HELP_FG));
    frame.render_widget(footer, area);
}

/// Renders a centered notification modal.
fn render_notification(frame: &mut Frame, screen_area: Rect, message: &str) {
    let modal_width = (message.len() as u16).saturating_add(4);
    let modal_height = 3;

    let modal_x = screen_area.x + (screen_area.width.saturating_sub(modal_width)) / 2;
    let modal_y = screen_area.y + (screen_area.height.saturating_sub(modal_height)) / 2;

    let modal_area = Rect {
        x: modal_x,
        y: modal_y,
        width: modal_width.min(screen_area.width),
        height: modal_height,
    };

    let modal_block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::Green).fg(Color::Black));

    frame.render_widget(&modal_block, modal_area);

    let inner_area = modal_block.inner(modal_area);
    let notification_text = Paragraph::new(message)
        .style(Style::default().bg(Color::Green).fg(Color::Black))
        .alignment(Alignment::Center);

    frame.render_widget(notification_text, inner_area);
}
