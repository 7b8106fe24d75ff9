//! Interactive terminal UI for browsing server-side transcription history.
//!
//! Provides a scrollable list of transcriptions with keyboard navigation,
//! clipboard copy, and per-record deletion. Deletion is returned to the
//! caller as an action so the server round-trip stays outside the viewer.

use crate::api::TranscriptionRecord;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, HighlightSpacing, List, ListItem, ListState, Padding, Paragraph},
};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

const BG: Color = Color::Rgb(0, 0, 0);
const FG: Color = Color::Rgb(255, 255, 255);
const TIMESTAMP_FG: Color = Color::Rgb(100, 100, 100);
const MIME_FG: Color = Color::Rgb(192, 132, 252);
const HIGHLIGHT_BG: Color = Color::Rgb(20, 20, 20);
const HELP_FG: Color = Color::Rgb(100, 100, 100);

/// Result of one viewer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerAction {
    /// User copied this transcript and is done
    Copy(String),
    /// User asked to delete this record; the caller performs the server
    /// call and re-opens the viewer with the updated list
    Delete(String),
    /// User left the viewer
    Exit,
}

/// Interactive viewer over transcription records fetched from the server.
pub struct HistoryViewer {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    records: Vec<TranscriptionRecord>,
    list_state: ListState,
    notification: Option<(String, Instant)>,
}

impl HistoryViewer {
    /// Creates a new history viewer with the given records.
    pub fn new(records: Vec<TranscriptionRecord>) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        let mut list_state = ListState::default();
        if !records.is_empty() {
            list_state.select(Some(0));
        }

        Ok(Self {
            terminal,
            records,
            list_state,
            notification: None,
        })
    }

    /// Runs the interactive viewer loop until the user acts.
    ///
    /// # Errors
    /// - If terminal rendering or event polling fails
    pub fn run(&mut self) -> Result<ViewerAction> {
        if self.records.is_empty() {
            self.cleanup()?;
            return Ok(ViewerAction::Exit);
        }

        tracing::debug!("History viewer started with {} records", self.records.len());

        let mut pending: Option<ViewerAction> = None;

        loop {
            self.draw()?;

            // A copy notification is shown briefly before exiting
            if let Some((_, start_time)) = self.notification {
                if start_time.elapsed() >= Duration::from_millis(500) {
                    self.notification = None;
                    if pending.is_some() {
                        break;
                    }
                }
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => {
                            tracing::debug!("History viewer exited via Escape/q");
                            pending = Some(ViewerAction::Exit);
                            break;
                        }
                        KeyCode::Up => self.list_state.select_previous(),
                        KeyCode::Down => self.list_state.select_next(),
                        KeyCode::Enter => {
                            if let Some(idx) = self.list_state.selected() {
                                pending = Some(ViewerAction::Copy(
                                    self.records[idx].transcript.clone(),
                                ));
                                self.notification =
                                    Some(("Copied to clipboard!".to_string(), Instant::now()));
                            }
                        }
                        KeyCode::Char('d') | KeyCode::Delete => {
                            if let Some(idx) = self.list_state.selected() {
                                tracing::debug!("Delete requested for record {}", self.records[idx].id);
                                pending =
                                    Some(ViewerAction::Delete(self.records[idx].id.clone()));
                                break;
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        self.cleanup()?;
        Ok(pending.unwrap_or(ViewerAction::Exit))
    }

    /// Renders the current state of the history viewer.
    fn draw(&mut self) -> Result<()> {
        let notification = self.notification.clone();

        self.terminal.draw(|frame| {
            let area = frame.area();

            let padding_block = Block::default()
                .padding(Padding::uniform(1))
                .style(Style::default().bg(BG));
            frame.render_widget(&padding_block, area);
            let padded_area = padding_block.inner(area);

            let [header_area, list_area, footer_area] = Layout::vertical([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .areas(padded_area);

            let header = Paragraph::new("say2text")
                .style(Style::default().fg(FG).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Left);
            frame.render_widget(header, header_area);

            let items: Vec<ListItem> = self
                .records
                .iter()
                .map(|record| {
                    let mut meta = vec![
                        Span::styled(record.created_at_local(), Style::default().fg(TIMESTAMP_FG)),
                        Span::raw("  "),
                        Span::styled(
                            record.mime_type_label().to_string(),
                            Style::default().fg(MIME_FG),
                        ),
                    ];
                    if let Some(size) = record.size {
                        meta.push(Span::styled(
                            format!("  {size} B"),
                            Style::default().fg(TIMESTAMP_FG),
                        ));
                    }
                    let text = Line::styled(record.transcript.clone(), Style::default().fg(FG));
                    ListItem::new(vec![Line::from(meta), text])
                })
                .collect();

            let list = List::new(items)
                .block(
                    Block::default()
                        .title(format!(" History ({}) ", self.records.len()))
                        .borders(Borders::ALL)
                        .padding(Padding::bottom(1)),
                )
                .highlight_style(Style::default().bg(HIGHLIGHT_BG))
                .highlight_symbol("> ")
                .highlight_spacing(HighlightSpacing::Always);

            frame.render_stateful_widget(list, list_area, &mut self.list_state);

            let help_text = "↑↓ select, ↵ copy, d delete, esc/q exit";
            let help_paragraph = Paragraph::new(help_text)
                .alignment(Alignment::Center)
                .style(Style::default().fg(HELP_FG));
            frame.render_widget(help_paragraph, footer_area);

            if let Some((message, _)) = notification {
                render_notification(frame, area, &message);
            }
        })?;

        Ok(())
    }

    /// Cleans up terminal and restores normal mode.
    fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        tracing::debug!("History viewer terminal cleanup complete");
        Ok(())
    }
}

impl Drop for HistoryViewer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
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
