use anyhow::Result;
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use glossa_core::{
    constants::display::{ASSISTANT_LABEL, USER_LABEL},
    ChatSession, Conversation, Role, Settings, TurnEvent,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Terminal,
};
use std::io;
use tokio::sync::mpsc;

use crate::commands::{self, CommandResult};
use crate::input::{InputBuffer, InputHistory};
use crate::theme::Theme;

// ── Single-prompt mode ──────────────────────────────────────────────────

pub async fn run_single_prompt(mut session: ChatSession, prompt: &str) -> Result<()> {
    let record = session.send(prompt).await?;
    println!("{}", record.reply.text());

    if let Some(e) = record.save_error {
        eprintln!(
            "Warning: could not save history to {}: {e}",
            session.store().path().display()
        );
    }
    Ok(())
}

// ── Transcript ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    User,
    Assistant,
    /// Local status text; never persisted.
    Notice,
    Warning,
}

/// One block of text in the chat window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub kind: EntryKind,
    pub content: String,
}

impl TranscriptEntry {
    pub fn new(kind: EntryKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }
}

/// Replay a loaded conversation into transcript entries.
pub fn transcript_from(conversation: &Conversation) -> Vec<TranscriptEntry> {
    conversation
        .iter()
        .map(|m| {
            let kind = match m.role() {
                Role::User => EntryKind::User,
                Role::Model => EntryKind::Assistant,
            };
            TranscriptEntry::new(kind, m.text())
        })
        .collect()
}

/// Render an entry as `Label: text`, continuation lines indented under the text.
pub fn render_entry_lines(entry: &TranscriptEntry, theme: &Theme) -> Vec<Line<'static>> {
    let (label, color) = match entry.kind {
        EntryKind::User => (Some(USER_LABEL), theme.user_color),
        EntryKind::Assistant => (Some(ASSISTANT_LABEL), theme.assistant_color),
        EntryKind::Notice => (None, theme.notice_color),
        EntryKind::Warning => (None, theme.error),
    };
    let prefix = label.map(|l| format!("{l}: ")).unwrap_or_default();
    let indent = " ".repeat(prefix.chars().count());

    let mut lines = Vec::new();
    for (i, raw_line) in entry.content.split('\n').enumerate() {
        let text_style = Style::default().fg(color);
        if i == 0 {
            lines.push(Line::from(vec![
                Span::styled(
                    prefix.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(raw_line.to_string(), text_style),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::raw(indent.clone()),
                Span::styled(raw_line.to_string(), text_style),
            ]));
        }
    }
    lines
}

fn build_chat_lines(entries: &[TranscriptEntry], busy: bool, theme: &Theme) -> Vec<Line<'static>> {
    let mut chat_lines = Vec::new();
    for entry in entries {
        chat_lines.extend(render_entry_lines(entry, theme));
        chat_lines.push(Line::raw(""));
    }

    if busy {
        chat_lines.push(Line::from(Span::styled(
            "  Waiting for reply...",
            Style::default().fg(theme.accent).add_modifier(Modifier::DIM),
        )));
    }
    chat_lines
}

// ── Interactive TUI ─────────────────────────────────────────────────────

struct AppState {
    session: ChatSession,

    // Input
    input: InputBuffer,
    input_history: InputHistory,

    // Chat
    entries: Vec<TranscriptEntry>,
    /// Raw input of the turn in flight, restored if it gets cancelled.
    pending_input: Option<String>,
    /// `usize::MAX` pins the view to the bottom.
    scroll_offset: usize,

    // UI
    theme: Theme,
    status_text: String,
    should_quit: bool,
}

impl AppState {
    fn new(session: ChatSession, theme: Theme) -> Self {
        let mut entries = transcript_from(session.conversation());
        if entries.is_empty() {
            entries.push(TranscriptEntry::new(
                EntryKind::Notice,
                "Type text to translate or polish. /help for commands.",
            ));
        } else {
            entries.push(TranscriptEntry::new(
                EntryKind::Notice,
                format!(
                    "Loaded {} messages from {}",
                    session.conversation().len(),
                    session.store().path().display()
                ),
            ));
        }

        Self {
            session,
            input: InputBuffer::new(),
            input_history: InputHistory::new(),
            entries,
            pending_input: None,
            scroll_offset: usize::MAX,
            theme,
            status_text: "Ready".into(),
            should_quit: false,
        }
    }

    fn add_entry(&mut self, kind: EntryKind, content: impl Into<String>) {
        self.entries.push(TranscriptEntry::new(kind, content));
        self.scroll_to_bottom();
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_offset = usize::MAX;
    }

    fn submit(&mut self, turn_tx: &mpsc::UnboundedSender<TurnEvent>) {
        let raw = self.input.text().to_string();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }

        if trimmed.starts_with('/') {
            let command = trimmed.to_string();
            self.input.clear();
            self.input_history.push(command.clone());
            let result = commands::handle_command(&command);
            handle_command_result(self, result);
            return;
        }

        if self.session.is_busy() {
            self.status_text = "Still waiting for the previous reply".into();
            return;
        }

        match self.session.spawn_turn(&raw, turn_tx.clone()) {
            Ok(user) => {
                self.input.clear();
                self.input_history.push(user.text().to_string());
                self.pending_input = Some(raw);
                self.add_entry(EntryKind::User, user.text());
                self.status_text = "Sending...".into();
            }
            Err(e) => {
                self.add_entry(EntryKind::Warning, e.to_string());
            }
        }
    }

    fn handle_turn_event(&mut self, event: TurnEvent) {
        let Some(record) = self.session.finish_turn(event) else {
            return;
        };
        self.pending_input = None;
        self.add_entry(EntryKind::Assistant, record.reply.text());
        self.status_text = if record.failed {
            "Request failed".into()
        } else {
            "Ready".into()
        };

        if let Some(e) = record.save_error {
            let path = self.session.store().path().display().to_string();
            self.add_entry(
                EntryKind::Warning,
                format!("Warning: could not save history to {path}: {e}"),
            );
        }
    }

    fn cancel_turn(&mut self) {
        if !self.session.cancel() {
            return;
        }
        if let Some(i) = self
            .entries
            .iter()
            .rposition(|e| e.kind == EntryKind::User)
        {
            self.entries.remove(i);
        }
        if let Some(raw) = self.pending_input.take() {
            if self.input.is_empty() {
                self.input.set(raw);
            }
        }
        self.status_text = "Cancelled".into();
        self.add_entry(EntryKind::Notice, "Request cancelled.");
    }
}

pub async fn run_tui(session: ChatSession, theme: Theme) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = AppState::new(session, theme);
    let result = event_loop(&mut terminal, &mut state);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    // Dropping the state drops the session, which aborts any request still in flight.
    drop(state);
    result
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, state: &mut AppState) -> Result<()> {
    let (turn_tx, mut turn_rx) = mpsc::unbounded_channel::<TurnEvent>();

    loop {
        terminal.draw(|f| draw_ui(f, state))?;

        // Process finished turns (non-blocking)
        while let Ok(turn_event) = turn_rx.try_recv() {
            state.handle_turn_event(turn_event);
        }

        if event::poll(std::time::Duration::from_millis(33))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(state, key, &turn_tx);
                }
                Event::Paste(text) => {
                    state.input.insert_str(&text.replace('\r', ""));
                }
                _ => {}
            }
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

fn draw_ui(f: &mut ratatui::Frame, state: &mut AppState) {
    let input_rows = state.input.line_count().clamp(1, 6) as u16;

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),                  // chat
            Constraint::Length(input_rows + 2), // input
            Constraint::Length(1),               // status
        ])
        .split(f.area());

    draw_chat(f, main_chunks[0], state);
    draw_input(f, main_chunks[1], state);
    draw_status_bar(f, main_chunks[2], state);
}

fn draw_chat(f: &mut ratatui::Frame, area: Rect, state: &mut AppState) {
    let theme = &state.theme;
    let text = Text::from(build_chat_lines(
        &state.entries,
        state.session.is_busy(),
        theme,
    ));

    // Rows after wrapping, so long replies scroll all the way.
    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let total_lines: usize = text
        .lines
        .iter()
        .map(|line| line.width().div_ceil(inner_width).max(1))
        .sum();
    let visible_height = area.height.saturating_sub(2) as usize;
    let max_scroll = total_lines.saturating_sub(visible_height);
    if state.scroll_offset > max_scroll {
        state.scroll_offset = max_scroll;
    }

    let chat = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Glossa ")
                .border_style(Style::default().fg(theme.border)),
        )
        .style(Style::default().fg(theme.fg))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset.min(u16::MAX as usize) as u16, 0));
    f.render_widget(chat, area);

    if total_lines > visible_height {
        let mut scrollbar_state = ScrollbarState::new(max_scroll).position(state.scroll_offset);
        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("^"))
                .end_symbol(Some("v")),
            area,
            &mut scrollbar_state,
        );
    }
}

fn draw_input(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let is_command = state.input.text().starts_with('/');

    let title = if is_command {
        " Command "
    } else if state.session.is_busy() {
        " Message (waiting for reply...) "
    } else {
        " Message  Enter send · Shift+Enter newline "
    };

    // Keep the cursor row inside the box.
    let visible_rows = area.height.saturating_sub(2).max(1) as usize;
    let (row, _) = state.input.cursor_row_col();
    let input_scroll = row.saturating_sub(visible_rows - 1);

    let input = Paragraph::new(state.input.text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(if is_command {
                    theme.accent
                } else {
                    theme.border
                })),
        )
        .style(Style::default().fg(theme.fg))
        .scroll((input_scroll as u16, 0));
    f.render_widget(input, area);

    let col_width = Line::raw(state.input.text_before_cursor_on_line()).width() as u16;
    let max_x = area.x + area.width.saturating_sub(2);
    let cursor_x = (area.x + 1 + col_width).min(max_x);
    let cursor_y = area.y + 1 + (row - input_scroll) as u16;
    f.set_cursor_position((cursor_x, cursor_y));
}

fn draw_status_bar(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let status_color = if state.session.is_busy() {
        theme.warning
    } else {
        theme.muted
    };

    let status_spans = vec![
        Span::styled(
            format!(" {} ", state.session.model()),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("| {} messages ", state.session.conversation().len()),
            Style::default().fg(theme.muted),
        ),
        Span::styled(
            format!("| {} ", state.session.store().path().display()),
            Style::default().fg(theme.muted),
        ),
        Span::styled("| ", Style::default().fg(theme.muted)),
        Span::styled(state.status_text.clone(), Style::default().fg(status_color)),
    ];
    f.render_widget(Paragraph::new(Line::from(status_spans)), area);
}

fn handle_key(state: &mut AppState, key: KeyEvent, turn_tx: &mpsc::UnboundedSender<TurnEvent>) {
    match (key.modifiers, key.code) {
        // Cancel the pending reply, or quit when idle
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            if state.session.is_busy() {
                state.cancel_turn();
            } else {
                state.should_quit = true;
            }
        }

        // Newline
        (m, KeyCode::Enter) if m.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
            state.input.newline();
        }
        (KeyModifiers::CONTROL, KeyCode::Char('j')) => {
            state.input.newline();
        }

        // Submit input
        (_, KeyCode::Enter) => {
            state.submit(turn_tx);
        }

        // Input editing
        (_, KeyCode::Backspace) => state.input.backspace(),
        (_, KeyCode::Delete) => state.input.delete(),
        (_, KeyCode::Left) => state.input.move_left(),
        (_, KeyCode::Right) => state.input.move_right(),
        (_, KeyCode::Home) => state.input.move_home(),
        (_, KeyCode::End) => state.input.move_end(),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => state.input.clear(),

        // Scroll (Shift+arrows, must come before bare arrows)
        (KeyModifiers::SHIFT, KeyCode::Up) => {
            state.scroll_offset = state.scroll_offset.saturating_sub(1);
        }
        (KeyModifiers::SHIFT, KeyCode::Down) => {
            state.scroll_offset = state.scroll_offset.saturating_add(1);
        }
        (_, KeyCode::PageUp) => {
            state.scroll_offset = state.scroll_offset.saturating_sub(10);
        }
        (_, KeyCode::PageDown) => {
            state.scroll_offset = state.scroll_offset.saturating_add(10);
        }

        // History navigation
        (_, KeyCode::Up) => {
            if let Some(previous) = state.input_history.older() {
                let previous = previous.to_string();
                state.input.set(previous);
            }
        }
        (_, KeyCode::Down) => {
            if let Some(next) = state.input_history.newer() {
                let next = next.to_string();
                state.input.set(next);
            }
        }

        // Tab completion for commands
        (_, KeyCode::Tab) => {
            if state.input.text().starts_with('/') {
                if let Some(completion) = commands::complete_command(state.input.text()) {
                    state.input.set(completion);
                }
            }
        }

        // Regular character input
        (m, KeyCode::Char(c)) if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            state.input.insert_char(c);
        }

        _ => {}
    }
}

fn handle_command_result(state: &mut AppState, result: CommandResult) {
    match result {
        CommandResult::Message(msg) => state.add_entry(EntryKind::Notice, msg),
        CommandResult::Quit => state.should_quit = true,
        CommandResult::ThemeChanged(name) => {
            state.theme = Theme::by_name(&name);
            // Persist only the theme; CLI overrides for this run stay out of the file.
            let mut saved = Settings::load();
            saved.theme = name.clone();
            match saved.save() {
                Ok(()) => state.add_entry(EntryKind::Notice, format!("Theme set to {name}.")),
                Err(e) => state.add_entry(
                    EntryKind::Warning,
                    format!("Theme set to {name}, but it could not be saved: {e}"),
                ),
            }
        }
        CommandResult::ShowStatus => {
            let conversation = state.session.conversation();
            let msg = format!(
                "Model: {}\nMessages: {} ({} turns)\nHistory file: {}\nTheme: {}",
                state.session.model(),
                conversation.len(),
                conversation.turns(),
                state.session.store().path().display(),
                state.theme.name,
            );
            state.add_entry(EntryKind::Notice, msg);
        }
        CommandResult::NotACommand => {}
    }
}
