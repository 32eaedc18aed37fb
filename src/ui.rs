//! UI rendering for the terminal user interface.
//!
//! Everything here reads from `App`; nothing mutates playback.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Tabs, Wrap},
};

use crate::app::{App, loop_mode_label};
use crate::config::UiSettings;
use crate::engine::TransportState;

const CONTROLS: [(&str, &str); 14] = [
    ("j/k", "up/down"),
    ("enter", "play selected"),
    ("space/p", "play/pause"),
    ("s", "stop"),
    ("h/l", "prev/next song"),
    ("+/-", "volume"),
    ("r", "loop mode"),
    ("tab", "next playlist"),
    ("f", "favourite"),
    ("n", "new playlist"),
    ("a", "add to playlist"),
    ("d", "remove from playlist"),
    ("D", "delete playlist"),
    ("q", "quit"),
];

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

fn padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Status line: transport state, song, loop mode, backend, volume and the
/// last message.
fn status_text(app: &App) -> String {
    let engine = &app.engine;
    let mut parts: Vec<String> = Vec::new();

    let state = match engine.state() {
        TransportState::Playing => "Playing",
        TransportState::Paused => "Paused",
        TransportState::Stopped => "Stopped",
    };
    parts.push(state.to_string());

    if engine.state() != TransportState::Stopped {
        if let Some(title) = engine.now_playing() {
            parts.push(format!("Song: {title}"));
        }
    }

    parts.push(format!("Loop: {}", loop_mode_label(engine.loop_mode())));
    parts.push(format!("Volume: {:.0}%", engine.volume() * 100.0));
    parts.push(format!("Backend: {}", engine.backend_kind()));

    if let Some(dir) = &app.current_dir {
        parts.push(format!("Dir: {dir}"));
    }

    let mut text = parts.join(" • ");
    if let Some(input) = &app.input {
        text.push('\n');
        text.push_str(&format!("{}: {}_", input.prompt.label(), input.buffer));
    } else if let Some(msg) = &app.message {
        text.push('\n');
        text.push_str(msg);
    }
    text
}

/// Window of `total` rows of height `height` that keeps `selected` centred
/// when possible. Returns `(start, end)`.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn draw_tracks(frame: &mut Frame, app: &App, area: Rect) {
    let playing = app.now_playing_index();
    let total = app.view.len();
    let height = area.height.saturating_sub(2) as usize;
    let (start, end) = visible_window(total, height, app.selected);

    let items: Vec<ListItem> = app.view[start..end]
        .iter()
        .enumerate()
        .map(|(offset, path)| {
            let index = start + offset;
            let marker = if Some(index) == playing { "♪ " } else { "  " };
            let star = if app.store.is_favourite(path) { " ★" } else { "" };
            ListItem::new(format!("{marker}{}{star}", app.title(path)))
        })
        .collect();

    let title = format!(" {} ({}) ", app.playlist, total);
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(app.selected - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the entire UI into `frame`.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(5),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" allegro ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let names = app.store.names();
    let active = names.iter().position(|n| *n == app.playlist).unwrap_or(0);
    let tabs = Tabs::new(names.into_iter().map(Line::from).collect::<Vec<_>>())
        .select(active)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED))
        .block(Block::default().borders(Borders::ALL).title(" playlists "));
    frame.render_widget(tabs, chunks[1]);

    draw_tracks(frame, app, chunks[2]);

    let status = Paragraph::new(status_text(app))
        .block(padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[3]);

    let progress = app.engine.progress();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .ratio(progress.ratio)
        .label(progress.label());
    frame.render_widget(gauge, chunks[4]);

    let footer = Paragraph::new(controls_text())
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);
}
