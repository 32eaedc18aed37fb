use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Prompt};
use crate::config;
use crate::ui;

/// Main terminal event loop: ticks the engine on schedule, draws, and maps
/// keys onto the app. Returns `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick = Duration::from_millis(settings.playback.tick_ms);
    let mut next_tick = Instant::now();

    loop {
        if Instant::now() >= next_tick {
            app.tick();
            next_tick = Instant::now() + tick;
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        let timeout = next_tick.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app) {
                    app.stop();
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply one key press. Returns `true` when the user asked to quit.
pub fn handle_key_event(key: KeyEvent, settings: &config::Settings, app: &mut App) -> bool {
    if app.input.is_some() {
        match key.code {
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Enter => app.submit_input(),
            KeyCode::Backspace => app.pop_input_char(),
            KeyCode::Char(c) if !c.is_control() => app.push_input_char(c),
            _ => {}
        }
        return false;
    }

    let step = settings.audio.volume_step;
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => app.play_selected(),
        KeyCode::Char(' ') | KeyCode::Char('p') => app.toggle_play_pause(),
        KeyCode::Char('s') => app.stop(),
        KeyCode::Char('l') | KeyCode::Right => app.next_track(),
        KeyCode::Char('h') | KeyCode::Left => app.previous_track(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.change_volume(step),
        KeyCode::Char('-') => app.change_volume(-step),
        KeyCode::Char('r') => app.cycle_loop_mode(),
        KeyCode::Tab => app.next_playlist(),
        KeyCode::Char('f') => app.toggle_favourite(),
        KeyCode::Char('n') => app.begin_input(Prompt::NewPlaylist),
        KeyCode::Char('a') => app.begin_input(Prompt::AddToPlaylist),
        KeyCode::Char('d') => app.remove_selected(),
        KeyCode::Char('D') => app.delete_current_playlist(),
        _ => {}
    }
    false
}
