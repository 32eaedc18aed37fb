use std::env;
use std::path::{Path, PathBuf};

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::engine::Engine;
use crate::library::{ALL, PlaylistStore, scan};

mod event_loop;
mod logging;
mod settings;

/// Directory scanned at startup: the first argument, else `./songs` when it
/// exists, else the current directory.
fn library_dir() -> PathBuf {
    if let Some(dir) = env::args().nth(1) {
        return PathBuf::from(dir);
    }
    let songs = Path::new("songs");
    if songs.is_dir() {
        return songs.to_path_buf();
    }
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_problem) = settings::load_settings();
    logging::init(&settings.logging);
    if let Some(problem) = config_problem {
        warn!("{problem}");
    }

    let dir = library_dir();
    let mut store = PlaylistStore::new();
    for path in scan(&dir, &settings.library) {
        store.add_to_library(&path);
    }
    info!("loaded {} tracks from {}", store.len(ALL), dir.display());

    // Without any backend there is nothing to drive; report before touching the terminal.
    let engine = Engine::new(&settings)?;
    let mut app = App::new(engine, store);
    app.set_current_dir(dir.display().to_string());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
