use std::fs::OpenOptions;

use env_logger::{Builder, Env, Target};

use crate::config::LoggingSettings;

/// Install the global logger. `RUST_LOG` wins over `settings.level`.
///
/// The terminal belongs to the UI, so a configured log file is preferred over
/// stderr. Returns whether the logger was installed; failures are reported
/// on stderr.
pub fn init(settings: &LoggingSettings) -> bool {
    let mut builder = Builder::from_env(Env::default().default_filter_or(settings.level.as_str()));
    builder.format_timestamp_millis();

    if let Some(path) = &settings.file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("allegro: cannot open log file {}: {e}", path.display()),
        }
    }

    match builder.try_init() {
        Ok(()) => true,
        Err(e) => {
            eprintln!("allegro: logging disabled: {e}");
            false
        }
    }
}
