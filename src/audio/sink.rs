//! Utilities for opening the output stream and creating `rodio` sinks.
//!
//! Every track gets a fresh paused `Sink`; the caller decides when it starts.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use super::types::NativeError;

/// Open the default output device.
pub(super) fn open_stream() -> Result<OutputStream, NativeError> {
    let mut stream = OutputStreamBuilder::open_default_stream()
        .map_err(|e| NativeError::Device(e.to_string()))?;
    // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
    // but noisy for a TUI app.
    stream.log_on_drop(false);
    Ok(stream)
}

/// Create a paused `Sink` for `path`, returning the decoder's reported length.
pub(super) fn create_sink(
    stream: &OutputStream,
    path: &Path,
) -> Result<(Sink, Option<Duration>), NativeError> {
    let file = File::open(path).map_err(|source| NativeError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let source =
        Decoder::new(BufReader::new(file)).map_err(|e| NativeError::Decode(e.to_string()))?;
    let total = source.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}

pub(super) fn millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}
