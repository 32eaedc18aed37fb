//! Best-effort track metadata: display titles and durations.
//!
//! Neither lookup ever fails the caller. Unreadable or untagged files fall
//! back to a title derived from the file name and to "no duration".

use std::path::Path;
use std::time::Duration;

use lofty::prelude::*;

/// Title used when nothing better can be derived.
pub const UNKNOWN_TITLE: &str = "Unknown Song";

/// Separators tried, in order, when splitting "Artist - Title" file names.
const TITLE_SEPARATORS: [&str; 5] = [" - ", " – ", " — ", "-", "_"];

/// Resolve the display title for `path`.
///
/// Prefers the title tag of the primary (or first) tag block. Falls back to
/// [`title_from_filename`].
pub fn title_for(path: &Path) -> String {
    match tag_title(path) {
        Some(title) => title,
        None => title_from_filename(path),
    }
}

fn tag_title(path: &Path) -> Option<String> {
    let tagged = lofty::read_from_path(path).ok()?;
    let tag = tagged.primary_tag().or_else(|| tagged.first_tag())?;
    let title = tag.title()?;
    let title = title.trim();
    if title.is_empty() || title == "Unknown" {
        return None;
    }
    Some(title.to_string())
}

/// Derive a title from the file name alone.
///
/// `"01 - Artist - My Song.mp3"` becomes `"My Song"`, `"07. Intro.ogg"`
/// becomes `"Intro"`.
pub fn title_from_filename(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut name = stem.as_str();
    for sep in TITLE_SEPARATORS {
        if name.contains(sep) {
            if let Some(last) = name.rsplit(sep).next() {
                name = last.trim();
            }
            break;
        }
    }

    let name = strip_track_number(name).trim();
    if name.is_empty() {
        UNKNOWN_TITLE.to_string()
    } else {
        name.to_string()
    }
}

/// Strip one leading `digits` + `[. -_ whitespace]+` prefix. Digits that are
/// not followed by punctuation are kept ("1979" stays "1979").
fn strip_track_number(name: &str) -> &str {
    let rest = name.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == name.len() {
        return name;
    }
    let stripped = rest.trim_start_matches(|c: char| matches!(c, '.' | '-' | '_') || c.is_whitespace());
    if stripped.len() == rest.len() {
        name
    } else {
        stripped
    }
}

/// Track length read from the file's audio properties, if it can be parsed.
pub fn duration_for(path: &Path) -> Option<Duration> {
    let tagged = lofty::read_from_path(path).ok()?;
    let duration = tagged.properties().duration();
    if duration.is_zero() { None } else { Some(duration) }
}
