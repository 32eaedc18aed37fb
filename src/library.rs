//! Track library: scanning, metadata lookup and in-memory playlists.

mod metadata;
mod scan;
mod store;

pub use metadata::{duration_for, title_for, title_from_filename};
pub use scan::scan;
pub use store::{ALL, FAVOURITE, PlaylistStore};
