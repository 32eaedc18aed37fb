//! Playback engine module: exposes the backend-agnostic `Engine` and its
//! transport/progress types.

mod model;
mod state;

pub use model::*;
pub use state::*;
