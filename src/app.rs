//! Application module: the host-side model driven by the runtime and read by
//! the UI.

mod model;

pub use model::*;
