//! Audio backends.
//!
//! `Backend` is the capability the engine drives. Two adapters implement it:
//! `FullBackend` over a media-player style engine and `DegradedBackend` over
//! a mixer-style one. Both have `rodio` implementations in `native`.

mod degraded;
mod full;
mod native;
mod select;
mod sink;
mod types;

pub use select::open_backend;
pub use types::{Backend, BackendKind};

#[cfg(test)]
mod tests;
