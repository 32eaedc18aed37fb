//! Configuration loader and schema types.
//!
//! Settings drive backend selection, the tick cadence, library scanning and
//! logging. They are read once at startup.

mod load;
mod schema;

pub use schema::*;
