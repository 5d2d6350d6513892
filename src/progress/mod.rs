//! Progress reporting module
//!
//! Sinks for per-file outcomes and the console status lines.

mod reporter;

pub use reporter::*;
