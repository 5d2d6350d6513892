//! Configuration module for DirCrypt
//!
//! CLI arguments, processing mode, and runtime settings.

mod settings;

pub use settings::*;
