//! File system module
//!
//! Tree walking and the per-file encrypt/decrypt codec.

mod codec;
mod producer;

pub use codec::*;
pub use producer::*;
