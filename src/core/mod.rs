//! Core pipeline module
//!
//! The job queue, the worker pool that drains it, and the engine that
//! wires producer, pool and reporting together.

mod engine;
mod pool;
mod queue;

pub use engine::*;
pub use pool::*;
pub use queue::*;
