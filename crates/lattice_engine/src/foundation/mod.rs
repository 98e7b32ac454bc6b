//! Foundation module - shared utilities
//!
//! Small pieces the rest of the engine leans on:
//! - Math types and the local transform
//! - Pulse timing
//! - Logging setup
//! - Sandboxed path resolution for script-supplied file names

pub mod logging;
pub mod math;
pub mod paths;
pub mod time;
