//! Logging setup
//!
//! The engine logs through the `log` facade; binaries pick the backend.
//! [`init`] wires up `env_logger` for hosts that do not bring their own.

pub use log::{debug, error, info, trace, warn};

/// Initialize `env_logger` from the `RUST_LOG` environment variable.
///
/// Call once at startup. Panics if a logger is already installed.
pub fn init() {
    env_logger::init();
}

/// Initialize `env_logger`, ignoring a logger that is already installed.
///
/// Handy in tests where several harness binaries race to initialize.
pub fn try_init() {
    let _ = env_logger::Builder::from_default_env().try_init();
}
