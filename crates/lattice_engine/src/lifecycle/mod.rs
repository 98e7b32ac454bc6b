//! Element lifecycle
//!
//! The ownership core of the engine. [`registry`] owns every live
//! element behind generational handles, [`relations`] keeps the
//! dependency edges between them consistent, and [`manager`] wraps both
//! with the factory and destruction entry points everything outside
//! this module goes through.

pub mod manager;
pub mod registry;
pub mod relations;

pub use manager::{ElementError, ElementManager};
pub use registry::ElementRegistry;
pub use relations::{RelationError, RelationGraph};
