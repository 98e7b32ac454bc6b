//! # Lattice Engine
//!
//! The element lifecycle core of a scriptable 3D engine.
//!
//! Everything a script can touch is an element behind a generational
//! handle: scenes, cameras, models, geometry, shaders, collision bodies,
//! and the rest of the taxonomy in [`elements`]. The crate's job is to
//! keep that population consistent: elements are born through factories
//! that refuse to register anything half-loaded, wired together through
//! a relation graph that validates every edge, and destroyed through a
//! cascade that walks their relations and detaches them from every
//! subsystem before the memory goes away.
//!
//! ## Features
//!
//! - **Generational handles**: stale references fail validation forever
//!   instead of aliasing recycled slots
//! - **Relation graph**: typed attach/detach operations with per-pair
//!   break processing when either endpoint dies
//! - **Fixed-order destruction**: one cascade per element kind across
//!   render state, physics, and the transform tree
//! - **Background geometry loading**: worker-thread parsing with
//!   main-thread-only registration
//! - **TOML/RON configuration**: one config type, two file formats
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lattice_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::new(EngineConfig::new("game_data"))?;
//!
//!     let scene = engine.elements_mut().create_scene();
//!     let camera = engine.elements_mut().create_camera(Projection::Perspective);
//!     engine.elements_mut().set_scene_camera(scene, camera)?;
//!     engine.set_active_scene(scene)?;
//!
//!     engine.pulse();
//!
//!     engine.destroy_element(scene);
//!     engine.shutdown();
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod config;
pub mod elements;
pub mod engine;
pub mod foundation;
pub mod lifecycle;
pub mod physics;
pub mod prerender;
pub mod render;

pub use engine::{Engine, EngineError};

/// Common imports for engine users.
pub mod prelude {
    pub use crate::assets::GeometryTicket;
    pub use crate::config::{Config, ConfigError, EngineConfig, PhysicsConfig};
    pub use crate::elements::{
        CollisionShape, ElementHandle, ElementKind, Filtering, Projection, RenderTargetKind,
        TextureKind,
    };
    pub use crate::engine::{Engine, EngineError};
    pub use crate::foundation::math::{Mat4, Transform, Vec3};
    pub use crate::lifecycle::{ElementError, ElementManager, RelationError};
    pub use crate::physics::CollisionLayers;
}
