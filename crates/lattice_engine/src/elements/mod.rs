//! Element taxonomy
//!
//! Everything scripts can create, wire together, and destroy is an
//! element. Each concrete kind gets its own module; the [`Element`] enum
//! ties them into one storable value so the registry can own every
//! element in a single container and subsystems can dispatch on kind
//! without downcasting.

pub mod animation;
pub mod camera;
pub mod collision;
pub mod file;
pub mod font;
pub mod geometry;
pub mod light;
pub mod model;
pub mod movie;
pub mod render_target;
pub mod scene;
pub mod shader;
pub mod sound;
pub mod texture;

pub use animation::Animation;
pub use camera::{Camera, Projection};
pub use collision::{Collision, CollisionShape};
pub use file::FileStream;
pub use font::Font;
pub use geometry::Geometry;
pub use light::Light;
pub use model::{Model, PlayState};
pub use movie::Movie;
pub use render_target::{RenderTarget, RenderTargetKind};
pub use scene::Scene;
pub use shader::Shader;
pub use sound::Sound;
pub use texture::{Filtering, Texture, TextureKind};

use slotmap::new_key_type;

new_key_type! {
    /// Generational handle identifying a registered element.
    ///
    /// Handles are the only element reference that crosses a subsystem
    /// boundary. Destroying an element bumps the generation of its slot,
    /// so a stale handle keeps failing validation instead of silently
    /// aliasing whatever reuses the slot.
    pub struct ElementHandle;
}

/// Discriminant naming each element variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// World container holding the active camera and light
    Scene,
    /// View and projection source
    Camera,
    /// Light parameters
    Light,
    /// Skeletal animation clip
    Animation,
    /// Mesh data shared between models
    Geometry,
    /// Placeable instance of a geometry
    Model,
    /// Shader program with sampler bind slots
    Shader,
    /// Audio stream
    Sound,
    /// Offscreen render surface
    RenderTarget,
    /// Image sampler source
    Texture,
    /// Physics body that can drive a model
    Collision,
    /// Video stream usable as a sampler source
    Movie,
    /// Raw file opened on behalf of scripts
    File,
    /// Glyph atlas for text drawing
    Font,
}

impl ElementKind {
    /// Stable lowercase name used in logs and script-facing errors.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Scene => "scene",
            Self::Camera => "camera",
            Self::Light => "light",
            Self::Animation => "animation",
            Self::Geometry => "geometry",
            Self::Model => "model",
            Self::Shader => "shader",
            Self::Sound => "sound",
            Self::RenderTarget => "render-target",
            Self::Texture => "texture",
            Self::Collision => "collision",
            Self::Movie => "movie",
            Self::File => "file",
            Self::Font => "font",
        }
    }

    /// Whether this kind can occupy a shader sampler slot.
    #[must_use]
    pub const fn is_drawable(self) -> bool {
        matches!(self, Self::Texture | Self::RenderTarget | Self::Movie)
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A managed engine object.
///
/// Variants carry the full per-kind state; cross-element references are
/// stored as [`ElementHandle`]s, never as direct pointers into the
/// registry.
#[derive(Debug)]
pub enum Element {
    /// See [`Scene`]
    Scene(Scene),
    /// See [`Camera`]
    Camera(Camera),
    /// See [`Light`]
    Light(Light),
    /// See [`Animation`]
    Animation(Animation),
    /// See [`Geometry`]
    Geometry(Geometry),
    /// See [`Model`]
    Model(Model),
    /// See [`Shader`]
    Shader(Shader),
    /// See [`Sound`]
    Sound(Sound),
    /// See [`RenderTarget`]
    RenderTarget(RenderTarget),
    /// See [`Texture`]
    Texture(Texture),
    /// See [`Collision`]
    Collision(Collision),
    /// See [`Movie`]
    Movie(Movie),
    /// See [`FileStream`]
    File(FileStream),
    /// See [`Font`]
    Font(Font),
}

impl Element {
    /// Discriminant of this element.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Scene(_) => ElementKind::Scene,
            Self::Camera(_) => ElementKind::Camera,
            Self::Light(_) => ElementKind::Light,
            Self::Animation(_) => ElementKind::Animation,
            Self::Geometry(_) => ElementKind::Geometry,
            Self::Model(_) => ElementKind::Model,
            Self::Shader(_) => ElementKind::Shader,
            Self::Sound(_) => ElementKind::Sound,
            Self::RenderTarget(_) => ElementKind::RenderTarget,
            Self::Texture(_) => ElementKind::Texture,
            Self::Collision(_) => ElementKind::Collision,
            Self::Movie(_) => ElementKind::Movie,
            Self::File(_) => ElementKind::File,
            Self::Font(_) => ElementKind::Font,
        }
    }

    /// Stable lowercase name of this element's kind.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    /// Whether this element can occupy a shader sampler slot.
    #[must_use]
    pub const fn is_drawable(&self) -> bool {
        self.kind().is_drawable()
    }

    /// True for cubemap textures; flat textures, render targets, and
    /// movies all sample as 2D.
    #[must_use]
    pub fn samples_as_cube(&self) -> bool {
        match self {
            Self::Texture(texture) => texture.is_cubemap(),
            _ => false,
        }
    }
}
