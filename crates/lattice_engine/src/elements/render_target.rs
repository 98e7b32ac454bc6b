//! Render target element

use super::texture::Filtering;

/// Attachment layout of an offscreen render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTargetKind {
    /// Depth-only target for shadow passes
    Shadow,
    /// Opaque color target
    Rgb,
    /// Color target with alpha
    Rgba,
    /// High-precision opaque color target
    RgbFloat,
    /// High-precision color target with alpha
    RgbaFloat,
}

/// Offscreen render surface usable as a sampler source.
#[derive(Debug)]
pub struct RenderTarget {
    kind: RenderTargetKind,
    width: u32,
    height: u32,
    filtering: Filtering,
}

impl RenderTarget {
    /// Describe a target; dimension validation happens at the factory.
    #[must_use]
    pub fn new(kind: RenderTargetKind, width: u32, height: u32, filtering: Filtering) -> Self {
        Self {
            kind,
            width,
            height,
            filtering,
        }
    }

    /// Attachment layout.
    #[must_use]
    pub fn kind(&self) -> RenderTargetKind {
        self.kind
    }

    /// Width and height in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Sampling filter used when the target is read back as a texture.
    #[must_use]
    pub fn filtering(&self) -> Filtering {
        self.filtering
    }

    /// Whether the color layout carries alpha.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        matches!(self.kind, RenderTargetKind::Rgba | RenderTargetKind::RgbaFloat)
    }

    /// Whether this is a depth-only shadow target.
    #[must_use]
    pub fn is_shadow(&self) -> bool {
        self.kind == RenderTargetKind::Shadow
    }
}
