//! Texture element

/// Sampling filter applied when a drawable is stretched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filtering {
    /// Nearest-texel lookup
    #[default]
    Nearest,
    /// Bilinear interpolation
    Linear,
}

/// Pixel layout of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    /// Opaque RGB image
    Rgb,
    /// RGBA image with an alpha channel
    Rgba,
    /// Six-faced cubemap
    Cubemap,
}

/// Image sampler source.
#[derive(Debug)]
pub struct Texture {
    kind: TextureKind,
    width: u32,
    height: u32,
    filtering: Filtering,
}

impl Texture {
    /// Flat 2D texture.
    #[must_use]
    pub fn flat(kind: TextureKind, width: u32, height: u32, filtering: Filtering) -> Self {
        Self {
            kind,
            width,
            height,
            filtering,
        }
    }

    /// Cubemap texture; `width` and `height` describe one face.
    #[must_use]
    pub fn cubemap(width: u32, height: u32, filtering: Filtering) -> Self {
        Self {
            kind: TextureKind::Cubemap,
            width,
            height,
            filtering,
        }
    }

    /// Pixel layout.
    #[must_use]
    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    /// Width and height in pixels (per face for cubemaps).
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Sampling filter.
    #[must_use]
    pub fn filtering(&self) -> Filtering {
        self.filtering
    }

    /// Whether this texture samples as a cube.
    #[must_use]
    pub fn is_cubemap(&self) -> bool {
        self.kind == TextureKind::Cubemap
    }

    /// Whether the pixel layout carries alpha.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.kind == TextureKind::Rgba
    }
}
