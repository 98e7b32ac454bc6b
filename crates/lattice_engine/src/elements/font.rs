//! Font element

use super::texture::Filtering;

/// Glyph atlas for text drawing.
///
/// Rasterization happens in the render layer; the element pins down the
/// face parameters the atlas was built with.
#[derive(Debug)]
pub struct Font {
    point_size: u32,
    atlas_width: u32,
    atlas_height: u32,
    filtering: Filtering,
}

impl Font {
    /// Describe a font atlas.
    #[must_use]
    pub fn new(point_size: u32, atlas: (u32, u32), filtering: Filtering) -> Self {
        Self {
            point_size,
            atlas_width: atlas.0,
            atlas_height: atlas.1,
            filtering,
        }
    }

    /// Glyph size in points.
    #[must_use]
    pub fn point_size(&self) -> u32 {
        self.point_size
    }

    /// Atlas texture dimensions in pixels.
    #[must_use]
    pub fn atlas_size(&self) -> (u32, u32) {
        (self.atlas_width, self.atlas_height)
    }

    /// Sampling filter for glyph quads.
    #[must_use]
    pub fn filtering(&self) -> Filtering {
        self.filtering
    }
}
