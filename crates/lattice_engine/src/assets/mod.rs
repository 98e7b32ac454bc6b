//! Asset loading
//!
//! Parsers and probes behind the element factories. Everything here is
//! synchronous and side-effect free; the async geometry path wraps
//! [`geometry::load_geometry`] in a worker thread without changing its
//! contract.

pub mod animation;
pub mod async_loader;
pub mod geometry;
pub mod images;
pub mod media;
pub mod shader_source;

pub use animation::{encode_lga, load_animation, AnimationData};
pub use async_loader::{AsyncGeometryLoader, GeometryTicket, LoadedGeometry};
pub use geometry::{encode_lgm, load_geometry, BoneData, GeometryData, Vertex};
pub use images::{load_cubemap, load_texture, TextureData};
pub use media::{
    probe_font, probe_movie, probe_sound, MovieFormat, MovieInfo, SoundFormat, SoundInfo,
};
pub use shader_source::{load_shader_program, ShaderSources};

use std::path::Path;
use thiserror::Error;

/// Errors produced while loading or probing assets.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The file does not exist under the working directory.
    #[error("asset not found: {0}")]
    NotFound(String),
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Image decoding failure.
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    /// Wavefront OBJ parsing failure.
    #[error("obj parse error: {0}")]
    Obj(#[from] tobj::LoadError),
    /// The bytes were readable but not a valid asset of the kind.
    #[error("invalid asset data: {0}")]
    InvalidData(String),
    /// The extension or magic bytes match no supported format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Read a whole file, mapping a missing file to [`AssetError::NotFound`].
pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => AssetError::NotFound(path.display().to_string()),
        _ => AssetError::Io(source),
    })
}

/// Little-endian cursor over a byte slice for the binary asset formats.
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], AssetError> {
        if self.remaining() < count {
            return Err(AssetError::InvalidData(format!(
                "unexpected end of data at byte {}",
                self.offset
            )));
        }
        let slice = &self.data[self.offset..self.offset + count];
        self.offset += count;
        Ok(slice)
    }

    pub(crate) fn bytes(&mut self, count: usize) -> Result<&'a [u8], AssetError> {
        self.take(count)
    }

    pub(crate) fn u32(&mut self) -> Result<u32, AssetError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn u16(&mut self) -> Result<u16, AssetError> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub(crate) fn i32(&mut self) -> Result<i32, AssetError> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn f32(&mut self) -> Result<f32, AssetError> {
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read `count` consecutive `f32` values in one copy.
    pub(crate) fn f32_slice(&mut self, count: usize) -> Result<Vec<f32>, AssetError> {
        let bytes = self.take(count * 4)?;
        Ok(bytemuck::pod_collect_to_vec(bytes))
    }

    /// Read `count` consecutive `u32` values in one copy.
    pub(crate) fn u32_slice(&mut self, count: usize) -> Result<Vec<u32>, AssetError> {
        let bytes = self.take(count * 4)?;
        Ok(bytemuck::pod_collect_to_vec(bytes))
    }
}
