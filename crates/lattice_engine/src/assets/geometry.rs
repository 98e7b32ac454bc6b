//! Mesh loading
//!
//! Two on-disk formats feed geometry elements: Wavefront OBJ for static
//! meshes and the engine's own `.lgm` container for skinned ones. Both
//! land in the same [`GeometryData`], so the rest of the engine never
//! cares which format a mesh came from.
//!
//! `.lgm` layout, all little-endian:
//!
//! ```text
//! magic   b"LGM1"
//! u32     vertex count
//! u32     index count
//! u32     bone count
//! f32[8]  per vertex: position xyz, normal xyz, uv
//! u32     per index
//! bones   per bone: u16 name length, name bytes, i32 parent index
//! ```

use super::{read_bytes, AssetError, ByteReader};
use crate::foundation::paths::has_extension;
use std::path::Path;

/// One interleaved mesh vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Model-space position
    pub position: [f32; 3],
    /// Model-space normal
    pub normal: [f32; 3],
    /// Texture coordinate
    pub uv: [f32; 2],
}

/// One skeleton bone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoneData {
    /// Bone name from the authoring tool
    pub name: String,
    /// Index of the parent bone, `-1` for the root
    pub parent: i32,
}

/// Fully parsed mesh ready to back a geometry element.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Unique vertices
    pub vertices: Vec<Vertex>,
    /// Triangle list indices into `vertices`
    pub indices: Vec<u32>,
    /// Skeleton bones; empty for static meshes
    pub bones: Vec<BoneData>,
    /// Radius of the model-space bounding sphere
    pub bound_radius: f32,
}

/// Load a mesh, picking the parser from the file extension.
pub fn load_geometry(path: &Path) -> Result<GeometryData, AssetError> {
    if has_extension(path, "obj") {
        load_obj(path)
    } else if has_extension(path, "lgm") {
        parse_lgm(&read_bytes(path)?)
    } else {
        Err(AssetError::UnsupportedFormat(path.display().to_string()))
    }
}

fn load_obj(path: &Path) -> Result<GeometryData, AssetError> {
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let (meshes, _materials) = tobj::load_obj(path, &options)?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for mesh in meshes {
        let mesh = mesh.mesh;
        let base = vertices.len() as u32;
        let count = mesh.positions.len() / 3;
        for i in 0..count {
            let normal = if mesh.normals.len() >= (i + 1) * 3 {
                [
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    mesh.normals[i * 3 + 2],
                ]
            } else {
                [0.0, 0.0, 0.0]
            };
            let uv = if mesh.texcoords.len() >= (i + 1) * 2 {
                [mesh.texcoords[i * 2], mesh.texcoords[i * 2 + 1]]
            } else {
                [0.0, 0.0]
            };
            vertices.push(Vertex {
                position: [
                    mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    mesh.positions[i * 3 + 2],
                ],
                normal,
                uv,
            });
        }
        indices.extend(mesh.indices.iter().map(|&index| base + index));
    }
    if vertices.is_empty() {
        return Err(AssetError::InvalidData(format!(
            "{}: no vertices",
            path.display()
        )));
    }

    let bound_radius = bound_radius(&vertices);
    Ok(GeometryData {
        vertices,
        indices,
        bones: Vec::new(),
        bound_radius,
    })
}

fn parse_lgm(data: &[u8]) -> Result<GeometryData, AssetError> {
    let mut reader = ByteReader::new(data);
    if reader.bytes(4)? != b"LGM1" {
        return Err(AssetError::InvalidData("bad mesh magic".to_owned()));
    }
    let vertex_count = reader.u32()? as usize;
    let index_count = reader.u32()? as usize;
    let bone_count = reader.u32()? as usize;
    if index_count % 3 != 0 {
        return Err(AssetError::InvalidData(
            "index count is not a triangle list".to_owned(),
        ));
    }

    let raw = reader.f32_slice(vertex_count * 8)?;
    let vertices: Vec<Vertex> = raw
        .chunks_exact(8)
        .map(|v| Vertex {
            position: [v[0], v[1], v[2]],
            normal: [v[3], v[4], v[5]],
            uv: [v[6], v[7]],
        })
        .collect();

    let indices = reader.u32_slice(index_count)?;
    if let Some(&bad) = indices.iter().find(|&&index| index as usize >= vertex_count) {
        return Err(AssetError::InvalidData(format!(
            "index {bad} out of range for {vertex_count} vertices"
        )));
    }

    // Capacity from the header only up to what the payload could hold; a
    // serialized bone takes at least 6 bytes.
    let mut bones = Vec::with_capacity(bone_count.min(reader.remaining() / 6));
    for _ in 0..bone_count {
        let name_len = reader.u16()? as usize;
        let name = String::from_utf8(reader.bytes(name_len)?.to_vec())
            .map_err(|_| AssetError::InvalidData("bone name is not UTF-8".to_owned()))?;
        let parent = reader.i32()?;
        if parent >= 0 && parent as usize >= bone_count {
            return Err(AssetError::InvalidData(format!(
                "bone `{name}` has out-of-range parent {parent}"
            )));
        }
        bones.push(BoneData { name, parent });
    }

    let bound_radius = bound_radius(&vertices);
    Ok(GeometryData {
        vertices,
        indices,
        bones,
        bound_radius,
    })
}

fn bound_radius(vertices: &[Vertex]) -> f32 {
    vertices
        .iter()
        .map(|v| {
            let [x, y, z] = v.position;
            (x * x + y * y + z * z).sqrt()
        })
        .fold(0.0, f32::max)
}

/// Serialize mesh data back into the `.lgm` layout.
///
/// The asset pipeline and tests use this to produce fixtures; the
/// engine itself only reads.
#[must_use]
pub fn encode_lgm(data: &GeometryData) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"LGM1");
    out.extend_from_slice(&(data.vertices.len() as u32).to_le_bytes());
    out.extend_from_slice(&(data.indices.len() as u32).to_le_bytes());
    out.extend_from_slice(&(data.bones.len() as u32).to_le_bytes());
    for vertex in &data.vertices {
        for value in vertex
            .position
            .iter()
            .chain(&vertex.normal)
            .chain(&vertex.uv)
        {
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
    for index in &data.indices {
        out.extend_from_slice(&index.to_le_bytes());
    }
    for bone in &data.bones {
        out.extend_from_slice(&(bone.name.len() as u16).to_le_bytes());
        out.extend_from_slice(bone.name.as_bytes());
        out.extend_from_slice(&bone.parent.to_le_bytes());
    }
    out
}
