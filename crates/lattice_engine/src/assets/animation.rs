//! Animation clip loading
//!
//! Clips ship in the `.lga` container, little-endian:
//!
//! ```text
//! magic   b"LGA1"
//! u32     bone count
//! u32     frame count
//! f32     frames per second
//! f32[10] per bone per frame: position xyz, rotation xyzw, scale xyz
//! ```
//!
//! The frame payload is length-checked and then skipped; pose sampling
//! belongs to the animation runtime, which sits outside this crate.

use super::{read_bytes, AssetError, ByteReader};
use std::path::Path;

/// Floats per bone in one frame: position, quaternion, scale.
const FLOATS_PER_BONE: usize = 10;

/// Summary of a parsed animation clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationData {
    /// Bones posed by every frame
    pub bone_count: u32,
    /// Total frames in the clip
    pub frame_count: u32,
    /// Playback rate in frames per second
    pub fps: f32,
}

/// Load and validate a `.lga` clip.
pub fn load_animation(path: &Path) -> Result<AnimationData, AssetError> {
    parse_lga(&read_bytes(path)?)
}

fn parse_lga(data: &[u8]) -> Result<AnimationData, AssetError> {
    let mut reader = ByteReader::new(data);
    if reader.bytes(4)? != b"LGA1" {
        return Err(AssetError::InvalidData("bad animation magic".to_owned()));
    }
    let bone_count = reader.u32()?;
    let frame_count = reader.u32()?;
    let fps = reader.f32()?;
    if bone_count == 0 || frame_count == 0 {
        return Err(AssetError::InvalidData(
            "animation without bones or frames".to_owned(),
        ));
    }
    if !(fps.is_finite() && fps > 0.0) {
        return Err(AssetError::InvalidData(format!("bad frame rate {fps}")));
    }

    let expected = (bone_count as usize)
        .checked_mul(frame_count as usize)
        .and_then(|poses| poses.checked_mul(FLOATS_PER_BONE * 4))
        .ok_or_else(|| {
            AssetError::InvalidData(format!(
                "frame payload for {bone_count} bones over {frame_count} frames overflows"
            ))
        })?;
    if reader.remaining() != expected {
        return Err(AssetError::InvalidData(format!(
            "frame payload is {} bytes, expected {expected}",
            reader.remaining()
        )));
    }
    Ok(AnimationData {
        bone_count,
        frame_count,
        fps,
    })
}

/// Serialize a clip header plus a zeroed frame payload.
///
/// Fixture producer for the asset pipeline and tests.
#[must_use]
pub fn encode_lga(data: &AnimationData) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"LGA1");
    out.extend_from_slice(&data.bone_count.to_le_bytes());
    out.extend_from_slice(&data.frame_count.to_le_bytes());
    out.extend_from_slice(&data.fps.to_le_bytes());
    let payload = data.bone_count as usize * data.frame_count as usize * FLOATS_PER_BONE * 4;
    out.resize(out.len() + payload, 0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_survives_encoding() {
        let clip = AnimationData {
            bone_count: 12,
            frame_count: 48,
            fps: 24.0,
        };
        assert_eq!(parse_lga(&encode_lga(&clip)).unwrap(), clip);
    }

    #[test]
    fn short_payload_is_rejected() {
        let mut bytes = encode_lga(&AnimationData {
            bone_count: 2,
            frame_count: 4,
            fps: 30.0,
        });
        bytes.pop();
        assert!(matches!(
            parse_lga(&bytes),
            Err(AssetError::InvalidData(_))
        ));
    }

    #[test]
    fn zero_bones_is_rejected() {
        let bytes = encode_lga(&AnimationData {
            bone_count: 0,
            frame_count: 4,
            fps: 30.0,
        });
        assert!(matches!(
            parse_lga(&bytes),
            Err(AssetError::InvalidData(_))
        ));
    }

    #[test]
    fn absurd_counts_are_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"LGA1");
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        bytes.extend_from_slice(&30.0_f32.to_le_bytes());
        assert!(matches!(
            parse_lga(&bytes),
            Err(AssetError::InvalidData(_))
        ));
    }
}
