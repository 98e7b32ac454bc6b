//! Animation element

use crate::assets::AnimationData;

/// Skeletal animation clip.
///
/// Clips only bind to models whose skeleton has exactly the same bone
/// count; the relation layer enforces that before wiring the pair up.
#[derive(Debug)]
pub struct Animation {
    bone_count: u32,
    frame_count: u32,
    fps: f32,
}

impl Animation {
    /// Build the element from loaded clip data.
    #[must_use]
    pub fn from_data(data: &AnimationData) -> Self {
        Self {
            bone_count: data.bone_count,
            frame_count: data.frame_count,
            fps: data.fps,
        }
    }

    /// Number of bones each frame poses.
    #[must_use]
    pub fn bone_count(&self) -> u32 {
        self.bone_count
    }

    /// Total frames in the clip.
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Playback rate in frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Clip length in seconds.
    #[must_use]
    pub fn duration(&self) -> f32 {
        if self.fps > 0.0 {
            self.frame_count as f32 / self.fps
        } else {
            0.0
        }
    }
}
