//! Sound element

use crate::assets::SoundInfo;

/// Audio stream opened from disk.
///
/// The element tracks stream metadata and playback intent; feeding an
/// audio device is the host application's job.
#[derive(Debug)]
pub struct Sound {
    looped: bool,
    channels: u16,
    sample_rate: u32,
    duration: Option<f32>,
    volume: f32,
}

impl Sound {
    /// Build the element from probed stream info.
    #[must_use]
    pub fn from_info(info: &SoundInfo, looped: bool) -> Self {
        Self {
            looped,
            channels: info.channels,
            sample_rate: info.sample_rate,
            duration: info.duration,
            volume: 1.0,
        }
    }

    /// Whether playback restarts at the end of the stream.
    #[must_use]
    pub fn is_looped(&self) -> bool {
        self.looped
    }

    /// Channel count of the stream.
    #[must_use]
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Sample rate in Hz.
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Stream length in seconds, when the container states it.
    #[must_use]
    pub fn duration(&self) -> Option<f32> {
        self.duration
    }

    /// Playback volume in `0.0..=1.0`.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Set the playback volume, clamped to `0.0..=1.0`.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}
