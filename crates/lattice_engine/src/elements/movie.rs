//! Movie element

use super::model::PlayState;
use crate::assets::{MovieFormat, MovieInfo};

/// Video stream usable as a flat sampler source.
///
/// The element tracks container metadata and playback intent; the host's
/// video backend owns decoding, finding active movies through the render
/// state's movie list.
#[derive(Debug)]
pub struct Movie {
    format: MovieFormat,
    byte_size: u64,
    framerate: Option<f32>,
    duration: Option<f32>,
    sample_rate: Option<u32>,
    state: PlayState,
    time: f32,
    volume: f32,
}

impl Movie {
    /// Build the element from probed container info.
    #[must_use]
    pub fn from_info(info: &MovieInfo) -> Self {
        Self {
            format: info.format,
            byte_size: info.byte_size,
            framerate: info.framerate,
            duration: info.duration,
            sample_rate: info.sample_rate,
            state: PlayState::Stopped,
            time: 0.0,
            volume: 1.0,
        }
    }

    /// Container format detected from the file header.
    #[must_use]
    pub fn format(&self) -> MovieFormat {
        self.format
    }

    /// File size in bytes.
    #[must_use]
    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    /// Video frame rate in frames per second, when the header states it.
    #[must_use]
    pub fn framerate(&self) -> Option<f32> {
        self.framerate
    }

    /// Stream length in seconds, when the header states it.
    #[must_use]
    pub fn duration(&self) -> Option<f32> {
        self.duration
    }

    /// Audio sample rate in Hz, when an audio stream is declared.
    #[must_use]
    pub fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    /// Current playback state.
    #[must_use]
    pub fn play_state(&self) -> PlayState {
        self.state
    }

    /// Start or resume playback.
    pub fn play(&mut self) {
        self.state = PlayState::Playing;
    }

    /// Pause playback. False unless it was playing.
    pub fn pause(&mut self) -> bool {
        if self.state == PlayState::Playing {
            self.state = PlayState::Paused;
            true
        } else {
            false
        }
    }

    /// Halt playback and rewind to the start.
    pub fn stop(&mut self) {
        self.state = PlayState::Stopped;
        self.time = 0.0;
    }

    /// Seconds into the stream.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Seek to `time` seconds, clamped to the stream length when known.
    pub fn set_time(&mut self, time: f32) {
        let time = time.max(0.0);
        self.time = match self.duration {
            Some(duration) => time.min(duration),
            None => time,
        };
    }

    /// Audio track volume in `0.0..=1.0`.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Set the audio track volume, clamped to `0.0..=1.0`.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn menu_movie() -> Movie {
        Movie::from_info(&MovieInfo {
            format: MovieFormat::Avi,
            byte_size: 1024,
            framerate: Some(25.0),
            duration: Some(9.6),
            sample_rate: Some(44_100),
        })
    }

    #[test]
    fn probed_fields_reach_the_element() {
        let movie = menu_movie();
        assert_eq!(movie.format(), MovieFormat::Avi);
        assert_relative_eq!(movie.framerate().unwrap(), 25.0);
        assert_relative_eq!(movie.duration().unwrap(), 9.6);
        assert_eq!(movie.sample_rate(), Some(44_100));
        assert_eq!(movie.play_state(), PlayState::Stopped);
    }

    #[test]
    fn playback_walks_play_pause_stop() {
        let mut movie = menu_movie();
        assert!(!movie.pause());
        movie.play();
        assert_eq!(movie.play_state(), PlayState::Playing);
        assert!(movie.pause());
        assert_eq!(movie.play_state(), PlayState::Paused);
        movie.play();
        movie.set_time(3.0);
        movie.stop();
        assert_eq!(movie.play_state(), PlayState::Stopped);
        assert_relative_eq!(movie.time(), 0.0);
    }

    #[test]
    fn seeking_clamps_to_the_stream() {
        let mut movie = menu_movie();
        movie.set_time(-2.0);
        assert_relative_eq!(movie.time(), 0.0);
        movie.set_time(99.0);
        assert_relative_eq!(movie.time(), 9.6);

        let mut unknown = Movie::from_info(&MovieInfo {
            format: MovieFormat::Matroska,
            byte_size: 0,
            framerate: None,
            duration: None,
            sample_rate: None,
        });
        unknown.set_time(99.0);
        assert_relative_eq!(unknown.time(), 99.0);
    }
}
