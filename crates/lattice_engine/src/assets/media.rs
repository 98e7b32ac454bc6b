//! Container probes for sound, movie, and font files
//!
//! Sound and movie elements only need stream metadata at creation time;
//! decoding is deferred to the host's audio and video backends. The
//! probes read file headers, so a corrupt or mislabeled file fails at
//! element creation instead of first playback.

use super::{read_bytes, AssetError, ByteReader};
use std::path::Path;

/// Detected audio container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundFormat {
    /// RIFF WAVE
    Wav,
    /// Ogg (Vorbis or Opus)
    Ogg,
    /// Free Lossless Audio Codec
    Flac,
}

/// Stream metadata for a sound element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundInfo {
    /// Detected container
    pub format: SoundFormat,
    /// Channel count, `0` when the container hides it in codec data
    pub channels: u16,
    /// Sample rate in Hz, `0` when unknown
    pub sample_rate: u32,
    /// Stream length in seconds, when the container states it
    pub duration: Option<f32>,
}

/// Probe an audio file header.
pub fn probe_sound(path: &Path) -> Result<SoundInfo, AssetError> {
    let data = read_bytes(path)?;
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WAVE" {
        return parse_wav(&data);
    }
    if data.starts_with(b"OggS") {
        return Ok(SoundInfo {
            format: SoundFormat::Ogg,
            channels: 0,
            sample_rate: 0,
            duration: None,
        });
    }
    if data.starts_with(b"fLaC") {
        return Ok(SoundInfo {
            format: SoundFormat::Flac,
            channels: 0,
            sample_rate: 0,
            duration: None,
        });
    }
    Err(AssetError::UnsupportedFormat(path.display().to_string()))
}

/// Walk RIFF chunks for `fmt ` and `data`.
fn parse_wav(data: &[u8]) -> Result<SoundInfo, AssetError> {
    let mut reader = ByteReader::new(data);
    reader.bytes(12)?;

    let mut channels = 0_u16;
    let mut sample_rate = 0_u32;
    let mut byte_rate = 0_u32;
    let mut data_len: Option<u32> = None;
    while reader.remaining() >= 8 {
        let id: [u8; 4] = reader.bytes(4)?.try_into().unwrap_or(*b"????");
        let size = reader.u32()?;
        match &id {
            b"fmt " => {
                if size < 16 {
                    return Err(AssetError::InvalidData("short wav fmt chunk".to_owned()));
                }
                let _audio_format = reader.u16()?;
                channels = reader.u16()?;
                sample_rate = reader.u32()?;
                byte_rate = reader.u32()?;
                // Skip the rest of the chunk: block align, bit depth, extras.
                reader.bytes(size as usize - 12)?;
            }
            b"data" => {
                data_len = Some(size);
                break;
            }
            _ => {
                // Chunks are word-aligned; odd sizes carry a pad byte.
                let skip = size as usize + size as usize % 2;
                if reader.remaining() < skip {
                    break;
                }
                reader.bytes(skip)?;
            }
        }
    }
    if channels == 0 || sample_rate == 0 {
        return Err(AssetError::InvalidData("wav without fmt chunk".to_owned()));
    }
    let duration = match (data_len, byte_rate) {
        (Some(len), rate) if rate > 0 => Some(len as f32 / rate as f32),
        _ => None,
    };
    Ok(SoundInfo {
        format: SoundFormat::Wav,
        channels,
        sample_rate,
        duration,
    })
}

/// Detected video container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieFormat {
    /// RIFF AVI
    Avi,
    /// Matroska or WebM
    Matroska,
    /// ISO MP4
    Mp4,
}

/// Container metadata for a movie element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovieInfo {
    /// Detected container
    pub format: MovieFormat,
    /// File size in bytes
    pub byte_size: u64,
    /// Video frame rate in frames per second, when the header states it
    pub framerate: Option<f32>,
    /// Stream length in seconds, when the header states it
    pub duration: Option<f32>,
    /// Audio sample rate in Hz, when an audio stream is declared
    pub sample_rate: Option<u32>,
}

impl MovieInfo {
    fn bare(format: MovieFormat, byte_size: u64) -> Self {
        Self {
            format,
            byte_size,
            framerate: None,
            duration: None,
            sample_rate: None,
        }
    }
}

/// Probe a video file header.
///
/// AVI main and stream headers yield frame rate, duration, and audio
/// sample rate; Matroska and MP4 detection stays magic-byte only, their
/// metadata lives too deep for a header probe.
pub fn probe_movie(path: &Path) -> Result<MovieInfo, AssetError> {
    let data = read_bytes(path)?;
    let byte_size = data.len() as u64;
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"AVI " {
        let mut info = MovieInfo::bare(MovieFormat::Avi, byte_size);
        scan_avi_chunks(&data[12..], 0, &mut info);
        return Ok(info);
    }
    if data.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Ok(MovieInfo::bare(MovieFormat::Matroska, byte_size));
    }
    if data.len() >= 12 && &data[4..8] == b"ftyp" {
        return Ok(MovieInfo::bare(MovieFormat::Mp4, byte_size));
    }
    Err(AssetError::UnsupportedFormat(path.display().to_string()))
}

/// Nesting allowance for the AVI header walk; real files use three levels.
const AVI_LIST_DEPTH: u32 = 8;

/// Walk sibling RIFF chunks, descending into `LIST` containers, and pull
/// stream metadata out of `avih`, `strh`, and `strf`. Best effort: a
/// header the walk cannot make sense of leaves the fields unset.
fn scan_avi_chunks(mut data: &[u8], depth: u32, info: &mut MovieInfo) {
    // An audio `strf` only means something right after an `auds` stream
    // header in the same list.
    let mut audio_stream = false;
    while data.len() >= 8 {
        let id = [data[0], data[1], data[2], data[3]];
        let declared = u32::from_le_bytes([data[4], data[5], data[6], data[7]]) as usize;
        let body = &data[8..];
        let size = declared.min(body.len());
        let chunk = &body[..size];
        match &id {
            b"LIST" if depth < AVI_LIST_DEPTH && chunk.len() >= 4 => {
                scan_avi_chunks(&chunk[4..], depth + 1, info);
            }
            b"avih" if chunk.len() >= 20 => {
                let micros = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                let frames = u32::from_le_bytes([chunk[16], chunk[17], chunk[18], chunk[19]]);
                if micros > 0 {
                    info.framerate = Some(1_000_000.0 / micros as f32);
                    if frames > 0 {
                        info.duration = Some(frames as f32 * micros as f32 / 1_000_000.0);
                    }
                }
            }
            b"strh" if chunk.len() >= 4 => {
                audio_stream = &chunk[0..4] == b"auds";
            }
            b"strf" if audio_stream && chunk.len() >= 8 => {
                let rate = u32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);
                if rate > 0 {
                    info.sample_rate = Some(rate);
                }
            }
            _ => {}
        }
        // Chunks are word-aligned; odd sizes carry a pad byte.
        data = &body[(size + size % 2).min(body.len())..];
    }
}

/// Verify a font file carries an sfnt table directory.
///
/// Covers TrueType, OpenType, and TrueType collections.
pub fn probe_font(path: &Path) -> Result<(), AssetError> {
    let data = read_bytes(path)?;
    let sfnt = data.len() >= 4
        && matches!(
            &data[0..4],
            [0x00, 0x01, 0x00, 0x00] | b"OTTO" | b"true" | b"ttcf"
        );
    if sfnt {
        Ok(())
    } else {
        Err(AssetError::UnsupportedFormat(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch(name: &str, bytes: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lattice-media-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn tiny_wav(channels: u16, sample_rate: u32, data_len: u32) -> Vec<u8> {
        let byte_rate = sample_rate * u32::from(channels) * 2;
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16_u32.to_le_bytes());
        out.extend_from_slice(&1_u16.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&byte_rate.to_le_bytes());
        out.extend_from_slice(&4_u16.to_le_bytes());
        out.extend_from_slice(&16_u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        out.resize(out.len() + data_len as usize, 0);
        out
    }

    #[test]
    fn wav_header_yields_full_info() {
        let path = scratch("tone.wav", &tiny_wav(2, 44_100, 176_400));
        let info = probe_sound(&path).unwrap();
        assert_eq!(info.format, SoundFormat::Wav);
        assert_eq!(info.channels, 2);
        assert_eq!(info.sample_rate, 44_100);
        let duration = info.duration.unwrap();
        assert!((duration - 1.0).abs() < 1e-3);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn ogg_magic_is_detected() {
        let path = scratch("tone.ogg", b"OggS\x00rest-of-stream");
        let info = probe_sound(&path).unwrap();
        assert_eq!(info.format, SoundFormat::Ogg);
        assert_eq!(info.duration, None);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn garbage_audio_is_rejected() {
        let path = scratch("noise.bin", b"not-a-sound");
        assert!(matches!(
            probe_sound(&path),
            Err(AssetError::UnsupportedFormat(_))
        ));
        std::fs::remove_file(path).unwrap();
    }

    fn riff_chunk(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(id);
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend_from_slice(body);
        if body.len() % 2 == 1 {
            out.push(0);
        }
        out
    }

    fn riff_list(kind: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut inner = kind.to_vec();
        inner.extend_from_slice(body);
        riff_chunk(b"LIST", &inner)
    }

    fn tiny_avi(micros_per_frame: u32, total_frames: u32, sample_rate: u32) -> Vec<u8> {
        let mut avih = Vec::new();
        avih.extend_from_slice(&micros_per_frame.to_le_bytes());
        avih.extend_from_slice(&[0_u8; 12]);
        avih.extend_from_slice(&total_frames.to_le_bytes());
        avih.extend_from_slice(&[0_u8; 36]);

        let mut strh = b"auds".to_vec();
        strh.extend_from_slice(&[0_u8; 52]);
        let mut strf = Vec::new();
        strf.extend_from_slice(&1_u16.to_le_bytes());
        strf.extend_from_slice(&2_u16.to_le_bytes());
        strf.extend_from_slice(&sample_rate.to_le_bytes());
        strf.extend_from_slice(&[0_u8; 8]);

        let mut strl = riff_chunk(b"strh", &strh);
        strl.extend(riff_chunk(b"strf", &strf));
        let mut hdrl = riff_chunk(b"avih", &avih);
        hdrl.extend(riff_list(b"strl", &strl));

        let mut body = b"AVI ".to_vec();
        body.extend(riff_list(b"hdrl", &hdrl));

        let mut out = b"RIFF".to_vec();
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend(body);
        out
    }

    #[test]
    fn movie_containers_are_detected() {
        let avi = scratch("clip.avi", b"RIFF\x10\x00\x00\x00AVI LIST");
        let mkv = scratch("clip.mkv", &[0x1A, 0x45, 0xDF, 0xA3, 0x01, 0x02, 0x03]);
        let mp4 = scratch("clip.mp4", b"\x00\x00\x00\x20ftypisom-rest");
        assert_eq!(probe_movie(&avi).unwrap().format, MovieFormat::Avi);
        assert_eq!(probe_movie(&mkv).unwrap().format, MovieFormat::Matroska);
        assert_eq!(probe_movie(&mp4).unwrap().format, MovieFormat::Mp4);
        for path in [avi, mkv, mp4] {
            std::fs::remove_file(path).unwrap();
        }
    }

    #[test]
    fn avi_headers_yield_stream_info() {
        let path = scratch("menu.avi", &tiny_avi(40_000, 240, 44_100));
        let info = probe_movie(&path).unwrap();
        assert_eq!(info.format, MovieFormat::Avi);
        assert!((info.framerate.unwrap() - 25.0).abs() < 1e-3);
        assert!((info.duration.unwrap() - 9.6).abs() < 1e-3);
        assert_eq!(info.sample_rate, Some(44_100));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn headerless_avi_probes_with_unknown_streams() {
        let path = scratch("bare.avi", b"RIFF\x10\x00\x00\x00AVI LIST");
        let info = probe_movie(&path).unwrap();
        assert_eq!(info.format, MovieFormat::Avi);
        assert_eq!(info.framerate, None);
        assert_eq!(info.duration, None);
        assert_eq!(info.sample_rate, None);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn font_probe_requires_sfnt_magic() {
        let good = scratch("face.ttf", &[0x00, 0x01, 0x00, 0x00, 0x00, 0x0C]);
        let bad = scratch("face.txt", b"Comic Sans");
        assert!(probe_font(&good).is_ok());
        assert!(matches!(
            probe_font(&bad),
            Err(AssetError::UnsupportedFormat(_))
        ));
        std::fs::remove_file(good).unwrap();
        std::fs::remove_file(bad).unwrap();
    }
}
