//! Minimal RIFF/WAVE reading and writing for decoder artifacts.
//!
//! The ffmpeg decoder writes its capture to a temporary `.wav` file which is
//! read back through [`read_wav_mono_i16`].  Only the format this crate ever
//! produces is supported: PCM (format code 1), 16-bit, mono.  The reader
//! walks chunks rather than assuming a fixed 44-byte header because ffmpeg
//! inserts a `LIST` metadata chunk between `fmt ` and `data`.
//!
//! Header layout (canonical 44-byte form, as written by
//! [`write_wav_mono_i16`]):
//!
//! ```text
//! [0-3]    "RIFF"
//! [4-7]    file size - 8
//! [8-11]   "WAVE"
//! [12-15]  "fmt "
//! [16-19]  16 (PCM format chunk size)
//! [20-21]  1 (PCM format code)
//! [22-23]  channels
//! [24-27]  sample_rate
//! [28-31]  byte_rate = sample_rate * channels * 2
//! [32-33]  block_align = channels * 2
//! [34-35]  16 (bit depth)
//! [36-39]  "data"
//! [40-43]  data_size
//! ```

use std::path::Path;

use thiserror::Error;

use super::pcm::PcmBuffer;

/// Size of the canonical WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

// ---------------------------------------------------------------------------
// WavError
// ---------------------------------------------------------------------------

/// Reason a WAV file could not be read.
#[derive(Debug, Error)]
pub enum WavError {
    /// Underlying file I/O failed.
    #[error("WAV I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is shorter than the structure it claims to contain.
    #[error("WAV file truncated")]
    Truncated,

    /// Missing `RIFF`/`WAVE` magic.
    #[error("not a RIFF/WAVE file")]
    BadMagic,

    /// A required chunk (`fmt ` or `data`) was not found.
    #[error("missing {0} chunk")]
    MissingChunk(&'static str),

    /// Format code other than 1 (PCM).
    #[error("unsupported WAV format code {0} (only PCM is supported)")]
    UnsupportedFormat(u16),

    /// Bit depth other than 16.
    #[error("unsupported bit depth {0} (only 16-bit is supported)")]
    UnsupportedBitDepth(u16),

    /// More than one channel.
    #[error("expected mono audio, got {0} channels")]
    NotMono(u16),
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

fn u16_le(bytes: &[u8], at: usize) -> Result<u16, WavError> {
    let b = bytes.get(at..at + 2).ok_or(WavError::Truncated)?;
    Ok(u16::from_le_bytes([b[0], b[1]]))
}

fn u32_le(bytes: &[u8], at: usize) -> Result<u32, WavError> {
    let b = bytes.get(at..at + 4).ok_or(WavError::Truncated)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Read a mono 16-bit PCM WAV file into a [`PcmBuffer`].
///
/// Walks the chunk list after the `WAVE` tag, picking up `fmt ` and `data`
/// and skipping anything else (`LIST`, `fact`, …).  The sample rate is taken
/// from the `fmt ` chunk as-is; rate validation is the caller's concern.
pub fn read_wav_mono_i16(path: &Path) -> Result<PcmBuffer, WavError> {
    let bytes = std::fs::read(path)?;

    if bytes.len() < 12 {
        return Err(WavError::Truncated);
    }
    if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(WavError::BadMagic);
    }

    let mut fmt: Option<(u16, u16, u32, u16)> = None; // (code, channels, rate, bits)
    let mut data: Option<(usize, usize)> = None; // (offset, len)

    let mut pos = 12;
    while pos + 8 <= bytes.len() {
        let id = &bytes[pos..pos + 4];
        let size = u32_le(&bytes, pos + 4)? as usize;
        let body = pos + 8;
        if body + size > bytes.len() {
            return Err(WavError::Truncated);
        }

        match id {
            b"fmt " => {
                if size < 16 {
                    return Err(WavError::Truncated);
                }
                fmt = Some((
                    u16_le(&bytes, body)?,
                    u16_le(&bytes, body + 2)?,
                    u32_le(&bytes, body + 4)?,
                    u16_le(&bytes, body + 14)?,
                ));
            }
            b"data" => {
                data = Some((body, size));
            }
            _ => {} // LIST, fact, etc.
        }

        // Chunks are word-aligned; odd sizes carry a pad byte.
        pos = body + size + (size & 1);
    }

    let (code, channels, sample_rate, bits) = fmt.ok_or(WavError::MissingChunk("fmt "))?;
    if code != 1 {
        return Err(WavError::UnsupportedFormat(code));
    }
    if bits != 16 {
        return Err(WavError::UnsupportedBitDepth(bits));
    }
    if channels != 1 {
        return Err(WavError::NotMono(channels));
    }

    let (offset, len) = data.ok_or(WavError::MissingChunk("data"))?;
    let samples: Vec<i16> = bytes[offset..offset + len]
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect();

    Ok(PcmBuffer::new(sample_rate, samples))
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Generate the canonical 44-byte header for a mono 16-bit PCM payload.
pub fn wav_header_mono_i16(sample_rate: u32, data_size: u32) -> [u8; WAV_HEADER_SIZE] {
    let byte_rate = sample_rate * 2;
    let mut header = [0u8; WAV_HEADER_SIZE];

    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&(36 + data_size).to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM
    header[22..24].copy_from_slice(&1u16.to_le_bytes()); // mono
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&2u16.to_le_bytes()); // block align
    header[34..36].copy_from_slice(&16u16.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    header
}

/// Write a [`PcmBuffer`] as a canonical mono 16-bit PCM WAV file.
pub fn write_wav_mono_i16(path: &Path, buffer: &PcmBuffer) -> Result<(), WavError> {
    let data_size = (buffer.samples.len() * 2) as u32;
    let mut bytes = Vec::with_capacity(WAV_HEADER_SIZE + data_size as usize);
    bytes.extend_from_slice(&wav_header_mono_i16(buffer.sample_rate, data_size));
    for s in &buffer.samples {
        bytes.extend_from_slice(&s.to_le_bytes());
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
