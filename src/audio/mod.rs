//! Audio data model — PCM buffers, WAV artifact I/O, peak normalization.
//!
//! # Pipeline position
//!
//! ```text
//! ffmpeg artifact (.wav) → read_wav_mono_i16 → PcmBuffer
//!                        → normalize → Vec<f32> in [-1, 1]
//! ```
//!
//! Everything here is synchronous and allocation-local; the async capture
//! side lives in [`crate::capture`].

pub mod normalize;
pub mod pcm;
pub mod wav;

pub use normalize::{normalize, normalize_f32};
pub use pcm::{PcmBuffer, SAMPLE_RATE};
pub use wav::{read_wav_mono_i16, write_wav_mono_i16, WavError};
