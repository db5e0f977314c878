//! The raw PCM buffer type produced by a capture.
//!
//! A [`PcmBuffer`] is mono, signed 16-bit, at a fixed sample rate (the
//! decoder adapter is responsible for downmixing and resampling — see
//! [`crate::capture::StreamDecoder`]).  Buffers are created fresh per
//! comparison and never shared between comparisons.

/// Fixed comparison sample rate in Hz.
///
/// Both captures are decoded to this rate; a buffer arriving at any other
/// rate is a capture error, not an alignment concern.
pub const SAMPLE_RATE: u32 = 44_100;

// ---------------------------------------------------------------------------
// PcmBuffer
// ---------------------------------------------------------------------------

/// Mono PCM audio at a fixed sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    /// Samples per second.
    pub sample_rate: u32,
    /// Signed 16-bit amplitudes, one channel.
    pub samples: Vec<i16>,
}

impl PcmBuffer {
    /// Build a buffer from raw samples at the given rate.
    pub fn new(sample_rate: u32, samples: Vec<i16>) -> Self {
        Self {
            sample_rate,
            samples,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` when the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds at the buffer's sample rate.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// `true` when every sample is zero (peak amplitude is zero).
    ///
    /// A silent buffer normalizes to all zeros and correlates at 0 — see
    /// [`crate::audio::normalize`] and [`crate::align::pearson`].
    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|&s| s == 0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
