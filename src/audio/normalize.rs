//! Peak normalization of captured audio.
//!
//! Each buffer is rescaled by its own peak absolute amplitude so that the
//! loudest sample maps to exactly 1.0.  Normalization is applied
//! independently per buffer on purpose: the similarity score becomes
//! invariant to each stream's own loudness, not to the relative loudness
//! between the two streams.
//!
//! A fully silent buffer has a zero peak; the division is skipped and the
//! result is an all-zero buffer of the same length.  Silence then propagates
//! to a correlation of 0 downstream — see [`crate::align::pearson`].

use super::pcm::PcmBuffer;

// ---------------------------------------------------------------------------
// normalize
// ---------------------------------------------------------------------------

/// Normalize a captured PCM buffer to floating-point samples in `[-1, 1]`.
///
/// The output has the same length as the input and a peak absolute value of
/// exactly 1.0, unless the input is entirely silent, in which case all
/// outputs are 0.0.
pub fn normalize(buffer: &PcmBuffer) -> Vec<f32> {
    let floats: Vec<f32> = buffer.samples.iter().map(|&s| s as f32).collect();
    normalize_f32(&floats)
}

/// Normalize a float buffer by its peak absolute amplitude.
///
/// Idempotent: an input whose peak is already exactly 1.0 is returned
/// unchanged.  A silent (all-zero) input yields an all-zero output rather
/// than a division error.
pub fn normalize_f32(samples: &[f32]) -> Vec<f32> {
    let peak = samples.iter().fold(0.0_f32, |acc, &s| acc.max(s.abs()));
    if peak == 0.0 {
        return vec![0.0; samples.len()];
    }
    samples.iter().map(|&s| s / peak).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SAMPLE_RATE;

    #[test]
    fn peak_maps_to_one() {
        let buf = PcmBuffer::new(SAMPLE_RATE, vec![0, 100, -200, 50]);
        let out = normalize(&buf);
        assert_eq!(out.len(), 4);
        let peak = out.iter().fold(0.0_f32, |a, &s| a.max(s.abs()));
        assert!((peak - 1.0).abs() < 1e-6);
        assert!((out[2] - (-1.0)).abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn silent_buffer_yields_zeros() {
        let buf = PcmBuffer::new(SAMPLE_RATE, vec![0; 1000]);
        let out = normalize(&buf);
        assert_eq!(out.len(), 1000);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn output_bounded() {
        let buf = PcmBuffer::new(SAMPLE_RATE, vec![i16::MIN, i16::MAX, -1, 1]);
        let out = normalize(&buf);
        assert!(out.iter().all(|&s| (-1.0..=1.0).contains(&s)));
    }

    #[test]
    fn already_normalized_is_unchanged() {
        let samples = vec![0.25_f32, -1.0, 0.5, 0.0];
        let out = normalize_f32(&samples);
        assert_eq!(out, samples);
    }

    #[test]
    fn empty_input() {
        assert!(normalize_f32(&[]).is_empty());
    }
}
