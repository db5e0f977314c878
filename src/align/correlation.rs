//! Pearson correlation over equal-length sample slices.
//!
//! ## Degenerate-input policy
//!
//! Pearson correlation is undefined when either slice has zero variance
//! (silence, a constant tone at DC).  This module returns **0.0** for those
//! cases instead of propagating NaN.  That is a policy choice, not the
//! mathematically "correct" value: two silent streams are arguably maximally
//! similar, but this crate scores them as dissimilar.  Intended behavior —
//! see the scoring rules in [`crate::align::score`].

// ---------------------------------------------------------------------------
// pearson
// ---------------------------------------------------------------------------

/// Pearson correlation coefficient between two equal-length slices.
///
/// Accumulates in `f64` to avoid precision loss over second-scale windows
/// (hundreds of thousands of samples).  Returns a value in `[-1, 1]`, or
/// `0.0` when the inputs are empty, of different lengths, or either side has
/// zero variance.
pub fn pearson(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let n = a.len() as f64;
    let mean_a = a.iter().map(|&x| x as f64).sum::<f64>() / n;
    let mean_b = b.iter().map(|&x| x as f64).sum::<f64>() / n;

    let mut cov = 0.0_f64;
    let mut var_a = 0.0_f64;
    let mut var_b = 0.0_f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let dx = x as f64 - mean_a;
        let dy = y as f64 - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a <= 0.0 || var_b <= 0.0 {
        return 0.0;
    }

    let r = cov / (var_a.sqrt() * var_b.sqrt());
    if r.is_finite() {
        r.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (i as f32 * 0.05).sin())
            .collect()
    }

    #[test]
    fn identical_signals_correlate_at_one() {
        let a = sine(4096);
        let r = pearson(&a, &a);
        assert!((r - 1.0).abs() < 1e-6, "r = {r}");
    }

    #[test]
    fn phase_inversion_correlates_at_minus_one() {
        let a = sine(4096);
        let b: Vec<f32> = a.iter().map(|&x| -x).collect();
        let r = pearson(&a, &b);
        assert!((r + 1.0).abs() < 1e-6, "r = {r}");
    }

    #[test]
    fn silence_is_zero_not_nan() {
        let silent = vec![0.0_f32; 1024];
        let tone = sine(1024);
        assert_eq!(pearson(&silent, &tone), 0.0);
        assert_eq!(pearson(&tone, &silent), 0.0);
        assert_eq!(pearson(&silent, &silent), 0.0);
    }

    #[test]
    fn constant_signal_is_zero() {
        let flat = vec![0.7_f32; 1024];
        let tone = sine(1024);
        assert_eq!(pearson(&flat, &tone), 0.0);
    }

    #[test]
    fn empty_and_mismatched_lengths_are_zero() {
        assert_eq!(pearson(&[], &[]), 0.0);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn uncorrelated_noise_is_small() {
        // Deterministic pseudo-noise, two unrelated generators.
        let a: Vec<f32> = (0..8192).map(|i| ((i * 7919 % 104729) as f32 / 104729.0) - 0.5).collect();
        let b: Vec<f32> = (0..8192).map(|i| ((i * 6101 % 104729) as f32 / 104729.0) - 0.5).collect();
        let r = pearson(&a, &b);
        assert!(r.abs() < 0.1, "r = {r}");
    }
}
