//! Reduction of an alignment result to the final similarity score.
//!
//! The score is the alignment's Pearson correlation clamped to `[0, 1]`:
//! negative correlation (e.g. phase-inverted signals) means zero similarity,
//! not a signed signal.  The clamp is the terminal output of a comparison —
//! a percentage for human eyes, nothing machine-readable beyond that.

use super::search::Alignment;

// ---------------------------------------------------------------------------
// similarity
// ---------------------------------------------------------------------------

/// Final similarity score for one comparison, clamped to `[0.0, 1.0]`.
pub fn similarity(alignment: &Alignment) -> f32 {
    (alignment.correlation as f32).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// aligned_overlap
// ---------------------------------------------------------------------------

/// Apply a discovered offset to two buffers and return the equal-length
/// overlapping slices.
///
/// The leading samples are trimmed off whichever buffer lags (B for a
/// positive offset, A for a negative one), then the trailing excess is
/// trimmed off the other side.  Used for reporting the effective comparison
/// window; the score itself comes straight from the alignment correlation.
///
/// Returns empty slices when the offset leaves no overlap.
pub fn aligned_overlap<'a>(
    a: &'a [f32],
    b: &'a [f32],
    alignment: &Alignment,
) -> (&'a [f32], &'a [f32]) {
    let (a, b) = if alignment.offset_samples >= 0 {
        let skip = (alignment.offset_samples as usize).min(b.len());
        (a, &b[skip..])
    } else {
        let skip = (alignment.offset_samples.unsigned_abs() as usize).min(a.len());
        (&a[skip..], b)
    };

    let n = a.len().min(b.len());
    (&a[..n], &b[..n])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
