//! Coarse-stride cross-correlation alignment search.
//!
//! Two simultaneously captured streams are never sample-aligned: connection
//! setup, server-side buffering and scheduler wake-up all skew the start
//! points.  [`AlignmentSearch`] scans a bounded window of candidate offsets
//! in both directions and reports the offset with the highest Pearson
//! correlation.
//!
//! ## Cost model
//!
//! An exhaustive per-sample search over a 1-second window at 44.1 kHz is
//! 88 200 hypotheses, each costing a full pass over the overlap.  The coarse
//! stride (default 1 000 samples) trades up to `step / 2` samples of residual
//! offset for a ~1000× smaller search, which is acceptable because scoring
//! operates on the post-alignment overlap and is insensitive to sub-stride
//! drift at this comparison granularity.  Both the stride and the window are
//! tuning knobs, exposed through [`crate::config::AlignmentConfig`].

use super::correlation::pearson;
use crate::audio::SAMPLE_RATE;

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Result of one alignment search.  Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    /// Best offset in samples.  Positive means stream A leads stream B:
    /// A's content reappears in B `offset_samples` samples later.
    pub offset_samples: i64,
    /// Pearson correlation at the best offset, in `[-1, 1]`.
    pub correlation: f64,
}

impl Alignment {
    /// The offset expressed in seconds at the fixed comparison rate.
    pub fn offset_secs(&self) -> f64 {
        self.offset_samples as f64 / SAMPLE_RATE as f64
    }
}

// ---------------------------------------------------------------------------
// AlignmentSearch
// ---------------------------------------------------------------------------

/// Bounded two-sided offset search over normalized buffers.
#[derive(Debug, Clone, Copy)]
pub struct AlignmentSearch {
    /// Maximum offset magnitude in samples (exclusive upper bound).
    pub max_offset: usize,
    /// Candidate stride in samples.
    pub step: usize,
}

impl Default for AlignmentSearch {
    fn default() -> Self {
        Self {
            // 1 second of audio in each direction.
            max_offset: SAMPLE_RATE as usize,
            step: 1000,
        }
    }
}

impl AlignmentSearch {
    /// Build a search over `max_offset` samples with the given stride.
    pub fn new(max_offset: usize, step: usize) -> Self {
        Self { max_offset, step }
    }

    /// Find the offset in `{0, ±step, ±2·step, …} ∩ (-max_offset, max_offset)`
    /// that maximizes Pearson correlation between `a` and `b`.
    ///
    /// For a positive candidate `o`, `a[..n]` is correlated against
    /// `b[o..o + n]` over the overlapping region `n = min(a.len(),
    /// b.len() - o)`; the negative hypothesis is symmetric.  Only a strictly
    /// higher correlation replaces the running best, so ties keep the
    /// earliest (smallest-magnitude) offset encountered.
    ///
    /// When no candidate produces a positive correlation — degenerate
    /// lengths, silence, genuinely unrelated signals — the result is
    /// `{offset: 0, correlation: 0.0}`.
    pub fn search(&self, a: &[f32], b: &[f32]) -> Alignment {
        let mut best = Alignment {
            offset_samples: 0,
            correlation: 0.0,
        };
        let step = self.step.max(1);

        for offset in (0..self.max_offset).step_by(step) {
            // A leads B by `offset`: B's front is skipped.
            if offset < b.len() {
                let n = a.len().min(b.len() - offset);
                let r = pearson(&a[..n], &b[offset..offset + n]);
                if r > best.correlation {
                    best = Alignment {
                        offset_samples: offset as i64,
                        correlation: r,
                    };
                }
            }

            // B leads A by `offset` (skip the duplicate zero hypothesis).
            if offset > 0 && offset < a.len() {
                let n = b.len().min(a.len() - offset);
                let r = pearson(&b[..n], &a[offset..offset + n]);
                if r > best.correlation {
                    best = Alignment {
                        offset_samples: -(offset as i64),
                        correlation: r,
                    };
                }
            }
        }

        best
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
