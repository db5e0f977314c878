//! End-to-end comparison orchestration.
//!
//! [`StreamComparator`] drives one full comparison:
//!
//! ```text
//! detect kinds → synchronized capture pair → per-buffer normalization
//!              → alignment search → similarity score
//! ```
//!
//! Everything after the capture join is pure synchronous computation; a
//! comparison owns all of its buffers exclusively and leaves no state
//! behind.  A silent or non-overlapping stream legitimately scores 0.00 —
//! only capture failure prevents a score from being produced at all, and it
//! surfaces as a [`CaptureError`] naming the failing side.

use std::sync::Arc;

use crate::align::{aligned_overlap, similarity, Alignment, AlignmentSearch};
use crate::audio::normalize;
use crate::capture::{detect_stream_kind, CaptureCoordinator, CaptureError, StreamDecoder};
use crate::config::AppConfig;

// ---------------------------------------------------------------------------
// ComparisonReport
// ---------------------------------------------------------------------------

/// Terminal output of one comparison run.  Not persisted.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonReport {
    /// Similarity in `[0.0, 1.0]`.
    pub similarity: f32,
    /// The alignment the score was computed at.
    pub alignment: Alignment,
}

impl ComparisonReport {
    /// Similarity as a percentage, for the human-readable surface.
    pub fn percent(&self) -> f32 {
        self.similarity * 100.0
    }
}

// ---------------------------------------------------------------------------
// StreamComparator
// ---------------------------------------------------------------------------

/// Compares two stream endpoints and reduces them to one similarity score.
pub struct StreamComparator {
    config: AppConfig,
    decoder: Arc<dyn StreamDecoder>,
    client: reqwest::Client,
}

impl StreamComparator {
    pub fn new(config: AppConfig, decoder: Arc<dyn StreamDecoder>) -> Self {
        Self {
            config,
            decoder,
            client: reqwest::Client::new(),
        }
    }

    /// Run one comparison between `url1` and `url2`.
    ///
    /// A number is always produced for any pair of captures that completes;
    /// degenerate audio (silence, no correlated overlap) scores 0.00 rather
    /// than erroring.
    pub async fn compare(&self, url1: &str, url2: &str) -> Result<ComparisonReport, CaptureError> {
        log::info!("starting stream comparison");

        let kind1 = detect_stream_kind(&self.client, url1).await;
        let kind2 = detect_stream_kind(&self.client, url2).await;
        log::info!("stream 1 type: {kind1}");
        log::info!("stream 2 type: {kind2}");

        let coordinator =
            CaptureCoordinator::new(Arc::clone(&self.decoder), self.config.capture.grace_secs);
        let (buffer1, buffer2) = coordinator
            .capture_pair(url1, url2, self.config.capture.duration_secs)
            .await?;

        // Per-buffer peak normalization, then the bounded offset search.
        let a = normalize(&buffer1);
        let b = normalize(&buffer2);

        let search = AlignmentSearch::new(
            self.config.alignment.max_offset_samples(),
            self.config.alignment.step_samples,
        );
        let alignment = search.search(&a, &b);
        log::info!(
            "best alignment found at offset: {} samples ({:.3} seconds)",
            alignment.offset_samples,
            alignment.offset_secs()
        );

        let (overlap_a, _) = aligned_overlap(&a, &b, &alignment);
        let score = similarity(&alignment);
        log::debug!(
            "similarity {score:.4} over {} aligned samples",
            overlap_a.len()
        );

        Ok(ComparisonReport {
            similarity: score,
            alignment,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests — end-to-end scenarios over a scripted decoder
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{PcmBuffer, SAMPLE_RATE};
    use crate::capture::{DecodeError, Side};
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct ScriptedDecoder {
        buffers: HashMap<String, PcmBuffer>,
    }

    impl ScriptedDecoder {
        fn new(buffers: Vec<(&str, PcmBuffer)>) -> Arc<Self> {
            Arc::new(Self {
                buffers: buffers
                    .into_iter()
                    .map(|(k, v)| (k.to_owned(), v))
                    .collect(),
            })
        }
    }

    #[async_trait]
    impl StreamDecoder for ScriptedDecoder {
        async fn capture(
            &self,
            endpoint: &str,
            _duration_secs: f64,
        ) -> Result<PcmBuffer, DecodeError> {
            self.buffers
                .get(endpoint)
                .cloned()
                .ok_or(DecodeError::Empty)
        }
    }

    /// 440 Hz sine at the comparison rate, ~0.37 full scale.
    fn sine(duration_secs: f64) -> PcmBuffer {
        let len = (duration_secs * SAMPLE_RATE as f64) as usize;
        let samples = (0..len)
            .map(|i| {
                let t = i as f64 / SAMPLE_RATE as f64;
                ((t * 440.0 * std::f64::consts::TAU).sin() * 12_000.0) as i16
            })
            .collect();
        PcmBuffer::new(SAMPLE_RATE, samples)
    }

    fn delayed(buffer: &PcmBuffer, delay_samples: usize) -> PcmBuffer {
        let mut samples = vec![0_i16; delay_samples];
        samples.extend_from_slice(&buffer.samples[..buffer.len() - delay_samples]);
        PcmBuffer::new(buffer.sample_rate, samples)
    }

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        // Short captures in tests; alignment defaults stay production-like.
        config.capture.duration_secs = 5.0;
        config
    }

    #[tokio::test]
    async fn identical_sines_score_one_at_zero_offset() {
        let tone = sine(5.0);
        let decoder = ScriptedDecoder::new(vec![("mock://one", tone.clone()), ("mock://two", tone)]);
        let comparator = StreamComparator::new(test_config(), decoder);

        let report = comparator
            .compare("mock://one", "mock://two")
            .await
            .expect("comparison");
        assert_eq!(report.alignment.offset_samples, 0);
        assert!((report.similarity - 1.0).abs() < 0.01, "score = {}", report.similarity);
        assert!((report.percent() - 100.0).abs() < 1.0);
    }

    #[tokio::test]
    async fn front_padded_delay_is_aligned_out() {
        let tone = sine(5.0);
        let decoder = ScriptedDecoder::new(vec![
            ("mock://one", tone.clone()),
            ("mock://two", delayed(&tone, 2000)),
        ]);
        let comparator = StreamComparator::new(test_config(), decoder);

        let report = comparator
            .compare("mock://one", "mock://two")
            .await
            .expect("comparison");
        assert!(
            (1000..=3000).contains(&report.alignment.offset_samples),
            "offset = {}",
            report.alignment.offset_samples
        );
        assert!(report.similarity >= 0.95, "score = {}", report.similarity);
    }

    #[tokio::test]
    async fn decode_failure_identifies_the_side_and_yields_no_score() {
        let decoder = ScriptedDecoder::new(vec![("mock://one", sine(5.0))]);
        let comparator = StreamComparator::new(test_config(), decoder);

        let err = comparator
            .compare("mock://one", "mock://broken")
            .await
            .expect_err("must fail");
        assert_eq!(err.side(), Some(Side::Stream2));
    }

    #[tokio::test]
    async fn silence_against_tone_scores_zero() {
        let decoder = ScriptedDecoder::new(vec![
            ("mock://silent", PcmBuffer::new(SAMPLE_RATE, vec![0; 5 * SAMPLE_RATE as usize])),
            ("mock://tone", sine(5.0)),
        ]);
        let comparator = StreamComparator::new(test_config(), decoder);

        let report = comparator
            .compare("mock://silent", "mock://tone")
            .await
            .expect("comparison");
        assert_eq!(report.similarity, 0.0);
        assert_eq!(report.alignment.offset_samples, 0);
    }

    /// Slowly chirped tone — non-periodic over the search window, so shifted
    /// copies do not re-correlate at other offsets the way a pure sine does.
    fn chirp(duration_secs: f64) -> PcmBuffer {
        let len = (duration_secs * SAMPLE_RATE as f64) as usize;
        let samples = (0..len)
            .map(|i| {
                let t = i as f64;
                ((t * 0.02 + t * t * 1e-7).sin() * 12_000.0) as i16
            })
            .collect();
        PcmBuffer::new(SAMPLE_RATE, samples)
    }

    #[tokio::test]
    async fn phase_inverted_streams_score_zero_not_negative() {
        let tone = chirp(5.0);
        let inverted = PcmBuffer::new(
            SAMPLE_RATE,
            tone.samples.iter().map(|&s| s.saturating_neg()).collect(),
        );
        let decoder =
            ScriptedDecoder::new(vec![("mock://one", tone), ("mock://two", inverted)]);
        let comparator = StreamComparator::new(test_config(), decoder);

        let report = comparator
            .compare("mock://one", "mock://two")
            .await
            .expect("comparison");
        assert!(report.similarity >= 0.0);
        assert!(report.similarity < 0.05, "score = {}", report.similarity);
    }
}
