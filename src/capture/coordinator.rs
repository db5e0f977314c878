//! Synchronized dual-capture coordination.
//!
//! [`CaptureCoordinator`] drives two [`StreamDecoder`] invocations so both
//! begin consuming their endpoints at the same release instant:
//!
//! 1. spawn both capture tasks, each parked on a [`StartGate`];
//! 2. fire the [`StartSignal`] once, unconditionally;
//! 3. join both tasks, each bounded by `duration + grace`.
//!
//! Failure of either side is total failure for the comparison — one buffer
//! has nothing meaningful to align against.  The other side still runs to
//! its own completion or timeout first: early-failure cancellation is
//! deliberately not implemented, trading a little latency on the failure
//! path for a simpler shared-nothing task model (the tasks share only the
//! latch).

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::error::Elapsed;

use super::decoder::{DecodeError, StreamDecoder};
use super::sync::{StartGate, StartSignal};
use crate::audio::PcmBuffer;

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// Which of the two captures an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Stream1,
    Stream2,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Stream1 => write!(f, "stream 1"),
            Side::Stream2 => write!(f, "stream 2"),
        }
    }
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Reason the coordinator could not deliver two comparable buffers.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Requested duration was zero or negative.
    #[error("capture duration must be positive, got {0}s")]
    InvalidDuration(f64),

    /// The decode adapter failed for one side.
    #[error("capture failed for {side}: {source}")]
    Decode {
        side: Side,
        #[source]
        source: DecodeError,
    },

    /// One side did not complete within `duration + grace`.
    #[error("capture for {side} did not finish within {limit_secs:.1}s")]
    Timeout { side: Side, limit_secs: f64 },

    /// A capture task panicked or was aborted.
    #[error("capture task for {side} failed to run to completion")]
    Task { side: Side },

    /// One side produced a buffer with zero samples.
    #[error("capture for {side} produced an empty buffer")]
    Empty { side: Side },

    /// The two buffers are not at the same sample rate; resampling is out of
    /// scope, so this is a capture error rather than an alignment concern.
    #[error("sample rate mismatch: stream 1 at {rate1} Hz, stream 2 at {rate2} Hz")]
    SampleRateMismatch { rate1: u32, rate2: u32 },
}

impl CaptureError {
    /// The failing side, when the error is attributable to one.
    pub fn side(&self) -> Option<Side> {
        match self {
            CaptureError::Decode { side, .. }
            | CaptureError::Timeout { side, .. }
            | CaptureError::Task { side }
            | CaptureError::Empty { side } => Some(*side),
            CaptureError::InvalidDuration(_) | CaptureError::SampleRateMismatch { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// CaptureCoordinator
// ---------------------------------------------------------------------------

type CaptureOutcome = Result<Result<PcmBuffer, DecodeError>, Elapsed>;

/// Runs two decoder invocations with a synchronized start and a joint join.
pub struct CaptureCoordinator {
    decoder: Arc<dyn StreamDecoder>,
    grace_secs: f64,
}

impl CaptureCoordinator {
    /// `grace_secs` is the allowance on top of the requested duration before
    /// a capture is declared timed out (connection setup, decoder flush).
    pub fn new(decoder: Arc<dyn StreamDecoder>, grace_secs: f64) -> Self {
        Self {
            decoder,
            grace_secs,
        }
    }

    /// Capture `duration_secs` of audio from both endpoints simultaneously.
    ///
    /// Returns both buffers on success.  Any single-side failure is total
    /// failure, reported with the failing [`Side`]; when both sides fail,
    /// stream 1's error is reported.
    pub async fn capture_pair(
        &self,
        endpoint_a: &str,
        endpoint_b: &str,
        duration_secs: f64,
    ) -> Result<(PcmBuffer, PcmBuffer), CaptureError> {
        if duration_secs <= 0.0 || !duration_secs.is_finite() {
            return Err(CaptureError::InvalidDuration(duration_secs));
        }

        let limit = Duration::from_secs_f64(duration_secs + self.grace_secs);
        let signal = StartSignal::new();

        let task_a = self.spawn_capture(endpoint_a, duration_secs, limit, signal.gate());
        let task_b = self.spawn_capture(endpoint_b, duration_secs, limit, signal.gate());

        // Both tasks exist and are parked on their gates (or about to be —
        // the watch latch releases late subscribers just the same).  Fire
        // unconditionally so start skew is bounded by scheduler wake-up.
        log::info!("starting synchronized capture ({duration_secs}s per side)");
        signal.fire();

        // Join both unconditionally; no cross-cancellation on failure.
        let outcome_a = task_a.await;
        let outcome_b = task_b.await;

        let buffer_a = Self::settle(outcome_a, Side::Stream1, limit)?;
        let buffer_b = Self::settle(outcome_b, Side::Stream2, limit)?;

        if buffer_a.sample_rate != buffer_b.sample_rate {
            return Err(CaptureError::SampleRateMismatch {
                rate1: buffer_a.sample_rate,
                rate2: buffer_b.sample_rate,
            });
        }

        log::debug!(
            "captured {:.2}s / {:.2}s of audio",
            buffer_a.duration_secs(),
            buffer_b.duration_secs()
        );
        Ok((buffer_a, buffer_b))
    }

    fn spawn_capture(
        &self,
        endpoint: &str,
        duration_secs: f64,
        limit: Duration,
        gate: StartGate,
    ) -> JoinHandle<CaptureOutcome> {
        let decoder = Arc::clone(&self.decoder);
        let endpoint = endpoint.to_owned();
        tokio::spawn(async move {
            // No I/O before the release point.
            gate.released().await;
            tokio::time::timeout(limit, decoder.capture(&endpoint, duration_secs)).await
        })
    }

    fn settle(
        outcome: Result<CaptureOutcome, tokio::task::JoinError>,
        side: Side,
        limit: Duration,
    ) -> Result<PcmBuffer, CaptureError> {
        let buffer = match outcome {
            Err(join_error) => {
                log::error!("capture task for {side} did not complete: {join_error}");
                return Err(CaptureError::Task { side });
            }
            Ok(Err(_elapsed)) => {
                return Err(CaptureError::Timeout {
                    side,
                    limit_secs: limit.as_secs_f64(),
                })
            }
            Ok(Ok(Err(source))) => {
                log::error!("failed to record {side}: {source}");
                return Err(CaptureError::Decode { side, source });
            }
            Ok(Ok(Ok(buffer))) => buffer,
        };

        if buffer.is_empty() {
            return Err(CaptureError::Empty { side });
        }
        Ok(buffer)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
