//! Perceptual similarity of two network audio streams.
//!
//! The crate captures the same wall-clock window from two stream endpoints,
//! normalizes each capture, finds the time offset that maximizes Pearson
//! cross-correlation, and reduces the result to a single score in `[0, 1]`.
//!
//! # Pipeline
//!
//! ```text
//! CaptureCoordinator (two gated tasks, one ffmpeg decode each)
//!   └─▶ (PcmBuffer, PcmBuffer)
//!         └─▶ normalize × 2 ─▶ AlignmentSearch ─▶ similarity ─▶ score
//! ```
//!
//! External decoding (connection, demux, downmix, resample to 44.1 kHz) is
//! delegated to ffmpeg behind the [`capture::StreamDecoder`] trait; the rest
//! of the pipeline is pure computation over owned buffers.

pub mod align;
pub mod audio;
pub mod capture;
pub mod cli;
pub mod comparator;
pub mod config;

pub use align::{Alignment, AlignmentSearch};
pub use audio::{PcmBuffer, SAMPLE_RATE};
pub use capture::{CaptureCoordinator, CaptureError, FfmpegDecoder, Side, StreamDecoder};
pub use comparator::{ComparisonReport, StreamComparator};
pub use config::AppConfig;
