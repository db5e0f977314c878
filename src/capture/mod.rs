//! Capture side of the pipeline — stream probing, the external decoder
//! seam, and synchronized dual capture.
//!
//! ```text
//! detect_stream_kind ──▶ (log / pathway selection)
//!
//!            ┌─ task A ─ StartGate ─ StreamDecoder::capture ─┐
//! StartSignal┤                                               ├─ join ─▶ (PcmBuffer, PcmBuffer)
//!            └─ task B ─ StartGate ─ StreamDecoder::capture ─┘
//! ```
//!
//! The two tasks share nothing but the one-shot latch; each owns its buffer
//! and temporary artifact exclusively.  Everything downstream of the join is
//! synchronous — see [`crate::align`].

pub mod coordinator;
pub mod decoder;
pub mod detect;
pub mod sync;

pub use coordinator::{CaptureCoordinator, CaptureError, Side};
pub use decoder::{DecodeError, FfmpegDecoder, StreamDecoder};
pub use detect::{classify, detect_stream_kind, StreamKind};
pub use sync::{StartGate, StartSignal};
