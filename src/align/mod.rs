//! Alignment core — Pearson correlation, bounded offset search, scoring.
//!
//! Operates purely on already-normalized `f32` buffers; nothing here blocks,
//! suspends, or touches shared state.  See [`crate::comparator`] for how the
//! pieces are driven end to end.

pub mod correlation;
pub mod score;
pub mod search;

pub use correlation::pearson;
pub use score::{aligned_overlap, similarity};
pub use search::{Alignment, AlignmentSearch};
