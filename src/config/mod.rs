//! Configuration module for stream-similarity.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for capture and
//! alignment, `AppPaths` for the platform config directory, and TOML
//! persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AlignmentConfig, AppConfig, CaptureConfig};
