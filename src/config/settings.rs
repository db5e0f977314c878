//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.  CLI flags override the
//! loaded values — see [`crate::cli`].

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::audio::SAMPLE_RATE;

// ---------------------------------------------------------------------------
// CaptureConfig
// ---------------------------------------------------------------------------

/// Settings for the synchronized capture stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Seconds of audio to capture from each stream.
    pub duration_secs: f64,
    /// Allowance on top of `duration_secs` before a capture is declared
    /// timed out.  Covers connection setup and decoder flush.
    pub grace_secs: f64,
    /// The ffmpeg binary to invoke (name resolved via `PATH`, or an
    /// absolute path).
    pub ffmpeg_path: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            duration_secs: 30.0,
            grace_secs: 10.0,
            ffmpeg_path: "ffmpeg".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AlignmentConfig
// ---------------------------------------------------------------------------

/// Settings for the alignment search.
///
/// Both fields are tuning knobs, not architectural constants: a larger
/// window or a finer stride buys alignment reach/precision at linear search
/// cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Maximum offset magnitude to search, in seconds.
    pub max_offset_secs: f64,
    /// Candidate stride in samples.  Residual misalignment after the search
    /// is at most half of this.
    pub step_samples: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            max_offset_secs: 1.0,
            step_samples: 1000,
        }
    }
}

impl AlignmentConfig {
    /// The search window converted to samples at the fixed comparison rate.
    ///
    /// The CLI rejects non-positive windows up front, but a hand-edited
    /// settings file can still carry one; falling back to the default keeps
    /// the search from silently degenerating to zero candidates.
    pub fn max_offset_samples(&self) -> usize {
        let secs = if self.max_offset_secs.is_finite() && self.max_offset_secs > 0.0 {
            self.max_offset_secs
        } else {
            log::warn!(
                "ignoring non-positive alignment window {}s, using default",
                self.max_offset_secs
            );
            Self::default().max_offset_secs
        };
        (secs * SAMPLE_RATE as f64) as usize
    }
}

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub capture: CaptureConfig,
    pub alignment: AlignmentConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
