//! Decoder adapter — the seam between the core and the external decode
//! process.
//!
//! [`StreamDecoder`] is the only interface the alignment core needs from the
//! outside world: *give me `duration_secs` of mono PCM at the fixed rate for
//! this endpoint*.  Tests substitute mock implementations; production uses
//! [`FfmpegDecoder`], which shells out to ffmpeg for connection, demuxing,
//! decoding, downmixing and resampling, then reads the WAV artifact back.
//!
//! The artifact lives in a per-capture [`tempfile::TempDir`], so it is
//! removed on every exit path — success, decode failure, or timeout-induced
//! drop.

use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;

use crate::audio::{read_wav_mono_i16, PcmBuffer, WavError, SAMPLE_RATE};

// ---------------------------------------------------------------------------
// DecodeError
// ---------------------------------------------------------------------------

/// Reason the decode process could not produce a usable buffer.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The decoder binary could not be started at all.
    #[error("failed to spawn decoder `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// The decoder exited with a non-zero status (network, protocol or
    /// decode failure).  Carries the tail of stderr for diagnostics.
    #[error("decoder exited with {status}: {stderr}")]
    Failed {
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// The decoded artifact could not be parsed.
    #[error("unreadable capture artifact: {0}")]
    Artifact(#[from] WavError),

    /// The decoder succeeded but produced zero samples.
    #[error("capture produced an empty buffer")]
    Empty,

    /// The artifact is not at the fixed comparison rate.
    #[error("capture sample rate {got} Hz, expected {expected} Hz")]
    RateMismatch { expected: u32, got: u32 },
}

// ---------------------------------------------------------------------------
// StreamDecoder
// ---------------------------------------------------------------------------

/// Asynchronous decode-to-PCM adapter.
///
/// Implementations may block (internally) for roughly `duration_secs` of
/// wall-clock time and must deliver mono audio at
/// [`SAMPLE_RATE`](crate::audio::SAMPLE_RATE).  Implementors must be
/// `Send + Sync` so a single adapter can serve both capture tasks through an
/// `Arc<dyn StreamDecoder>`.
#[async_trait]
pub trait StreamDecoder: Send + Sync {
    async fn capture(&self, endpoint: &str, duration_secs: f64) -> Result<PcmBuffer, DecodeError>;
}

// ---------------------------------------------------------------------------
// FfmpegDecoder
// ---------------------------------------------------------------------------

/// Production decoder shelling out to ffmpeg.
///
/// Equivalent command line:
///
/// ```text
/// ffmpeg -nostdin -loglevel error -i <endpoint> -t <duration>
///        -ac 1 -ar 44100 -y <tmpdir>/capture.wav
/// ```
///
/// ffmpeg handles both continuous streams (Icecast/MP3) and segmented
/// playlists (HLS) behind the same invocation, which is why the alignment
/// core never needs to care which pathway supplied a buffer.
#[derive(Debug, Clone)]
pub struct FfmpegDecoder {
    ffmpeg_path: String,
}

impl FfmpegDecoder {
    /// Use the given ffmpeg binary (name or absolute path).
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

impl Default for FfmpegDecoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl StreamDecoder for FfmpegDecoder {
    async fn capture(&self, endpoint: &str, duration_secs: f64) -> Result<PcmBuffer, DecodeError> {
        // Scoped artifact: the directory and everything in it are removed
        // when `dir` drops, on every path out of this function.
        let dir = tempfile::tempdir().map_err(|source| DecodeError::Spawn {
            command: self.ffmpeg_path.clone(),
            source,
        })?;
        let artifact = dir.path().join("capture.wav");

        log::debug!("decoding {endpoint} for {duration_secs:.1}s into {}", artifact.display());

        // The coordinator bounds this call with a timeout; when it fires,
        // the future is dropped mid-flight.  The child must die with it, or
        // a stalled stream leaves an ffmpeg holding its socket forever.
        let output = tokio::process::Command::new(&self.ffmpeg_path)
            .kill_on_drop(true)
            .arg("-nostdin")
            .args(["-loglevel", "error"])
            .args(["-i", endpoint])
            .args(["-t", &format!("{duration_secs}")])
            .args(["-ac", "1"])
            .args(["-ar", &SAMPLE_RATE.to_string()])
            .arg("-y")
            .arg(&artifact)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| DecodeError::Spawn {
                command: self.ffmpeg_path.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DecodeError::Failed {
                status: output.status,
                stderr: stderr_tail(&output.stderr),
            });
        }

        let buffer = read_wav_mono_i16(&artifact)?;
        if buffer.is_empty() {
            return Err(DecodeError::Empty);
        }
        if buffer.sample_rate != SAMPLE_RATE {
            return Err(DecodeError::RateMismatch {
                expected: SAMPLE_RATE,
                got: buffer.sample_rate,
            });
        }

        log::debug!(
            "decoded {} samples ({:.2}s) from {endpoint}",
            buffer.len(),
            buffer.duration_secs()
        );
        Ok(buffer)
    }
}

/// Last few lines of decoder stderr, trimmed for log/error readability.
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let tail: Vec<&str> = text.lines().rev().take(4).collect();
    tail.into_iter().rev().collect::<Vec<_>>().join(" | ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stderr_tail_keeps_last_lines() {
        let noise = b"line1\nline2\nline3\nline4\nline5\nline6" as &[u8];
        let tail = stderr_tail(noise);
        assert_eq!(tail, "line3 | line4 | line5 | line6");
    }

    #[test]
    fn stderr_tail_handles_empty() {
        assert_eq!(stderr_tail(b""), "");
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let decoder = FfmpegDecoder::new("definitely-not-a-real-ffmpeg-binary");
        let err = decoder
            .capture("http://example.invalid/stream", 1.0)
            .await
            .expect_err("spawn must fail");
        assert!(matches!(err, DecodeError::Spawn { .. }), "got {err:?}");
    }

    /// Polls the pid file a hanging decoder script writes on startup.
    #[cfg(target_os = "linux")]
    async fn wait_for_pid(path: &std::path::Path) -> u32 {
        for _ in 0..100 {
            if let Ok(text) = std::fs::read_to_string(path) {
                if let Ok(pid) = text.trim().parse() {
                    return pid;
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        panic!("decoder never reported its pid");
    }

    /// Dead or zombie counts as gone; only a live process holds its socket.
    #[cfg(target_os = "linux")]
    fn process_is_gone(pid: u32) -> bool {
        match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
            Err(_) => true,
            Ok(stat) => stat
                .rsplit_once(')')
                .map(|(_, rest)| rest.trim_start().starts_with('Z'))
                .unwrap_or(true),
        }
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn timed_out_capture_kills_the_decoder_process() {
        use std::os::unix::fs::PermissionsExt;
        use std::time::Duration;

        let dir = tempfile::tempdir().expect("temp dir");
        let pid_file = dir.path().join("decoder.pid");
        let script = dir.path().join("hanging-decoder");
        std::fs::write(
            &script,
            format!("#!/bin/sh\necho $$ > '{}'\nexec sleep 60\n", pid_file.display()),
        )
        .expect("write script");
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .expect("mark script executable");

        let decoder = FfmpegDecoder::new(script.to_string_lossy().into_owned());
        let result = tokio::time::timeout(
            Duration::from_millis(500),
            decoder.capture("http://example.invalid/stream", 0.1),
        )
        .await;
        assert!(result.is_err(), "hanging decoder must hit the timeout");

        let pid = wait_for_pid(&pid_file).await;
        for _ in 0..50 {
            if process_is_gone(pid) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        panic!("decoder process {pid} is still running after its capture timed out");
    }
}
