//! Stream-type probing via a `HEAD` request.
//!
//! The comparison pipeline does not care which pathway produced a buffer —
//! ffmpeg consumes both continuous streams and segmented playlists — but the
//! kind is logged and selects the capture pathway.  Detection is therefore
//! best-effort: any transport failure degrades to a warning and the
//! continuous-audio assumption, never an aborted comparison.

use std::time::Duration;

/// Probe timeout; a stream host that cannot answer a HEAD in this window is
/// assumed to be a plain audio mount.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// StreamKind
// ---------------------------------------------------------------------------

/// Capture pathway for one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// A continuous audio mount (Icecast, Shoutcast, plain MP3/AAC URL).
    ContinuousAudio,
    /// A segmented playlist (HLS `.m3u8`).
    SegmentedPlaylist,
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamKind::ContinuousAudio => write!(f, "continuous audio"),
            StreamKind::SegmentedPlaylist => write!(f, "segmented playlist"),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify an endpoint from its `Content-Type` header and URL.
///
/// Pure function, split out from the network probe so it can be tested
/// without I/O.
pub fn classify(content_type: &str, url: &str) -> StreamKind {
    let content_type = content_type.to_ascii_lowercase();
    if content_type.contains("mpegurl")
        || content_type.contains("m3u8")
        || url.ends_with(".m3u8")
    {
        StreamKind::SegmentedPlaylist
    } else {
        StreamKind::ContinuousAudio
    }
}

/// Detect the stream kind of `url` with a bounded HEAD request.
pub async fn detect_stream_kind(client: &reqwest::Client, url: &str) -> StreamKind {
    let response = client
        .head(url)
        .timeout(PROBE_TIMEOUT)
        .send()
        .await;

    match response {
        Ok(resp) => {
            let content_type = resp
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");
            let kind = classify(content_type, url);
            log::debug!("{url}: Content-Type {content_type:?} → {kind}");
            kind
        }
        Err(e) => {
            log::warn!("could not detect stream type for {url} ({e}); assuming continuous audio");
            StreamKind::ContinuousAudio
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
