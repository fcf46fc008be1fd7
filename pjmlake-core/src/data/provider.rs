//! Transport trait, raw responses, and structured error types.
//!
//! The Transport trait abstracts over the HTTP client so the fetch pipeline can
//! run against the live API or an in-memory fake in tests.

use super::feed::Feed;
use super::range::Window;
use chrono::NaiveDateTime;
use flate2::read::GzDecoder;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a transport or while unpacking its response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decompress {encoding} body: {message}")]
    Decompress { encoding: String, message: String },

    #[error("transport error: {0}")]
    Other(String),
}

/// Errors from planning, fetching, decoding, or writing a feed.
///
/// Every variant is fatal to the run that produced it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("invalid window span: max span must be at least one day")]
    InvalidSpan,

    #[error("invalid timestamp '{input}' (expected MM/DD/YYYY HH:MM or YYYY-MM-DD HH:MM)")]
    InvalidTimestamp { input: String },

    /// `index` is the zero-based position of the window in the plan.
    #[error("{feed} window index {index} ({window}) failed: {source}")]
    Transport {
        feed: Feed,
        index: usize,
        window: Window,
        #[source]
        source: TransportError,
    },

    #[error("{feed} window index {index} ({window}) returned an undecodable payload: {source}")]
    Decode {
        feed: Feed,
        index: usize,
        window: Window,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A response as delivered by the transport, before decompression.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub content_encoding: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_encoding: None,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check the status and return the decompressed body.
    pub fn into_payload(self) -> Result<Vec<u8>, TransportError> {
        let gzipped = matches!(
            self.content_encoding
                .as_deref()
                .map(|e| e.trim().to_ascii_lowercase())
                .as_deref(),
            Some("gzip") | Some("x-gzip")
        );

        if !self.is_success() {
            let body = if gzipped {
                gunzip(&self.body).unwrap_or(self.body)
            } else {
                self.body
            };
            return Err(TransportError::Status {
                status: self.status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        if gzipped {
            gunzip(&self.body).map_err(|e| TransportError::Decompress {
                encoding: "gzip".into(),
                message: e.to_string(),
            })
        } else {
            Ok(self.body)
        }
    }
}

fn gunzip(body: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(body).read_to_end(&mut out)?;
    Ok(out)
}

/// Request headers, ordered for deterministic logging.
pub type Headers = BTreeMap<String, String>;

/// Something that can perform one blocking GET.
pub trait Transport: Send + Sync {
    /// Human-readable name of this transport.
    fn name(&self) -> &str;

    fn fetch(&self, url: &str, headers: &Headers) -> Result<RawResponse, TransportError>;
}

/// Progress callback for multi-window fetches.
pub trait WindowProgress {
    /// Called before a window's request is sent.
    fn on_window_start(&self, feed: Feed, window: &Window, index: usize, total: usize);

    /// Called after a window has been decoded and merged.
    fn on_window_complete(&self, feed: Feed, window: &Window, index: usize, total: usize, records: usize);
}

/// Progress reporter that emits `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl WindowProgress for LogProgress {
    fn on_window_start(&self, feed: Feed, window: &Window, index: usize, total: usize) {
        tracing::debug!(%feed, %window, "[{}/{}] fetching", index + 1, total);
    }

    fn on_window_complete(&self, feed: Feed, window: &Window, index: usize, total: usize, records: usize) {
        tracing::info!(%feed, %window, records, "[{}/{}] merged", index + 1, total);
    }
}

/// Progress reporter that stays quiet.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl WindowProgress for NoProgress {
    fn on_window_start(&self, _: Feed, _: &Window, _: usize, _: usize) {}

    fn on_window_complete(&self, _: Feed, _: &Window, _: usize, _: usize, _: usize) {}
}
