//! What a reduction did, for callers that log or display it.

use serde::{Deserialize, Serialize};

use crate::mime::ImageMime;

/// How the returned bytes were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReduceOutcome {
    /// Input was already within the ceiling and is returned as-is.
    Unchanged,
    /// A full-resolution JPEG at `quality` fit.
    Quality { quality: u8 },
    /// A downscaled JPEG fit.
    Scaled { scale_tenths: u8, quality: u8 },
    /// Nothing fit; the last candidate tried is returned anyway.
    BestEffort { scale_tenths: u8, quality: u8 },
}

impl ReduceOutcome {
    pub fn is_reencoded(self) -> bool {
        !matches!(self, ReduceOutcome::Unchanged)
    }
}

/// One encoded candidate produced during the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub quality: u8,
    /// 10 for full resolution.
    pub scale_tenths: u8,
    pub width: u32,
    pub height: u32,
    /// Encoded size in bytes.
    pub len: usize,
}

/// Result of [`reduce_with_report`](super::reduce_with_report).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceReport {
    pub bytes: Vec<u8>,
    /// Format of `bytes`: the declared type when unchanged, JPEG otherwise.
    pub content_type: ImageMime,
    pub outcome: ReduceOutcome,
    /// Candidates in the order they were tried.
    pub attempts: Vec<Attempt>,
    pub ceiling: usize,
}

impl ReduceReport {
    pub fn fits_ceiling(&self) -> bool {
        self.bytes.len() <= self.ceiling
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
