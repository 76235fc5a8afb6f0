//! Shrinking uploaded photos to fit a byte ceiling.
//!
//! The reducer accepts raw upload bytes and a declared content type and
//! returns bytes that are at most `ceiling` long whenever the search space
//! allows it:
//!
//! 1. Reject content types outside the allow-list, before touching the bytes.
//! 2. Return the input untouched if it already fits.
//! 3. Decode once and flatten onto an opaque background.
//! 4. Walk [`QUALITY_LADDER`] at full resolution.
//! 5. Walk [`SCALE_LADDER_TENTHS`] at [`SCALED_QUALITY`]. Every step resizes
//!    the canonical full-resolution image, never a previous step's output,
//!    so resampling artifacts do not compound.
//! 6. If nothing fits, return the last candidate.
//!
//! The search is synchronous and owns all of its buffers; calls may run
//! concurrently without coordination.

mod options;
mod report;

pub use options::{
    ReduceOptions, DEFAULT_CEILING, QUALITY_LADDER, SCALED_QUALITY, SCALE_LADDER_TENTHS,
};
pub use report::{Attempt, ReduceOutcome, ReduceReport};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::decode::{self, DecodeError, DecodedImage};
use crate::encode::{self, EncodeError};
use crate::mime::ImageMime;

/// Errors returned by the reducer. No bytes are produced on error.
#[derive(Debug, Error)]
pub enum ReduceError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Invalid image data: {0}")]
    InvalidImageData(#[source] DecodeError),

    #[error("Image processing failed: {0}")]
    ImageProcessing(#[source] ProcessingError),
}

/// Underlying cause of [`ReduceError::ImageProcessing`].
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("resize failed: {0}")]
    Resize(#[source] DecodeError),
}

impl From<EncodeError> for ReduceError {
    fn from(err: EncodeError) -> Self {
        ReduceError::ImageProcessing(ProcessingError::Encode(err))
    }
}

/// Reduce `bytes` to at most `ceiling` bytes using the default ladders.
///
/// See [`reduce_with_report`] for details.
pub fn reduce(bytes: &[u8], content_type: &str, ceiling: usize) -> Result<Vec<u8>, ReduceError> {
    reduce_with_report(bytes, content_type, &ReduceOptions::with_ceiling(ceiling))
        .map(ReduceReport::into_bytes)
}

/// Reduce `bytes` and describe how the result was obtained.
///
/// # Errors
///
/// - `UnsupportedMediaType` if `content_type` is not an allowed image type.
/// - `InvalidImageData` if the input exceeds the ceiling and cannot be decoded.
/// - `ImageProcessing` if a resize or encode step fails.
///
/// Failing to get under the ceiling is not an error: the report's outcome
/// is then [`ReduceOutcome::BestEffort`].
pub fn reduce_with_report(
    bytes: &[u8],
    content_type: &str,
    options: &ReduceOptions,
) -> Result<ReduceReport, ReduceError> {
    let mime = ImageMime::from_content_type(content_type)
        .ok_or_else(|| ReduceError::UnsupportedMediaType(content_type.to_string()))?;

    let ceiling = options.ceiling;
    if bytes.len() <= ceiling {
        debug!(len = bytes.len(), ceiling, %mime, "upload within ceiling, keeping original");
        return Ok(ReduceReport {
            bytes: bytes.to_vec(),
            content_type: mime,
            outcome: ReduceOutcome::Unchanged,
            attempts: Vec::new(),
            ceiling,
        });
    }

    let decoded = decode::decode_image(bytes, mime).map_err(ReduceError::InvalidImageData)?;
    let canonical = decode::canonicalize(decoded, options.background);
    debug!(
        width = canonical.width,
        height = canonical.height,
        len = bytes.len(),
        ceiling,
        "searching for a candidate under the ceiling"
    );

    let mut search = Search::new(ceiling);

    for &quality in &options.quality_ladder {
        if search.try_candidate(&canonical, 10, quality)? {
            return Ok(search.finish(ReduceOutcome::Quality { quality }));
        }
    }

    let quality = options.scaled_quality;
    for &scale_tenths in &options.scale_ladder_tenths {
        let scaled = decode::scale_by_tenths(&canonical, scale_tenths, options.filter)
            .map_err(|e| ReduceError::ImageProcessing(ProcessingError::Resize(e)))?;
        if search.try_candidate(&scaled, scale_tenths, quality)? {
            return Ok(search.finish(ReduceOutcome::Scaled {
                scale_tenths,
                quality,
            }));
        }
    }

    // Both ladders empty: still hand back a JPEG of the canonical image.
    if search.last.is_none() {
        search.try_candidate(&canonical, 10, quality)?;
    }

    let (scale_tenths, quality) = search
        .attempts
        .last()
        .map(|a| (a.scale_tenths, a.quality))
        .unwrap_or((10, quality));
    warn!(
        ceiling,
        attempts = search.attempts.len(),
        "no candidate fits the ceiling, returning the last one"
    );
    Ok(search.finish(ReduceOutcome::BestEffort {
        scale_tenths,
        quality,
    }))
}

/// Candidates produced so far; only the most recent one is kept.
struct Search {
    ceiling: usize,
    attempts: Vec<Attempt>,
    last: Option<Vec<u8>>,
}

impl Search {
    fn new(ceiling: usize) -> Self {
        Self {
            ceiling,
            attempts: Vec::with_capacity(QUALITY_LADDER.len() + SCALE_LADDER_TENTHS.len()),
            last: None,
        }
    }

    /// Encode `image` at `quality` and report whether it fits.
    fn try_candidate(
        &mut self,
        image: &DecodedImage,
        scale_tenths: u8,
        quality: u8,
    ) -> Result<bool, ReduceError> {
        let candidate = encode::encode_decoded(image, quality)?;
        let attempt = Attempt {
            quality,
            scale_tenths,
            width: image.width,
            height: image.height,
            len: candidate.len(),
        };
        debug!(?attempt, ceiling = self.ceiling, "encoded candidate");

        let fits = candidate.len() <= self.ceiling;
        self.attempts.push(attempt);
        self.last = Some(candidate);
        Ok(fits)
    }

    fn finish(self, outcome: ReduceOutcome) -> ReduceReport {
        let bytes = self.last.unwrap_or_default();
        info!(?outcome, len = bytes.len(), ceiling = self.ceiling, "photo reduced");
        ReduceReport {
            bytes,
            content_type: ImageMime::Jpeg,
            outcome,
            attempts: self.attempts,
            ceiling: self.ceiling,
        }
    }
}
