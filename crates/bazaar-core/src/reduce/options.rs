//! Tunables for the size reducer.

use serde::{Deserialize, Serialize};

use crate::decode::{FilterType, WHITE};

/// Ceiling used by the marketplace upload endpoint: 5 MiB.
pub const DEFAULT_CEILING: usize = 5 * 1024 * 1024;

/// JPEG qualities tried at full resolution, in order.
pub const QUALITY_LADDER: [u8; 9] = [95, 85, 75, 65, 55, 45, 35, 25, 15];

/// Scale factors (in tenths) tried once the quality ladder is exhausted.
pub const SCALE_LADDER_TENTHS: [u8; 6] = [9, 8, 7, 6, 5, 4];

/// JPEG quality used for every step of the scale ladder.
pub const SCALED_QUALITY: u8 = 85;

/// Options controlling a reduction.
///
/// `Default` reproduces the production ladder with a 5 MiB ceiling. Hosts
/// that load this from configuration may omit any field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReduceOptions {
    /// Maximum acceptable output size in bytes.
    pub ceiling: usize,
    pub quality_ladder: Vec<u8>,
    pub scale_ladder_tenths: Vec<u8>,
    pub scaled_quality: u8,
    /// Color transparent pixels are flattened onto.
    pub background: [u8; 3],
    /// Resampling filter for the scale ladder.
    pub filter: FilterType,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self {
            ceiling: DEFAULT_CEILING,
            quality_ladder: QUALITY_LADDER.to_vec(),
            scale_ladder_tenths: SCALE_LADDER_TENTHS.to_vec(),
            scaled_quality: SCALED_QUALITY,
            background: WHITE,
            filter: FilterType::Lanczos3,
        }
    }
}

impl ReduceOptions {
    /// Default ladders with a different ceiling.
    pub fn with_ceiling(ceiling: usize) -> Self {
        Self {
            ceiling,
            ..Self::default()
        }
    }
}
