use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::reduce::DEFAULT_CEILING;

pub const UPLOAD_DIR_VAR: &str = "BAZAAR_UPLOAD_DIR";
pub const CEILING_VAR: &str = "BAZAAR_PHOTO_CEILING";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Where listing photos live and how large they may be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoStoreConfig {
    pub upload_dir: PathBuf,
    /// Byte ceiling handed to the reducer.
    pub ceiling: usize,
}

impl Default for PhotoStoreConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            ceiling: DEFAULT_CEILING,
        }
    }
}

impl PhotoStoreConfig {
    /// Load from `BAZAAR_UPLOAD_DIR` and `BAZAAR_PHOTO_CEILING`, falling
    /// back to the defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            upload_dir: try_load(&lookup, UPLOAD_DIR_VAR, defaults.upload_dir)?,
            ceiling: try_load(&lookup, CEILING_VAR, defaults.ceiling)?,
        })
    }
}

fn try_load<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::InvalidValue {
                key,
                value,
                reason: e.to_string(),
            }
        }),
        None => {
            info!("{key} not set, using default: {default:?}");
            Ok(default)
        }
    }
}
