//! Document store configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Upper bound for per-collection snapshot buffers.
pub const MAX_CHANNEL_CAPACITY: usize = 4096;

/// Where the journal is persisted and how snapshots are buffered.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Directory holding `store.json`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Snapshots buffered per collection before slow subscribers lag
    #[serde(default = "default_channel_capacity")]
    pub snapshot_channel_capacity: usize,
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("store.data_dir"));
        }
        if self.snapshot_channel_capacity == 0
            || self.snapshot_channel_capacity > MAX_CHANNEL_CAPACITY
        {
            return Err(ValidationError::InvalidChannelCapacity {
                max: MAX_CHANNEL_CAPACITY,
            });
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            snapshot_channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_channel_capacity() -> usize {
    crate::adapters::DEFAULT_CHANNEL_CAPACITY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = StoreConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.snapshot_channel_capacity, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = StoreConfig {
            snapshot_channel_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidChannelCapacity { .. })
        ));
    }

    #[test]
    fn empty_data_dir_is_rejected() {
        let config = StoreConfig {
            data_dir: PathBuf::new(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("store.data_dir"))
        );
    }
}
