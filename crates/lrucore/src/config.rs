//! Cache construction parameters

use crate::error::{Error, Result};

/// Default capacity when none is configured
pub const DEFAULT_MAX_SIZE: usize = 3;

/// Validated cache configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    max_size: usize,
}

impl CacheConfig {
    /// Build a config, rejecting `max_size < 1`
    pub fn new(max_size: usize) -> Result<Self> {
        if max_size < 1 {
            return Err(Error::Config(format!(
                "max_size must be at least 1, got {}",
                max_size
            ))
            .logged());
        }
        Ok(Self { max_size })
    }

    /// Maximum number of entries the cache holds
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}
