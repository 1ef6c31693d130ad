//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

use crate::cache::Capacity;

/// Cache configuration parameters.
///
/// Built once and handed to the cache at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheConfig {
    /// Maximum number of resident entries
    pub max_resident: Capacity,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHEBACK_MAX_RESIDENT` - Resident entry limit, `0` disables the limit (default: 1000)
    pub fn from_env() -> Self {
        Self {
            max_resident: env::var("CACHEBACK_MAX_RESIDENT")
                .ok()
                .and_then(|v| v.trim().parse::<usize>().ok())
                .map(Capacity::from)
                .unwrap_or_default(),
        }
    }

    /// Creates a config with the given resident limit.
    pub fn with_max_resident(max_resident: impl Into<Capacity>) -> Self {
        Self {
            max_resident: max_resident.into(),
        }
    }
}
