//! Limits applied to a read request.

use log::debug;
use serde::{
    Deserialize,
    Serialize,
};

use crate::utils::env_parse;
use crate::{
    getter_fn,
    with_field_fn,
};

/// Largest output extent along a single axis.
pub const DEFAULT_MAX_AXIS_LEN: u64 = i32::MAX as u64;
/// Largest total output length (2^52).
pub const DEFAULT_MAX_TOTAL_LEN: u64 = 1 << 52;
/// Hyperslab count above which a warning is logged.
pub const DEFAULT_WARN_HYPERSLABS: u64 = 100_000;

pub const ENV_MAX_HYPERSLABS: &str = "SLABREAD_MAX_HYPERSLABS";
pub const ENV_MAX_TOTAL_LEN: &str = "SLABREAD_MAX_TOTAL_LEN";

/// Bounds checked while building the region table and the selection.
///
/// The axis and total bounds describe what the destination buffer can hold,
/// independently of the integer width used for accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadConfig {
    max_axis_len:    u64,
    max_total_len:   u64,
    max_hyperslabs:  Option<u64>,
    warn_hyperslabs: u64,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            max_axis_len:    DEFAULT_MAX_AXIS_LEN,
            max_total_len:   DEFAULT_MAX_TOTAL_LEN,
            max_hyperslabs:  None,
            warn_hyperslabs: DEFAULT_WARN_HYPERSLABS,
        }
    }
}

impl ReadConfig {
    getter_fn!(max_axis_len, u64);
    getter_fn!(max_total_len, u64);
    getter_fn!(max_hyperslabs, Option<u64>);
    getter_fn!(warn_hyperslabs, u64);

    with_field_fn!(max_axis_len, u64);
    with_field_fn!(max_total_len, u64);
    with_field_fn!(max_hyperslabs, Option<u64>);
    with_field_fn!(warn_hyperslabs, u64);

    /// Default config with `SLABREAD_MAX_HYPERSLABS` and
    /// `SLABREAD_MAX_TOTAL_LEN` applied when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(n) = env_parse::<u64>(ENV_MAX_HYPERSLABS) {
            debug!("{} = {}", ENV_MAX_HYPERSLABS, n);
            config.max_hyperslabs = Some(n);
        }
        if let Some(n) = env_parse::<u64>(ENV_MAX_TOTAL_LEN) {
            debug!("{} = {}", ENV_MAX_TOTAL_LEN, n);
            config.max_total_len = n;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ReadConfig::default()
            .with_max_axis_len(10)
            .with_max_hyperslabs(Some(4));
        assert_eq!(config.max_axis_len(), 10);
        assert_eq!(config.max_hyperslabs(), Some(4));
        assert_eq!(config.max_total_len(), DEFAULT_MAX_TOTAL_LEN);
    }

    #[test]
    fn test_from_env() {
        std::env::set_var(ENV_MAX_HYPERSLABS, "12");
        std::env::set_var(ENV_MAX_TOTAL_LEN, "not a number");
        let config = ReadConfig::from_env();
        std::env::remove_var(ENV_MAX_HYPERSLABS);
        std::env::remove_var(ENV_MAX_TOTAL_LEN);

        assert_eq!(config.max_hyperslabs(), Some(12));
        assert_eq!(config.max_total_len(), DEFAULT_MAX_TOTAL_LEN);
    }
}
