//! Validated client configuration.

use crate::args::KinesisArgs;
use crate::error::ConfigError;
use std::path::PathBuf;

/// Process-wide adapter configuration, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub region: String,
    pub stream_name: String,
    /// Number of samples reported per call
    pub batch_size: usize,
    pub audit_log: Option<PathBuf>,
}

impl ClientConfig {
    /// Build and validate a config from CLI arguments.
    ///
    /// The stream name comes from `--stream-name`, falling back to `--host`.
    pub fn from_args(args: &KinesisArgs) -> Result<Self, ConfigError> {
        let stream_name = non_empty(args.stream_name.as_deref())
            .or_else(|| non_empty(args.host.as_deref()))
            .ok_or(ConfigError::MissingStreamName)?;

        let config = Self {
            region: args.region.trim().to_string(),
            stream_name,
            batch_size: args.batch_size,
            audit_log: (!args.no_audit_log).then(|| args.audit_log.clone()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stream_name.trim().is_empty() {
            return Err(ConfigError::MissingStreamName);
        }
        if !is_valid_region(&self.region) {
            return Err(ConfigError::InvalidRegion(self.region.clone()));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(self.batch_size));
        }
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Check the shape of an AWS region code, e.g. `us-east-1` or `us-gov-west-1`.
pub fn is_valid_region(region: &str) -> bool {
    let parts: Vec<&str> = region.split('-').collect();
    if parts.len() < 3 {
        return false;
    }

    let (number, names) = match parts.split_last() {
        Some(split) => split,
        None => return false,
    };

    !number.is_empty()
        && number.bytes().all(|b| b.is_ascii_digit())
        && names
            .iter()
            .all(|name| !name.is_empty() && name.bytes().all(|b| b.is_ascii_lowercase()))
}
