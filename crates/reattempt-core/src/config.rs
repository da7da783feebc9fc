use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Retry defaults as read from a TOML document.
///
/// Both keys are optional; anything missing falls back to
/// `RetryPolicy::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    /// Fixed pause between attempts, in whole milliseconds. Sub-millisecond
    /// delays cannot be expressed here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
}

impl RetryConfig {
    pub fn from_toml_str(data: &str) -> Result<Self> {
        let cfg: RetryConfig = toml::from_str(data).context("invalid retry config")?;
        Ok(cfg)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading retry config {}", path.display()))?;
        let cfg = Self::from_toml_str(&data)
            .with_context(|| format!("parsing retry config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded retry config");
        Ok(cfg)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn into_policy(self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy {
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            delay: self
                .delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.delay),
        }
    }
}

/// Rounds the delay down to whole milliseconds; delays beyond `u64::MAX` ms
/// saturate.
impl From<RetryPolicy> for RetryConfig {
    fn from(policy: RetryPolicy) -> Self {
        Self {
            max_attempts: Some(policy.max_attempts),
            delay_ms: Some(u64::try_from(policy.delay.as_millis()).unwrap_or(u64::MAX)),
        }
    }
}
