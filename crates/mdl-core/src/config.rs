use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Hard bounds enforced before any task is dispatched.
pub const MAX_JOBS: usize = 50;
pub const MAX_RETRIES: u32 = 10;
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

/// Configuration error; always fatal, raised before any dispatch.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("jobs must be between 1 and {MAX_JOBS}, got {0}")]
    JobsOutOfRange(usize),
    #[error("retries must be between 0 and {MAX_RETRIES}, got {0}")]
    RetriesOutOfRange(u32),
    #[error("timeout must be at most {MAX_TIMEOUT_SECS} seconds, got {0}")]
    TimeoutOutOfRange(u64),
    #[error("backoff base delay must be a non-negative number of seconds, got {0}")]
    BadBaseDelay(f64),
}

/// Global configuration loaded from `~/.config/mdl/config.toml`.
/// Every field is a default; CLI flags override per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MdlConfig {
    /// Concurrent download slots (1–50).
    pub jobs: usize,
    /// Additional attempts after the first failure (0–10).
    pub retries: u32,
    /// Base delay in seconds for linear backoff (wait = attempt * base).
    pub base_delay_secs: f64,
    /// Per-attempt timeout in seconds (0 = no timeout).
    #[serde(default)]
    pub timeout_secs: u64,
    /// Optional download rate cap, passed through to the transfer backend
    /// (e.g. "500k", "2m"). The scheduler never interprets it.
    #[serde(default)]
    pub rate_limit: Option<String>,
    /// Resume partially downloaded files instead of skipping existing ones.
    #[serde(default)]
    pub resume: bool,
}

impl Default for MdlConfig {
    fn default() -> Self {
        Self {
            jobs: 4,
            retries: 3,
            base_delay_secs: 2.0,
            timeout_secs: 0,
            rate_limit: None,
            resume: false,
        }
    }
}

impl MdlConfig {
    /// Validates the bounds the scheduler relies on. Called after CLI
    /// overrides are applied and before anything is dispatched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jobs == 0 || self.jobs > MAX_JOBS {
            return Err(ConfigError::JobsOutOfRange(self.jobs));
        }
        if self.retries > MAX_RETRIES {
            return Err(ConfigError::RetriesOutOfRange(self.retries));
        }
        if self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::TimeoutOutOfRange(self.timeout_secs));
        }
        if !self.base_delay_secs.is_finite() || self.base_delay_secs < 0.0 {
            return Err(ConfigError::BadBaseDelay(self.base_delay_secs));
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MdlConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = MdlConfig::default();
        assert_eq!(cfg.jobs, 4);
        assert_eq!(cfg.retries, 3);
        assert!((cfg.base_delay_secs - 2.0).abs() < 1e-9);
        assert_eq!(cfg.timeout_secs, 0);
        assert!(cfg.rate_limit.is_none());
        assert!(!cfg.resume);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = MdlConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: MdlConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.jobs, cfg.jobs);
        assert_eq!(parsed.retries, cfg.retries);
        assert_eq!(parsed.timeout_secs, cfg.timeout_secs);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            jobs = 8
            retries = 5
            base_delay_secs = 0.5
            timeout_secs = 120
            rate_limit = "500k"
            resume = true
        "#;
        let cfg: MdlConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.jobs, 8);
        assert_eq!(cfg.retries, 5);
        assert_eq!(cfg.timeout_secs, 120);
        assert_eq!(cfg.rate_limit.as_deref(), Some("500k"));
        assert!(cfg.resume);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let mut cfg = MdlConfig::default();
        cfg.jobs = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::JobsOutOfRange(0))));
        cfg.jobs = 51;
        assert!(matches!(cfg.validate(), Err(ConfigError::JobsOutOfRange(51))));

        let mut cfg = MdlConfig::default();
        cfg.retries = 11;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::RetriesOutOfRange(11))
        ));

        let mut cfg = MdlConfig::default();
        cfg.timeout_secs = MAX_TIMEOUT_SECS + 1;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::TimeoutOutOfRange(_))
        ));

        let mut cfg = MdlConfig::default();
        cfg.base_delay_secs = -1.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::BadBaseDelay(_))));
    }

    #[test]
    fn validate_accepts_boundary_values() {
        let mut cfg = MdlConfig::default();
        cfg.jobs = 1;
        cfg.retries = 0;
        assert!(cfg.validate().is_ok());
        cfg.jobs = MAX_JOBS;
        cfg.retries = MAX_RETRIES;
        cfg.timeout_secs = MAX_TIMEOUT_SECS;
        assert!(cfg.validate().is_ok());
    }
}
