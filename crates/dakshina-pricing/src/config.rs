//! Pricing service configuration

use crate::policy::PricingPolicy;
use config::{Config, ConfigError, Environment, File};
use dakshina_common::{DakshinaError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Default config file, relative to the working directory, without extension
pub const DEFAULT_CONFIG_FILE: &str = "config/pricing";

/// Pricing service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Pricing figures
    pub policy: PricingPolicy,
    /// Services priced concurrently by the batch operation
    pub batch_concurrency: usize,
    /// JSON rate table loaded at startup; built-in defaults when unset
    pub rates_path: Option<String>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            policy: PricingPolicy::default(),
            batch_concurrency: 16,
            rates_path: None,
        }
    }
}

impl PricingConfig {
    /// Load configuration from `.env`, the config file and `DAKSHINA__` variables
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let file =
            std::env::var("DAKSHINA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let cfg = Self::build(File::with_name(&file).required(false))?;
        info!(
            config_file = %file,
            batch_concurrency = cfg.batch_concurrency,
            "Pricing configuration loaded"
        );
        Ok(cfg)
    }

    /// Load configuration from a specific file, still honouring `DAKSHINA__` variables
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::build(File::from(path.as_ref()))
    }

    fn build(file: File<config::FileSourceFile, config::FileFormat>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("DAKSHINA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_error)?;

        let cfg: Self = settings.try_deserialize().map_err(config_error)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_concurrency == 0 {
            return Err(DakshinaError::Config(
                "batch_concurrency must be at least 1".to_string(),
            ));
        }
        self.policy.validate()?;
        Ok(())
    }
}

fn config_error(err: ConfigError) -> DakshinaError {
    DakshinaError::Config(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let cfg = PricingConfig::default();
        assert_eq!(cfg.batch_concurrency, 16);
        assert!(cfg.rates_path.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let file = toml_file(
            r#"
batch_concurrency = 4
rates_path = "config/rates.json"

[policy.fallback]
multiplier = "1.5"

[policy.demand]
ceiling = "1.4"
"#,
        );
        let cfg = PricingConfig::from_file(file.path()).unwrap();

        assert_eq!(cfg.batch_concurrency, 4);
        assert_eq!(cfg.rates_path.as_deref(), Some("config/rates.json"));
        assert_eq!(cfg.policy.fallback.multiplier, dec!(1.5));
        assert_eq!(cfg.policy.fallback.confidence, 0.3);
        assert_eq!(cfg.policy.demand.ceiling, dec!(1.4));
        assert_eq!(cfg.policy.demand.floor, dec!(0.7));
        assert_eq!(cfg.policy.category_rules.len(), 4);
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let file = toml_file(
            r#"
[policy.bounds]
ceiling_multiplier = "0.5"
"#,
        );
        assert!(matches!(
            PricingConfig::from_file(file.path()),
            Err(DakshinaError::Pricing(_))
        ));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let file = toml_file("batch_concurrency = 0\n");
        assert!(matches!(
            PricingConfig::from_file(file.path()),
            Err(DakshinaError::Config(_))
        ));
    }
}
