//! Settings, layered: built-in defaults, then `cashflow.toml` in the platform
//! config directory (optional), then `CASHFLOW_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::CurrencyCode;

pub(crate) const CONFIG_FILE: &str = "cashflow.toml";
const ENV_PREFIX: &str = "CASHFLOW";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// Currency every stored amount is denominated in.
    pub(crate) base_currency: String,
    /// Currencies offered for display, base included.
    pub(crate) currencies: Vec<String>,
    pub(crate) low_balance_percent: u32,
    pub(crate) rate_api_url: String,
    pub(crate) rate_timeout_secs: u64,
    pub(crate) storage_key: String,
    pub(crate) data_dir: Option<PathBuf>,
    pub(crate) log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_currency: "INR".to_string(),
            currencies: vec!["INR".to_string(), "USD".to_string()],
            low_balance_percent: 10,
            rate_api_url: "https://api.frankfurter.app".to_string(),
            rate_timeout_secs: 10,
            storage_key: "cashflowData".to_string(),
            data_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub(crate) fn load() -> Result<Self> {
        let config_file = directories::ProjectDirs::from("com", "cashflow", "CashFlow")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE));
        Self::load_from(config_file.as_deref())
    }

    pub(crate) fn load_from(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("currencies"),
        );

        let settings: Settings = builder
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        CurrencyCode::parse(&self.base_currency)
            .with_context(|| format!("base_currency '{}'", self.base_currency))?;
        for code in &self.currencies {
            CurrencyCode::parse(code).with_context(|| format!("currencies entry '{code}'"))?;
        }
        if !(1..=100).contains(&self.low_balance_percent) {
            anyhow::bail!(
                "low_balance_percent must be between 1 and 100, got {}",
                self.low_balance_percent
            );
        }
        if self.storage_key.trim().is_empty() {
            anyhow::bail!("storage_key cannot be empty");
        }
        if self.rate_timeout_secs == 0 {
            anyhow::bail!("rate_timeout_secs must be at least 1");
        }
        Ok(())
    }

    pub(crate) fn base(&self) -> Result<CurrencyCode> {
        Ok(CurrencyCode::parse(&self.base_currency)?)
    }

    /// Display choices, base first and without duplicates.
    pub(crate) fn display_currencies(&self) -> Vec<CurrencyCode> {
        let mut out: Vec<CurrencyCode> = Vec::new();
        let all = std::iter::once(&self.base_currency).chain(self.currencies.iter());
        for code in all.filter_map(|c| CurrencyCode::parse(c).ok()) {
            if !out.contains(&code) {
                out.push(code);
            }
        }
        out
    }

    pub(crate) fn rate_timeout(&self) -> Duration {
        Duration::from_secs(self.rate_timeout_secs)
    }

    pub(crate) fn data_dir(&self) -> Result<PathBuf> {
        let dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => directories::ProjectDirs::from("com", "cashflow", "CashFlow")
                .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
                .data_dir()
                .to_path_buf(),
        };
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        Ok(dir)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
