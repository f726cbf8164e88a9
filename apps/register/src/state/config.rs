//! # Configuration State
//!
//! Stores register configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Environment Variables (highest priority)                           │
//! │     BISTRO_STORE_NAME, BISTRO_TAX_RATE=8.25, BISTRO_DEFAULT_TIP=15,     │
//! │     BISTRO_PROCESSING_DELAY_MS=2000                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $BISTRO_CONFIG, or register.toml in the platform config dir        │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! store_name = "Bistro Downtown"
//! tax_rate_bps = 825
//! tip_presets = [10, 15, 20]
//! default_tip_percent = 15
//! processing_delay_ms = 2000
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bistro_core::{Money, Rate, TipPolicy};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ConfigError;

/// Decimal places of a `Money` amount (cents).
const MONEY_DECIMALS: u8 = 2;

/// Register configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// Store name (shown on the confirmation step)
    pub store_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency. Must match the cent
    /// precision of `Money`, so only 2 is accepted.
    pub currency_decimals: u8,

    /// Tax rate in basis points
    /// e.g., 800 = 8%
    pub tax_rate_bps: i64,

    /// Tip buttons offered on the Add Tip step, in whole percent
    pub tip_presets: Vec<i64>,

    /// Preset selected when checkout starts
    pub default_tip_percent: i64,

    /// How long order processing takes before confirmation (milliseconds)
    pub processing_delay_ms: u64,

    /// Kitchen estimate shown once an order is confirmed
    pub estimated_prep_time: String,
}

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Store: "Bistro Dev Kitchen"
    /// - Currency: USD ($)
    /// - Tax: 8%
    /// - Tips: 10 / 15 / 20 %, 15 % preselected
    /// - Processing: 2 seconds
    fn default() -> Self {
        ConfigState {
            store_name: "Bistro Dev Kitchen".to_string(),
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            tax_rate_bps: 800,
            tip_presets: vec![10, 15, 20],
            default_tip_percent: 15,
            processing_delay_ms: 2000,
            estimated_prep_time: "25-30 minutes".to_string(),
        }
    }
}

impl ConfigState {
    /// Loads configuration: defaults, then the TOML file, then environment.
    ///
    /// `config_path` overrides the file location; otherwise `BISTRO_CONFIG`
    /// or the platform config directory is used. A missing file is fine.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = config_path
            .or_else(|| std::env::var("BISTRO_CONFIG").ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(?path, "No config file, using defaults");
                ConfigState::default()
            }
            None => ConfigState::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        info!(
            store = %config.store_name,
            tax = %config.tax_rate(),
            default_tip = config.default_tip_percent,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Reads a TOML file; fields it omits keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&contents)?;
        info!(?path, "Config file loaded");
        Ok(config)
    }

    /// Applies `BISTRO_*` overrides using `lookup` to read variables.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("BISTRO_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(raw) = lookup("BISTRO_TAX_RATE") {
            match raw.parse::<Rate>() {
                Ok(rate) => self.tax_rate_bps = rate.bps(),
                Err(e) => warn!(value = %raw, error = %e, "Ignoring BISTRO_TAX_RATE"),
            }
        }

        if let Some(raw) = lookup("BISTRO_DEFAULT_TIP") {
            match raw.trim().parse::<i64>() {
                Ok(percent) => self.default_tip_percent = percent,
                Err(e) => warn!(value = %raw, error = %e, "Ignoring BISTRO_DEFAULT_TIP"),
            }
        }

        if let Some(raw) = lookup("BISTRO_PROCESSING_DELAY_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.processing_delay_ms = ms,
                Err(e) => warn!(value = %raw, error = %e, "Ignoring BISTRO_PROCESSING_DELAY_MS"),
            }
        }
    }

    /// Checks the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0..=10_000).contains(&self.tax_rate_bps) {
            return Err(ConfigError::Invalid(format!(
                "tax_rate_bps must be between 0 and 10000, got {}",
                self.tax_rate_bps
            )));
        }

        if self.tip_presets.is_empty() {
            return Err(ConfigError::Invalid("tip_presets cannot be empty".to_string()));
        }

        if let Some(bad) = self.tip_presets.iter().find(|p| !(0..=100).contains(*p)) {
            return Err(ConfigError::Invalid(format!(
                "tip preset {}% must be between 0 and 100",
                bad
            )));
        }

        if !self.tip_presets.contains(&self.default_tip_percent) {
            return Err(ConfigError::Invalid(format!(
                "default_tip_percent {} is not one of the presets {:?}",
                self.default_tip_percent, self.tip_presets
            )));
        }

        if self.currency_decimals != MONEY_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "currency_decimals must be {} (amounts are kept in cents), got {}",
                MONEY_DECIMALS, self.currency_decimals
            )));
        }

        Ok(())
    }

    /// Tax rate as a core `Rate`.
    pub fn tax_rate(&self) -> Rate {
        Rate::from_bps(self.tax_rate_bps)
    }

    /// The tip policy a new checkout starts with.
    pub fn default_tip(&self) -> TipPolicy {
        TipPolicy::percent(self.default_tip_percent)
    }

    /// Simulated payment processing time.
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_register::state::ConfigState;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(3931), "$39.31");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = (cents / divisor).unsigned_abs();
        let frac = (cents % divisor).unsigned_abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole,
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.to_string()
            }
        )
    }

    /// Formats a `Money` value with the configured currency.
    pub fn format_money(&self, amount: Money) -> String {
        self.format_currency(amount.cents())
    }

    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "bistro", "register")
            .map(|dirs| dirs.config_dir().join("register.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ConfigState::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tax_rate(), Rate::from_bps(800));
        assert_eq!(config.default_tip(), TipPolicy::percent(15));
        assert_eq!(config.processing_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(3931), "$39.31");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(0), "$0.00");
        assert_eq!(config.format_currency(-3034), "-$30.34");
        assert_eq!(config.format_money(Money::from_cents(1966)), "$19.66");
        assert_eq!(config.format_currency(i64::MIN), "-$92233720368547758.08");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BISTRO_STORE_NAME", "Corner Bistro"),
            ("BISTRO_TAX_RATE", "8.25"),
            ("BISTRO_DEFAULT_TIP", "20"),
            ("BISTRO_PROCESSING_DELAY_MS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = ConfigState::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.store_name, "Corner Bistro");
        assert_eq!(config.tax_rate_bps, 825);
        assert_eq!(config.default_tip_percent, 20);
        // bad value ignored
        assert_eq!(config.processing_delay_ms, 2000);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = ConfigState::default();
        config.tax_rate_bps = -1;
        assert!(config.validate().is_err());

        let mut config = ConfigState::default();
        config.tip_presets.clear();
        assert!(config.validate().is_err());

        let mut config = ConfigState::default();
        config.default_tip_percent = 18;
        assert!(config.validate().is_err());

        let mut config = ConfigState::default();
        config.currency_decimals = 9;
        assert!(config.validate().is_err());

        let mut config = ConfigState::default();
        config.currency_decimals = 3;
        assert!(config.validate().is_err());
        config.currency_decimals = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file_keeps_unset_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "store_name = \"Harbor Grill\"").unwrap();
        writeln!(file, "tax_rate_bps = 900").unwrap();
        writeln!(file, "tip_presets = [12, 18, 22]").unwrap();
        writeln!(file, "default_tip_percent = 18").unwrap();

        let config = ConfigState::from_file(file.path()).unwrap();

        assert_eq!(config.store_name, "Harbor Grill");
        assert_eq!(config.tax_rate_bps, 900);
        assert_eq!(config.tip_presets, vec![12, 18, 22]);
        assert_eq!(config.currency_symbol, "$");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tax_rate_bps = \"lots\"").unwrap();

        assert!(matches!(
            ConfigState::from_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = ConfigState::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("tax_rate_bps = 800"));
        let parsed: ConfigState = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
