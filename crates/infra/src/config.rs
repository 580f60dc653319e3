//! Configuration loading and representation.

use serde::Deserialize;
use thiserror::Error;

use shopledger_accounting::ClosingPolicy;
use shopledger_core::DEFAULT_SCALE;
use shopledger_observability::LogConfig;

/// Largest supported minor-unit scale.
pub const MAX_SCALE: u32 = 18;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration document: {0}")]
    Parse(String),

    #[error("currency_scale must be at most {MAX_SCALE} (got {0})")]
    ScaleOutOfRange(u32),
}

/// Ledger settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Fractional digits of the currency's minor unit.
    pub currency_scale: u32,
    /// Default for statements that do not pick a closing policy explicitly.
    pub statement_includes_closing: bool,
    /// Presentation only: renderers flip the sign of balances.
    pub invert_display_sign: bool,
    pub log: LogConfig,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            currency_scale: DEFAULT_SCALE,
            statement_includes_closing: true,
            invert_display_sign: false,
            log: LogConfig::default(),
        }
    }
}

impl LedgerConfig {
    /// Read `SHOPLEDGER_*` environment variables over the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("SHOPLEDGER_CURRENCY_SCALE") {
            match raw.trim().parse::<u32>() {
                Ok(scale) if scale <= MAX_SCALE => config.currency_scale = scale,
                _ => tracing::warn!(value = %raw, "invalid SHOPLEDGER_CURRENCY_SCALE; using default"),
            }
        }
        if let Some(raw) = lookup("SHOPLEDGER_STATEMENT_INCLUDES_CLOSING") {
            match parse_flag(&raw) {
                Some(flag) => config.statement_includes_closing = flag,
                None => tracing::warn!(value = %raw, "invalid SHOPLEDGER_STATEMENT_INCLUDES_CLOSING; using default"),
            }
        }
        if let Some(raw) = lookup("SHOPLEDGER_INVERT_DISPLAY_SIGN") {
            match parse_flag(&raw) {
                Some(flag) => config.invert_display_sign = flag,
                None => tracing::warn!(value = %raw, "invalid SHOPLEDGER_INVERT_DISPLAY_SIGN; using default"),
            }
        }
        if let Some(raw) = lookup("SHOPLEDGER_LOG") {
            config.log.filter = raw;
        }
        if let Some(raw) = lookup("SHOPLEDGER_LOG_JSON") {
            match parse_flag(&raw) {
                Some(flag) => config.log.json = flag,
                None => tracing::warn!(value = %raw, "invalid SHOPLEDGER_LOG_JSON; using default"),
            }
        }

        config
    }

    /// Parse a JSON configuration document; missing fields take defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if config.currency_scale > MAX_SCALE {
            return Err(ConfigError::ScaleOutOfRange(config.currency_scale));
        }
        Ok(config)
    }

    pub fn default_closing_policy(&self) -> ClosingPolicy {
        ClosingPolicy::from_include_flag(self.statement_includes_closing)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
