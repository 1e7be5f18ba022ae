use std::path::PathBuf;

use crate::models::request::{parse_levels, DEFAULT_ACCOUNT_BALANCE, DEFAULT_FIBO_LEVELS};
use crate::trading::trade_log::DEFAULT_LOG_FILE;

#[derive(Debug, Clone)]
pub struct Config {
    // Account
    pub account_balance: f64,
    pub default_risk_pct: f64,

    // Fibo
    pub default_levels: Vec<f64>,

    // Persistence
    pub log_path: PathBuf,

    // Chart
    pub chart_symbol: String,
    pub chart_interval: String,

    // Logging
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account_balance: DEFAULT_ACCOUNT_BALANCE,
            default_risk_pct: 1.0,
            default_levels: DEFAULT_FIBO_LEVELS.to_vec(),
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
            chart_symbol: "OANDA:XAUUSD".to_string(),
            chart_interval: "15".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or unparseable keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let default_levels = lookup("DEFAULT_FIBO_LEVELS")
            .and_then(|s| parse_levels(&s).ok())
            .filter(|levels| !levels.is_empty())
            .unwrap_or(defaults.default_levels);

        Config {
            account_balance: lookup("ACCOUNT_BALANCE")
                .and_then(|s| s.trim().parse().ok())
                .filter(|b: &f64| b.is_finite() && *b >= 0.0)
                .unwrap_or(defaults.account_balance),
            default_risk_pct: lookup("DEFAULT_RISK_PCT")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.default_risk_pct),
            default_levels,
            log_path: lookup("TRADE_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_path),
            chart_symbol: lookup("CHART_SYMBOL").unwrap_or(defaults.chart_symbol),
            chart_interval: lookup("CHART_INTERVAL").unwrap_or(defaults.chart_interval),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }
}
