//! Runtime settings read from the environment (and `.env`, loaded by the binary).

use std::path::PathBuf;

use crate::error::{Result, SalesError};
use crate::forecast::DEFAULT_INTERVAL_WIDTH;

pub const DEFAULT_RAW_PATH: &str = "raw_data/sales_data_2025.csv";
pub const DEFAULT_CLEAN_PATH: &str = "clean_data/cleaned_sales_data_2025.csv";
pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_FORECAST_HORIZON_DAYS: u32 = 180;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub raw_path: PathBuf,
    pub clean_path: PathBuf,
    pub top_n: usize,
    pub forecast_horizon_days: u32,
    pub forecast_interval: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            raw_path: PathBuf::from(DEFAULT_RAW_PATH),
            clean_path: PathBuf::from(DEFAULT_CLEAN_PATH),
            top_n: DEFAULT_TOP_N,
            forecast_horizon_days: DEFAULT_FORECAST_HORIZON_DAYS,
            forecast_interval: DEFAULT_INTERVAL_WIDTH,
        }
    }
}

impl Settings {
    /// Reads `SALES_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup; unset keys keep their defaults.
    ///
    /// # Errors
    ///
    /// [`SalesError::Config`] if a numeric variable does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(v) = lookup("SALES_RAW_PATH") {
            settings.raw_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("SALES_CLEAN_PATH") {
            settings.clean_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("SALES_TOP_N") {
            settings.top_n = parse("SALES_TOP_N", v)?;
        }
        if let Some(v) = lookup("SALES_FORECAST_HORIZON_DAYS") {
            settings.forecast_horizon_days = parse("SALES_FORECAST_HORIZON_DAYS", v)?;
        }
        if let Some(v) = lookup("SALES_FORECAST_INTERVAL") {
            let width: f64 = parse("SALES_FORECAST_INTERVAL", v.clone())?;
            if !(width > 0.0 && width < 1.0) {
                return Err(SalesError::Config {
                    key: "SALES_FORECAST_INTERVAL",
                    value: v,
                });
            }
            settings.forecast_interval = width;
        }

        Ok(settings)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| SalesError::Config { key, value })
}
