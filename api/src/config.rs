use common::{Error, Result};
use connectors::coingecko::COINGECKO_API_URL;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the market data API
    pub market_data_url: String,
    pub api_key: Option<String>,
    /// Period of the silent background refresh
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            market_data_url: COINGECKO_API_URL.to_string(),
            api_key: None,
            refresh_interval: Duration::from_secs(60),
            request_timeout: Duration::from_secs(15),
        }
    }
}

fn parse_var<T: FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| {
            Error::ConfigError(format!("{} has an invalid value: {:?}", name, value))
        }),
    }
}

impl DashboardConfig {
    /// Reads the configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let host = lookup("DASHBOARD_HOST").unwrap_or(defaults.host);
        let port = parse_var("DASHBOARD_PORT", lookup("DASHBOARD_PORT"), defaults.port)?;
        let market_data_url = lookup("MARKET_DATA_URL").unwrap_or(defaults.market_data_url);
        let api_key = lookup("MARKET_DATA_API_KEY").filter(|key| !key.is_empty());
        let refresh_secs = parse_var(
            "REFRESH_INTERVAL_SECS",
            lookup("REFRESH_INTERVAL_SECS"),
            defaults.refresh_interval.as_secs(),
        )?;
        let timeout_secs = parse_var(
            "REQUEST_TIMEOUT_SECS",
            lookup("REQUEST_TIMEOUT_SECS"),
            defaults.request_timeout.as_secs(),
        )?;

        if refresh_secs == 0 {
            return Err(Error::ConfigError(
                "REFRESH_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            market_data_url,
            api_key,
            refresh_interval: Duration::from_secs(refresh_secs),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
