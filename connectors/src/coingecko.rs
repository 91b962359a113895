use crate::MarketDataSource;
use async_trait::async_trait;
use chrono::DateTime;
use common::{
    models::{ChartRange, Coin, Currency, PricePoint},
    Error, Result,
};
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use tracing::{debug, error, warn};

pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Size of the dashboard's coin snapshot
pub const TOP_COINS: usize = 50;

/// Chart history is always requested in USD
const CHART_CURRENCY: &str = "usd";

pub struct CoinGeckoConnector {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl Default for CoinGeckoConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinGeckoConnector {
    pub fn new() -> Self {
        Self::with_base_url(COINGECKO_API_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Sends `key` as the demo API key header on every request
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Network)?;
        Ok(self)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        debug!("Fetching from CoinGecko: {} {:?}", url, query);

        let mut request = self
            .client
            .get(url)
            .header("accept", "application/json")
            .query(query);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response = request.send().await.map_err(Error::Network)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                warn!("CoinGecko rate limit hit: {}", error_text);
            } else {
                error!("CoinGecko API error: {} - {}", status, error_text);
            }
            return Err(Error::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(Error::Network)?;
        serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("Failed to parse CoinGecko response: {}", e)))
    }
}

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Vec<(i64, f64)>,
}

fn to_price_points(prices: Vec<(i64, f64)>) -> Vec<PricePoint> {
    prices
        .into_iter()
        .filter_map(|(millis, price)| {
            DateTime::from_timestamp_millis(millis).map(|timestamp| PricePoint { timestamp, price })
        })
        .collect()
}

#[async_trait]
impl MarketDataSource for CoinGeckoConnector {
    async fn fetch_top_coins(&self, currency: Currency) -> Result<Vec<Coin>> {
        let url = format!("{}/coins/markets", self.base_url);
        let coins: Vec<Coin> = self
            .get_json(
                &url,
                &[
                    ("vs_currency", currency.code().to_string()),
                    ("order", "market_cap_desc".to_string()),
                    ("per_page", TOP_COINS.to_string()),
                    ("page", "1".to_string()),
                    ("sparkline", "true".to_string()),
                    ("price_change_percentage", "24h".to_string()),
                ],
            )
            .await?;

        debug!("Fetched {} coins in {}", coins.len(), currency);
        Ok(coins)
    }

    async fn fetch_price_history(
        &self,
        coin_id: &str,
        range: ChartRange,
    ) -> Result<Vec<PricePoint>> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, coin_id);
        let chart: MarketChartResponse = self
            .get_json(
                &url,
                &[
                    ("vs_currency", CHART_CURRENCY.to_string()),
                    ("days", range.days().to_string()),
                ],
            )
            .await?;

        debug!(
            "Fetched {} price samples for {} over {}d",
            chart.prices.len(),
            coin_id,
            range
        );
        Ok(to_price_points(chart.prices))
    }
}
