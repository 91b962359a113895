pub mod coingecko;

use async_trait::async_trait;
use common::{
    models::{ChartRange, Coin, Currency, PricePoint},
    Result,
};

/// Trait defining the interface for market data providers
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Top coins by market cap, priced in `currency`, with 24h change and
    /// 7-day sparkline
    async fn fetch_top_coins(&self, currency: Currency) -> Result<Vec<Coin>>;

    /// Historical USD prices for one coin over `range`, oldest first
    async fn fetch_price_history(&self, coin_id: &str, range: ChartRange)
        -> Result<Vec<PricePoint>>;
}
