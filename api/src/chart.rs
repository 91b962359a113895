use common::models::{ChartRange, ChartType, Coin};
use connectors::MarketDataSource;
use std::sync::Arc;
use store::{ChartState, ChartTicket};
use tokio::sync::RwLock;
use tracing::{error, info};

/// Loads price history for the chart view.
///
/// Cheap to clone; clones share the same chart.
#[derive(Clone)]
pub struct ChartAdapter {
    source: Arc<dyn MarketDataSource>,
    chart: Arc<RwLock<ChartState>>,
}

impl ChartAdapter {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            source,
            chart: Arc::new(RwLock::new(ChartState::new())),
        }
    }

    pub async fn state(&self) -> ChartState {
        self.chart.read().await.clone()
    }

    pub async fn open(&self, coin: &Coin, range: ChartRange) -> ChartTicket {
        info!("Opening chart for {} ({}d)", coin.id, range);
        self.chart.write().await.open(coin, range)
    }

    pub async fn set_range(&self, range: ChartRange) -> Option<ChartTicket> {
        self.chart.write().await.set_range(range)
    }

    pub async fn set_chart_type(&self, chart_type: ChartType) {
        self.chart.write().await.set_chart_type(chart_type);
    }

    pub async fn close(&self) {
        self.chart.write().await.close();
    }

    /// Fetches the history `ticket` asks for and lands it unless the chart
    /// moved on in the meantime. Returns whether it landed.
    pub async fn load(&self, ticket: ChartTicket) -> bool {
        let outcome = self
            .source
            .fetch_price_history(&ticket.coin_id, ticket.range)
            .await
            .map_err(|e| {
                error!("Failed to load chart for {}: {}", ticket.coin_id, e);
                e.to_string()
            });

        self.chart.write().await.complete(&ticket, outcome)
    }

    /// Runs [`ChartAdapter::load`] in the background
    pub fn spawn_load(&self, ticket: ChartTicket) {
        let adapter = self.clone();
        tokio::spawn(async move {
            adapter.load(ticket).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use common::{
        models::{Currency, PricePoint},
        Error, Result,
    };
    use tokio::sync::{mpsc, Semaphore};

    fn coin(id: &str, price: f64) -> Coin {
        Coin {
            id: id.to_string(),
            symbol: id.to_string(),
            name: id.to_string(),
            current_price: Some(price),
            ..Default::default()
        }
    }

    /// Serves `days * 24` hourly samples per request, optionally held back
    struct HistorySource {
        gate: Option<(mpsc::UnboundedSender<String>, Semaphore)>,
        fail: bool,
    }

    #[async_trait]
    impl MarketDataSource for HistorySource {
        async fn fetch_top_coins(&self, _: Currency) -> Result<Vec<Coin>> {
            Ok(Vec::new())
        }

        async fn fetch_price_history(
            &self,
            coin_id: &str,
            range: ChartRange,
        ) -> Result<Vec<PricePoint>> {
            if let Some((started, gate)) = &self.gate {
                let _ = started.send(coin_id.to_string());
                gate.acquire()
                    .await
                    .map_err(|e| Error::Parse(e.to_string()))?
                    .forget();
            }
            if self.fail {
                return Err(Error::Parse("unexpected body".to_string()));
            }

            let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            let price = if coin_id == "btc" { 60000.0 } else { 0.5 };
            Ok((0..range.days() as i64 * 24)
                .map(|h| PricePoint {
                    timestamp: start + Duration::hours(h),
                    price,
                })
                .collect())
        }
    }

    fn adapter(fail: bool) -> ChartAdapter {
        ChartAdapter::new(Arc::new(HistorySource { gate: None, fail }))
    }

    #[tokio::test]
    async fn loads_decimated_series() {
        let charts = adapter(false);
        let ticket = charts.open(&coin("btc", 60000.0), ChartRange::SevenDays).await;
        assert!(charts.state().await.busy);

        assert!(charts.load(ticket).await);
        let chart = charts.state().await;
        assert!(!chart.busy);
        // 168 samples, step 3
        assert_eq!(chart.points.len(), 56);
        assert_eq!(chart.points[0].price, 60000.0);
    }

    #[tokio::test]
    async fn failure_clears_busy() {
        let charts = adapter(true);
        let ticket = charts.open(&coin("btc", 60000.0), ChartRange::OneDay).await;

        assert!(charts.load(ticket).await);
        let chart = charts.state().await;
        assert!(!chart.busy);
        assert!(chart.points.is_empty());
        assert!(chart.error.is_some());
    }

    #[tokio::test]
    async fn response_for_previous_coin_is_ignored() {
        let (started, mut rx) = mpsc::unbounded_channel();
        let source = HistorySource {
            gate: Some((started, Semaphore::new(0))),
            fail: false,
        };
        let source = Arc::new(source);
        let charts = ChartAdapter::new(source.clone());

        let btc_ticket = charts.open(&coin("btc", 60000.0), ChartRange::SevenDays).await;
        let btc = tokio::spawn({
            let charts = charts.clone();
            async move { charts.load(btc_ticket).await }
        });
        assert_eq!(rx.recv().await.as_deref(), Some("btc"));

        let doge_ticket = charts.open(&coin("doge", 0.5), ChartRange::OneDay).await;
        let doge = tokio::spawn({
            let charts = charts.clone();
            async move { charts.load(doge_ticket).await }
        });
        assert_eq!(rx.recv().await.as_deref(), Some("doge"));

        if let Some((_, gate)) = &source.gate {
            gate.add_permits(2);
        }
        let landed = [btc.await.unwrap(), doge.await.unwrap()];
        assert_eq!(landed, [false, true]);

        let chart = charts.state().await;
        assert_eq!(chart.coin_id.as_deref(), Some("doge"));
        assert_eq!(chart.points.len(), 24);
        assert_eq!(chart.points[0].label, "00:00");
    }

    #[tokio::test]
    async fn closing_discards_in_flight_history() {
        let charts = adapter(false);
        let ticket = charts.open(&coin("btc", 60000.0), ChartRange::ThirtyDays).await;
        charts.close().await;

        assert!(!charts.load(ticket).await);
        let chart = charts.state().await;
        assert!(chart.coin_id.is_none());
        assert!(chart.points.is_empty());
    }

    #[tokio::test]
    async fn range_and_type_changes() {
        let charts = adapter(false);
        assert!(charts.set_range(ChartRange::OneYear).await.is_none());

        charts.open(&coin("btc", 60000.0), ChartRange::SevenDays).await;
        charts.set_chart_type(ChartType::Bar).await;
        let ticket = charts.set_range(ChartRange::OneYear).await.unwrap();
        assert!(charts.load(ticket).await);

        let chart = charts.state().await;
        assert_eq!(chart.chart_type, ChartType::Bar);
        assert_eq!(chart.range, ChartRange::OneYear);
        // 8760 samples, step 110 -> 80 points
        assert_eq!(chart.points.len(), 80);
    }
}
