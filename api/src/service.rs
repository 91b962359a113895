use crate::chart::ChartAdapter;
use crate::refresher::{Refresher, SharedStore};
use common::{
    models::{Alert, ChartRange, ChartType, Coin, Currency},
    Error, Result,
};
use connectors::MarketDataSource;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use store::{
    derived::{
        alert_statuses, market_stats, portfolio_allocation, portfolio_valuation, watchlist_coins,
        AlertStatus, AllocationSlice, DashboardSnapshot, MarketStats, PortfolioValuation,
    },
    Action, AlertInput, AppState, ChartState, HoldingInput, Store,
};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Portfolio page read model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioView {
    #[serde(flatten)]
    pub valuation: PortfolioValuation,
    pub allocation: Vec<AllocationSlice>,
}

/// Front door of the dashboard: owns the store, the snapshot refresher and
/// the chart adapter.
pub struct DashboardService {
    store: SharedStore,
    refresher: Arc<Refresher>,
    chart: ChartAdapter,
}

impl DashboardService {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        let store: SharedStore = Arc::new(RwLock::new(Store::new()));
        Self {
            refresher: Arc::new(Refresher::new(source.clone(), store.clone())),
            chart: ChartAdapter::new(source),
            store,
        }
    }

    /// Spawns the startup load and the periodic silent refresh
    pub fn start(&self, period: Duration) -> JoinHandle<()> {
        info!("Refreshing market data every {:?}", period);
        self.refresher.clone().spawn(period)
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.store.read().await.snapshot()
    }

    pub async fn state(&self) -> AppState {
        self.store.read().await.state().clone()
    }

    pub async fn stats(&self) -> MarketStats {
        market_stats(&self.store.read().await.state().coins)
    }

    /// Applies an action coming from a client.
    ///
    /// Snapshot actions belong to the refresher and are refused. Currency and
    /// coin selection go through their dedicated flows so the matching fetch
    /// is issued.
    pub async fn dispatch(&self, action: Action) -> Result<DashboardSnapshot> {
        match action {
            Action::SetCoins(_) | Action::SetLoading(_) | Action::SetError(_) => {
                return Err(Error::InvalidInput(format!(
                    "{} is reserved for market data refreshes",
                    action.name()
                )));
            }
            Action::SetCurrency(currency) => {
                self.change_currency(currency).await;
            }
            Action::SelectCoin(Some(coin)) => {
                self.open_chart(&coin.id, ChartRange::default()).await?;
            }
            Action::SelectCoin(None) => self.close_chart().await,
            action => self.store.write().await.dispatch(action),
        }
        Ok(self.snapshot().await)
    }

    /// Manual, non-silent refresh of the selected currency
    pub async fn refresh(&self) -> DashboardSnapshot {
        self.refresher.refresh_current(false).await;
        self.snapshot().await
    }

    pub async fn change_currency(&self, currency: Currency) -> DashboardSnapshot {
        self.refresher.change_currency(currency).await;
        self.snapshot().await
    }

    pub async fn watchlist(&self) -> Vec<Coin> {
        let store = self.store.read().await;
        let state = store.state();
        watchlist_coins(&state.coins, &state.watchlist)
    }

    pub async fn portfolio(&self) -> PortfolioView {
        let store = self.store.read().await;
        let state = store.state();
        let valuation = portfolio_valuation(&state.portfolio, &state.coins);
        PortfolioView {
            allocation: portfolio_allocation(&valuation),
            valuation,
        }
    }

    pub async fn upsert_holding(&self, input: HoldingInput) -> Result<PortfolioView> {
        let action = input.into_action()?;
        self.store.write().await.dispatch(action);
        Ok(self.portfolio().await)
    }

    pub async fn delete_holding(&self, coin_id: &str) -> PortfolioView {
        self.store
            .write()
            .await
            .dispatch(Action::DeleteHolding(coin_id.to_string()));
        self.portfolio().await
    }

    pub async fn alerts(&self) -> Vec<AlertStatus> {
        let store = self.store.read().await;
        let state = store.state();
        alert_statuses(&state.alerts, &state.coins)
    }

    /// Creates an alert and returns it with its generated id
    pub async fn add_alert(&self, input: AlertInput) -> Result<Alert> {
        let mut store = self.store.write().await;
        let alert = input.into_alert(&store.state().coins)?;
        store.dispatch(Action::AddAlert(alert.clone()));
        debug!("Added alert {} for {}", alert.id, alert.coin_id);
        Ok(alert)
    }

    pub async fn delete_alert(&self, id: &str) -> Vec<AlertStatus> {
        self.store
            .write()
            .await
            .dispatch(Action::DeleteAlert(id.to_string()));
        self.alerts().await
    }

    /// Selects `coin_id` and starts loading its history over `range`.
    ///
    /// The coin must be in the current snapshot.
    pub async fn open_chart(&self, coin_id: &str, range: ChartRange) -> Result<ChartState> {
        let ticket = {
            let mut store = self.store.write().await;
            let coin = store
                .state()
                .find_coin(coin_id)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("Coin with ID '{}' not found", coin_id)))?;
            // Selection and chart change together; lock order is store, then chart.
            let ticket = self.chart.open(&coin, range).await;
            store.dispatch(Action::SelectCoin(Some(coin)));
            ticket
        };

        self.chart.spawn_load(ticket);
        Ok(self.chart.state().await)
    }

    pub async fn set_chart_range(&self, range: ChartRange) -> Result<ChartState> {
        let ticket = self
            .chart
            .set_range(range)
            .await
            .ok_or_else(|| Error::NotFound("No chart is open".to_string()))?;
        self.chart.spawn_load(ticket);
        Ok(self.chart.state().await)
    }

    pub async fn set_chart_type(&self, chart_type: ChartType) -> ChartState {
        self.chart.set_chart_type(chart_type).await;
        self.chart.state().await
    }

    pub async fn close_chart(&self) {
        let mut store = self.store.write().await;
        self.chart.close().await;
        store.dispatch(Action::SelectCoin(None));
    }

    pub async fn chart(&self) -> ChartState {
        self.chart.state().await
    }
}
