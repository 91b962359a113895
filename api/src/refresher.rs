use common::models::Currency;
use connectors::MarketDataSource;
use std::sync::Arc;
use std::time::Duration;
use store::{Action, Store};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

pub type SharedStore = Arc<RwLock<Store>>;

/// Pulls coin snapshots from the market data source into the store.
///
/// Every request carries a ticket; the store drops responses whose currency
/// is no longer selected or that were overtaken by a later request.
pub struct Refresher {
    source: Arc<dyn MarketDataSource>,
    store: SharedStore,
}

impl Refresher {
    pub fn new(source: Arc<dyn MarketDataSource>, store: SharedStore) -> Self {
        Self { source, store }
    }

    /// Fetches the top coins in `currency` and commits them if still current.
    ///
    /// A `silent` refresh never touches the loading flag. Nothing is fetched
    /// when `currency` is no longer selected. Returns whether the outcome
    /// (coins or error) was applied.
    pub async fn refresh(&self, currency: Currency, silent: bool) -> bool {
        let ticket = {
            let mut store = self.store.write().await;
            let selected = store.state().currency;
            if currency != selected {
                debug!("Skipping refresh in {} (selected: {})", currency, selected);
                return false;
            }
            if !silent {
                store.dispatch(Action::SetLoading(true));
            }
            store.issue_ticket(currency)
        };

        let outcome = self
            .source
            .fetch_top_coins(currency)
            .await
            .map_err(|e| {
                error!("Failed to refresh coins in {}: {}", currency, e);
                e.to_string()
            });
        let fetched = outcome.as_ref().map(Vec::len).ok();

        let applied = self.store.write().await.commit_snapshot(ticket, outcome);
        if let (true, Some(count)) = (applied, fetched) {
            info!("Committed {} coins in {} (request #{})", count, currency, ticket.seq);
        }
        applied
    }

    /// Refreshes whatever currency is selected right now
    pub async fn refresh_current(&self, silent: bool) -> bool {
        let currency = self.store.read().await.state().currency;
        self.refresh(currency, silent).await
    }

    /// Selects `currency` and loads its snapshot
    pub async fn change_currency(&self, currency: Currency) -> bool {
        self.store
            .write()
            .await
            .dispatch(Action::SetCurrency(currency));
        self.refresh(currency, false).await
    }

    /// Runs the startup refresh, then a silent refresh every `period`.
    pub fn spawn(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.refresh_current(false).await;

            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.refresh_current(true).await;
            }
        })
    }
}
