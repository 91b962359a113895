use chrono::{DateTime, Utc};
use common::models::{Alert, Coin, Currency, Holding, SortKey};
use serde::{Deserialize, Serialize};

/// Coin list layout; presentation only
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Grid,
    List,
}

/// Active dashboard section
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Dashboard,
    Watchlist,
    Portfolio,
    Alerts,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Dashboard, Page::Watchlist, Page::Portfolio, Page::Alerts];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Dashboard => "Market Overview",
            Page::Watchlist => "My Watchlist",
            Page::Portfolio => "Portfolio Tracker",
            Page::Alerts => "Price Alerts",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Page::Dashboard => "Live crypto prices & market data",
            Page::Watchlist => "Your starred coins",
            Page::Portfolio => "Track holdings & P&L",
            Page::Alerts => "Monitor price movements",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// The whole session state of the dashboard.
///
/// Owned by [`crate::Store`] and only ever changed through [`crate::apply`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Latest committed coin snapshot, replaced wholesale on every refresh
    pub coins: Vec<Coin>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub search: String,
    pub sort: SortKey,
    pub currency: Currency,
    /// Starred coin ids. Unique; entries may reference coins outside the snapshot
    pub watchlist: Vec<String>,
    /// At most one holding per coin id
    pub portfolio: Vec<Holding>,
    pub alerts: Vec<Alert>,
    pub selected_coin: Option<Coin>,
    pub view: View,
    pub page: Page,
    pub theme: Theme,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            coins: Vec::new(),
            loading: true,
            error: None,
            last_updated: None,
            search: String::new(),
            sort: SortKey::MarketCapDesc,
            currency: Currency::Usd,
            watchlist: Vec::new(),
            portfolio: Vec::new(),
            alerts: Vec::new(),
            selected_coin: None,
            view: View::Grid,
            page: Page::Dashboard,
            theme: Theme::Dark,
        }
    }
}

impl AppState {
    pub fn is_watched(&self, coin_id: &str) -> bool {
        self.watchlist.iter().any(|id| id == coin_id)
    }

    pub fn holding(&self, coin_id: &str) -> Option<&Holding> {
        self.portfolio.iter().find(|h| h.coin_id == coin_id)
    }

    pub fn find_coin(&self, coin_id: &str) -> Option<&Coin> {
        self.coins.iter().find(|c| c.id == coin_id)
    }
}
