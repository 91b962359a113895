//! Pure views computed from [`AppState`] on every read.
//!
//! Nothing here is cached or written back into the state; callers recompute
//! whenever the inputs change.

use crate::state::{AppState, Page};
use chrono::{DateTime, Utc};
use common::models::{
    currency_symbol, Alert, ChartPoint, Coin, Currency, Holding, PricePoint, SortKey,
};
use serde::Serialize;
use std::cmp::Ordering;

/// Upper bound on points handed to the chart renderer
pub const MAX_CHART_POINTS: usize = 80;

/// Coins whose name or symbol contains `search` (case-insensitive), stably
/// sorted by `sort`.
pub fn filtered_sorted_coins(coins: &[Coin], search: &str, sort: SortKey) -> Vec<Coin> {
    let needle = search.to_lowercase();
    let mut filtered: Vec<Coin> = coins
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle) || c.symbol.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    filtered.sort_by(|a, b| compare_coins(a, b, sort));
    filtered
}

fn compare_coins(a: &Coin, b: &Coin, sort: SortKey) -> Ordering {
    match sort {
        SortKey::MarketCapDesc => b.market_cap_or_zero().total_cmp(&a.market_cap_or_zero()),
        SortKey::MarketCapAsc => a.market_cap_or_zero().total_cmp(&b.market_cap_or_zero()),
        SortKey::PriceDesc => b.price().total_cmp(&a.price()),
        SortKey::PriceAsc => a.price().total_cmp(&b.price()),
        SortKey::ChangeDesc => b.change_24h().total_cmp(&a.change_24h()),
        SortKey::ChangeAsc => a.change_24h().total_cmp(&b.change_24h()),
        SortKey::VolumeDesc => b.volume().total_cmp(&a.volume()),
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketStats {
    pub total_market_cap: f64,
    /// Coins with a strictly positive 24h change
    pub gainers: usize,
    pub total: usize,
}

pub fn market_stats(coins: &[Coin]) -> MarketStats {
    MarketStats {
        total_market_cap: coins.iter().map(Coin::market_cap_or_zero).sum(),
        gainers: coins
            .iter()
            .filter(|c| c.price_change_percentage_24h.is_some_and(|pct| pct > 0.0))
            .count(),
        total: coins.len(),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HoldingValuation {
    pub holding: Holding,
    pub coin: Coin,
    pub value: f64,
    pub cost: f64,
    pub pnl: f64,
    pub pnl_pct: f64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    /// Only holdings whose coin is in the current snapshot
    pub holdings: Vec<HoldingValuation>,
    pub total_value: f64,
    pub total_cost: f64,
    pub total_pnl: f64,
    pub total_pnl_pct: f64,
}

fn pnl_pct(pnl: f64, cost: f64) -> f64 {
    if cost > 0.0 {
        pnl / cost * 100.0
    } else {
        0.0
    }
}

/// Values every holding at the snapshot price.
///
/// Holdings for coins missing from the snapshot are left out of the totals
/// (they stay in the portfolio).
pub fn portfolio_valuation(portfolio: &[Holding], coins: &[Coin]) -> PortfolioValuation {
    let holdings: Vec<HoldingValuation> = portfolio
        .iter()
        .filter_map(|holding| {
            let coin = coins.iter().find(|c| c.id == holding.coin_id)?;
            let value = coin.price() * holding.amount;
            let cost = holding.buy_price * holding.amount;
            let pnl = value - cost;
            Some(HoldingValuation {
                holding: holding.clone(),
                coin: coin.clone(),
                value,
                cost,
                pnl,
                pnl_pct: pnl_pct(pnl, cost),
            })
        })
        .collect();

    let total_value: f64 = holdings.iter().map(|h| h.value).sum();
    let total_cost: f64 = holdings.iter().map(|h| h.cost).sum();
    let total_pnl = total_value - total_cost;

    PortfolioValuation {
        holdings,
        total_value,
        total_cost,
        total_pnl,
        total_pnl_pct: pnl_pct(total_pnl, total_cost),
    }
}

/// One bar of the portfolio allocation chart
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AllocationSlice {
    pub symbol: String,
    pub value: f64,
}

pub fn portfolio_allocation(valuation: &PortfolioValuation) -> Vec<AllocationSlice> {
    valuation
        .holdings
        .iter()
        .map(|h| AllocationSlice {
            symbol: h.coin.symbol.to_uppercase(),
            value: round_to(h.value, 2),
        })
        .collect()
}

/// Whether `alert` fires against the current snapshot. An alert whose coin
/// is not in the snapshot never fires.
pub fn alert_trigger_status(alert: &Alert, coins: &[Coin]) -> bool {
    coins
        .iter()
        .find(|c| c.id == alert.coin_id)
        .is_some_and(|coin| alert.condition.is_met(coin.price(), alert.target_price))
}

/// An alert together with its evaluation against the current snapshot
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertStatus {
    #[serde(flatten)]
    pub alert: Alert,
    pub triggered: bool,
    /// `None` when the coin is not in the snapshot
    pub current_price: Option<f64>,
}

pub fn alert_statuses(alerts: &[Alert], coins: &[Coin]) -> Vec<AlertStatus> {
    alerts
        .iter()
        .map(|alert| AlertStatus {
            alert: alert.clone(),
            triggered: alert_trigger_status(alert, coins),
            current_price: coins
                .iter()
                .find(|c| c.id == alert.coin_id)
                .map(Coin::price),
        })
        .collect()
}

pub fn triggered_alerts<'a>(alerts: &'a [Alert], coins: &[Coin]) -> Vec<&'a Alert> {
    alerts
        .iter()
        .filter(|a| alert_trigger_status(a, coins))
        .collect()
}

/// Watched coins present in the snapshot, in snapshot order
pub fn watchlist_coins(coins: &[Coin], watchlist: &[String]) -> Vec<Coin> {
    coins
        .iter()
        .filter(|c| watchlist.contains(&c.id))
        .cloned()
        .collect()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn chart_label(timestamp: &DateTime<Utc>, range_days: u32) -> String {
    if range_days <= 1 {
        timestamp.format("%H:%M").to_string()
    } else {
        timestamp.format("%b %-d").to_string()
    }
}

/// Decimates `raw` to at most [`MAX_CHART_POINTS`] by keeping every Nth
/// sample, `N = ceil(len / 80)`, starting with the first.
///
/// Prices are rounded to 6 decimals for sub-unit coins, 2 otherwise.
pub fn chart_series(raw: &[PricePoint], range_days: u32, current_price: f64) -> Vec<ChartPoint> {
    if raw.is_empty() {
        return Vec::new();
    }

    let step = raw.len().div_ceil(MAX_CHART_POINTS);
    let decimals = if current_price < 1.0 { 6 } else { 2 };

    raw.iter()
        .step_by(step)
        .map(|point| ChartPoint {
            label: chart_label(&point.timestamp, range_days),
            price: round_to(point.price, decimals),
        })
        .collect()
}

/// Title block for a dashboard section
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PageMetadata {
    pub title: &'static str,
    pub subtitle: &'static str,
}

pub fn page_metadata(page: Page) -> PageMetadata {
    PageMetadata {
        title: page.title(),
        subtitle: page.subtitle(),
    }
}

/// Read model served to the dashboard front end
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub version: u64,
    pub loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub currency: Currency,
    pub currency_symbol: &'static str,
    pub page: PageMetadata,
    /// Snapshot is empty because nothing has arrived yet
    pub awaiting_first_snapshot: bool,
    pub stats: MarketStats,
    pub coins: Vec<Coin>,
}

impl DashboardSnapshot {
    pub fn from_state(state: &AppState, version: u64) -> Self {
        Self {
            version,
            loading: state.loading,
            error: state.error.clone(),
            last_updated: state.last_updated,
            currency: state.currency,
            currency_symbol: currency_symbol(state.currency.code()),
            page: page_metadata(state.page),
            awaiting_first_snapshot: state.loading && state.coins.is_empty(),
            stats: market_stats(&state.coins),
            coins: filtered_sorted_coins(&state.coins, &state.search, state.sort),
        }
    }
}
