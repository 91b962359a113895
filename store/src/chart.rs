use crate::derived::chart_series;
use common::models::{ChartPoint, ChartRange, ChartType, Coin, PricePoint};
use serde::Serialize;
use tracing::debug;

/// Identifies one chart history request
#[derive(Debug, Clone, PartialEq)]
pub struct ChartTicket {
    generation: u64,
    pub coin_id: String,
    pub range: ChartRange,
    pub current_price: f64,
}

/// Detail chart for the selected coin.
///
/// Opening, re-ranging or closing the chart starts a new generation; a
/// history response only lands if its ticket belongs to the current one.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartState {
    pub coin_id: Option<String>,
    pub current_price: f64,
    pub range: ChartRange,
    pub chart_type: ChartType,
    pub busy: bool,
    pub points: Vec<ChartPoint>,
    pub error: Option<String>,
    #[serde(skip)]
    generation: u64,
}

impl ChartState {
    pub fn new() -> Self {
        Self::default()
    }

    fn begin(&mut self, coin_id: String) -> ChartTicket {
        self.generation += 1;
        self.busy = true;
        self.points.clear();
        self.error = None;
        ChartTicket {
            generation: self.generation,
            coin_id,
            range: self.range,
            current_price: self.current_price,
        }
    }

    /// Shows `coin` over `range` and returns the ticket for its history fetch
    pub fn open(&mut self, coin: &Coin, range: ChartRange) -> ChartTicket {
        self.coin_id = Some(coin.id.clone());
        self.current_price = coin.price();
        self.range = range;
        self.begin(coin.id.clone())
    }

    /// Switches the range of an open chart. `None` when no chart is open.
    pub fn set_range(&mut self, range: ChartRange) -> Option<ChartTicket> {
        let coin_id = self.coin_id.clone()?;
        self.range = range;
        Some(self.begin(coin_id))
    }

    pub fn set_chart_type(&mut self, chart_type: ChartType) {
        self.chart_type = chart_type;
    }

    /// Closes the chart; any in-flight history response is ignored.
    pub fn close(&mut self) {
        self.generation += 1;
        self.coin_id = None;
        self.busy = false;
        self.points.clear();
        self.error = None;
    }

    pub fn is_current(&self, ticket: &ChartTicket) -> bool {
        ticket.generation == self.generation && self.coin_id.as_deref() == Some(&ticket.coin_id)
    }

    /// Lands a history response. A failure still clears `busy`.
    ///
    /// Returns whether the response was applied.
    pub fn complete(&mut self, ticket: &ChartTicket, outcome: Result<Vec<PricePoint>, String>) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "Discarding stale chart data for {} ({}d)",
                ticket.coin_id, ticket.range
            );
            return false;
        }

        self.busy = false;
        match outcome {
            Ok(raw) => {
                self.points = chart_series(&raw, ticket.range.days(), ticket.current_price);
            }
            Err(message) => {
                self.points.clear();
                self.error = Some(message);
            }
        }
        true
    }
}
