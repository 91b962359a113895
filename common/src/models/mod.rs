mod chart;
mod coin;
mod portfolio;

pub use chart::{ChartPoint, ChartRange, ChartType, PricePoint};
pub use coin::{currency_symbol, Coin, Currency, SortKey, Sparkline};
pub use portfolio::{Alert, AlertCondition, Holding};
