use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw historical price sample
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Decimated, labelled point ready for the chart renderer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartPoint {
    /// Time-of-day label for intraday ranges, month/day label otherwise
    pub label: String,
    pub price: f64,
}

/// Supported history windows, serialized as a number of days
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u32", into = "u32")]
pub enum ChartRange {
    OneDay,
    #[default]
    SevenDays,
    ThirtyDays,
    NinetyDays,
    OneYear,
}

impl ChartRange {
    pub const ALL: [ChartRange; 5] = [
        ChartRange::OneDay,
        ChartRange::SevenDays,
        ChartRange::ThirtyDays,
        ChartRange::NinetyDays,
        ChartRange::OneYear,
    ];

    pub fn days(&self) -> u32 {
        match self {
            ChartRange::OneDay => 1,
            ChartRange::SevenDays => 7,
            ChartRange::ThirtyDays => 30,
            ChartRange::NinetyDays => 90,
            ChartRange::OneYear => 365,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChartRange::OneDay => "24H",
            ChartRange::SevenDays => "7D",
            ChartRange::ThirtyDays => "1M",
            ChartRange::NinetyDays => "3M",
            ChartRange::OneYear => "1Y",
        }
    }
}

impl TryFrom<u32> for ChartRange {
    type Error = Error;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        ChartRange::ALL
            .into_iter()
            .find(|range| range.days() == days)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Unknown chart range: {} days. Supported ranges: 1, 7, 30, 90, 365",
                    days
                ))
            })
    }
}

impl From<ChartRange> for u32 {
    fn from(range: ChartRange) -> Self {
        range.days()
    }
}

impl std::fmt::Display for ChartRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.days())
    }
}

/// Chart style; presentation only
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Area,
    Bar,
}
