use crate::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One market-data record from a coin snapshot.
///
/// Numeric fields are optional because the market data API reports `null`
/// for assets it has no figure for. The accessors treat a missing figure as 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Coin {
    /// Stable identifier (e.g., "bitcoin", "ethereum")
    pub id: String,
    /// Ticker symbol as reported by the API, usually lower-case (e.g., "btc")
    pub symbol: String,
    /// Human-readable name (e.g., "Bitcoin")
    pub name: String,
    /// Logo URL
    #[serde(default)]
    pub image: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub total_volume: Option<f64>,
    /// Signed 24h change in percent
    pub price_change_percentage_24h: Option<f64>,
    /// All-time high
    pub ath: Option<f64>,
    pub circulating_supply: Option<f64>,
    /// Hourly prices over the last 7 days, most recent last
    pub sparkline_in_7d: Option<Sparkline>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Sparkline {
    #[serde(default)]
    pub price: Vec<f64>,
}

impl Coin {
    pub fn price(&self) -> f64 {
        self.current_price.unwrap_or(0.0)
    }

    pub fn market_cap_or_zero(&self) -> f64 {
        self.market_cap.unwrap_or(0.0)
    }

    pub fn volume(&self) -> f64 {
        self.total_volume.unwrap_or(0.0)
    }

    pub fn change_24h(&self) -> f64 {
        self.price_change_percentage_24h.unwrap_or(0.0)
    }

    pub fn sparkline(&self) -> &[f64] {
        self.sparkline_in_7d
            .as_ref()
            .map(|s| s.price.as_slice())
            .unwrap_or(&[])
    }
}

/// Quote currencies the dashboard can price coins in
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Usd, Currency::Eur, Currency::Gbp, Currency::Jpy];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
            Currency::Gbp => "gbp",
            Currency::Jpy => "jpy",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "usd" => Ok(Currency::Usd),
            "eur" => Ok(Currency::Eur),
            "gbp" => Ok(Currency::Gbp),
            "jpy" => Ok(Currency::Jpy),
            unknown => Err(Error::InvalidInput(format!(
                "Unknown currency: {}. Supported currencies: usd, eur, gbp, jpy",
                unknown
            ))),
        }
    }
}

/// Display symbol for a raw currency code. Unknown codes fall back to `$`.
pub fn currency_symbol(code: &str) -> &'static str {
    code.parse::<Currency>().map(|c| c.symbol()).unwrap_or("$")
}

/// Orderings offered for the coin list.
///
/// Deserializing an unrecognized key yields `MarketCapDesc`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum SortKey {
    #[default]
    MarketCapDesc,
    MarketCapAsc,
    PriceDesc,
    PriceAsc,
    ChangeDesc,
    ChangeAsc,
    VolumeDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::MarketCapDesc => "market_cap_desc",
            SortKey::MarketCapAsc => "market_cap_asc",
            SortKey::PriceDesc => "price_desc",
            SortKey::PriceAsc => "price_asc",
            SortKey::ChangeDesc => "change_desc",
            SortKey::ChangeAsc => "change_asc",
            SortKey::VolumeDesc => "volume_desc",
        }
    }

    /// Short label for the sort picker
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::MarketCapDesc => "MCap ↓",
            SortKey::MarketCapAsc => "MCap ↑",
            SortKey::PriceDesc => "Price ↓",
            SortKey::PriceAsc => "Price ↑",
            SortKey::ChangeDesc => "24h ↓",
            SortKey::ChangeAsc => "24h ↑",
            SortKey::VolumeDesc => "Volume ↓",
        }
    }
}

impl From<&str> for SortKey {
    fn from(key: &str) -> Self {
        match key {
            "market_cap_asc" => SortKey::MarketCapAsc,
            "price_desc" => SortKey::PriceDesc,
            "price_asc" => SortKey::PriceAsc,
            "change_desc" => SortKey::ChangeDesc,
            "change_asc" => SortKey::ChangeAsc,
            "volume_desc" => SortKey::VolumeDesc,
            _ => SortKey::MarketCapDesc,
        }
    }
}

impl From<String> for SortKey {
    fn from(key: String) -> Self {
        SortKey::from(key.as_str())
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
