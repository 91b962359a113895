use serde::{Deserialize, Serialize};

/// A simulated position in one coin
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub coin_id: String,
    pub amount: f64,
    /// Cost basis per unit; 0 when the user gave none
    #[serde(default)]
    pub buy_price: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertCondition {
    Above,
    Below,
}

impl AlertCondition {
    /// Inclusive threshold check
    pub fn is_met(&self, price: f64, target: f64) -> bool {
        match self {
            AlertCondition::Above => price >= target,
            AlertCondition::Below => price <= target,
        }
    }
}

impl std::fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertCondition::Above => write!(f, "above"),
            AlertCondition::Below => write!(f, "below"),
        }
    }
}

/// A price threshold on one coin.
///
/// `coin_name` and `coin_image` are captured when the alert is created and
/// are never refreshed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub coin_id: String,
    pub coin_name: Option<String>,
    pub coin_image: Option<String>,
    pub condition: AlertCondition,
    pub target_price: f64,
}
