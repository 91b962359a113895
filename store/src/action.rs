use crate::state::{Page, Theme, View};
use common::models::{Alert, Coin, Currency, Holding, SortKey};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A discrete state transition request.
///
/// On the wire an action is `{"type": "SET_SEARCH", "payload": "btc"}`.
/// A `type` this build does not know deserializes to [`Action::Unknown`]
/// whatever its payload, and the reducer ignores it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    SetCoins(Vec<Coin>),
    SetLoading(bool),
    SetError(String),
    SetSearch(String),
    SetSort(SortKey),
    SetCurrency(Currency),
    SetView(View),
    SetPage(Page),
    SetTheme(Theme),
    SelectCoin(Option<Coin>),
    ToggleWatch(String),
    UpsertHolding(Holding),
    DeleteHolding(String),
    AddAlert(Alert),
    DeleteAlert(String),
    Unknown,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

impl Envelope {
    fn into_action(self) -> serde_json::Result<Action> {
        let payload = self.payload;
        let action = match self.kind.as_str() {
            "SET_COINS" => Action::SetCoins(serde_json::from_value(payload)?),
            "SET_LOADING" => Action::SetLoading(serde_json::from_value(payload)?),
            "SET_ERROR" => Action::SetError(serde_json::from_value(payload)?),
            "SET_SEARCH" => Action::SetSearch(serde_json::from_value(payload)?),
            "SET_SORT" => Action::SetSort(serde_json::from_value(payload)?),
            "SET_CURRENCY" => Action::SetCurrency(serde_json::from_value(payload)?),
            "SET_VIEW" => Action::SetView(serde_json::from_value(payload)?),
            "SET_PAGE" => Action::SetPage(serde_json::from_value(payload)?),
            "SET_THEME" => Action::SetTheme(serde_json::from_value(payload)?),
            "SELECT_COIN" => Action::SelectCoin(serde_json::from_value(payload)?),
            "TOGGLE_WATCH" => Action::ToggleWatch(serde_json::from_value(payload)?),
            "UPSERT_HOLDING" => Action::UpsertHolding(serde_json::from_value(payload)?),
            "DELETE_HOLDING" => Action::DeleteHolding(serde_json::from_value(payload)?),
            "ADD_ALERT" => Action::AddAlert(serde_json::from_value(payload)?),
            "DELETE_ALERT" => Action::DeleteAlert(serde_json::from_value(payload)?),
            _ => Action::Unknown,
        };
        Ok(action)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Envelope::deserialize(deserializer)?
            .into_action()
            .map_err(de::Error::custom)
    }
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetCoins(_) => "SET_COINS",
            Action::SetLoading(_) => "SET_LOADING",
            Action::SetError(_) => "SET_ERROR",
            Action::SetSearch(_) => "SET_SEARCH",
            Action::SetSort(_) => "SET_SORT",
            Action::SetCurrency(_) => "SET_CURRENCY",
            Action::SetView(_) => "SET_VIEW",
            Action::SetPage(_) => "SET_PAGE",
            Action::SetTheme(_) => "SET_THEME",
            Action::SelectCoin(_) => "SELECT_COIN",
            Action::ToggleWatch(_) => "TOGGLE_WATCH",
            Action::UpsertHolding(_) => "UPSERT_HOLDING",
            Action::DeleteHolding(_) => "DELETE_HOLDING",
            Action::AddAlert(_) => "ADD_ALERT",
            Action::DeleteAlert(_) => "DELETE_ALERT",
            Action::Unknown => "UNKNOWN",
        }
    }
}
