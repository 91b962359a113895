//! Form input coercion into validated actions.

use crate::action::Action;
use common::models::{Alert, AlertCondition, Coin, Holding};
use common::{Error, Result};
use serde::Deserialize;

/// A number as typed into a form: either a JSON number or its text.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    /// `None` for blank, non-numeric or non-finite input
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            NumberInput::Number(n) => Some(*n),
            NumberInput::Text(text) => text.trim().parse::<f64>().ok(),
        };
        value.filter(|n| n.is_finite())
    }
}

fn required_coin_id(coin_id: &str) -> Result<String> {
    let coin_id = coin_id.trim();
    if coin_id.is_empty() {
        return Err(Error::InvalidInput("coin id is required".to_string()));
    }
    Ok(coin_id.to_string())
}

fn required_non_negative(input: Option<&NumberInput>, field: &str) -> Result<f64> {
    match input.and_then(NumberInput::value) {
        Some(n) if n >= 0.0 => Ok(n),
        Some(n) => Err(Error::InvalidInput(format!("{} must not be negative: {}", field, n))),
        None => Err(Error::InvalidInput(format!("{} must be a number", field))),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingInput {
    #[serde(default)]
    pub coin_id: String,
    pub amount: Option<NumberInput>,
    pub buy_price: Option<NumberInput>,
}

impl HoldingInput {
    /// Builds `UPSERT_HOLDING`. A missing or non-numeric buy price becomes 0.
    pub fn into_action(self) -> Result<Action> {
        let coin_id = required_coin_id(&self.coin_id)?;
        let amount = required_non_negative(self.amount.as_ref(), "amount")?;
        let buy_price = self
            .buy_price
            .as_ref()
            .and_then(NumberInput::value)
            .unwrap_or(0.0);
        if buy_price < 0.0 {
            return Err(Error::InvalidInput(format!(
                "buy price must not be negative: {}",
                buy_price
            )));
        }

        Ok(Action::UpsertHolding(Holding {
            coin_id,
            amount,
            buy_price,
        }))
    }
}

fn default_condition() -> AlertCondition {
    AlertCondition::Above
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertInput {
    #[serde(default)]
    pub coin_id: String,
    #[serde(default = "default_condition")]
    pub condition: AlertCondition,
    pub target_price: Option<NumberInput>,
}

impl AlertInput {
    /// Builds the alert with a fresh id, copying name and image from the
    /// snapshot entry of its coin when there is one.
    pub fn into_alert(self, coins: &[Coin]) -> Result<Alert> {
        let coin_id = required_coin_id(&self.coin_id)?;
        let target_price = required_non_negative(self.target_price.as_ref(), "target price")?;
        let coin = coins.iter().find(|c| c.id == coin_id);

        Ok(Alert {
            id: uuid::Uuid::new_v4().to_string(),
            coin_name: coin.map(|c| c.name.clone()),
            coin_image: coin.map(|c| c.image.clone()),
            coin_id,
            condition: self.condition,
            target_price,
        })
    }

    pub fn into_action(self, coins: &[Coin]) -> Result<Action> {
        self.into_alert(coins).map(Action::AddAlert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding_input(json: &str) -> HoldingInput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn holding_accepts_text_and_numbers() {
        let action = holding_input(r#"{"coinId":"btc","amount":"2","buyPrice":10000}"#)
            .into_action()
            .unwrap();
        assert_eq!(
            action,
            Action::UpsertHolding(Holding {
                coin_id: "btc".to_string(),
                amount: 2.0,
                buy_price: 10000.0,
            })
        );
    }

    #[test]
    fn holding_buy_price_defaults_to_zero() {
        for json in [
            r#"{"coinId":"eth","amount":1}"#,
            r#"{"coinId":"eth","amount":1,"buyPrice":""}"#,
            r#"{"coinId":"eth","amount":1,"buyPrice":"abc"}"#,
        ] {
            match holding_input(json).into_action().unwrap() {
                Action::UpsertHolding(h) => assert_eq!(h.buy_price, 0.0),
                other => panic!("unexpected action {:?}", other),
            }
        }
    }

    #[test]
    fn holding_requires_coin_and_amount() {
        assert!(holding_input(r#"{"amount":1}"#).into_action().is_err());
        assert!(holding_input(r#"{"coinId":"btc"}"#).into_action().is_err());
        assert!(holding_input(r#"{"coinId":"btc","amount":"x"}"#).into_action().is_err());
        assert!(holding_input(r#"{"coinId":"btc","amount":-1}"#).into_action().is_err());
    }

    #[test]
    fn alert_captures_coin_metadata() {
        let coins = vec![Coin {
            id: "btc".to_string(),
            symbol: "btc".to_string(),
            name: "Bitcoin".to_string(),
            image: "https://img/btc.png".to_string(),
            ..Default::default()
        }];
        let input: AlertInput =
            serde_json::from_str(r#"{"coinId":"btc","condition":"below","targetPrice":"50000"}"#)
                .unwrap();

        match input.into_action(&coins).unwrap() {
            Action::AddAlert(alert) => {
                assert!(!alert.id.is_empty());
                assert_eq!(alert.coin_name.as_deref(), Some("Bitcoin"));
                assert_eq!(alert.coin_image.as_deref(), Some("https://img/btc.png"));
                assert_eq!(alert.condition, AlertCondition::Below);
                assert_eq!(alert.target_price, 50000.0);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn alert_ids_are_unique() {
        let make = || {
            let input: AlertInput =
                serde_json::from_str(r#"{"coinId":"eth","targetPrice":1}"#).unwrap();
            match input.into_action(&[]).unwrap() {
                Action::AddAlert(alert) => alert,
                other => panic!("unexpected action {:?}", other),
            }
        };
        let (a, b) = (make(), make());
        assert_ne!(a.id, b.id);
        assert_eq!(a.condition, AlertCondition::Above);
        assert_eq!(a.coin_name, None);
    }

    #[test]
    fn alert_requires_target_price() {
        let input: AlertInput = serde_json::from_str(r#"{"coinId":"eth"}"#).unwrap();
        assert!(input.into_action(&[]).is_err());
    }
}
