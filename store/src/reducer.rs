use crate::action::Action;
use crate::state::AppState;
use chrono::{DateTime, Utc};

/// Applies `action` to `state` and returns the next state.
///
/// Total: every action yields a state, and [`Action::Unknown`] yields the
/// input unchanged. Payloads are expected to be validated by the caller.
pub fn apply(state: AppState, action: Action) -> AppState {
    apply_at(state, action, Utc::now())
}

/// [`apply`] with an explicit clock, used for `SET_COINS` timestamps.
pub fn apply_at(mut state: AppState, action: Action, now: DateTime<Utc>) -> AppState {
    match action {
        Action::SetCoins(coins) => {
            state.coins = coins;
            state.error = None;
            state.loading = false;
            state.last_updated = Some(now);
        }
        Action::SetLoading(loading) => state.loading = loading,
        Action::SetError(message) => {
            state.error = Some(message);
            state.loading = false;
        }
        Action::SetSearch(search) => state.search = search,
        Action::SetSort(sort) => state.sort = sort,
        Action::SetCurrency(currency) => state.currency = currency,
        Action::SetView(view) => state.view = view,
        Action::SetPage(page) => state.page = page,
        Action::SetTheme(theme) => state.theme = theme,
        Action::SelectCoin(coin) => state.selected_coin = coin,
        Action::ToggleWatch(coin_id) => {
            match state.watchlist.iter().position(|id| *id == coin_id) {
                Some(index) => {
                    state.watchlist.remove(index);
                }
                None => state.watchlist.push(coin_id),
            }
        }
        Action::UpsertHolding(holding) => {
            state.portfolio.retain(|h| h.coin_id != holding.coin_id);
            state.portfolio.push(holding);
        }
        Action::DeleteHolding(coin_id) => state.portfolio.retain(|h| h.coin_id != coin_id),
        Action::AddAlert(alert) => state.alerts.push(alert),
        Action::DeleteAlert(alert_id) => state.alerts.retain(|a| a.id != alert_id),
        Action::Unknown => {}
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Page, Theme, View};
    use chrono::TimeZone;
    use common::models::{Alert, AlertCondition, Coin, Currency, Holding, SortKey};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn coin(id: &str) -> Coin {
        Coin {
            id: id.to_string(),
            symbol: id.to_string(),
            name: id.to_uppercase(),
            ..Default::default()
        }
    }

    fn holding(coin_id: &str, amount: f64, buy_price: f64) -> Holding {
        Holding {
            coin_id: coin_id.to_string(),
            amount,
            buy_price,
        }
    }

    fn alert(id: &str, coin_id: &str) -> Alert {
        Alert {
            id: id.to_string(),
            coin_id: coin_id.to_string(),
            coin_name: None,
            coin_image: None,
            condition: AlertCondition::Above,
            target_price: 1.0,
        }
    }

    #[test]
    fn set_coins_replaces_snapshot_and_clears_error() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut state = AppState::default();
        state.coins = vec![coin("old")];
        state.error = Some("API 500".to_string());

        let state = apply_at(state, Action::SetCoins(vec![coin("btc"), coin("eth")]), now);
        assert_eq!(state.coins.len(), 2);
        assert_eq!(state.coins[0].id, "btc");
        assert_eq!(state.error, None);
        assert!(!state.loading);
        assert_eq!(state.last_updated, Some(now));
    }

    #[test]
    fn set_error_stops_loading() {
        let state = apply(AppState::default(), Action::SetError("API 429 – rate limited".into()));
        assert_eq!(state.error.as_deref(), Some("API 429 – rate limited"));
        assert!(!state.loading);
    }

    #[test]
    fn simple_setters() {
        let state = AppState::default();
        let state = apply(state, Action::SetLoading(false));
        let state = apply(state, Action::SetSearch("sol".into()));
        let state = apply(state, Action::SetSort(SortKey::VolumeDesc));
        let state = apply(state, Action::SetCurrency(Currency::Jpy));
        let state = apply(state, Action::SetView(View::List));
        let state = apply(state, Action::SetPage(Page::Alerts));
        let state = apply(state, Action::SetTheme(Theme::Light));
        let state = apply(state, Action::SelectCoin(Some(coin("btc"))));

        assert!(!state.loading);
        assert_eq!(state.search, "sol");
        assert_eq!(state.sort, SortKey::VolumeDesc);
        assert_eq!(state.currency, Currency::Jpy);
        assert_eq!(state.view, View::List);
        assert_eq!(state.page, Page::Alerts);
        assert_eq!(state.theme, Theme::Light);
        assert_eq!(state.selected_coin.as_ref().map(|c| c.id.as_str()), Some("btc"));

        let state = apply(state, Action::SelectCoin(None));
        assert!(state.selected_coin.is_none());
    }

    #[test]
    fn selecting_a_coin_does_not_touch_the_snapshot() {
        let mut state = AppState::default();
        state.coins = vec![coin("btc")];
        let mut edited = coin("btc");
        edited.current_price = Some(1.0);

        let state = apply(state, Action::SelectCoin(Some(edited)));
        assert_eq!(state.coins[0].current_price, None);
    }

    #[test]
    fn toggle_watch_is_its_own_inverse() {
        let state = apply(AppState::default(), Action::ToggleWatch("btc".into()));
        assert!(state.is_watched("btc"));
        let state = apply(state, Action::ToggleWatch("btc".into()));
        assert!(!state.is_watched("btc"));
        assert!(state.watchlist.is_empty());
    }

    #[test]
    fn upsert_holding_replaces_existing_entry() {
        let state = apply(AppState::default(), Action::UpsertHolding(holding("btc", 1.0, 100.0)));
        let state = apply(state, Action::UpsertHolding(holding("eth", 3.0, 50.0)));
        let state = apply(state, Action::UpsertHolding(holding("btc", 2.0, 200.0)));

        assert_eq!(state.portfolio.len(), 2);
        assert_eq!(state.holding("btc"), Some(&holding("btc", 2.0, 200.0)));
    }

    #[test]
    fn delete_holding_missing_id_is_noop() {
        let state = apply(AppState::default(), Action::UpsertHolding(holding("btc", 1.0, 0.0)));
        let before = state.clone();
        let state = apply(state, Action::DeleteHolding("doge".into()));
        assert_eq!(state, before);

        let state = apply(state, Action::DeleteHolding("btc".into()));
        assert!(state.portfolio.is_empty());
    }

    #[test]
    fn alerts_append_without_dedup_and_delete_by_id() {
        let state = apply(AppState::default(), Action::AddAlert(alert("a1", "btc")));
        let state = apply(state, Action::AddAlert(alert("a2", "btc")));
        assert_eq!(state.alerts.len(), 2);

        let state = apply(state, Action::DeleteAlert("a1".into()));
        assert_eq!(state.alerts.len(), 1);
        assert_eq!(state.alerts[0].id, "a2");

        let state = apply(state, Action::DeleteAlert("missing".into()));
        assert_eq!(state.alerts.len(), 1);
    }

    #[test]
    fn unknown_action_leaves_state_untouched() {
        let state = apply(AppState::default(), Action::SetSearch("btc".into()));
        let before = state.clone();
        assert_eq!(apply(state, Action::Unknown), before);
    }

    fn arb_action() -> impl Strategy<Value = Action> {
        let ids = prop::sample::select(vec!["btc", "eth", "sol", "ada"]);
        prop_oneof![
            ids.clone().prop_map(|id| Action::ToggleWatch(id.to_string())),
            (ids.clone(), 0.0..100.0f64, 0.0..1000.0f64)
                .prop_map(|(id, amount, price)| Action::UpsertHolding(holding(id, amount, price))),
            ids.clone().prop_map(|id| Action::DeleteHolding(id.to_string())),
            (0u32..1000, ids.clone())
                .prop_map(|(n, id)| Action::AddAlert(alert(&format!("a{}", n), id))),
            (0u32..1000).prop_map(|n| Action::DeleteAlert(format!("a{}", n))),
            prop::collection::vec(ids.prop_map(coin), 0..4).prop_map(Action::SetCoins),
            Just(Action::Unknown),
        ]
    }

    proptest! {
        #[test]
        fn keyed_collections_stay_unique(actions in prop::collection::vec(arb_action(), 0..64)) {
            let state = actions.into_iter().fold(AppState::default(), apply);

            let watch: HashSet<_> = state.watchlist.iter().collect();
            prop_assert_eq!(watch.len(), state.watchlist.len());

            let held: HashSet<_> = state.portfolio.iter().map(|h| &h.coin_id).collect();
            prop_assert_eq!(held.len(), state.portfolio.len());
        }

        #[test]
        fn double_toggle_restores_membership(
            actions in prop::collection::vec(arb_action(), 0..32),
            id in prop::sample::select(vec!["btc", "eth", "doge"]),
        ) {
            let state = actions.into_iter().fold(AppState::default(), apply);
            let before: HashSet<_> = state.watchlist.iter().cloned().collect();

            let state = apply(state, Action::ToggleWatch(id.to_string()));
            let state = apply(state, Action::ToggleWatch(id.to_string()));
            let after: HashSet<_> = state.watchlist.iter().cloned().collect();
            prop_assert_eq!(before, after);
        }
    }
}
