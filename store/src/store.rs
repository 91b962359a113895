use crate::action::Action;
use crate::derived::DashboardSnapshot;
use crate::reducer::apply;
use crate::state::AppState;
use common::models::{Coin, Currency};
use tracing::debug;

/// Identifies one coin snapshot request.
///
/// Issued by [`Store::issue_ticket`] before the request goes out and handed
/// back with the response so late answers can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub currency: Currency,
}

/// Owner of the single [`AppState`].
///
/// Every mutation goes through [`Store::dispatch`], which runs the pure
/// reducer and bumps the version.
#[derive(Debug, Default)]
pub struct Store {
    state: AppState,
    version: u64,
    next_seq: u64,
    applied_seq: u64,
    snapshot_currency: Option<Currency>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Number of actions applied so far
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn dispatch(&mut self, action: Action) {
        debug!("Dispatching {} (version {})", action.name(), self.version);
        let state = std::mem::take(&mut self.state);
        self.state = apply(state, action);
        self.version += 1;
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot::from_state(&self.state, self.version)
    }

    /// Currency of the committed coin snapshot, if any
    pub fn snapshot_currency(&self) -> Option<Currency> {
        self.snapshot_currency
    }

    pub fn issue_ticket(&mut self, currency: Currency) -> FetchTicket {
        self.next_seq += 1;
        FetchTicket {
            seq: self.next_seq,
            currency,
        }
    }

    /// A response is current when it was requested for the selected currency
    /// and nothing issued after it has been committed yet.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.currency == self.state.currency && ticket.seq > self.applied_seq
    }

    /// Commits the outcome of a snapshot request, or drops it if stale.
    ///
    /// Returns whether the outcome was applied.
    pub fn commit_snapshot(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Vec<Coin>, String>,
    ) -> bool {
        if !self.is_current(&ticket) {
            debug!(
                "Discarding stale snapshot #{} for {} (selected: {})",
                ticket.seq, ticket.currency, self.state.currency
            );
            return false;
        }

        // A failure also supersedes older in-flight requests.
        self.applied_seq = ticket.seq;
        match outcome {
            Ok(coins) => {
                self.snapshot_currency = Some(ticket.currency);
                self.dispatch(Action::SetCoins(coins));
            }
            Err(message) => self.dispatch(Action::SetError(message)),
        }
        true
    }
}
