mod action;
mod chart;
pub mod derived;
mod input;
mod reducer;
mod state;
mod store;

pub use action::Action;
pub use chart::{ChartState, ChartTicket};
pub use input::{AlertInput, HoldingInput, NumberInput};
pub use reducer::{apply, apply_at};
pub use state::{AppState, Page, Theme, View};
pub use store::{FetchTicket, Store};
