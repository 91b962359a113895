use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API {status}{}", rate_limit_note(.status))]
    Http { status: u16 },

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

fn rate_limit_note(status: &u16) -> &'static str {
    if *status == 429 {
        " – rate limited"
    } else {
        ""
    }
}

impl Error {
    /// True for a 429 response from the market data API.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::Http { status: 429 })
    }
}
