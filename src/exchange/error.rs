/// Failures raised by an exchange collaborator
#[derive(thiserror::Error, Debug)]
pub enum ExchangeError {
    #[error("HTTP error: {0}")] Http(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")] Url(#[from] url::ParseError),
    #[error("API error: {status} - {body}")] Api {
        status: u16,
        body: String,
    },
    #[error("Parse error: {0}")] Parse(String),
    #[error("Authentication error: {0}")] Auth(String),
    #[error("Order rejected: {0}")] Rejected(String),
}

pub type Result<T> = std::result::Result<T, ExchangeError>;
