use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    /// Any transport failure: connect, DNS, TLS, timeout or body read.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid header value for {name}: {reason}")]
    InvalidHeader { name: &'static str, reason: String },
}
