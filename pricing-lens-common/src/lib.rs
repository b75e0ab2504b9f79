pub mod config;
pub use config::{ChartConfig, Config, DisplayConfig, ExportConfig, LoggingConfig, ServiceConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingLensError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(String),
    #[error("invalid {field}: {message}")]
    InvalidRequest { field: &'static str, message: String },
    /// non-success HTTP status; `message` is the service's `detail` or a generic fallback
    #[error("{message} (HTTP {status})")]
    Transport { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
    #[error("Optimization returned an empty curve")]
    EmptyCurve,
}

impl PricingLensError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRequest { field, message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, PricingLensError>;
