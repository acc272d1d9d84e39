use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Rate limit exceeded, resets in {0} seconds")]
    RateLimited(u64),

    #[error("GitHub request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Empty response for {0}")]
    EmptyResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why a fetch did not produce data, in a form that can be reported and
/// serialized alongside the collected records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    RateLimited { reset_in_secs: u64 },
    RequestFailed { status: u16 },
    MissingData { detail: String },
    Transport { detail: String },
}

impl Error {
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::RateLimited(secs) => FailureKind::RateLimited {
                reset_in_secs: *secs,
            },
            Error::RequestFailed { status, .. } => FailureKind::RequestFailed { status: *status },
            Error::EmptyResponse(_) | Error::ParseError(_) | Error::Serialization(_) => {
                FailureKind::MissingData {
                    detail: self.to_string(),
                }
            }
            _ => FailureKind::Transport {
                detail: self.to_string(),
            },
        }
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Error::RateLimited(_))
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::RateLimited { reset_in_secs } => {
                write!(f, "rate limited (resets in {}s)", reset_in_secs)
            }
            FailureKind::RequestFailed { status } => write!(f, "request failed ({})", status),
            FailureKind::MissingData { detail } => write!(f, "missing data: {}", detail),
            FailureKind::Transport { detail } => write!(f, "transport error: {}", detail),
        }
    }
}
