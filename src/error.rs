use thiserror::Error;

/// Failures surfaced by the dashboard client.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("request to {path} timed out")]
    Timeout { path: String },

    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{path} returned {status}: {body}")]
    Status {
        path: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("could not decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The envelope came back with `success: false`.
    #[error("server rejected request: {message}")]
    Rejected { message: String },

    #[error("invalid admin credentials")]
    InvalidCredentials,

    #[error("configuration error: {0}")]
    Config(String),
}

impl DashboardError {
    pub fn from_reqwest(path: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DashboardError::Timeout {
                path: path.to_string(),
            }
        } else {
            DashboardError::Transport {
                path: path.to_string(),
                source: err,
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
