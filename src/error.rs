use thiserror::Error;

pub type Result<T> = anyhow::Result<T>;

#[derive(Error, Debug)]
pub enum RedeployError {
    #[error("Deployment endpoint rejected the request: {0}")]
    DeployRejected(String),
    #[error("Notification endpoint responded with {0}")]
    NotifyRejected(reqwest::StatusCode),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
