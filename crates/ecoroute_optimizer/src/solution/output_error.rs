use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write route stops: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}
