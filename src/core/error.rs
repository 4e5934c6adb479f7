use thiserror::Error;
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("ADB not found in PATH or next to the executable")]
    AdbNotFound,
    #[error("ADB command failed: {0}")]
    CommandFailed(String),
    #[error("ADB timeout after {0}s")]
    Timeout(u64),
    #[error("No connected device found")]
    NoDevices,
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
pub type Result<T> = std::result::Result<T, HarnessError>;
