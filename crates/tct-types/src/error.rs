use thiserror::Error;

#[derive(Error, Debug)]
pub enum TctError {
    #[error("Prompt weighting snapshot failed to load: {0}")]
    PromptSnapshot(String),

    #[error("Weighting snapshot error: {0}")]
    Snapshot(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Signal bin out of range: bin={bin}, n_bins={n_bins}")]
    SignalBinOutOfRange { bin: usize, n_bins: usize },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Usage error: {0}")]
    Usage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TctResult<T> = Result<T, TctError>;
