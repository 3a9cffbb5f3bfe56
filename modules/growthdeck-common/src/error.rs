use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrowthdeckError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Classification error: {0}")]
    Classification(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
