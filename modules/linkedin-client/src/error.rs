use thiserror::Error;

pub type Result<T> = std::result::Result<T, LinkedInError>;

#[derive(Debug, Error)]
pub enum LinkedInError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for LinkedInError {
    fn from(err: reqwest::Error) -> Self {
        LinkedInError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for LinkedInError {
    fn from(err: serde_json::Error) -> Self {
        LinkedInError::Parse(err.to_string())
    }
}
