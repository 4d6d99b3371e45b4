use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
    /// Network failure or a response that was not JSON
    #[error("{0}")]
    Transport(String),
    #[error("{status} - {status_text}")]
    Status { status: u16, status_text: String },
    #[error("Invalid record: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    /// HTTP status behind this error, `0` when the request never got a JSON answer.
    pub fn status(&self) -> u16 {
        match self {
            Self::Status { status, .. } => *status,
            _ => 0,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == 404
    }
}
