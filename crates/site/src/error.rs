use carlton_core::bilingual::ReconstructError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {status}: {message}")]
    Status { status: u16, message: String },

    /// The key is already taken, or the version being edited is stale.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("section `{0}` is not stored")]
    NotStored(String),

    #[error("stored section is malformed: {0}")]
    Malformed(#[from] ReconstructError),
}
