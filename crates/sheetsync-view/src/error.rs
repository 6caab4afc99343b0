use sheetsync_client::ClientError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// The intent cannot run in the current state. Nothing was changed.
    #[error("{0}")]
    Validation(String),

    /// The record service refused or never answered.
    #[error("{0}")]
    Transport(#[from] ClientError),
}
