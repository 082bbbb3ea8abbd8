use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to reach relay: {0}")]
    Connect(String),

    #[error("relay connection closed")]
    TransportClosed,

    #[error("frame codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("session already ended")]
    SessionEnded,
}
