use crate::error::ClientError;
use async_trait::async_trait;
use bytes::Bytes;
use peerlink_core::model::ParticipantId;
use tokio::sync::mpsc;

/// Raw events surfaced by the physical connection.
#[derive(Debug)]
pub enum WireEvent {
    Frame(Bytes),
    Closed,
}

/// One live connection to the relay. `sid` is the connection-scoped id the
/// relay minted for this connection; it dies with it.
pub struct WireConn {
    pub sid: ParticipantId,
    pub tx: mpsc::Sender<Bytes>,
    pub rx: mpsc::Receiver<WireEvent>,
}

/// Seam between the session layer and the underlying connection, so tests
/// can run against an in-memory relay.
#[async_trait]
pub trait Wire: Send + Sync + 'static {
    async fn connect(&self) -> Result<WireConn, ClientError>;
}
