use crate::error::ClientError;
use crate::transport::wire::{Wire, WireConn, WireEvent};
use bytes::Bytes;
use peerlink_core::model::{ParticipantId, RoomId};
use peerlink_core::protocol::{ClientEnvelope, ClientEvent, ServerEnvelope, ServerEvent};
use tracing::{debug, warn};

/// Typed event delivered by [`TransportChannel::recv`].
#[derive(Debug)]
pub enum TransportEvent {
    Event(ServerEvent),
    /// The connection is gone. A later reconnect means rejoining from
    /// scratch with a fresh sid.
    Down,
}

/// Client half of one relay connection, scoped to a single room. Frames are
/// decoded here, exactly once; everything past this boundary works with
/// typed envelopes.
pub struct TransportChannel {
    room: RoomId,
    conn: Option<WireConn>,
}

impl TransportChannel {
    pub fn new(room: RoomId) -> Self {
        Self { room, conn: None }
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Current connection-scoped id, `None` while disconnected. Callers must
    /// read this fresh for every "is this me" comparison instead of caching
    /// it across reconnects.
    pub fn local_sid(&self) -> Option<&ParticipantId> {
        self.conn.as_ref().map(|c| &c.sid)
    }

    /// Open the underlying connection. A no-op while already connected, so
    /// repeated calls cannot produce duplicate join storms.
    pub async fn connect(&mut self, wire: &dyn Wire) -> Result<(), ClientError> {
        if self.conn.is_some() {
            debug!(room = %self.room, "connect ignored: channel already connected");
            return Ok(());
        }
        self.conn = Some(wire.connect().await?);
        Ok(())
    }

    /// Send one event to the relay. A closed connection degrades to a flag
    /// flip observable via `is_connected`; nothing here returns an error to
    /// the game layer.
    pub async fn emit(&mut self, event: ClientEvent) {
        let Some(conn) = &self.conn else {
            debug!(room = %self.room, "emit while disconnected, dropping event");
            return;
        };
        let envelope = ClientEnvelope {
            room: self.room.clone(),
            event,
        };
        match serde_json::to_vec(&envelope) {
            Ok(frame) => {
                if conn.tx.send(Bytes::from(frame)).await.is_err() {
                    warn!(room = %self.room, "relay connection closed while sending");
                    self.conn = None;
                }
            }
            Err(e) => warn!("failed to encode envelope: {e}"),
        }
    }

    /// Next typed event from the relay. Frames that fail to decode, and
    /// envelopes for rooms this channel is not joined to, are dropped here.
    pub async fn recv(&mut self) -> TransportEvent {
        loop {
            let Some(conn) = self.conn.as_mut() else {
                return TransportEvent::Down;
            };
            match conn.rx.recv().await {
                Some(WireEvent::Frame(frame)) => {
                    match serde_json::from_slice::<ServerEnvelope>(&frame) {
                        Ok(envelope) if envelope.room == self.room => {
                            return TransportEvent::Event(envelope.event);
                        }
                        Ok(envelope) => {
                            debug!(
                                ours = %self.room,
                                got = %envelope.room,
                                "envelope for another room, ignoring"
                            );
                        }
                        Err(e) => warn!("undecodable frame from relay: {e}"),
                    }
                }
                Some(WireEvent::Closed) | None => {
                    self.conn = None;
                    return TransportEvent::Down;
                }
            }
        }
    }

    /// Drop the connection. Safe to call any number of times.
    pub fn disconnect(&mut self) {
        self.conn = None;
    }
}
