use peerlink_core::model::{GameEvent, ParticipantId, Role, SignalPayload};

/// Everything the owning UI can ask a running session to do.
#[derive(Debug)]
pub enum SessionCommand {
    /// Leader-only: begin the round for the whole room. Ignored unless the
    /// session is ready.
    Start,
    /// Fire-and-forget; the new role is adopted locally only once the relay
    /// echoes it back.
    RoleChange(Role),
    /// Owner-pushed progress scalar, broadcast on every change.
    Progress(f64),
    /// Discrete gameplay event; sequenced and relayed to the room.
    Game(GameEvent),
    /// Media signaling passthrough to one peer.
    Signal {
        target: ParticipantId,
        signal: SignalPayload,
    },
    /// Tear the session down. Fires the leave intent and closes the
    /// connection without waiting for an acknowledgment.
    Leave,
}
