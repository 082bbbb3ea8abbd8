use crate::model::{
    GameEvent, Participant, ParticipantId, Role, RoomId, RoundVerdict, SignalPayload,
    StateSnapshot,
};
use serde::{Deserialize, Serialize};

/// First frame the relay sends on a fresh connection, carrying the
/// connection-scoped id it minted for us.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Hello {
    pub sid: ParticipantId,
}

/// Outbound envelope: every message a client sends is scoped to one room.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClientEnvelope {
    pub room: RoomId,
    #[serde(flatten)]
    pub event: ClientEvent,
}

/// Inbound envelope. Receivers drop envelopes for rooms they are not
/// currently joined to.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServerEnvelope {
    pub room: RoomId,
    #[serde(flatten)]
    pub event: ServerEvent,
}

/// Everything a client may say to the relay.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "op", content = "d")]
#[serde(rename_all = "snake_case")]
pub enum ClientEvent {
    Join {
        name: String,
        #[serde(default)]
        role: Option<Role>,
        #[serde(default)]
        avatar: Option<String>,
    },
    Leave,
    RoleChange {
        role: Role,
    },
    Start,
    /// Late-joiner recovery: ask the leader to re-broadcast its snapshot.
    RequestState,
    /// Leader-only coarse-state broadcast.
    StateSync {
        state: StateSnapshot,
    },
    /// Owner-pushed per-participant scalar.
    Progress {
        value: f64,
    },
    /// Discrete gameplay event with a per-session monotonic sequence number.
    Game {
        seq: u64,
        event: GameEvent,
    },
    /// Media signaling passthrough, addressed to one peer.
    Signal {
        target: ParticipantId,
        signal: SignalPayload,
    },
    Ping,
}

/// Everything the relay fans out to room members. Sender-originated events
/// carry the sender's sid so recipients can tell self from peer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "op", content = "d")]
#[serde(rename_all = "snake_case")]
pub enum ServerEvent {
    /// Authoritative membership, replacing any local roster wholesale.
    Roster {
        players: Vec<Participant>,
    },
    PeerLeft {
        sid: ParticipantId,
    },
    /// Echoed to everyone including the requester; local roles are adopted
    /// from this echo, never optimistically.
    RoleChanged {
        sid: ParticipantId,
        role: Role,
    },
    Started {
        sid: ParticipantId,
    },
    StateSync {
        sid: ParticipantId,
        state: StateSnapshot,
    },
    StateRequested {
        sid: ParticipantId,
    },
    Progress {
        sid: ParticipantId,
        value: f64,
    },
    Game {
        sid: ParticipantId,
        seq: u64,
        event: GameEvent,
    },
    /// Relay-authored; only emitted after every participant submitted.
    RoundResult {
        verdict: RoundVerdict,
    },
    Signal {
        sid: ParticipantId,
        signal: SignalPayload,
    },
    Ping {
        sid: ParticipantId,
    },
}
