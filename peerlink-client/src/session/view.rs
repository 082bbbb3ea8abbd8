use peerlink_core::model::{GamePhase, Participant, ParticipantId};
use std::collections::HashMap;

/// Final result of a session, from the local participant's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won { by_forfeit: bool },
    Lost,
}

/// A complete, renderable picture of one session. Published wholesale on
/// every change through a watch channel; readers never write back.
#[derive(Debug, Clone, Default)]
pub struct SessionView<S> {
    pub connected: bool,
    /// Current connection-scoped id; gone when the connection is.
    pub local_sid: Option<ParticipantId>,
    pub players: Vec<Participant>,
    pub is_ready: bool,
    pub is_leader: bool,
    pub phase: GamePhase,
    pub time_left: f64,
    /// Per-participant progress mirror, keyed by owner sid.
    pub progress: HashMap<ParticipantId, f64>,
    pub outcome: Option<Outcome>,
    pub game: S,
}
