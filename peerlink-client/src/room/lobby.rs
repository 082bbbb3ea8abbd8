use crate::room::roster::Roster;
use peerlink_core::model::{Participant, ParticipantId, Role};
use tracing::debug;

/// How the local participant introduces itself on join.
#[derive(Debug, Clone)]
pub struct Identity {
    pub name: String,
    pub role: Option<Role>,
    pub avatar: Option<String>,
}

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
            avatar: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

/// Client-side lobby state: the authoritative roster plus the readiness
/// threshold. Role changes follow the echo rule: a self-originated change
/// is only adopted when the relay echoes it back, while peer changes apply
/// immediately (both arrive through [`Lobby::apply_role`]).
#[derive(Debug)]
pub struct Lobby {
    roster: Roster,
    ready_threshold: usize,
}

impl Lobby {
    pub fn new(ready_threshold: usize) -> Self {
        Self {
            roster: Roster::default(),
            ready_threshold,
        }
    }

    /// Replace the membership from a roster broadcast. Returns the sids that
    /// disappeared, so the caller can run its departure policy even when the
    /// relay coalesced a leave into a roster update.
    pub fn apply_roster(&mut self, players: Vec<Participant>) -> Vec<ParticipantId> {
        let departed: Vec<ParticipantId> = self
            .roster
            .sids()
            .filter(|sid| !players.iter().any(|p| p.sid == **sid))
            .cloned()
            .collect();
        self.roster.replace(players);
        departed
    }

    pub fn apply_role(&mut self, sid: &ParticipantId, role: Role) {
        if !self.roster.set_role(sid, role) {
            debug!(%sid, "role change for unknown participant, ignoring");
        }
    }

    /// Returns true if the peer was actually present.
    pub fn apply_peer_left(&mut self, sid: &ParticipantId) -> bool {
        self.roster.remove(sid)
    }

    /// Pure function of membership size; recomputed on every roster change.
    pub fn is_ready(&self) -> bool {
        self.roster.len() >= self.ready_threshold
    }

    pub fn is_leader(&self, local: &ParticipantId) -> bool {
        self.roster.leader().is_some_and(|p| &p.sid == local)
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }
}
