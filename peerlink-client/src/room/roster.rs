use peerlink_core::model::{Participant, ParticipantId, Role};

/// Room membership as last broadcast by the relay, in join order. Always
/// replaced wholesale; the relay is the single source of truth, so there
/// is nothing to merge and nothing to diverge.
#[derive(Debug, Default, Clone)]
pub struct Roster {
    players: Vec<Participant>,
}

impl Roster {
    pub fn replace(&mut self, players: Vec<Participant>) {
        self.players = players;
    }

    /// Remove one participant after a peer-left notification. Returns true
    /// if they were actually present.
    pub fn remove(&mut self, sid: &ParticipantId) -> bool {
        let before = self.players.len();
        self.players.retain(|p| &p.sid != sid);
        self.players.len() != before
    }

    pub fn set_role(&mut self, sid: &ParticipantId, role: Role) -> bool {
        match self.players.iter_mut().find(|p| &p.sid == sid) {
            Some(player) => {
                player.role = role;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, sid: &ParticipantId) -> bool {
        self.players.iter().any(|p| &p.sid == sid)
    }

    pub fn get(&self, sid: &ParticipantId) -> Option<&Participant> {
        self.players.iter().find(|p| &p.sid == sid)
    }

    /// First joiner; the authoritative broadcaster of coarse state.
    pub fn leader(&self) -> Option<&Participant> {
        self.players.first()
    }

    pub fn players(&self) -> &[Participant] {
        &self.players
    }

    pub fn sids(&self) -> impl Iterator<Item = &ParticipantId> {
        self.players.iter().map(|p| &p.sid)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
