use peerlink_core::model::ParticipantId;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Last-heard bookkeeping for room peers. Any inbound event from a peer
/// counts as a sign of life; a peer silent past the timeout is reported so
/// the session can apply the same departure policy as an explicit
/// disconnect.
#[derive(Debug, Default)]
pub struct Liveness {
    last_heard: HashMap<ParticipantId, Instant>,
}

impl Liveness {
    pub fn track(&mut self, sid: &ParticipantId) {
        self.last_heard.insert(sid.clone(), Instant::now());
    }

    pub fn forget(&mut self, sid: &ParticipantId) {
        self.last_heard.remove(sid);
    }

    /// Keep only the given sids, so bookkeeping follows roster replacement.
    pub fn retain_members<'a>(&mut self, members: impl Iterator<Item = &'a ParticipantId>) {
        let keep: Vec<ParticipantId> = members.cloned().collect();
        self.last_heard.retain(|sid, _| keep.contains(sid));
    }

    pub fn silent_peers(&self, timeout: Duration) -> Vec<ParticipantId> {
        self.last_heard
            .iter()
            .filter(|(_, heard)| heard.elapsed() >= timeout)
            .map(|(sid, _)| sid.clone())
            .collect()
    }
}
