use peerlink_core::model::ParticipantId;
use std::collections::HashMap;

/// Per-sender high-water marks for discrete game events. The transport is
/// ordered per connection, so any non-advancing sequence number is a replay
/// or a stale duplicate; dropping it keeps application at-most-once even if
/// the relay ever delivers twice.
#[derive(Debug, Default)]
pub struct SeqTracker {
    seen: HashMap<ParticipantId, u64>,
}

impl SeqTracker {
    /// Returns true exactly when the event should be applied, advancing the
    /// sender's high-water mark.
    pub fn accept(&mut self, sender: &ParticipantId, seq: u64) -> bool {
        match self.seen.get(sender) {
            Some(&last) if seq <= last => false,
            _ => {
                self.seen.insert(sender.clone(), seq);
                true
            }
        }
    }

    /// Drop a departed sender's mark. Sids are never reused, so this is
    /// hygiene, not correctness.
    pub fn forget(&mut self, sender: &ParticipantId) {
        self.seen.remove(sender);
    }
}
