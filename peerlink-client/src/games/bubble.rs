use crate::games::GameLogic;
use crate::session::Outcome;
use peerlink_core::model::{BubbleEvent, GameEvent, ParticipantId};

/// 1v1 bubble battle: popping bubbles lets you send monsters to the
/// opponent's board; the first board to clear wins.
#[derive(Debug, Clone, Default)]
pub struct BubbleState {
    /// Monsters queued on the local board by opponent attacks. Incremented
    /// on receipt, which is why the session's replay guard matters here.
    pub pending_monsters: u32,
    /// Monsters we have sent across.
    pub monsters_sent: u32,
    /// Opponent's cumulative pop count, owner-authoritative.
    pub peer_popped: u32,
    pub finish: Option<BubbleFinish>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BubbleFinish {
    pub sid: ParticipantId,
    pub elapsed_ms: u64,
    pub local: bool,
}

pub struct BubbleGame;

impl GameLogic for BubbleGame {
    type State = BubbleState;

    fn apply_remote(
        &mut self,
        state: &mut BubbleState,
        _local: &ParticipantId,
        sender: &ParticipantId,
        event: &GameEvent,
    ) {
        let GameEvent::Bubble(event) = event else {
            return;
        };
        match event {
            BubbleEvent::SendMonsters { count } => state.pending_monsters += count,
            BubbleEvent::Popped { count } => state.peer_popped = *count,
            BubbleEvent::Cleared { elapsed_ms } => {
                if state.finish.is_none() {
                    state.finish = Some(BubbleFinish {
                        sid: sender.clone(),
                        elapsed_ms: *elapsed_ms,
                        local: false,
                    });
                }
            }
        }
    }

    fn apply_local(&mut self, state: &mut BubbleState, local: &ParticipantId, event: &GameEvent) {
        let GameEvent::Bubble(event) = event else {
            return;
        };
        match event {
            BubbleEvent::SendMonsters { count } => state.monsters_sent += count,
            BubbleEvent::Popped { .. } => {}
            BubbleEvent::Cleared { elapsed_ms } => {
                if state.finish.is_none() {
                    state.finish = Some(BubbleFinish {
                        sid: local.clone(),
                        elapsed_ms: *elapsed_ms,
                        local: true,
                    });
                }
            }
        }
    }

    fn outcome(&self, state: &BubbleState) -> Option<Outcome> {
        state.finish.as_ref().map(|finish| {
            if finish.local {
                Outcome::Won { by_forfeit: false }
            } else {
                Outcome::Lost
            }
        })
    }
}
