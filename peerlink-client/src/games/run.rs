use crate::games::GameLogic;
use crate::session::Outcome;
use peerlink_core::model::{GameEvent, ParticipantId, RunEvent};

/// Race mini-game. Positions travel as owner-pushed progress through the
/// session; only items and the finish line are discrete events.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    /// Items used against the local runner, in arrival order.
    pub items_against: Vec<String>,
    pub finish: Option<RunFinish>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunFinish {
    pub sid: ParticipantId,
    pub elapsed_ms: u64,
    pub local: bool,
}

pub struct RunGame;

impl GameLogic for RunGame {
    type State = RunState;

    fn apply_remote(
        &mut self,
        state: &mut RunState,
        local: &ParticipantId,
        sender: &ParticipantId,
        event: &GameEvent,
    ) {
        let GameEvent::Run(event) = event else {
            return;
        };
        match event {
            RunEvent::ItemUsed { item, target } => {
                let hits_us = target.as_ref().is_none_or(|t| t == local);
                if hits_us {
                    state.items_against.push(item.clone());
                }
            }
            RunEvent::Finished { elapsed_ms } => {
                if state.finish.is_none() {
                    state.finish = Some(RunFinish {
                        sid: sender.clone(),
                        elapsed_ms: *elapsed_ms,
                        local: false,
                    });
                }
            }
        }
    }

    fn apply_local(&mut self, state: &mut RunState, local: &ParticipantId, event: &GameEvent) {
        if let GameEvent::Run(RunEvent::Finished { elapsed_ms }) = event {
            if state.finish.is_none() {
                state.finish = Some(RunFinish {
                    sid: local.clone(),
                    elapsed_ms: *elapsed_ms,
                    local: true,
                });
            }
        }
    }

    fn outcome(&self, state: &RunState) -> Option<Outcome> {
        state.finish.as_ref().map(|finish| {
            if finish.local {
                Outcome::Won { by_forfeit: false }
            } else {
                Outcome::Lost
            }
        })
    }
}
