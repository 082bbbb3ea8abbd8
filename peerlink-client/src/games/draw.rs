use crate::games::GameLogic;
use crate::session::Outcome;
use peerlink_core::model::{CanvasState, DrawEvent, GameEvent, ParticipantId, RoundVerdict};
use tracing::{debug, warn};

/// Architecture-draw quiz. The opponent's canvas is mirrored by wholesale
/// replacement; rounds go start -> both submit -> relay verdict. The relay
/// is the only party that joins the two submissions, so a verdict arriving
/// before both flags are set is an anomaly and is dropped.
#[derive(Debug, Clone, Default)]
pub struct DrawState {
    pub round: u32,
    pub peer_canvas: CanvasState,
    pub self_submitted: bool,
    pub peer_submitted: bool,
    pub verdicts: Vec<RoundVerdict>,
    pub rounds_won: u32,
    pub rounds_lost: u32,
}

pub struct DrawGame;

impl DrawGame {
    fn begin_round(state: &mut DrawState, round: u32) {
        state.round = round;
        state.self_submitted = false;
        state.peer_submitted = false;
    }
}

impl GameLogic for DrawGame {
    type State = DrawState;

    fn apply_remote(
        &mut self,
        state: &mut DrawState,
        _local: &ParticipantId,
        _sender: &ParticipantId,
        event: &GameEvent,
    ) {
        let GameEvent::Draw(event) = event else {
            return;
        };
        match event {
            DrawEvent::Canvas { canvas } => state.peer_canvas = canvas.clone(),
            DrawEvent::RoundStart { round } => Self::begin_round(state, *round),
            DrawEvent::Submit { round } => {
                if *round == state.round {
                    state.peer_submitted = true;
                } else {
                    debug!(
                        got = round,
                        current = state.round,
                        "submit for another round, ignoring"
                    );
                }
            }
        }
    }

    fn apply_local(&mut self, state: &mut DrawState, _local: &ParticipantId, event: &GameEvent) {
        let GameEvent::Draw(event) = event else {
            return;
        };
        match event {
            DrawEvent::Canvas { .. } => {}
            DrawEvent::RoundStart { round } => Self::begin_round(state, *round),
            DrawEvent::Submit { round } => {
                if *round == state.round {
                    state.self_submitted = true;
                }
            }
        }
    }

    fn apply_verdict(
        &mut self,
        state: &mut DrawState,
        local: &ParticipantId,
        verdict: &RoundVerdict,
    ) {
        if !(state.self_submitted && state.peer_submitted) {
            warn!(
                round = verdict.round,
                "verdict before both submissions, dropping"
            );
            return;
        }
        if verdict.round != state.round {
            warn!(
                got = verdict.round,
                current = state.round,
                "verdict for another round, dropping"
            );
            return;
        }
        match &verdict.winner {
            Some(winner) if winner == local => state.rounds_won += 1,
            Some(_) => state.rounds_lost += 1,
            None => {}
        }
        state.verdicts.push(verdict.clone());
    }

    fn on_time_up(&self, state: &DrawState) -> Option<Outcome> {
        if state.rounds_won > state.rounds_lost {
            Some(Outcome::Won { by_forfeit: false })
        } else if state.rounds_won < state.rounds_lost {
            Some(Outcome::Lost)
        } else {
            None
        }
    }
}
