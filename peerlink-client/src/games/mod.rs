mod bubble;
mod draw;
mod run;
mod wars;

pub use bubble::{BubbleFinish, BubbleGame, BubbleState};
pub use draw::{DrawGame, DrawState};
pub use run::{RunFinish, RunGame, RunState};
pub use wars::{WarsGame, WarsState};

use crate::session::Outcome;
use peerlink_core::model::{GameEvent, ParticipantId, RoundVerdict};

/// Per-game reducer plugged into the generic session loop. The session owns
/// transport, roster, phase and sequencing; implementations only fold
/// events into their own state and report a verdict when they have one.
///
/// `local` is always the current connection's sid, and `sender` is never
/// the local participant; the session filters echoes and replays before
/// calling in.
pub trait GameLogic: Send + 'static {
    type State: Clone + Default + Send + Sync + 'static;

    /// Fold one peer event into the local mirror.
    fn apply_remote(
        &mut self,
        state: &mut Self::State,
        local: &ParticipantId,
        sender: &ParticipantId,
        event: &GameEvent,
    );

    /// Fold a locally-initiated event, just before it goes out.
    fn apply_local(&mut self, _state: &mut Self::State, _local: &ParticipantId, _event: &GameEvent) {
    }

    /// Relay-authored round verdicts (draw quiz).
    fn apply_verdict(
        &mut self,
        _state: &mut Self::State,
        _local: &ParticipantId,
        _verdict: &RoundVerdict,
    ) {
    }

    /// Has the game decided? Checked after every application; the first
    /// `Some` ends the session.
    fn outcome(&self, _state: &Self::State) -> Option<Outcome> {
        None
    }

    /// Verdict when the countdown runs out with no winner. `None` renders
    /// as a plain timeout.
    fn on_time_up(&self, _state: &Self::State) -> Option<Outcome> {
        None
    }
}
