use crate::games::GameLogic;
use peerlink_core::model::{GameEvent, ParticipantId, WarsEvent};

/// Mock-interview war room. Mostly a plain room (roles, readiness, media
/// signaling); the only shared game state is the current topic and a
/// reaction feed. No winner; the room ends by leaving or timeout.
#[derive(Debug, Clone, Default)]
pub struct WarsState {
    pub topic: Option<String>,
    /// (who, emoji), in arrival order.
    pub reactions: Vec<(ParticipantId, String)>,
}

pub struct WarsGame;

impl WarsGame {
    fn apply(state: &mut WarsState, who: &ParticipantId, event: &WarsEvent) {
        match event {
            WarsEvent::TopicChanged { topic } => state.topic = Some(topic.clone()),
            WarsEvent::Reaction { emoji } => state.reactions.push((who.clone(), emoji.clone())),
        }
    }
}

impl GameLogic for WarsGame {
    type State = WarsState;

    fn apply_remote(
        &mut self,
        state: &mut WarsState,
        _local: &ParticipantId,
        sender: &ParticipantId,
        event: &GameEvent,
    ) {
        if let GameEvent::Wars(event) = event {
            Self::apply(state, sender, event);
        }
    }

    fn apply_local(&mut self, state: &mut WarsState, local: &ParticipantId, event: &GameEvent) {
        if let GameEvent::Wars(event) = event {
            Self::apply(state, local, event);
        }
    }
}
