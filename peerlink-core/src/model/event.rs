use crate::model::participant::ParticipantId;
use crate::model::snapshot::CanvasState;
use serde::{Deserialize, Serialize};

/// Discrete one-shot gameplay event. Every variant is self-describing: it
/// carries everything a peer needs to apply it, no follow-up fetch.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "op", content = "d")]
#[serde(rename_all = "snake_case")]
pub enum GameEvent {
    Bubble(BubbleEvent),
    Run(RunEvent),
    Draw(DrawEvent),
    Wars(WarsEvent),
}

/// Bubble-battle events. `SendMonsters` is applied as an increment on the
/// receiving board, which is why delivery must stay at-most-once.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "op", content = "d")]
#[serde(rename_all = "snake_case")]
pub enum BubbleEvent {
    SendMonsters { count: u32 },
    Popped { count: u32 },
    Cleared { elapsed_ms: u64 },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "op", content = "d")]
#[serde(rename_all = "snake_case")]
pub enum RunEvent {
    ItemUsed {
        item: String,
        /// `None` hits every other runner in the room.
        target: Option<ParticipantId>,
    },
    Finished {
        elapsed_ms: u64,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "op", content = "d")]
#[serde(rename_all = "snake_case")]
pub enum DrawEvent {
    /// Wholesale canvas replacement for the sender's board.
    Canvas { canvas: CanvasState },
    RoundStart { round: u32 },
    Submit { round: u32 },
}

/// War-room (mock interview) events.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "op", content = "d")]
#[serde(rename_all = "snake_case")]
pub enum WarsEvent {
    TopicChanged { topic: String },
    Reaction { emoji: String },
}

/// Relay-authored verdict for one draw round, emitted only once every
/// participant has submitted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RoundVerdict {
    pub round: u32,
    pub winner: Option<ParticipantId>,
    pub scores: Vec<RoundScore>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RoundScore {
    pub sid: ParticipantId,
    pub score: u32,
}
