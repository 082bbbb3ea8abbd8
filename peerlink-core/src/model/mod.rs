mod event;
mod participant;
mod phase;
mod room;
mod signaling;
mod snapshot;

pub use event::{BubbleEvent, DrawEvent, GameEvent, RoundScore, RoundVerdict, RunEvent, WarsEvent};
pub use participant::{Participant, ParticipantId, Role};
pub use phase::{EndReason, GamePhase};
pub use room::RoomId;
pub use signaling::{IceServerConfig, SignalPayload};
pub use snapshot::{CanvasArrow, CanvasNode, CanvasState, StateSnapshot};
