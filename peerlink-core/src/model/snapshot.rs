use crate::model::phase::GamePhase;
use serde::{Deserialize, Serialize};

/// Full coarse-state broadcast. Peers apply it by wholesale overwrite (with
/// a timer hysteresis band), never by incremental patching.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StateSnapshot {
    pub phase: GamePhase,
    /// Seconds left on the authoritative countdown.
    pub time_left: f64,
    /// The broadcaster's own coarse progress scalar.
    pub progress: f64,
}

/// A placed component marker on the architecture-draw canvas.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CanvasNode {
    pub component: String,
    pub label: String,
    pub icon: String,
    pub x: f32,
    pub y: f32,
}

/// A drawn connection between two placed components.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CanvasArrow {
    pub from: String,
    pub to: String,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// One participant's whole canvas. Mirrors are replaced, not diffed; the
/// payloads are small and the sync frequency is bounded.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct CanvasState {
    pub nodes: Vec<CanvasNode>,
    pub arrows: Vec<CanvasArrow>,
}
