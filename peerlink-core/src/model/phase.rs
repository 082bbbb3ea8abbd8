use serde::{Deserialize, Serialize};

/// Why a session reached its terminal state. Objective, shared by both
/// participants; who won is derived locally from game state.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Finished,
    Timeout,
    Forfeit,
}

/// Coarse session phase. Transitions go through [`GamePhase::advance`],
/// which enforces the table below; anything else is rejected rather than
/// silently accepted as a plain assignment would be.
///
/// `Lobby -> Ready` when membership reaches the threshold, `Ready -> Lobby`
/// when it drops back, `Ready -> Active` on an explicit start, and
/// `Active -> Ended` on a verdict, timeout, or departure. Terminal states
/// are sticky.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Lobby,
    Ready,
    Active,
    Ended {
        reason: EndReason,
    },
}

impl GamePhase {
    /// Ordering used when applying remote snapshots: the mirror only ever
    /// moves forward.
    pub fn rank(self) -> u8 {
        match self {
            GamePhase::Lobby => 0,
            GamePhase::Ready => 1,
            GamePhase::Active => 2,
            GamePhase::Ended { .. } => 3,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Ended { .. })
    }

    fn permits(self, next: GamePhase) -> bool {
        use GamePhase::*;
        matches!(
            (self, next),
            (Lobby, Ready) | (Ready, Lobby) | (Ready, Active) | (Active, Ended { .. })
        )
    }

    /// Apply a local transition. Returns false (and leaves the phase
    /// untouched) when the table forbids it.
    pub fn advance(&mut self, next: GamePhase) -> bool {
        if self.permits(next) {
            *self = next;
            true
        } else {
            false
        }
    }
}
