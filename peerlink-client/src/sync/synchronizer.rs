use peerlink_core::model::{GamePhase, StateSnapshot};
use tracing::debug;

/// Coarse session state plus the rules for applying leader broadcasts.
///
/// Exactly one participant (the leader) ever emits this snapshot; everyone
/// else holds a mirror that moves only forward in phase and only outside
/// the timer hysteresis band.
#[derive(Debug)]
pub struct Synchronizer {
    snapshot: StateSnapshot,
    hysteresis: f64,
}

impl Synchronizer {
    pub fn new(hysteresis: f64, round_time: f64) -> Self {
        Self {
            snapshot: StateSnapshot {
                phase: GamePhase::Lobby,
                time_left: round_time,
                progress: 0.0,
            },
            hysteresis,
        }
    }

    pub fn snapshot(&self) -> &StateSnapshot {
        &self.snapshot
    }

    pub fn phase(&self) -> GamePhase {
        self.snapshot.phase
    }

    /// Local, table-checked phase transition.
    pub fn advance(&mut self, next: GamePhase) -> bool {
        self.snapshot.phase.advance(next)
    }

    pub fn set_progress(&mut self, value: f64) {
        self.snapshot.progress = value;
    }

    /// Leader-side countdown. Returns true on the tick that exhausts the
    /// timer.
    pub fn tick_timer(&mut self, elapsed: f64) -> bool {
        if self.snapshot.phase != GamePhase::Active || self.snapshot.time_left == 0.0 {
            return false;
        }
        self.snapshot.time_left = (self.snapshot.time_left - elapsed).max(0.0);
        self.snapshot.time_left == 0.0
    }

    /// Apply a leader snapshot to the mirror: wholesale overwrite, except
    /// that the phase never regresses and the timer only moves when the
    /// discrepancy reaches the hysteresis band (suppressing jitter from
    /// redundant broadcasts). Returns the phase the mirror moved to, if it
    /// moved.
    pub fn apply_remote(&mut self, incoming: &StateSnapshot) -> Option<GamePhase> {
        let mut advanced = None;
        if incoming.phase.rank() > self.snapshot.phase.rank() {
            self.snapshot.phase = incoming.phase;
            advanced = Some(incoming.phase);
        } else if incoming.phase != self.snapshot.phase {
            debug!(
                local = ?self.snapshot.phase,
                incoming = ?incoming.phase,
                "stale phase in snapshot, keeping local"
            );
        }

        if (incoming.time_left - self.snapshot.time_left).abs() >= self.hysteresis {
            self.snapshot.time_left = incoming.time_left;
        }
        self.snapshot.progress = incoming.progress;
        advanced
    }
}
