use std::time::Duration;

/// Tunables for one game session. Defaults match the 1v1 mini-games.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Membership size at which the room counts as ready.
    pub ready_threshold: usize,
    /// Cadence of the leader's coarse-state broadcast.
    pub sync_interval: Duration,
    /// Cadence of outbound pings.
    pub heartbeat_interval: Duration,
    /// A peer silent for this long is treated as departed.
    pub liveness_timeout: Duration,
    /// Incoming timer values closer than this to the local one are ignored
    /// to suppress jitter from redundant broadcasts.
    pub timer_hysteresis: f64,
    /// Countdown the leader runs once the session goes active.
    pub round_time: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ready_threshold: 2,
            sync_interval: Duration::from_secs(3),
            heartbeat_interval: Duration::from_secs(2),
            liveness_timeout: Duration::from_secs(10),
            timer_hysteresis: 1.0,
            round_time: Duration::from_secs(120),
        }
    }
}
