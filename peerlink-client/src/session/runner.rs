use crate::config::SessionConfig;
use crate::error::ClientError;
use crate::games::GameLogic;
use crate::room::{Identity, Lobby};
use crate::session::command::SessionCommand;
use crate::session::view::{Outcome, SessionView};
use crate::sync::{Liveness, SeqTracker, Synchronizer};
use crate::transport::{TransportChannel, TransportEvent, Wire};
use peerlink_core::model::{
    EndReason, GamePhase, ParticipantId, RoomId, SignalPayload,
};
use peerlink_core::protocol::{ClientEvent, ServerEvent};
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Caller-side handle to a running session. Dropping it aborts the loop;
/// calling [`SessionHandle::leave`] first gives the relay a leave intent.
pub struct SessionHandle<S> {
    cmd_tx: mpsc::Sender<SessionCommand>,
    view_rx: watch::Receiver<SessionView<S>>,
    signal_rx: mpsc::Receiver<(ParticipantId, SignalPayload)>,
    task: Option<JoinHandle<()>>,
}

impl<S: Clone> SessionHandle<S> {
    /// Snapshot of the current session view.
    pub fn view(&self) -> SessionView<S> {
        self.view_rx.borrow().clone()
    }

    /// Wait until the view changes. Errors once the session loop is gone.
    pub async fn changed(&mut self) -> Result<(), ClientError> {
        self.view_rx
            .changed()
            .await
            .map_err(|_| ClientError::SessionEnded)
    }

    pub async fn send(&self, command: SessionCommand) -> Result<(), ClientError> {
        self.cmd_tx
            .send(command)
            .await
            .map_err(|_| ClientError::SessionEnded)
    }

    pub async fn start(&self) -> Result<(), ClientError> {
        self.send(SessionCommand::Start).await
    }

    pub async fn set_progress(&self, value: f64) -> Result<(), ClientError> {
        self.send(SessionCommand::Progress(value)).await
    }

    /// Next inbound media signal addressed to us, with the sender's sid.
    pub async fn next_signal(&mut self) -> Option<(ParticipantId, SignalPayload)> {
        self.signal_rx.recv().await
    }

    /// Fire the leave intent and wait for the loop to wind down.
    pub async fn leave(mut self) -> Result<(), ClientError> {
        self.send(SessionCommand::Leave).await?;
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        Ok(())
    }
}

impl<S> Drop for SessionHandle<S> {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

/// One game session: a single event loop owning the transport channel, the
/// lobby, the coarse-state synchronizer and the game reducer. Invariant:
/// every field has exactly one writer. Per-participant fields belong to
/// their owner, coarse fields to the leader; everyone else mirrors.
pub struct Session<G: GameLogic> {
    cfg: SessionConfig,
    channel: TransportChannel,
    lobby: Lobby,
    sync: Synchronizer,
    seqs: SeqTracker,
    liveness: Liveness,
    next_seq: u64,
    progress: HashMap<ParticipantId, f64>,
    game: G,
    state: G::State,
    outcome: Option<Outcome>,
    command_rx: mpsc::Receiver<SessionCommand>,
    signal_tx: mpsc::Sender<(ParticipantId, SignalPayload)>,
    view_tx: watch::Sender<SessionView<G::State>>,
}

impl<G: GameLogic> Session<G> {
    /// Connect, send the join intent and hand the loop to the runtime.
    /// Membership arrives asynchronously through roster broadcasts; the
    /// returned handle's view starts empty.
    pub async fn spawn(
        wire: &dyn Wire,
        room: RoomId,
        identity: Identity,
        game: G,
        cfg: SessionConfig,
    ) -> Result<SessionHandle<G::State>, ClientError> {
        let mut channel = TransportChannel::new(room);
        channel.connect(wire).await?;
        channel
            .emit(ClientEvent::Join {
                name: identity.name.clone(),
                role: identity.role,
                avatar: identity.avatar.clone(),
            })
            .await;
        // Late-joiner recovery: if a game is already running, the leader
        // answers this with a room-wide snapshot.
        channel.emit(ClientEvent::RequestState).await;

        let (cmd_tx, command_rx) = mpsc::channel(64);
        let (signal_tx, signal_rx) = mpsc::channel(64);
        let (view_tx, view_rx) = watch::channel(SessionView::default());

        let session = Session {
            lobby: Lobby::new(cfg.ready_threshold),
            sync: Synchronizer::new(cfg.timer_hysteresis, cfg.round_time.as_secs_f64()),
            cfg,
            channel,
            seqs: SeqTracker::default(),
            liveness: Liveness::default(),
            next_seq: 0,
            progress: HashMap::new(),
            game,
            state: G::State::default(),
            outcome: None,
            command_rx,
            signal_tx,
            view_tx,
        };
        session.publish();
        let task = tokio::spawn(session.run());

        Ok(SessionHandle {
            cmd_tx,
            view_rx,
            signal_rx,
            task: Some(task),
        })
    }

    async fn run(mut self) {
        info!(room = %self.channel.room(), "session loop started");

        let mut sync_tick = tokio::time::interval(self.cfg.sync_interval);
        sync_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut heartbeat_tick = tokio::time::interval(self.cfg.heartbeat_interval);
        heartbeat_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_timer_tick = Instant::now();

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => {
                        if self.handle_command(cmd).await {
                            break;
                        }
                    }
                    None => {
                        // Every handle is gone; treat it as a leave.
                        self.channel.emit(ClientEvent::Leave).await;
                        self.channel.disconnect();
                        break;
                    }
                },
                event = self.channel.recv() => match event {
                    TransportEvent::Event(event) => self.handle_server_event(event).await,
                    TransportEvent::Down => {
                        self.on_transport_down();
                        break;
                    }
                },
                _ = sync_tick.tick() => {
                    let elapsed = last_timer_tick.elapsed().as_secs_f64();
                    last_timer_tick = Instant::now();
                    self.on_sync_tick(elapsed).await;
                }
                _ = heartbeat_tick.tick() => self.on_heartbeat_tick().await,
            }
            self.publish();
        }

        self.publish();
        info!(room = %self.channel.room(), "session loop finished");
    }

    fn local_sid(&self) -> Option<ParticipantId> {
        self.channel.local_sid().cloned()
    }

    fn is_local(&self, sid: &ParticipantId) -> bool {
        self.channel.local_sid() == Some(sid)
    }

    fn is_leader(&self) -> bool {
        self.channel
            .local_sid()
            .is_some_and(|sid| self.lobby.is_leader(sid))
    }

    /// Returns true when the loop should end.
    async fn handle_command(&mut self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::Start => {
                if !self.is_leader() {
                    warn!("start ignored: only the leader may start");
                    return false;
                }
                if !self.sync.advance(GamePhase::Active) {
                    warn!(phase = ?self.sync.phase(), "start ignored in current phase");
                    return false;
                }
                // Peers transition on the fan-out; we transition here, so
                // both ends begin in step.
                self.channel.emit(ClientEvent::Start).await;
                self.broadcast_snapshot().await;
            }
            SessionCommand::RoleChange(role) => {
                // Not applied optimistically; adoption happens on echo-back.
                self.channel.emit(ClientEvent::RoleChange { role }).await;
            }
            SessionCommand::Progress(value) => {
                if let Some(sid) = self.local_sid() {
                    self.progress.insert(sid, value);
                }
                self.sync.set_progress(value);
                self.channel.emit(ClientEvent::Progress { value }).await;
            }
            SessionCommand::Game(event) => {
                let Some(local) = self.local_sid() else {
                    return false;
                };
                self.game.apply_local(&mut self.state, &local, &event);
                self.next_seq += 1;
                self.channel
                    .emit(ClientEvent::Game {
                        seq: self.next_seq,
                        event,
                    })
                    .await;
                self.check_outcome().await;
            }
            SessionCommand::Signal { target, signal } => {
                self.channel.emit(ClientEvent::Signal { target, signal }).await;
            }
            SessionCommand::Leave => {
                self.channel.emit(ClientEvent::Leave).await;
                self.channel.disconnect();
                return true;
            }
        }
        false
    }

    async fn handle_server_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Roster { players } => {
                let departed = self.lobby.apply_roster(players);
                for sid in &departed {
                    self.drop_peer_state(sid);
                }
                if let Some(local) = self.local_sid() {
                    for sid in self.lobby.roster().sids().filter(|s| **s != local) {
                        self.liveness.track(sid);
                    }
                }
                self.liveness
                    .retain_members(self.lobby.roster().sids());
                if departed.is_empty() {
                    self.refresh_readiness();
                } else {
                    self.on_peer_departed();
                }
            }
            ServerEvent::PeerLeft { sid } => {
                let was_present = self.lobby.apply_peer_left(&sid);
                self.drop_peer_state(&sid);
                if was_present {
                    info!(%sid, "peer left the room");
                    self.on_peer_departed();
                }
            }
            ServerEvent::RoleChanged { sid, role } => {
                // Covers both peers and our own echoed-back request.
                self.note_peer(&sid);
                self.lobby.apply_role(&sid, role);
            }
            ServerEvent::Started { sid } => {
                self.note_peer(&sid);
                if !self.sync.advance(GamePhase::Active) {
                    debug!(phase = ?self.sync.phase(), "redundant start signal");
                }
            }
            ServerEvent::StateSync { sid, state } => {
                self.note_peer(&sid);
                if self.is_local(&sid) {
                    return;
                }
                if let Some(GamePhase::Ended { reason }) = self.sync.apply_remote(&state) {
                    self.on_remote_ended(reason);
                }
            }
            ServerEvent::StateRequested { sid } => {
                self.note_peer(&sid);
                if self.is_leader() && !self.is_local(&sid) {
                    self.broadcast_snapshot().await;
                }
            }
            ServerEvent::Progress { sid, value } => {
                self.note_peer(&sid);
                if !self.is_local(&sid) {
                    // Owner-authoritative: plain overwrite, no merging.
                    self.progress.insert(sid, value);
                }
            }
            ServerEvent::Game { sid, seq, event } => {
                self.note_peer(&sid);
                if self.is_local(&sid) {
                    return;
                }
                if !self.seqs.accept(&sid, seq) {
                    debug!(%sid, seq, "stale or replayed event dropped");
                    return;
                }
                if self.sync.phase() != GamePhase::Active {
                    debug!(phase = ?self.sync.phase(), "game event outside active phase ignored");
                    return;
                }
                let Some(local) = self.local_sid() else {
                    return;
                };
                self.game
                    .apply_remote(&mut self.state, &local, &sid, &event);
                self.check_outcome().await;
            }
            ServerEvent::RoundResult { verdict } => {
                let Some(local) = self.local_sid() else {
                    return;
                };
                self.game.apply_verdict(&mut self.state, &local, &verdict);
                self.check_outcome().await;
            }
            ServerEvent::Signal { sid, signal } => {
                self.note_peer(&sid);
                if !self.is_local(&sid)
                    && self.signal_tx.try_send((sid, signal)).is_err()
                {
                    warn!("signal receiver full or gone, dropping signal");
                }
            }
            ServerEvent::Ping { sid } => self.note_peer(&sid),
        }
    }

    async fn on_sync_tick(&mut self, elapsed: f64) {
        if !self.is_leader() {
            return;
        }
        if self.sync.tick_timer(elapsed) {
            self.on_time_up();
        }
        // Only the leader ever emits the coarse snapshot, and only once
        // there is someone to hear it.
        if self.lobby.roster().len() > 1 {
            self.broadcast_snapshot().await;
        }
    }

    async fn on_heartbeat_tick(&mut self) {
        self.channel.emit(ClientEvent::Ping).await;
        for sid in self.liveness.silent_peers(self.cfg.liveness_timeout) {
            warn!(%sid, "peer silent past liveness timeout, treating as departed");
            let was_present = self.lobby.apply_peer_left(&sid);
            self.drop_peer_state(&sid);
            if was_present {
                self.on_peer_departed();
            }
        }
    }

    async fn broadcast_snapshot(&mut self) {
        let state = self.sync.snapshot().clone();
        self.channel.emit(ClientEvent::StateSync { state }).await;
    }

    fn note_peer(&mut self, sid: &ParticipantId) {
        if !self.is_local(sid) {
            self.liveness.track(sid);
        }
    }

    fn drop_peer_state(&mut self, sid: &ParticipantId) {
        self.liveness.forget(sid);
        self.seqs.forget(sid);
        self.progress.remove(sid);
    }

    fn refresh_readiness(&mut self) {
        if self.lobby.is_ready() {
            if self.sync.phase() == GamePhase::Lobby {
                self.sync.advance(GamePhase::Ready);
            }
        } else if self.sync.phase() == GamePhase::Ready {
            self.sync.advance(GamePhase::Lobby);
        }
    }

    /// Departure policy: mid-game it is a win by forfeit for whoever
    /// remains; before the start it just drops readiness.
    fn on_peer_departed(&mut self) {
        if self.sync.phase() == GamePhase::Active {
            self.sync.advance(GamePhase::Ended {
                reason: EndReason::Forfeit,
            });
            if self.outcome.is_none() {
                self.outcome = Some(Outcome::Won { by_forfeit: true });
            }
        } else {
            self.refresh_readiness();
        }
    }

    fn on_remote_ended(&mut self, reason: EndReason) {
        if self.outcome.is_some() {
            return;
        }
        match reason {
            EndReason::Timeout => self.outcome = self.game.on_time_up(&self.state),
            // Finished and forfeit outcomes are derived from game events
            // and departure detection on our own side.
            EndReason::Finished | EndReason::Forfeit => {}
        }
    }

    fn on_time_up(&mut self) {
        if self.sync.advance(GamePhase::Ended {
            reason: EndReason::Timeout,
        }) && self.outcome.is_none()
        {
            self.outcome = self.game.on_time_up(&self.state);
        }
    }

    async fn check_outcome(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        let Some(outcome) = self.game.outcome(&self.state) else {
            return;
        };
        self.outcome = Some(outcome);
        self.sync.advance(GamePhase::Ended {
            reason: EndReason::Finished,
        });
        if self.is_leader() {
            // Converge followers without waiting for the next cadence.
            self.broadcast_snapshot().await;
        }
    }

    fn on_transport_down(&mut self) {
        warn!(room = %self.channel.room(), "relay connection lost");
        // We cannot tell who vanished from here; surface a terminal state
        // instead of leaving the UI stuck. No win is claimed.
        if self.sync.phase() == GamePhase::Active {
            self.sync.advance(GamePhase::Ended {
                reason: EndReason::Forfeit,
            });
        }
    }

    fn publish(&self) {
        let snapshot = self.sync.snapshot();
        self.view_tx.send_replace(SessionView {
            connected: self.channel.is_connected(),
            local_sid: self.local_sid(),
            players: self.lobby.roster().players().to_vec(),
            is_ready: self.lobby.is_ready(),
            is_leader: self.is_leader(),
            phase: snapshot.phase,
            time_left: snapshot.time_left,
            progress: self.progress.clone(),
            outcome: self.outcome,
            game: self.state.clone(),
        });
    }
}
