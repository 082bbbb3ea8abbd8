use async_trait::async_trait;
use bytes::Bytes;
use dashmap::{DashMap, DashSet};
use peerlink_client::error::ClientError;
use peerlink_client::transport::{Wire, WireConn, WireEvent};
use peerlink_core::model::{
    DrawEvent, GameEvent, Participant, ParticipantId, Role, RoomId, RoundScore, RoundVerdict,
};
use peerlink_core::protocol::{ClientEnvelope, ClientEvent, ServerEnvelope, ServerEvent};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

/// In-memory stand-in for the relay server: authoritative rosters in join
/// order, fan-out minus sender, role echo-back, and the draw-round AND gate
/// (a round result only once every member submitted).
///
/// Test hooks: [`LocalRelay::kick`] drops a connection as if the socket
/// died, [`LocalRelay::mute`] silences a peer without disconnecting it,
/// [`LocalRelay::replay_last_game_event`] simulates duplicate delivery, and
/// [`LocalRelay::inject`] delivers an arbitrary envelope to one connection.
#[derive(Clone, Default)]
pub struct LocalRelay {
    inner: Arc<RelayInner>,
}

#[derive(Default)]
struct RelayInner {
    conns: DashMap<ParticipantId, mpsc::Sender<WireEvent>>,
    rooms: DashMap<RoomId, RoomState>,
    muted: DashSet<ParticipantId>,
    /// Every sid that ever emitted a coarse-state snapshot.
    sync_senders: Mutex<Vec<ParticipantId>>,
    last_game: DashMap<RoomId, (ParticipantId, u64, GameEvent)>,
}

#[derive(Default)]
struct RoomState {
    members: Vec<Member>,
    round: u32,
    /// Submitters for the current round, in submission order.
    submitted: Vec<ParticipantId>,
}

struct Member {
    sid: ParticipantId,
    name: String,
    role: Role,
    avatar: Option<String>,
}

impl RoomState {
    fn roster(&self) -> Vec<Participant> {
        self.members
            .iter()
            .map(|m| Participant {
                sid: m.sid.clone(),
                name: m.name.clone(),
                role: m.role,
                avatar: m.avatar.clone(),
            })
            .collect()
    }
}

impl LocalRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a connection abruptly, as if the socket died.
    pub async fn kick(&self, sid: &ParticipantId) {
        self.disconnect(sid).await;
    }

    /// Stop forwarding anything this peer sends, without disconnecting it.
    /// From everyone else's point of view the peer just goes silent.
    pub fn mute(&self, sid: &ParticipantId) {
        self.inner.muted.insert(sid.clone());
    }

    /// Re-deliver the last game event seen in this room, simulating a
    /// duplicate delivery from the relay.
    pub async fn replay_last_game_event(&self, room: &RoomId) {
        let Some(last) = self.inner.last_game.get(room).map(|e| e.value().clone()) else {
            return;
        };
        let (sender, seq, event) = last;
        self.broadcast(
            room,
            Some(&sender),
            ServerEvent::Game {
                sid: sender.clone(),
                seq,
                event,
            },
        )
        .await;
    }

    /// Deliver an arbitrary envelope to one connection.
    pub async fn inject(&self, target: &ParticipantId, envelope: ServerEnvelope) {
        let Some(tx) = self.inner.conns.get(target).map(|tx| tx.value().clone()) else {
            return;
        };
        match serde_json::to_vec(&envelope) {
            Ok(frame) => {
                let _ = tx.send(WireEvent::Frame(Bytes::from(frame))).await;
            }
            Err(e) => warn!("[LocalRelay] failed to encode injected envelope: {e}"),
        }
    }

    /// Every sid that ever emitted a coarse-state snapshot.
    pub async fn sync_senders(&self) -> Vec<ParticipantId> {
        self.inner.sync_senders.lock().await.clone()
    }

    async fn pump(self, sid: ParticipantId, mut rx: mpsc::Receiver<Bytes>) {
        while let Some(frame) = rx.recv().await {
            match serde_json::from_slice::<ClientEnvelope>(&frame) {
                Ok(envelope) => self.handle(&sid, envelope).await,
                Err(e) => warn!("[LocalRelay] bad client frame from {sid}: {e}"),
            }
        }
        self.disconnect(&sid).await;
    }

    async fn handle(&self, sid: &ParticipantId, envelope: ClientEnvelope) {
        if self.inner.muted.contains(sid) {
            debug!("[LocalRelay] dropping envelope from muted {sid}");
            return;
        }
        let ClientEnvelope { room, event } = envelope;
        match event {
            ClientEvent::Join { name, role, avatar } => {
                let players = {
                    let mut state = self.inner.rooms.entry(room.clone()).or_default();
                    if !state.members.iter().any(|m| &m.sid == sid) {
                        state.members.push(Member {
                            sid: sid.clone(),
                            name,
                            role: role.unwrap_or_default(),
                            avatar,
                        });
                    }
                    state.roster()
                };
                self.broadcast(&room, None, ServerEvent::Roster { players })
                    .await;
            }
            ClientEvent::Leave => self.remove_from_room(&room, sid).await,
            ClientEvent::RoleChange { role } => {
                let known = match self.inner.rooms.get_mut(&room) {
                    Some(mut state) => match state.members.iter_mut().find(|m| &m.sid == sid) {
                        Some(member) => {
                            member.role = role;
                            true
                        }
                        None => false,
                    },
                    None => false,
                };
                if known {
                    // Echoed to everyone including the requester.
                    self.broadcast(
                        &room,
                        None,
                        ServerEvent::RoleChanged {
                            sid: sid.clone(),
                            role,
                        },
                    )
                    .await;
                }
            }
            ClientEvent::Start => {
                self.broadcast(&room, Some(sid), ServerEvent::Started { sid: sid.clone() })
                    .await;
            }
            ClientEvent::RequestState => {
                self.broadcast(
                    &room,
                    Some(sid),
                    ServerEvent::StateRequested { sid: sid.clone() },
                )
                .await;
            }
            ClientEvent::StateSync { state } => {
                self.inner.sync_senders.lock().await.push(sid.clone());
                self.broadcast(
                    &room,
                    Some(sid),
                    ServerEvent::StateSync {
                        sid: sid.clone(),
                        state,
                    },
                )
                .await;
            }
            ClientEvent::Progress { value } => {
                self.broadcast(
                    &room,
                    Some(sid),
                    ServerEvent::Progress {
                        sid: sid.clone(),
                        value,
                    },
                )
                .await;
            }
            ClientEvent::Game { seq, event } => {
                self.inner
                    .last_game
                    .insert(room.clone(), (sid.clone(), seq, event.clone()));
                let verdict = self.track_round(&room, sid, &event);
                self.broadcast(
                    &room,
                    Some(sid),
                    ServerEvent::Game {
                        sid: sid.clone(),
                        seq,
                        event,
                    },
                )
                .await;
                if let Some(verdict) = verdict {
                    self.broadcast(&room, None, ServerEvent::RoundResult { verdict })
                        .await;
                }
            }
            ClientEvent::Signal { target, signal } => {
                self.send_to(
                    &room,
                    &target,
                    ServerEvent::Signal {
                        sid: sid.clone(),
                        signal,
                    },
                )
                .await;
            }
            ClientEvent::Ping => {
                self.broadcast(&room, Some(sid), ServerEvent::Ping { sid: sid.clone() })
                    .await;
            }
        }
    }

    /// Draw-round bookkeeping: the relay is the only party that joins the
    /// two submissions, so the verdict is produced here.
    fn track_round(
        &self,
        room: &RoomId,
        sid: &ParticipantId,
        event: &GameEvent,
    ) -> Option<RoundVerdict> {
        let mut state = self.inner.rooms.get_mut(room)?;
        match event {
            GameEvent::Draw(DrawEvent::RoundStart { round }) => {
                state.round = *round;
                state.submitted.clear();
                None
            }
            GameEvent::Draw(DrawEvent::Submit { round }) if *round == state.round => {
                if !state.submitted.contains(sid) {
                    state.submitted.push(sid.clone());
                }
                if !state.members.is_empty() && state.submitted.len() == state.members.len() {
                    let winner = state.submitted.first().cloned();
                    Some(RoundVerdict {
                        round: state.round,
                        winner: winner.clone(),
                        scores: state
                            .members
                            .iter()
                            .map(|m| RoundScore {
                                sid: m.sid.clone(),
                                score: u32::from(winner.as_ref() == Some(&m.sid)),
                            })
                            .collect(),
                    })
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    async fn remove_from_room(&self, room: &RoomId, sid: &ParticipantId) {
        let removed = {
            let Some(mut state) = self.inner.rooms.get_mut(room) else {
                return;
            };
            let before = state.members.len();
            state.members.retain(|m| &m.sid != sid);
            state.submitted.retain(|s| s != sid);
            (state.members.len() != before).then(|| state.roster())
        };
        if let Some(players) = removed {
            self.broadcast(room, None, ServerEvent::PeerLeft { sid: sid.clone() })
                .await;
            self.broadcast(room, None, ServerEvent::Roster { players })
                .await;
        }
    }

    async fn disconnect(&self, sid: &ParticipantId) {
        let rooms: Vec<RoomId> = self
            .inner
            .rooms
            .iter()
            .filter(|entry| entry.value().members.iter().any(|m| &m.sid == sid))
            .map(|entry| entry.key().clone())
            .collect();
        for room in rooms {
            self.remove_from_room(&room, sid).await;
        }
        if let Some((_, tx)) = self.inner.conns.remove(sid) {
            let _ = tx.send(WireEvent::Closed).await;
        }
    }

    async fn broadcast(&self, room: &RoomId, skip: Option<&ParticipantId>, event: ServerEvent) {
        let targets: Vec<mpsc::Sender<WireEvent>> = {
            let Some(state) = self.inner.rooms.get(room) else {
                return;
            };
            state
                .members
                .iter()
                .filter(|m| skip != Some(&m.sid))
                .filter_map(|m| self.inner.conns.get(&m.sid).map(|tx| tx.value().clone()))
                .collect()
        };
        for tx in targets {
            self.deliver(&tx, room, &event).await;
        }
    }

    async fn send_to(&self, room: &RoomId, target: &ParticipantId, event: ServerEvent) {
        let in_room = self
            .inner
            .rooms
            .get(room)
            .is_some_and(|state| state.members.iter().any(|m| &m.sid == target));
        if !in_room {
            return;
        }
        let Some(tx) = self.inner.conns.get(target).map(|tx| tx.value().clone()) else {
            return;
        };
        self.deliver(&tx, room, &event).await;
    }

    async fn deliver(&self, tx: &mpsc::Sender<WireEvent>, room: &RoomId, event: &ServerEvent) {
        let envelope = ServerEnvelope {
            room: room.clone(),
            event: event.clone(),
        };
        match serde_json::to_vec(&envelope) {
            Ok(frame) => {
                let _ = tx.send(WireEvent::Frame(Bytes::from(frame))).await;
            }
            Err(e) => warn!("[LocalRelay] failed to encode envelope: {e}"),
        }
    }
}

#[async_trait]
impl Wire for LocalRelay {
    async fn connect(&self) -> Result<WireConn, ClientError> {
        let sid = ParticipantId::random();
        let (out_tx, out_rx) = mpsc::channel::<Bytes>(64);
        let (in_tx, in_rx) = mpsc::channel::<WireEvent>(64);
        self.inner.conns.insert(sid.clone(), in_tx);

        let relay = self.clone();
        let pump_sid = sid.clone();
        tokio::spawn(async move { relay.pump(pump_sid, out_rx).await });

        Ok(WireConn {
            sid,
            tx: out_tx,
            rx: in_rx,
        })
    }
}
