use crate::directory::PeerDirectory;
use crate::pipeline::{AvatarPipeline, VisualHandle};
use crate::protocol::{
    AnnouncePhase, AnnounceState, LocalIdentity, ReconcileOutcome, WalkingTracker, live_state,
    reconcile,
};
use crate::session::{SessionCommand, SessionConfig, SessionHandle, SessionSnapshot};
use crate::transport::{Transport, TransportEvent};
use plaza_core::{AvatarCode, AvatarVariant, CodecError, LiveState, PeerId, Receivers, SyncMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, sleep_until};
use tracing::{debug, error, info, warn};

/// Membership in one room. Dropping it cancels a pending announce cycle.
struct RoomState {
    name: String,
    local: PeerId,
    directory: PeerDirectory,
    announce: AnnounceState,
}

/// The per-peer protocol actor.
///
/// One task owns the directory and applies each transport event completely
/// before reading the next, so no locking is involved. Nothing in here
/// fails outward: problems are logged and the offending input dropped.
pub struct Session {
    transport: Arc<dyn Transport>,
    pipeline: Arc<dyn AvatarPipeline>,
    config: SessionConfig,
    /// Resolved once; a generated identity keeps its code across rejoins.
    identity: LocalIdentity,
    room: Option<RoomState>,
    walking: WalkingTracker,
    command_rx: mpsc::Receiver<SessionCommand>,
    transport_rx: mpsc::UnboundedReceiver<TransportEvent>,
}

impl Session {
    pub fn new(
        transport: Arc<dyn Transport>,
        pipeline: Arc<dyn AvatarPipeline>,
        transport_rx: mpsc::UnboundedReceiver<TransportEvent>,
        config: SessionConfig,
    ) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::channel(config.command_capacity.max(1));
        let identity = config.identity.clone().resolve();

        let session = Self {
            transport,
            pipeline,
            config,
            identity,
            room: None,
            walking: WalkingTracker::new(),
            command_rx,
            transport_rx,
        };
        (session, SessionHandle::new(command_tx))
    }

    pub fn spawn(
        transport: Arc<dyn Transport>,
        pipeline: Arc<dyn AvatarPipeline>,
        transport_rx: mpsc::UnboundedReceiver<TransportEvent>,
        config: SessionConfig,
    ) -> (SessionHandle, JoinHandle<()>) {
        let (session, handle) = Self::new(transport, pipeline, transport_rx, config);
        (handle, tokio::spawn(session.run()))
    }

    pub fn identity(&self) -> &LocalIdentity {
        &self.identity
    }

    /// Connects, then serves until every [`SessionHandle`] is gone.
    pub async fn run(mut self) {
        info!("Session started for room {}", self.config.room_name);

        if let Err(e) = self.transport.connect().await {
            error!("Failed to connect: {}", e);
        }

        let mut refresh = self.config.live_state_refresh.map(|period| {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker
        });

        loop {
            let settle_deadline = self
                .room
                .as_ref()
                .and_then(|room| room.announce.settle_deadline());

            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!("All session handles dropped. Shutting down session.");
                            break;
                        }
                    }
                }

                evt = self.transport_rx.recv() => {
                    match evt {
                        Some(e) => self.handle_transport_event(e).await,
                        None => {
                            warn!("Transport channel closed unexpectedly");
                            break;
                        }
                    }
                }

                _ = wait_until(settle_deadline) => self.finish_announce(),

                _ = tick(&mut refresh) => self.refresh_live_state().await,
            }
        }

        if self.room.is_some() {
            self.teardown("session ended");
            if let Err(e) = self.transport.leave_room().await {
                debug!("Leave on shutdown failed: {}", e);
            }
        }
        info!("Session event loop finished");
    }

    async fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::SetWalking(is_walking) => self.set_walking(is_walking).await,
            SessionCommand::Leave => self.leave().await,
            SessionCommand::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    async fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Connected => {
                info!("Connected. Joining room {}", self.config.room_name);
                if let Err(e) = self
                    .transport
                    .join_room(&self.config.room_name, &self.config.room_options)
                    .await
                {
                    error!("Failed to join room {}: {}", self.config.room_name, e);
                }
            }

            TransportEvent::JoinedRoom { local, members } => self.enter_room(local, members).await,

            TransportEvent::PeerJoined(peer_id) => {
                let Some(room) = self.room.as_mut() else {
                    debug!("Ignoring join of {:?} outside a room", peer_id);
                    return;
                };
                room.directory.register(peer_id, false);
                info!("Peer {:?} joined room {}", peer_id, room.name);
            }

            TransportEvent::PeerLeft(peer_id) => {
                let Some(room) = self.room.as_mut() else {
                    return;
                };
                match room.directory.unregister(&peer_id) {
                    Some(handle) => {
                        if let Some(visual) = handle.visual() {
                            self.pipeline.release(visual);
                        }
                        info!("Peer {:?} left room {}", peer_id, room.name);
                    }
                    None => debug!("Unknown peer {:?} left", peer_id),
                }
            }

            TransportEvent::Message {
                sender,
                tag,
                payload,
            } => match SyncMessage::decode(tag, &payload) {
                Ok(message) => self.handle_message(sender, message).await,
                Err(CodecError::UnknownTag(tag)) => {
                    debug!("Ignoring foreign event {} from {:?}", tag, sender)
                }
                Err(e) => warn!("Dropping event {} from {:?}: {}", tag, sender, e),
            },

            TransportEvent::LeftRoom => self.teardown("left room"),

            TransportEvent::Disconnected { reason } => {
                warn!("Transport disconnected: {}", reason);
                self.teardown("disconnected");
            }
        }
    }

    /// Spawning, then Announcing.
    async fn enter_room(&mut self, local: PeerId, members: Vec<PeerId>) {
        if self.room.is_some() {
            self.teardown("rejoining");
        }

        let mut directory = PeerDirectory::new();
        for member in &members {
            directory.register(*member, false);
        }
        directory.register(local, true);

        match directory.bind(
            &local,
            self.identity.variant,
            self.identity.avatar_code.clone(),
        ) {
            Ok(handle) => {
                let visual =
                    spawn_visual(self.pipeline.as_ref(), handle.variant(), handle.avatar_code());
                handle.replace_visual(visual);
            }
            Err(e) => error!("Failed to bind local avatar: {}", e),
        }
        info!(
            "Joined room {} as {:?} with {} peer(s) present",
            self.config.room_name,
            local,
            members.len()
        );
        self.walking.reset();

        let mut announce = AnnounceState::new();
        let join = self.identity.announcement(local);
        send_message(self.transport.as_ref(), join.into(), Receivers::Others).await;
        announce.begin(Instant::now(), self.config.announce_settle);

        self.room = Some(RoomState {
            name: self.config.room_name.clone(),
            local,
            directory,
            announce,
        });
    }

    fn finish_announce(&mut self) {
        let Some(room) = self.room.as_mut() else {
            return;
        };
        if room.announce.settle() {
            info!("Announced in room {} as {:?}", room.name, room.local);
        }
    }

    async fn handle_message(&mut self, sender: PeerId, message: SyncMessage) {
        let Some(room) = self.room.as_mut() else {
            debug!("Dropping {:?} from {:?}: not in a room", message.message_type(), sender);
            return;
        };
        let infer_origin = self.config.infer_origin_from_sender;

        match message {
            SyncMessage::JoinAnnounce(mut join) => {
                if infer_origin && join.origin.is_none() {
                    join.origin = Some(sender);
                }
                if join.origin == Some(room.local) {
                    debug!("Ignoring echo of own join announcement");
                    return;
                }

                let outcome = reconcile::apply(&join, &mut room.directory);
                let stale = matches!(outcome, ReconcileOutcome::StaleOrigin(_));
                realize(self.pipeline.as_ref(), &mut room.directory, outcome, "join announcement");
                if stale {
                    return;
                }

                let (reply, receivers) = self.identity.catch_up_for(room.local, &join);
                send_message(self.transport.as_ref(), reply.into(), receivers).await;
            }

            SyncMessage::CatchupAnnounce(mut catchup) => {
                if !catchup.is_for(&room.local) {
                    debug!("Catch-up from {:?} is for {:?}; ignoring", sender, catchup.target);
                    return;
                }
                if infer_origin && catchup.announcement.origin.is_none() {
                    catchup.announcement.origin = Some(sender);
                }

                let outcome = reconcile::apply(&catchup.announcement, &mut room.directory);
                realize(self.pipeline.as_ref(), &mut room.directory, outcome, "catch-up");
            }

            SyncMessage::LiveState(state) => match live_state::apply(&state, &mut room.directory) {
                Some(applied) => {
                    if let Some(visual) = applied.visual {
                        self.pipeline.set_walking(visual, applied.is_walking);
                    }
                }
                None => debug!(
                    "No active avatar {}; dropping live state from {:?}",
                    state.avatar_code, sender
                ),
            },
        }
    }

    async fn set_walking(&mut self, is_walking: bool) {
        let Some(room) = self.room.as_mut() else {
            debug!("Not in a room; walking flag ignored");
            return;
        };
        let Some(edge) = self.walking.observe(is_walking) else {
            return;
        };

        let local_id = room.local;
        let Some(local) = room.directory.get_mut(&local_id) else {
            return;
        };
        local.set_walking(edge);
        if let Some(visual) = local.visual() {
            self.pipeline.set_walking(visual, edge);
        }

        let Some(avatar_code) = local.avatar_code().cloned() else {
            debug!("Custom avatar has no code; walking flag not published");
            return;
        };
        let state = LiveState {
            avatar_code,
            is_walking: edge,
        };
        send_message(self.transport.as_ref(), state.into(), Receivers::Others).await;
    }

    async fn refresh_live_state(&mut self) {
        let Some(room) = self.room.as_ref() else {
            return;
        };
        let Some(avatar_code) = room.directory.local().and_then(|h| h.avatar_code()).cloned()
        else {
            return;
        };
        let state = LiveState {
            avatar_code,
            is_walking: self.walking.current(),
        };
        send_message(self.transport.as_ref(), state.into(), Receivers::Others).await;
    }

    async fn leave(&mut self) {
        if self.room.is_none() {
            debug!("Leave requested outside a room");
            return;
        }

        // Tear down first so nothing pending can reach the transport afterwards.
        self.teardown("leave requested");
        if let Err(e) = self.transport.leave_room().await {
            warn!("Failed to leave room: {}", e);
        }
    }

    fn teardown(&mut self, reason: &str) {
        self.walking.reset();
        let Some(mut room) = self.room.take() else {
            return;
        };

        if room.announce.phase() == AnnouncePhase::Announcing {
            debug!("Cancelling pending announce cycle");
        }
        for handle in room.directory.clear() {
            if let Some(visual) = handle.visual() {
                self.pipeline.release(visual);
            }
        }
        info!("Left room {} ({})", room.name, reason);
    }

    fn snapshot(&self) -> SessionSnapshot {
        match &self.room {
            Some(room) => SessionSnapshot {
                room: Some(room.name.clone()),
                phase: Some(room.announce.phase()),
                directory: room.directory.snapshot(),
            },
            None => SessionSnapshot {
                room: None,
                phase: None,
                directory: Default::default(),
            },
        }
    }
}

fn spawn_visual(
    pipeline: &dyn AvatarPipeline,
    variant: AvatarVariant,
    code: Option<&AvatarCode>,
) -> VisualHandle {
    match (variant, code) {
        (AvatarVariant::Generated, Some(code)) => pipeline.spawn_generated(code),
        _ => pipeline.spawn_custom(),
    }
}

/// Side effects and logging for a reconciliation result.
fn realize(
    pipeline: &dyn AvatarPipeline,
    directory: &mut PeerDirectory,
    outcome: ReconcileOutcome,
    kind: &str,
) {
    match outcome {
        ReconcileOutcome::Bound {
            peer_id,
            variant,
            avatar_code,
        } => {
            let visual = spawn_visual(pipeline, variant, avatar_code.as_ref());
            if let Some(handle) = directory.get_mut(&peer_id) {
                if let Some(placeholder) = handle.replace_visual(visual) {
                    pipeline.release(placeholder);
                }
            }
            info!(
                "Bound {:?} to {} avatar {:?} from {}",
                peer_id, variant, avatar_code, kind
            );
        }
        ReconcileOutcome::AlreadyReconciled(peer_id) => {
            debug!("Duplicate {} for {:?}", kind, peer_id)
        }
        ReconcileOutcome::StaleOrigin(peer_id) => {
            debug!("Dropping {} from departed peer {:?}", kind, peer_id)
        }
        ReconcileOutcome::NoPendingSlot => warn!("No pending peer for {}; dropping", kind),
        ReconcileOutcome::CodeInUse { code, holder } => {
            warn!("Avatar {} already shown by {:?}; dropping {}", code, holder, kind)
        }
        ReconcileOutcome::MissingCode => warn!("Generated avatar without code in {}", kind),
        ReconcileOutcome::Unaddressable => {
            warn!("Cannot tell which peer sent this {}; dropping", kind)
        }
    }
}

async fn send_message(transport: &dyn Transport, message: SyncMessage, receivers: Receivers) {
    let channel = message.channel();
    let (tag, payload) = match message.encode() {
        Ok(encoded) => encoded,
        Err(e) => {
            error!("Failed to encode {:?}: {}", message.message_type(), e);
            return;
        }
    };

    if let Err(e) = transport.send(tag.tag(), payload, receivers, channel).await {
        error!("Failed to send {:?} to {:?}: {}", tag, receivers, e);
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
