//! In-process transport: every session in the process shares one hub.
//!
//! Delivery is reliable and ordered per sender. `Receivers::Peer` is real
//! unicast here.

use crate::transport::{RoomOptions, Transport, TransportError, TransportEvent};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use plaza_core::{Channel, PeerId, Receivers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info};

struct Member {
    peer_id: PeerId,
    events: mpsc::UnboundedSender<TransportEvent>,
}

struct RoomSlot {
    options: RoomOptions,
    members: Vec<Member>,
}

impl RoomSlot {
    fn notify(&self, except: Option<PeerId>, event: &TransportEvent) {
        for member in &self.members {
            if Some(member.peer_id) == except {
                continue;
            }
            if member.events.send(event.clone()).is_err() {
                debug!("Member {:?} stopped listening", member.peer_id);
            }
        }
    }
}

/// Room registry shared by all [`LoopbackTransport`]s it hands out.
#[derive(Clone, Default)]
pub struct LoopbackHub {
    rooms: Arc<DashMap<String, RoomSlot>>,
}

impl LoopbackHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh, unconnected transport plus the event stream for its session.
    pub fn transport(&self) -> (Arc<LoopbackTransport>, mpsc::UnboundedReceiver<TransportEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let transport = LoopbackTransport {
            hub: self.clone(),
            events,
            link: Mutex::new(Link::default()),
        };
        (Arc::new(transport), events_rx)
    }

    /// Members of `room`, oldest first.
    pub fn members(&self, room: &str) -> Vec<PeerId> {
        self.rooms
            .get(room)
            .map(|slot| slot.members.iter().map(|m| m.peer_id).collect())
            .unwrap_or_default()
    }

    /// Rooms a lobby would list.
    pub fn visible_rooms(&self) -> Vec<String> {
        self.rooms
            .iter()
            .filter(|entry| entry.value().options.is_visible)
            .map(|entry| entry.key().clone())
            .collect()
    }

    fn join(
        &self,
        room: &str,
        options: &RoomOptions,
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> Result<PeerId, TransportError> {
        let mut slot = self
            .rooms
            .entry(room.to_owned())
            .or_insert_with(|| RoomSlot {
                options: options.clone(),
                members: Vec::new(),
            });

        if !slot.members.is_empty() && !slot.options.is_open {
            return Err(TransportError::Rejected(format!("room {room} is closed")));
        }
        let max = usize::from(slot.options.max_players);
        if max > 0 && slot.members.len() >= max {
            return Err(TransportError::Rejected(format!("room {room} is full")));
        }

        let peer_id = PeerId::new();
        let existing: Vec<PeerId> = slot.members.iter().map(|m| m.peer_id).collect();

        slot.notify(None, &TransportEvent::PeerJoined(peer_id));
        slot.members.push(Member {
            peer_id,
            events: events.clone(),
        });

        let _ = events.send(TransportEvent::JoinedRoom {
            local: peer_id,
            members: existing,
        });
        Ok(peer_id)
    }

    fn remove(&self, room: &str, peer_id: PeerId) {
        let now_empty = match self.rooms.get_mut(room) {
            Some(mut slot) => {
                slot.members.retain(|m| m.peer_id != peer_id);
                slot.notify(None, &TransportEvent::PeerLeft(peer_id));
                slot.members.is_empty()
            }
            None => false,
        };

        if now_empty {
            self.rooms.remove_if(room, |_, slot| slot.members.is_empty());
            debug!("Room {} is empty and was dropped", room);
        }
    }

    fn deliver(&self, room: &str, sender: PeerId, tag: u8, payload: Bytes, receivers: Receivers) {
        let Some(slot) = self.rooms.get(room) else {
            return;
        };
        let event = TransportEvent::Message {
            sender,
            tag,
            payload,
        };

        match receivers {
            Receivers::Others => slot.notify(Some(sender), &event),
            Receivers::All => slot.notify(None, &event),
            Receivers::Peer(target) => {
                let Some(member) = slot.members.iter().find(|m| m.peer_id == target) else {
                    debug!("Unicast target {:?} is not in room {}", target, room);
                    return;
                };
                let _ = member.events.send(event);
            }
        }
    }
}

#[derive(Default)]
struct Link {
    connected: bool,
    membership: Option<(String, PeerId)>,
}

pub struct LoopbackTransport {
    hub: LoopbackHub,
    events: mpsc::UnboundedSender<TransportEvent>,
    link: Mutex<Link>,
}

impl LoopbackTransport {
    /// Id assigned in the current room, if any.
    pub async fn peer_id(&self) -> Option<PeerId> {
        self.link.lock().await.membership.as_ref().map(|(_, id)| *id)
    }

    /// Simulate losing the connection: others see us leave, we see a disconnect.
    pub async fn drop_connection(&self, reason: &str) {
        let mut link = self.link.lock().await;
        link.connected = false;
        if let Some((room, peer_id)) = link.membership.take() {
            self.hub.remove(&room, peer_id);
        }
        let _ = self.events.send(TransportEvent::Disconnected {
            reason: reason.to_owned(),
        });
    }
}

#[async_trait]
impl Transport for LoopbackTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        let mut link = self.link.lock().await;
        link.connected = true;
        self.events
            .send(TransportEvent::Connected)
            .map_err(|_| TransportError::Closed)
    }

    async fn join_room(&self, room: &str, options: &RoomOptions) -> Result<(), TransportError> {
        let mut link = self.link.lock().await;
        if !link.connected {
            return Err(TransportError::NotConnected);
        }
        if let Some((current, _)) = &link.membership {
            return Err(TransportError::Rejected(format!(
                "already in room {current}"
            )));
        }

        let peer_id = self.hub.join(room, options, self.events.clone())?;
        info!("Loopback peer {:?} joined room {}", peer_id, room);
        link.membership = Some((room.to_owned(), peer_id));
        Ok(())
    }

    async fn leave_room(&self) -> Result<(), TransportError> {
        let mut link = self.link.lock().await;
        let (room, peer_id) = link.membership.take().ok_or(TransportError::NotInRoom)?;

        self.hub.remove(&room, peer_id);
        let _ = self.events.send(TransportEvent::LeftRoom);
        Ok(())
    }

    async fn send(
        &self,
        tag: u8,
        payload: Bytes,
        receivers: Receivers,
        _channel: Channel,
    ) -> Result<(), TransportError> {
        let link = self.link.lock().await;
        if !link.connected {
            return Err(TransportError::NotConnected);
        }
        let (room, sender) = link.membership.as_ref().ok_or(TransportError::NotInRoom)?;

        self.hub.deliver(room, *sender, tag, payload, receivers);
        Ok(())
    }
}
