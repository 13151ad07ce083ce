use crate::directory::PeerHandle;
use plaza_core::{AvatarCode, AvatarVariant, PeerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("peer {0} is not registered")]
    UnknownPeer(PeerId),

    #[error("peer {0} already has an active avatar")]
    AlreadyBound(PeerId),

    #[error("avatar code {code} is already bound to peer {holder}")]
    CodeInUse { code: AvatarCode, holder: PeerId },

    #[error("cannot bind to variant {0}")]
    InactiveVariant(AvatarVariant),

    #[error("generated avatars need an avatar code")]
    MissingCode,
}

/// Point-in-time view of a directory, in join order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectorySnapshot {
    pub local: Option<PeerId>,
    pub peers: Vec<PeerHandle>,
}

impl DirectorySnapshot {
    pub fn get(&self, peer_id: &PeerId) -> Option<&PeerHandle> {
        self.peers.iter().find(|p| &p.peer_id() == peer_id)
    }

    pub fn codes(&self) -> Vec<&AvatarCode> {
        self.peers.iter().filter_map(|p| p.avatar_code()).collect()
    }
}

/// Every peer known in the current room, keyed by transport id.
///
/// Owned by a single session; lives exactly as long as the room membership.
#[derive(Debug, Default)]
pub struct PeerDirectory {
    handles: HashMap<PeerId, PeerHandle>,
    /// Join order, oldest first.
    order: Vec<PeerId>,
    bindings: HashMap<AvatarCode, PeerId>,
    local: Option<PeerId>,
}

impl PeerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a room member. Registering a known id returns its existing handle.
    pub fn register(&mut self, peer_id: PeerId, is_local: bool) -> &mut PeerHandle {
        let is_local = if is_local && self.local.is_some_and(|local| local != peer_id) {
            warn!(
                "Peer {:?} registered as local while {:?} already is; treating as remote",
                peer_id, self.local
            );
            false
        } else {
            is_local
        };

        match self.handles.entry(peer_id) {
            Entry::Occupied(entry) => {
                debug!("Peer {:?} already registered", peer_id);
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                self.order.push(peer_id);
                if is_local {
                    self.local = Some(peer_id);
                }
                entry.insert(PeerHandle::new(peer_id, is_local))
            }
        }
    }

    pub fn unregister(&mut self, peer_id: &PeerId) -> Option<PeerHandle> {
        let handle = self.handles.remove(peer_id)?;

        self.order.retain(|id| id != peer_id);
        if let Some(code) = handle.avatar_code() {
            if self.bindings.get(code) == Some(peer_id) {
                self.bindings.remove(code);
            }
        }
        if self.local.as_ref() == Some(peer_id) {
            self.local = None;
        }

        Some(handle)
    }

    /// Active handle bound to `code`, if any.
    pub fn find_by_avatar_code(&self, code: &AvatarCode) -> Option<&PeerHandle> {
        let peer_id = self.bindings.get(code)?;
        self.handles.get(peer_id).filter(|h| h.is_active())
    }

    pub fn find_by_avatar_code_mut(&mut self, code: &AvatarCode) -> Option<&mut PeerHandle> {
        let peer_id = self.bindings.get(code)?;
        self.handles.get_mut(peer_id).filter(|h| h.is_active())
    }

    /// Owned copy of every handle in join order. Safe to hold across mutations.
    pub fn all_handles(&self) -> Vec<PeerHandle> {
        self.iter().cloned().collect()
    }

    /// Borrowing iteration in join order.
    pub fn iter(&self) -> impl Iterator<Item = &PeerHandle> {
        self.order.iter().filter_map(|id| self.handles.get(id))
    }

    pub fn get(&self, peer_id: &PeerId) -> Option<&PeerHandle> {
        self.handles.get(peer_id)
    }

    pub fn get_mut(&mut self, peer_id: &PeerId) -> Option<&mut PeerHandle> {
        self.handles.get_mut(peer_id)
    }

    pub fn local(&self) -> Option<&PeerHandle> {
        self.local.as_ref().and_then(|id| self.handles.get(id))
    }

    pub fn local_id(&self) -> Option<PeerId> {
        self.local
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Give an uninitialized handle its identity.
    ///
    /// A handle is bound at most once, and a code is bound to at most one
    /// handle. Custom avatars carry no code; any code passed with them is dropped.
    pub fn bind(
        &mut self,
        peer_id: &PeerId,
        variant: AvatarVariant,
        code: Option<AvatarCode>,
    ) -> Result<&mut PeerHandle, BindError> {
        let handle = self
            .handles
            .get(peer_id)
            .ok_or(BindError::UnknownPeer(*peer_id))?;
        if handle.is_active() {
            return Err(BindError::AlreadyBound(*peer_id));
        }

        let code = match variant {
            AvatarVariant::Uninitialized => return Err(BindError::InactiveVariant(variant)),
            AvatarVariant::Custom => None,
            AvatarVariant::Generated => Some(code.ok_or(BindError::MissingCode)?),
        };

        if let Some(code) = &code {
            if let Some(holder) = self.bindings.get(code) {
                return Err(BindError::CodeInUse {
                    code: code.clone(),
                    holder: *holder,
                });
            }
            self.bindings.insert(code.clone(), *peer_id);
        }

        let handle = self
            .handles
            .get_mut(peer_id)
            .ok_or(BindError::UnknownPeer(*peer_id))?;
        handle.activate(variant, code);
        Ok(handle)
    }

    /// Remove everything, oldest first. Used when the room is left or lost.
    pub fn clear(&mut self) -> Vec<PeerHandle> {
        let order = std::mem::take(&mut self.order);
        let removed = order
            .iter()
            .filter_map(|id| self.handles.remove(id))
            .collect();

        self.handles.clear();
        self.bindings.clear();
        self.local = None;
        removed
    }

    pub fn snapshot(&self) -> DirectorySnapshot {
        DirectorySnapshot {
            local: self.local,
            peers: self.all_handles(),
        }
    }
}
