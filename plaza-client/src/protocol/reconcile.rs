//! Binding inbound announcements to local peer handles.
//!
//! [`apply`] only touches the directory; spawning the visual for a fresh
//! binding is left to the caller. Applying the same announcement twice
//! leaves the directory as the first application did, which matters
//! because duplicate delivery is the normal case here.

use crate::directory::{BindError, PeerDirectory};
use plaza_core::{Announcement, AvatarCode, AvatarVariant, PeerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// A pending handle received its identity.
    Bound {
        peer_id: PeerId,
        variant: AvatarVariant,
        avatar_code: Option<AvatarCode>,
    },
    /// Target handle already carries an identity.
    AlreadyReconciled(PeerId),
    /// The announcer is not (or no longer) registered.
    StaleOrigin(PeerId),
    /// No uninitialized remote handle to assign the announcement to.
    NoPendingSlot,
    /// The code is held by another active handle.
    CodeInUse { code: AvatarCode, holder: PeerId },
    /// Generated announcement without a code.
    MissingCode,
    /// No origin and no code: nothing to correlate the announcement with.
    Unaddressable,
}

impl ReconcileOutcome {
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound { .. })
    }
}

pub fn apply(announcement: &Announcement, directory: &mut PeerDirectory) -> ReconcileOutcome {
    // Receivers always show the announced avatar; a missing hint means generated.
    let variant = match announcement.variant {
        AvatarVariant::Uninitialized => AvatarVariant::Generated,
        other => other,
    };
    if variant == AvatarVariant::Generated && announcement.avatar_code.is_none() {
        return ReconcileOutcome::MissingCode;
    }

    let target = match announcement.origin {
        Some(origin) => match directory.get(&origin) {
            None => return ReconcileOutcome::StaleOrigin(origin),
            Some(handle) if handle.is_active() => {
                return ReconcileOutcome::AlreadyReconciled(origin);
            }
            Some(_) => origin,
        },
        None => {
            // Positional fallback: next pending slot in join order. Only
            // possible when a code lets us recognise a repeat delivery.
            let Some(code) = announcement
                .avatar_code
                .as_ref()
                .filter(|_| variant == AvatarVariant::Generated)
            else {
                return ReconcileOutcome::Unaddressable;
            };
            if let Some(holder) = directory.find_by_avatar_code(code) {
                return ReconcileOutcome::AlreadyReconciled(holder.peer_id());
            }
            match first_pending_slot(directory) {
                Some(peer_id) => peer_id,
                None => return ReconcileOutcome::NoPendingSlot,
            }
        }
    };

    match directory.bind(&target, variant, announcement.avatar_code.clone()) {
        Ok(handle) => ReconcileOutcome::Bound {
            peer_id: handle.peer_id(),
            variant: handle.variant(),
            avatar_code: handle.avatar_code().cloned(),
        },
        Err(BindError::AlreadyBound(peer_id)) => ReconcileOutcome::AlreadyReconciled(peer_id),
        Err(BindError::UnknownPeer(peer_id)) => ReconcileOutcome::StaleOrigin(peer_id),
        Err(BindError::CodeInUse { code, holder }) => ReconcileOutcome::CodeInUse { code, holder },
        Err(BindError::MissingCode) => ReconcileOutcome::MissingCode,
        Err(BindError::InactiveVariant(_)) => ReconcileOutcome::Unaddressable,
    }
}

fn first_pending_slot(directory: &PeerDirectory) -> Option<PeerId> {
    directory
        .iter()
        .find(|h| !h.is_local() && h.variant() == AvatarVariant::Uninitialized)
        .map(|h| h.peer_id())
}
