//! Player rosters and the insects they field.

use fungorium_core::{InsectId, InsectStatus, PlayerId, RegionId, ThreadId};

/// Fungus-side player owning at most one thread for the whole match.
#[derive(Clone, Debug)]
pub(crate) struct FungusPlayer {
    pub(crate) id: PlayerId,
    pub(crate) name: String,
    pub(crate) score: u32,
    pub(crate) thread: Option<ThreadId>,
    pub(crate) branch_used: bool,
}

impl FungusPlayer {
    pub(crate) fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            score: 0,
            thread: None,
            branch_used: false,
        }
    }
}

/// Insect-side player; insects reference their owner by identifier.
#[derive(Clone, Debug)]
pub(crate) struct InsectPlayer {
    pub(crate) id: PlayerId,
    pub(crate) name: String,
    pub(crate) score: u32,
}

impl InsectPlayer {
    pub(crate) fn new(id: PlayerId, name: String) -> Self {
        Self { id, name, score: 0 }
    }
}

/// Insect standing on a region.
///
/// The `moved` and `cut` flags are the per-round action allowances; round
/// maintenance rewrites them from the insect's status before resetting the
/// status to normal.
#[derive(Clone, Debug)]
pub(crate) struct Insect {
    pub(crate) id: InsectId,
    pub(crate) owner: PlayerId,
    pub(crate) region: RegionId,
    pub(crate) status: InsectStatus,
    pub(crate) moved: bool,
    pub(crate) cut: bool,
}

impl Insect {
    pub(crate) fn new(id: InsectId, owner: PlayerId, region: RegionId) -> Self {
        Self {
            id,
            owner,
            region,
            status: InsectStatus::Normal,
            moved: false,
            cut: false,
        }
    }
}
