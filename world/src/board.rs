//! Region storage for the planar board.

use fungorium_core::{InsectId, MushroomId, RegionId, RegionKind, SporeId, SporeKind, ThreadId};

/// Spore resting on a region or queued inside a mushroom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Spore {
    pub(crate) id: SporeId,
    pub(crate) kind: SporeKind,
    pub(crate) thread: ThreadId,
}

/// Single region of the board graph.
///
/// Neighbor slots preserve the clockwise side order of the topology input;
/// `None` marks a side facing the board edge. References to the insect and
/// mushroom standing on the region are kept bidirectional by the world's
/// mutators.
#[derive(Clone, Debug)]
pub(crate) struct Region {
    pub(crate) id: RegionId,
    pub(crate) kind: RegionKind,
    pub(crate) neighbors: Vec<Option<RegionId>>,
    pub(crate) threads: Vec<ThreadId>,
    pub(crate) spores: Vec<Spore>,
    pub(crate) insect: Option<InsectId>,
    pub(crate) mushroom: Option<MushroomId>,
}

impl Region {
    pub(crate) fn new(id: RegionId, kind: RegionKind, neighbors: Vec<Option<RegionId>>) -> Self {
        Self {
            id,
            kind,
            neighbors,
            threads: Vec::new(),
            spores: Vec::new(),
            insect: None,
            mushroom: None,
        }
    }

    pub(crate) fn is_neighbor(&self, other: RegionId) -> bool {
        self.neighbors.iter().flatten().any(|id| *id == other)
    }

    pub(crate) fn carries(&self, thread: ThreadId) -> bool {
        self.threads.contains(&thread)
    }

    /// Reports whether the region's capacity policy admits one more thread.
    pub(crate) fn has_thread_capacity(&self) -> bool {
        !self.kind.single_threaded() || self.threads.is_empty()
    }

    pub(crate) fn shed_thread(&mut self, thread: ThreadId) {
        self.threads.retain(|id| *id != thread);
    }

    /// Rewrites the first neighbor slot referencing `old` to reference `new`.
    pub(crate) fn replace_neighbor(&mut self, old: RegionId, new: RegionId) {
        for slot in self.neighbors.iter_mut() {
            if *slot == Some(old) {
                *slot = Some(new);
                break;
            }
        }
    }

    pub(crate) fn same_thread_spores(&self, thread: ThreadId) -> usize {
        self.spores
            .iter()
            .filter(|spore| spore.thread == thread)
            .count()
    }
}

pub(crate) fn find(regions: &[Region], id: RegionId) -> Option<&Region> {
    regions.iter().find(|region| region.id == id)
}

pub(crate) fn find_mut(regions: &mut [Region], id: RegionId) -> Option<&mut Region> {
    regions.iter_mut().find(|region| region.id == id)
}
