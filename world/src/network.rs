//! Fungal thread network, severance scheduling, and pruning.

use std::collections::VecDeque;

use fungorium_core::{
    Event, MushroomId, MushroomStage, PlayerId, RegionId, ThreadId, ThreadKind,
};

use crate::board::{self, Region, Spore};

/// Thread section scheduled to wither at a future round boundary.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Severance {
    pub(crate) region: RegionId,
    pub(crate) rounds_left: u8,
}

/// Connected web of thread sections owned by one fungus player.
#[derive(Clone, Debug)]
pub(crate) struct FungalThread {
    pub(crate) id: ThreadId,
    pub(crate) kind: ThreadKind,
    pub(crate) owner: PlayerId,
    pub(crate) regions: Vec<RegionId>,
    pub(crate) doomed: Vec<Severance>,
}

impl FungalThread {
    pub(crate) fn new(id: ThreadId, kind: ThreadKind, owner: PlayerId, region: RegionId) -> Self {
        Self {
            id,
            kind,
            owner,
            regions: vec![region],
            doomed: Vec::new(),
        }
    }

    pub(crate) fn occupies(&self, region: RegionId) -> bool {
        self.regions.contains(&region)
    }

    pub(crate) fn schedule_severance(&mut self, region: RegionId) -> u8 {
        let rounds_left = self.kind.decay_rounds();
        self.doomed.push(Severance {
            region,
            rounds_left,
        });
        rounds_left
    }

    pub(crate) fn retreat_from(&mut self, region: RegionId) {
        self.regions.retain(|id| *id != region);
    }
}

/// Mushroom anchored on a region, generating and shooting spores.
#[derive(Clone, Debug)]
pub(crate) struct Mushroom {
    pub(crate) id: MushroomId,
    pub(crate) thread: ThreadId,
    pub(crate) region: RegionId,
    pub(crate) stage: MushroomStage,
    pub(crate) age: u32,
    pub(crate) shots: u8,
    pub(crate) queue: VecDeque<Spore>,
}

impl Mushroom {
    pub(crate) fn new(id: MushroomId, thread: ThreadId, region: RegionId) -> Self {
        Self {
            id,
            thread,
            region,
            stage: MushroomStage::Unevolved,
            age: 0,
            shots: 0,
            queue: VecDeque::new(),
        }
    }
}

/// Drops every section of `thread` that lost contact with its anchors.
///
/// Anchors are occupied regions hosting a mushroom of the same thread, plus
/// occupied keep-thread regions. Connectivity is a flood fill over adjacent
/// regions that carry the thread; sections outside the reached set are
/// removed from both sides of the region-thread relation.
pub(crate) fn prune(
    thread: &mut FungalThread,
    regions: &mut [Region],
    mushrooms: &[Mushroom],
    out_events: &mut Vec<Event>,
) {
    let mut reached: Vec<RegionId> = Vec::new();
    let mut frontier: Vec<RegionId> = thread
        .regions
        .iter()
        .copied()
        .filter(|id| anchors(thread, regions, mushrooms, *id))
        .collect();

    while let Some(current) = frontier.pop() {
        if reached.contains(&current) {
            continue;
        }
        reached.push(current);

        let Some(region) = board::find(regions, current) else {
            continue;
        };
        for neighbor in region.neighbors.iter().flatten() {
            let occupied = board::find(regions, *neighbor)
                .is_some_and(|candidate| candidate.carries(thread.id));
            if occupied && !reached.contains(neighbor) {
                frontier.push(*neighbor);
            }
        }
    }

    let severed: Vec<RegionId> = thread
        .regions
        .iter()
        .copied()
        .filter(|id| !reached.contains(id))
        .collect();
    for region_id in severed {
        if let Some(region) = board::find_mut(regions, region_id) {
            region.shed_thread(thread.id);
        }
        thread.retreat_from(region_id);
        out_events.push(Event::ThreadRetreated {
            thread: thread.id,
            region: region_id,
        });
    }
}

fn anchors(
    thread: &FungalThread,
    regions: &[Region],
    mushrooms: &[Mushroom],
    region_id: RegionId,
) -> bool {
    let Some(region) = board::find(regions, region_id) else {
        return false;
    };
    if region.kind.keeps_threads() {
        return true;
    }
    region.mushroom.is_some_and(|id| {
        mushrooms
            .iter()
            .any(|mushroom| mushroom.id == id && mushroom.thread == thread.id)
    })
}
