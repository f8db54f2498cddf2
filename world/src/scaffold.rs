//! Scenario scaffolding helpers for tests and demo adapters.
//!
//! Compiled only with the `scenario_scaffolding` feature. The helpers drop
//! entities into mid-match positions without replaying the rounds that would
//! produce them; they never bypass the world's structural invariants.

use fungorium_core::{InsectId, MushroomId, RegionId, SporeId, SporeKind, ThreadId};

use crate::board::{self, Spore};
use crate::World;

/// Places a spore of `kind` belonging to `thread` directly on a region.
///
/// Returns the identifier of the new spore, or `None` when the region or the
/// thread does not exist.
pub fn sow_spore(
    world: &mut World,
    region: RegionId,
    kind: SporeKind,
    thread: ThreadId,
) -> Option<SporeId> {
    if !world.threads.iter().any(|candidate| candidate.id == thread) {
        return None;
    }
    if board::find(&world.regions, region).is_none() {
        return None;
    }
    let id = world.allocate_spore_id();
    let target = board::find_mut(&mut world.regions, region)?;
    target.spores.push(Spore { id, kind, thread });
    Some(id)
}

/// Queues a spore of `kind` inside a mushroom, as if a round had generated it.
///
/// Returns the identifier of the new spore, or `None` when the mushroom does
/// not exist.
pub fn stock_mushroom(
    world: &mut World,
    mushroom: MushroomId,
    kind: SporeKind,
) -> Option<SporeId> {
    let index = world
        .mushrooms
        .iter()
        .position(|candidate| candidate.id == mushroom)?;
    let id = world.allocate_spore_id();
    let thread = world.mushrooms[index].thread;
    world.mushrooms[index].queue.push_back(Spore { id, kind, thread });
    Some(id)
}

/// Marks an insect as having spent both its move and its cut this round.
///
/// Returns `false` when the insect does not exist.
pub fn mark_insect_spent(world: &mut World, insect: InsectId) -> bool {
    match world
        .insects
        .iter_mut()
        .find(|candidate| candidate.id == insect)
    {
        Some(insect) => {
            insect.moved = true;
            insect.cut = true;
            true
        }
        None => false,
    }
}
