#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state management for Fungorium.
//!
//! The world owns every mutable entity of a match: the region graph, the
//! fungal thread networks, mushrooms, insects, and the player rosters.
//! Adapters and systems mutate it exclusively through [`apply`] and observe
//! it through the read-only [`query`] module. Failed commands leave the
//! world untouched and surface as `Event::ActionFailed`.

mod board;
mod network;
mod players;
#[cfg(feature = "scenario_scaffolding")]
pub mod scaffold;

use fungorium_core::{
    ActionError, ActionKind, Command, Event, Faction, InsectId, InsectStatus, Lcg, MushroomId,
    MushroomStage, Phase, PlayerId, RandomSource, RegionId, RegionKind, RegionSpec, SporeId,
    SporeKind, ThreadId, ThreadKind, WELCOME_BANNER,
};

use crate::board::{Region, Spore};
use crate::network::{FungalThread, Mushroom};
use crate::players::{FungusPlayer, Insect, InsectPlayer};

const MAX_PLAYERS_PER_FACTION: usize = 4;
const MUSHROOM_SHOT_CAP: u8 = 10;
const MUSHROOM_EVOLUTION_AGE: u32 = 5;
const GROWTH_SPORE_COST: usize = 3;
const SPORE_KIND_COUNT: u32 = 5;
const MIN_SPLIT_SIDES: usize = 4;
const SPORE_RAIN_PERIOD: u32 = 2;
const ABSORPTION_PERIOD: u32 = 4;

/// Tunable match parameters fixed at world construction.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Round index at which the match ends.
    pub max_rounds: u32,
    /// When disabled, every random draw collapses to its first outcome and
    /// generated spores are always [`SporeKind::Speed`].
    pub randomize: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_rounds: 5,
            randomize: true,
        }
    }
}

/// Represents the authoritative Fungorium world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: Config,
    rng: Box<dyn RandomSource>,
    regions: Vec<Region>,
    threads: Vec<FungalThread>,
    mushrooms: Vec<Mushroom>,
    insects: Vec<Insect>,
    fungus_players: Vec<FungusPlayer>,
    insect_players: Vec<InsectPlayer>,
    phase: Phase,
    turn: usize,
    round: u32,
    next_region: u32,
    next_thread: u32,
    next_mushroom: u32,
    next_insect: u32,
    next_spore: u32,
    next_player: u32,
}

impl World {
    /// Creates a new Fungorium world with default configuration and RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(Box::new(Lcg::default()), Config::default())
    }

    /// Creates a world driven by the provided random source and configuration.
    #[must_use]
    pub fn with_source(rng: Box<dyn RandomSource>, config: Config) -> Self {
        Self {
            banner: WELCOME_BANNER,
            config,
            rng,
            regions: Vec::new(),
            threads: Vec::new(),
            mushrooms: Vec::new(),
            insects: Vec::new(),
            fungus_players: Vec::new(),
            insect_players: Vec::new(),
            phase: Phase::MushroomPlacement,
            turn: 0,
            round: 0,
            next_region: 0,
            next_thread: 0,
            next_mushroom: 0,
            next_insect: 0,
            next_spore: 0,
            next_player: 0,
        }
    }

    fn allocate_region_id(&mut self) -> RegionId {
        let id = RegionId::new(self.next_region);
        self.next_region += 1;
        id
    }

    fn allocate_thread_id(&mut self) -> ThreadId {
        let id = ThreadId::new(self.next_thread);
        self.next_thread += 1;
        id
    }

    fn allocate_mushroom_id(&mut self) -> MushroomId {
        let id = MushroomId::new(self.next_mushroom);
        self.next_mushroom += 1;
        id
    }

    fn allocate_insect_id(&mut self) -> InsectId {
        let id = InsectId::new(self.next_insect);
        self.next_insect += 1;
        id
    }

    fn allocate_spore_id(&mut self) -> SporeId {
        let id = SporeId::new(self.next_spore);
        self.next_spore += 1;
        id
    }

    fn configure_board(
        &mut self,
        specs: Vec<RegionSpec>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let count = u32::try_from(specs.len()).map_err(|_| ActionError::InvalidTarget)?;
        for spec in &specs {
            for neighbor in spec.neighbors.iter().flatten() {
                if *neighbor >= count {
                    return Err(ActionError::InvalidTarget);
                }
            }
        }

        self.regions.clear();
        self.threads.clear();
        self.mushrooms.clear();
        self.insects.clear();
        self.round = 0;
        self.turn = 0;
        self.phase = Phase::MushroomPlacement;
        for player in self.fungus_players.iter_mut() {
            player.score = 0;
            player.thread = None;
            player.branch_used = false;
        }
        for player in self.insect_players.iter_mut() {
            player.score = 0;
        }

        let base = self.next_region;
        for (index, spec) in specs.into_iter().enumerate() {
            let id = RegionId::new(base + index as u32);
            let neighbors = spec
                .neighbors
                .into_iter()
                .map(|slot| slot.map(|offset| RegionId::new(base + offset)))
                .collect();
            self.regions.push(Region::new(id, spec.kind, neighbors));
        }
        self.next_region = base + count;

        out_events.push(Event::BoardConfigured { regions: count });
        Ok(())
    }

    fn register_player(
        &mut self,
        name: String,
        faction: Faction,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        if self.phase != Phase::MushroomPlacement
            || !self.mushrooms.is_empty()
            || !self.insects.is_empty()
        {
            return Err(ActionError::InvalidActor);
        }
        let seated = match faction {
            Faction::Fungus => self.fungus_players.len(),
            Faction::Insects => self.insect_players.len(),
        };
        if seated >= MAX_PLAYERS_PER_FACTION {
            return Err(ActionError::ResourceUnavailable);
        }

        let id = PlayerId::new(self.next_player);
        self.next_player += 1;
        match faction {
            Faction::Fungus => self
                .fungus_players
                .push(FungusPlayer::new(id, name.clone())),
            Faction::Insects => self
                .insect_players
                .push(InsectPlayer::new(id, name.clone())),
        }
        out_events.push(Event::PlayerRegistered {
            player: id,
            name,
            faction,
        });
        Ok(())
    }

    fn place_first_mushroom(
        &mut self,
        kind: ThreadKind,
        region_id: RegionId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        if self.phase != Phase::MushroomPlacement {
            return Err(ActionError::InvalidActor);
        }
        if self.fungus_players.is_empty() || self.insect_players.is_empty() {
            return Err(ActionError::InvalidActor);
        }
        let region_index = self
            .regions
            .iter()
            .position(|region| region.id == region_id)
            .ok_or(ActionError::InvalidTarget)?;
        {
            let region = &self.regions[region_index];
            if !region.kind.can_host_mushroom() {
                return Err(ActionError::InvalidTarget);
            }
            if !region.has_thread_capacity() {
                return Err(ActionError::ResourceUnavailable);
            }
            if region.mushroom.is_some() {
                return Err(ActionError::ResourceUnavailable);
            }
        }

        let owner = self.fungus_players[self.turn].id;
        let thread_id = self.allocate_thread_id();
        let mushroom_id = self.allocate_mushroom_id();
        self.regions[region_index].threads.push(thread_id);
        self.regions[region_index].mushroom = Some(mushroom_id);
        self.threads
            .push(FungalThread::new(thread_id, kind, owner, region_id));
        self.mushrooms
            .push(Mushroom::new(mushroom_id, thread_id, region_id));
        self.fungus_players[self.turn].thread = Some(thread_id);
        self.fungus_players[self.turn].score += 1;

        out_events.push(Event::ThreadSprouted {
            thread: thread_id,
            kind,
            owner,
            region: region_id,
        });
        out_events.push(Event::MushroomPlaced {
            mushroom: mushroom_id,
            thread: thread_id,
            region: region_id,
        });
        self.advance_placement(out_events);
        Ok(())
    }

    fn place_first_insect(
        &mut self,
        region_id: RegionId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        if self.phase != Phase::InsectPlacement {
            return Err(ActionError::InvalidActor);
        }
        let region_index = self
            .regions
            .iter()
            .position(|region| region.id == region_id)
            .ok_or(ActionError::InvalidTarget)?;
        if self.regions[region_index].insect.is_some() {
            return Err(ActionError::ResourceUnavailable);
        }

        let owner = self.insect_players[self.turn].id;
        let insect_id = self.allocate_insect_id();
        self.regions[region_index].insect = Some(insect_id);
        self.insects.push(Insect::new(insect_id, owner, region_id));

        out_events.push(Event::InsectHatched {
            insect: insect_id,
            owner,
            region: region_id,
        });
        self.advance_placement(out_events);
        Ok(())
    }

    fn advance_placement(&mut self, out_events: &mut Vec<Event>) {
        self.turn += 1;
        match self.phase {
            Phase::MushroomPlacement if self.turn >= self.fungus_players.len() => {
                self.phase = Phase::InsectPlacement;
                self.turn = 0;
                out_events.push(Event::PhaseChanged {
                    phase: Phase::InsectPlacement,
                });
            }
            Phase::InsectPlacement if self.turn >= self.insect_players.len() => {
                self.turn = 0;
                self.advance_round(out_events);
            }
            _ => {}
        }
    }

    fn acting_fungus_thread(&self) -> Result<ThreadId, ActionError> {
        if self.phase != Phase::FungusTurn {
            return Err(ActionError::InvalidActor);
        }
        let player = self
            .fungus_players
            .get(self.turn)
            .ok_or(ActionError::InvalidActor)?;
        player.thread.ok_or(ActionError::ResourceUnavailable)
    }

    fn branch_thread(
        &mut self,
        region_id: RegionId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let thread_id = self.acting_fungus_thread()?;
        if self.fungus_players[self.turn].branch_used {
            return Err(ActionError::AlreadyActedThisRound);
        }
        let region_index = self
            .regions
            .iter()
            .position(|region| region.id == region_id)
            .ok_or(ActionError::InvalidTarget)?;
        let has_own_spore = {
            let region = &self.regions[region_index];
            if region.carries(thread_id) {
                return Err(ActionError::InvalidTarget);
            }
            if !region.has_thread_capacity() {
                return Err(ActionError::ResourceUnavailable);
            }
            let connected = region.neighbors.iter().flatten().any(|neighbor| {
                board::find(&self.regions, *neighbor)
                    .is_some_and(|candidate| candidate.carries(thread_id))
            });
            if !connected {
                return Err(ActionError::InvalidTarget);
            }
            region.same_thread_spores(thread_id) > 0
        };

        self.regions[region_index].threads.push(thread_id);
        if let Some(thread) = self.threads.iter_mut().find(|thread| thread.id == thread_id) {
            thread.regions.push(region_id);
        }
        // A branch onto one of the thread's own spores keeps the allowance.
        if !has_own_spore {
            self.fungus_players[self.turn].branch_used = true;
        }
        out_events.push(Event::ThreadExtended {
            thread: thread_id,
            region: region_id,
        });
        Ok(())
    }

    fn grow_mushroom(
        &mut self,
        region_id: RegionId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let thread_id = self.acting_fungus_thread()?;
        let region_index = self
            .regions
            .iter()
            .position(|region| region.id == region_id)
            .ok_or(ActionError::InvalidTarget)?;
        {
            let region = &self.regions[region_index];
            if !region.carries(thread_id) || !region.kind.can_host_mushroom() {
                return Err(ActionError::InvalidTarget);
            }
            if region.mushroom.is_some() {
                return Err(ActionError::ResourceUnavailable);
            }
            if region.same_thread_spores(thread_id) < GROWTH_SPORE_COST {
                return Err(ActionError::ResourceUnavailable);
            }
        }

        let mushroom_id = self.allocate_mushroom_id();
        let mut consumed: Vec<Spore> = Vec::new();
        self.regions[region_index].spores.retain(|spore| {
            if consumed.len() < GROWTH_SPORE_COST && spore.thread == thread_id {
                consumed.push(*spore);
                false
            } else {
                true
            }
        });
        self.regions[region_index].mushroom = Some(mushroom_id);
        self.mushrooms
            .push(Mushroom::new(mushroom_id, thread_id, region_id));
        self.fungus_players[self.turn].score += 1;

        for spore in consumed {
            out_events.push(Event::SporeDestroyed { spore: spore.id });
        }
        out_events.push(Event::MushroomPlaced {
            mushroom: mushroom_id,
            thread: thread_id,
            region: region_id,
        });
        Ok(())
    }

    fn shoot_spore(
        &mut self,
        mushroom_id: MushroomId,
        region_id: RegionId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let thread_id = self.acting_fungus_thread()?;
        let mushroom_index = self
            .mushrooms
            .iter()
            .position(|mushroom| mushroom.id == mushroom_id)
            .ok_or(ActionError::InvalidTarget)?;
        if self.mushrooms[mushroom_index].thread != thread_id {
            return Err(ActionError::InvalidActor);
        }
        let target_index = self
            .regions
            .iter()
            .position(|region| region.id == region_id)
            .ok_or(ActionError::InvalidTarget)?;
        if self.mushrooms[mushroom_index].queue.is_empty() {
            return Err(ActionError::ResourceUnavailable);
        }
        let source_id = self.mushrooms[mushroom_index].region;
        {
            let target = &self.regions[target_index];
            let adjacent = target.is_neighbor(source_id);
            let extended = self.mushrooms[mushroom_index].stage == MushroomStage::Evolved
                && target.neighbors.iter().flatten().any(|neighbor| {
                    board::find(&self.regions, *neighbor)
                        .is_some_and(|candidate| candidate.is_neighbor(source_id))
                });
            if !adjacent && !extended {
                return Err(ActionError::InvalidTarget);
            }
        }

        let Some(spore) = self.mushrooms[mushroom_index].queue.pop_front() else {
            return Err(ActionError::ResourceUnavailable);
        };
        self.regions[target_index].spores.push(spore);
        self.mushrooms[mushroom_index].shots += 1;
        out_events.push(Event::SporeLanded {
            spore: spore.id,
            kind: spore.kind,
            region: region_id,
        });

        if self.mushrooms[mushroom_index].shots >= MUSHROOM_SHOT_CAP {
            self.retire_mushroom(mushroom_index, out_events);
        }
        Ok(())
    }

    /// Removes a mushroom that shot its last spore, then prunes its thread.
    fn retire_mushroom(&mut self, mushroom_index: usize, out_events: &mut Vec<Event>) {
        let mushroom = self.mushrooms.remove(mushroom_index);
        if let Some(region) = board::find_mut(&mut self.regions, mushroom.region) {
            region.mushroom = None;
        }
        out_events.push(Event::MushroomDied {
            mushroom: mushroom.id,
            region: mushroom.region,
        });
        for spore in mushroom.queue {
            out_events.push(Event::SporeDestroyed { spore: spore.id });
        }
        self.prune_thread(mushroom.thread, out_events);
    }

    fn move_insect(
        &mut self,
        insect_id: InsectId,
        target_id: RegionId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        if self.phase != Phase::InsectTurn {
            return Err(ActionError::InvalidActor);
        }
        let actor = self
            .insect_players
            .get(self.turn)
            .ok_or(ActionError::InvalidActor)?
            .id;
        let insect_index = self
            .insects
            .iter()
            .position(|insect| insect.id == insect_id)
            .ok_or(ActionError::InvalidTarget)?;
        if self.insects[insect_index].owner != actor {
            return Err(ActionError::InvalidActor);
        }
        if self.insects[insect_index].moved {
            return Err(ActionError::AlreadyActedThisRound);
        }
        let source_id = self.insects[insect_index].region;
        let target_index = self
            .regions
            .iter()
            .position(|region| region.id == target_id)
            .ok_or(ActionError::InvalidTarget)?;
        let source_index = self
            .regions
            .iter()
            .position(|region| region.id == source_id)
            .ok_or(ActionError::InvalidTarget)?;
        {
            let target = &self.regions[target_index];
            if !target.is_neighbor(source_id) {
                return Err(ActionError::InvalidTarget);
            }
            if target.insect.is_some() {
                return Err(ActionError::ResourceUnavailable);
            }
            let source = &self.regions[source_index];
            if !source.threads.iter().any(|thread| target.carries(*thread)) {
                return Err(ActionError::InvalidTarget);
            }
        }

        self.regions[source_index].insect = None;
        self.regions[target_index].insect = Some(insect_id);
        let consumed = if self.regions[target_index].spores.is_empty() {
            None
        } else {
            Some(self.regions[target_index].spores.remove(0))
        };
        self.insects[insect_index].region = target_id;
        self.insects[insect_index].moved = true;
        out_events.push(Event::InsectMoved {
            insect: insect_id,
            from: source_id,
            to: target_id,
        });

        if let Some(spore) = consumed {
            let status = spore.kind.applied_status();
            self.insects[insect_index].status = status;
            if let Some(player) = self
                .insect_players
                .iter_mut()
                .find(|player| player.id == actor)
            {
                player.score += 1;
            }
            out_events.push(Event::SporeConsumed {
                spore: spore.id,
                kind: spore.kind,
                insect: insect_id,
            });
            out_events.push(Event::InsectStatusChanged {
                insect: insect_id,
                status,
            });
        }
        self.settle_after_move(insect_index, out_events);
        Ok(())
    }

    /// Applies the side effects an insect's status triggers after each move.
    fn settle_after_move(&mut self, insect_index: usize, out_events: &mut Vec<Event>) {
        match self.insects[insect_index].status {
            InsectStatus::Divided => {
                let owner = self.insects[insect_index].owner;
                let here = self.insects[insect_index].region;
                let vacant = board::find(&self.regions, here).and_then(|region| {
                    region.neighbors.iter().flatten().copied().find(|candidate| {
                        board::find(&self.regions, *candidate)
                            .is_some_and(|neighbor| neighbor.insect.is_none())
                    })
                });
                if let Some(region_id) = vacant {
                    let hatchling = self.allocate_insect_id();
                    if let Some(region) = board::find_mut(&mut self.regions, region_id) {
                        region.insect = Some(hatchling);
                    }
                    self.insects.push(Insect::new(hatchling, owner, region_id));
                    out_events.push(Event::InsectHatched {
                        insect: hatchling,
                        owner,
                        region: region_id,
                    });
                }
            }
            InsectStatus::SpeedBoost => {
                let insect = &mut self.insects[insect_index];
                insect.moved = false;
                insect.status = InsectStatus::Normal;
                out_events.push(Event::InsectStatusChanged {
                    insect: insect.id,
                    status: InsectStatus::Normal,
                });
            }
            InsectStatus::NoCut | InsectStatus::Paralyzed => {
                self.insects[insect_index].cut = true;
            }
            InsectStatus::Normal | InsectStatus::Slowed => {}
        }
    }

    fn cut_thread(
        &mut self,
        insect_id: InsectId,
        target_id: RegionId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        if self.phase != Phase::InsectTurn {
            return Err(ActionError::InvalidActor);
        }
        let actor = self
            .insect_players
            .get(self.turn)
            .ok_or(ActionError::InvalidActor)?
            .id;
        let insect_index = self
            .insects
            .iter()
            .position(|insect| insect.id == insect_id)
            .ok_or(ActionError::InvalidTarget)?;
        if self.insects[insect_index].owner != actor {
            return Err(ActionError::InvalidActor);
        }
        if self.insects[insect_index].cut {
            return Err(ActionError::AlreadyActedThisRound);
        }
        let source_id = self.insects[insect_index].region;
        let target = board::find(&self.regions, target_id).ok_or(ActionError::InvalidTarget)?;
        if target.mushroom.is_some() || !target.is_neighbor(source_id) {
            return Err(ActionError::InvalidTarget);
        }
        let source = board::find(&self.regions, source_id).ok_or(ActionError::InvalidTarget)?;
        let shared: Vec<ThreadId> = source
            .threads
            .iter()
            .copied()
            .filter(|thread| target.carries(*thread))
            .collect();
        if shared.is_empty() {
            return Err(ActionError::InvalidTarget);
        }

        for thread_id in shared {
            if let Some(thread) = self.threads.iter_mut().find(|thread| thread.id == thread_id) {
                let rounds_left = thread.schedule_severance(target_id);
                out_events.push(Event::CutScheduled {
                    thread: thread_id,
                    region: target_id,
                    rounds_left,
                });
            }
        }
        self.insects[insect_index].cut = true;
        Ok(())
    }

    fn eat_insect(
        &mut self,
        insect_id: InsectId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let thread_id = self.acting_fungus_thread()?;
        let insect_index = self
            .insects
            .iter()
            .position(|insect| insect.id == insect_id)
            .ok_or(ActionError::InvalidTarget)?;
        {
            let insect = &self.insects[insect_index];
            if !insect.moved || !insect.cut {
                return Err(ActionError::InvalidTarget);
            }
        }
        let region_id = self.insects[insect_index].region;
        let reaches = self
            .threads
            .iter()
            .find(|thread| thread.id == thread_id)
            .is_some_and(|thread| thread.occupies(region_id));
        if !reaches {
            return Err(ActionError::InvalidTarget);
        }

        let insect = self.insects.remove(insect_index);
        if let Some(region) = board::find_mut(&mut self.regions, region_id) {
            region.insect = None;
        }
        out_events.push(Event::InsectEaten {
            insect: insect.id,
            region: region_id,
        });

        let regrows = board::find(&self.regions, region_id)
            .is_some_and(|region| region.kind.can_host_mushroom() && region.mushroom.is_none());
        if regrows {
            let mushroom_id = self.allocate_mushroom_id();
            if let Some(region) = board::find_mut(&mut self.regions, region_id) {
                region.mushroom = Some(mushroom_id);
            }
            self.mushrooms
                .push(Mushroom::new(mushroom_id, thread_id, region_id));
            self.fungus_players[self.turn].score += 1;
            out_events.push(Event::MushroomPlaced {
                mushroom: mushroom_id,
                thread: thread_id,
                region: region_id,
            });
        }
        Ok(())
    }

    fn split_region(
        &mut self,
        region_id: RegionId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        match self.phase {
            Phase::FungusTurn | Phase::InsectTurn => {}
            _ => return Err(ActionError::InvalidActor),
        }
        self.perform_split(region_id, out_events)
    }

    /// Splits a region into two successors, redistributing its sides.
    ///
    /// The first successor inherits the sides before the pivot plus the new
    /// shared edge and the resident insect; the second inherits the shared
    /// edge plus the remaining sides. Threads do not survive onto the
    /// successors; spores resting on the original are destroyed.
    fn perform_split(
        &mut self,
        region_id: RegionId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let index = self
            .regions
            .iter()
            .position(|region| region.id == region_id)
            .ok_or(ActionError::InvalidTarget)?;
        {
            let region = &self.regions[index];
            if region.mushroom.is_some() || region.neighbors.len() < MIN_SPLIT_SIDES {
                return Err(ActionError::ResourceUnavailable);
            }
        }

        let original = self.regions.remove(index);
        let first_id = self.allocate_region_id();
        let second_id = self.allocate_region_id();
        let pivot = original.neighbors.len() / 2;

        let mut first_sides: Vec<Option<RegionId>> = original.neighbors[..pivot].to_vec();
        first_sides.push(Some(second_id));
        let mut second_sides: Vec<Option<RegionId>> = vec![Some(first_id)];
        second_sides.extend_from_slice(&original.neighbors[pivot..]);

        for (side, slot) in original.neighbors.iter().enumerate() {
            let Some(neighbor_id) = slot else { continue };
            let successor = if side < pivot { first_id } else { second_id };
            if let Some(neighbor) = board::find_mut(&mut self.regions, *neighbor_id) {
                neighbor.replace_neighbor(original.id, successor);
            }
        }

        let mut first = Region::new(first_id, original.kind, first_sides);
        let second = Region::new(second_id, original.kind, second_sides);
        if let Some(insect_id) = original.insect {
            first.insect = Some(insect_id);
            if let Some(insect) = self.insects.iter_mut().find(|insect| insect.id == insect_id) {
                insect.region = first_id;
            }
        }
        self.regions.push(first);
        self.regions.push(second);

        out_events.push(Event::RegionSplit {
            original: original.id,
            first: first_id,
            second: second_id,
        });
        if let Some(insect_id) = original.insect {
            out_events.push(Event::InsectMoved {
                insect: insect_id,
                from: original.id,
                to: first_id,
            });
        }
        for spore in &original.spores {
            out_events.push(Event::SporeDestroyed { spore: spore.id });
        }
        for thread_id in original.threads.iter().copied() {
            if let Some(thread) = self.threads.iter_mut().find(|thread| thread.id == thread_id) {
                thread.retreat_from(original.id);
            }
            out_events.push(Event::ThreadRetreated {
                thread: thread_id,
                region: original.id,
            });
            self.prune_thread(thread_id, out_events);
        }
        Ok(())
    }

    fn end_turn(&mut self, out_events: &mut Vec<Event>) -> Result<(), ActionError> {
        match self.phase {
            Phase::FungusTurn => {
                self.turn += 1;
                if self.turn >= self.fungus_players.len() {
                    self.phase = Phase::InsectTurn;
                    self.turn = 0;
                    out_events.push(Event::PhaseChanged {
                        phase: Phase::InsectTurn,
                    });
                }
                Ok(())
            }
            Phase::InsectTurn => {
                self.turn += 1;
                if self.turn >= self.insect_players.len() {
                    self.turn = 0;
                    self.advance_round(out_events);
                }
                Ok(())
            }
            _ => Err(ActionError::InvalidActor),
        }
    }

    /// Runs the round boundary: severance decay, insect resets, branch-lock
    /// clearing, mushroom aging and spore generation, periodic absorption
    /// with one forced split, and finally the phase rotation.
    fn advance_round(&mut self, out_events: &mut Vec<Event>) {
        self.round += 1;
        if self.round >= self.config.max_rounds {
            self.phase = Phase::GameOver;
            out_events.push(Event::PhaseChanged {
                phase: Phase::GameOver,
            });
            out_events.push(Event::GameOver {
                fungus_winner: leading_score(
                    self.fungus_players.iter().map(|p| (p.id, p.score)),
                ),
                insect_winner: leading_score(
                    self.insect_players.iter().map(|p| (p.id, p.score)),
                ),
            });
            return;
        }

        self.decay_severances(out_events);

        for insect in self.insects.iter_mut() {
            let (moved, cut) = match insect.status {
                InsectStatus::Normal | InsectStatus::Divided => (false, false),
                InsectStatus::Slowed => (true, false),
                InsectStatus::Paralyzed => (true, true),
                InsectStatus::NoCut => (false, true),
                InsectStatus::SpeedBoost => (insect.moved, insect.cut),
            };
            insect.moved = moved;
            insect.cut = cut;
            insect.status = InsectStatus::Normal;
        }
        for player in self.fungus_players.iter_mut() {
            player.branch_used = false;
        }

        let rain = self.round % SPORE_RAIN_PERIOD == 0;
        for index in 0..self.mushrooms.len() {
            self.mushrooms[index].age += 1;
            if self.mushrooms[index].age >= MUSHROOM_EVOLUTION_AGE
                && self.mushrooms[index].stage == MushroomStage::Unevolved
            {
                self.mushrooms[index].stage = MushroomStage::Evolved;
                out_events.push(Event::MushroomEvolved {
                    mushroom: self.mushrooms[index].id,
                });
            }
            if rain {
                let kind = if self.config.randomize {
                    spore_kind_from_draw(self.rng.next_in(SPORE_KIND_COUNT))
                } else {
                    SporeKind::Speed
                };
                let spore = Spore {
                    id: self.allocate_spore_id(),
                    kind,
                    thread: self.mushrooms[index].thread,
                };
                self.mushrooms[index].queue.push_back(spore);
                out_events.push(Event::SporeGenerated {
                    spore: spore.id,
                    kind,
                    mushroom: self.mushrooms[index].id,
                });
            }
        }

        if self.round % ABSORPTION_PERIOD == 0 {
            self.absorb_regions(out_events);
            self.forced_split(out_events);
        }

        self.phase = Phase::FungusTurn;
        self.turn = 0;
        out_events.push(Event::PhaseChanged {
            phase: Phase::FungusTurn,
        });
        out_events.push(Event::RoundAdvanced { round: self.round });
    }

    fn decay_severances(&mut self, out_events: &mut Vec<Event>) {
        for thread in self.threads.iter_mut() {
            for severance in thread.doomed.iter_mut() {
                severance.rounds_left = severance.rounds_left.saturating_sub(1);
            }
            let mut expired: Vec<RegionId> = Vec::new();
            thread.doomed.retain(|severance| {
                if severance.rounds_left == 0 {
                    expired.push(severance.region);
                    false
                } else {
                    true
                }
            });
            for region_id in expired {
                if let Some(region) = board::find_mut(&mut self.regions, region_id) {
                    region.shed_thread(thread.id);
                }
                if thread.occupies(region_id) {
                    thread.retreat_from(region_id);
                    out_events.push(Event::ThreadRetreated {
                        thread: thread.id,
                        region: region_id,
                    });
                }
            }
            network::prune(thread, &mut self.regions, &self.mushrooms, out_events);
        }
    }

    fn absorb_regions(&mut self, out_events: &mut Vec<Event>) {
        let mut stripped: Vec<ThreadId> = Vec::new();
        for region in self.regions.iter_mut() {
            if region.kind != RegionKind::Absorbing || region.threads.is_empty() {
                continue;
            }
            for thread_id in std::mem::take(&mut region.threads) {
                if let Some(thread) = self.threads.iter_mut().find(|t| t.id == thread_id) {
                    thread.retreat_from(region.id);
                }
                out_events.push(Event::ThreadRetreated {
                    thread: thread_id,
                    region: region.id,
                });
                if !stripped.contains(&thread_id) {
                    stripped.push(thread_id);
                }
            }
        }
        for thread_id in stripped {
            self.prune_thread(thread_id, out_events);
        }
    }

    /// Draws one region to split, with a single retry on a different region.
    fn forced_split(&mut self, out_events: &mut Vec<Event>) {
        let count = self.regions.len();
        if count == 0 {
            return;
        }
        let bound = count as u32;
        let first_pick = self.rng.next_in(bound) as usize;
        let first_id = self.regions[first_pick].id;
        if self.perform_split(first_id, out_events).is_ok() {
            return;
        }
        let mut second_pick = self.rng.next_in(bound) as usize;
        if second_pick == first_pick {
            second_pick = (second_pick + 1) % count;
        }
        let second_id = self.regions[second_pick].id;
        let _ = self.perform_split(second_id, out_events);
    }

    fn prune_thread(&mut self, thread_id: ThreadId, out_events: &mut Vec<Event>) {
        if let Some(index) = self.threads.iter().position(|thread| thread.id == thread_id) {
            network::prune(
                &mut self.threads[index],
                &mut self.regions,
                &self.mushrooms,
                out_events,
            );
        }
    }
}

fn leading_score(scores: impl Iterator<Item = (PlayerId, u32)>) -> Option<PlayerId> {
    scores
        .fold(None, |best: Option<(PlayerId, u32)>, candidate| match best {
            Some(current) if current.1 >= candidate.1 => Some(current),
            _ => Some(candidate),
        })
        .map(|(id, _)| id)
}

fn spore_kind_from_draw(draw: u32) -> SporeKind {
    match draw {
        0 => SporeKind::Slow,
        1 => SporeKind::Speed,
        2 => SporeKind::Paralysing,
        3 => SporeKind::NoCut,
        _ => SporeKind::Dividing,
    }
}

fn action_kind(command: &Command) -> ActionKind {
    match command {
        Command::ConfigureBoard { .. } => ActionKind::ConfigureBoard,
        Command::RegisterPlayer { .. } => ActionKind::RegisterPlayer,
        Command::PlaceFirstMushroom { .. } => ActionKind::PlaceFirstMushroom,
        Command::PlaceFirstInsect { .. } => ActionKind::PlaceFirstInsect,
        Command::BranchThread { .. } => ActionKind::BranchThread,
        Command::GrowMushroom { .. } => ActionKind::GrowMushroom,
        Command::ShootSpore { .. } => ActionKind::ShootSpore,
        Command::MoveInsect { .. } => ActionKind::MoveInsect,
        Command::CutThread { .. } => ActionKind::CutThread,
        Command::EatInsect { .. } => ActionKind::EatInsect,
        Command::SplitRegion { .. } => ActionKind::SplitRegion,
        Command::EndTurn => ActionKind::EndTurn,
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Rejected commands leave the world untouched and surface as
/// [`Event::ActionFailed`] carrying the operation name and the reason.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let action = action_kind(&command);
    if world.phase == Phase::GameOver {
        out_events.push(Event::ActionFailed {
            action,
            reason: ActionError::TerminalState,
        });
        return;
    }

    let outcome = match command {
        Command::ConfigureBoard { regions } => world.configure_board(regions, out_events),
        Command::RegisterPlayer { name, faction } => {
            world.register_player(name, faction, out_events)
        }
        Command::PlaceFirstMushroom { kind, region } => {
            world.place_first_mushroom(kind, region, out_events)
        }
        Command::PlaceFirstInsect { region } => world.place_first_insect(region, out_events),
        Command::BranchThread { region } => world.branch_thread(region, out_events),
        Command::GrowMushroom { region } => world.grow_mushroom(region, out_events),
        Command::ShootSpore { mushroom, region } => {
            world.shoot_spore(mushroom, region, out_events)
        }
        Command::MoveInsect { insect, region } => world.move_insect(insect, region, out_events),
        Command::CutThread { insect, region } => world.cut_thread(insect, region, out_events),
        Command::EatInsect { insect } => world.eat_insect(insect, out_events),
        Command::SplitRegion { region } => world.split_region(region, out_events),
        Command::EndTurn => world.end_turn(out_events),
    };
    if let Err(reason) = outcome {
        out_events.push(Event::ActionFailed { action, reason });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use fungorium_core::{
        Faction, InsectId, InsectStatus, MushroomId, MushroomStage, Phase, PlayerId, RegionId,
        RegionKind, SporeId, SporeKind, ThreadId, ThreadKind,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Phase the match is currently in.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// One-based index of the current round; zero during placement.
    #[must_use]
    pub fn round(world: &World) -> u32 {
        world.round
    }

    /// Round index at which the match ends.
    #[must_use]
    pub fn max_rounds(world: &World) -> u32 {
        world.config.max_rounds
    }

    /// Player whose turn it is, if the match is still running.
    #[must_use]
    pub fn current_player(world: &World) -> Option<PlayerSnapshot> {
        match world.phase {
            Phase::MushroomPlacement | Phase::FungusTurn => {
                world.fungus_players.get(world.turn).map(|player| PlayerSnapshot {
                    id: player.id,
                    name: player.name.clone(),
                    faction: Faction::Fungus,
                })
            }
            Phase::InsectPlacement | Phase::InsectTurn => {
                world.insect_players.get(world.turn).map(|player| PlayerSnapshot {
                    id: player.id,
                    name: player.name.clone(),
                    faction: Faction::Insects,
                })
            }
            Phase::GameOver => None,
        }
    }

    /// Fungus-side scores in registration order.
    #[must_use]
    pub fn fungus_scores(world: &World) -> Vec<ScoreEntry> {
        world
            .fungus_players
            .iter()
            .map(|player| ScoreEntry {
                player: player.id,
                name: player.name.clone(),
                score: player.score,
            })
            .collect()
    }

    /// Insect-side scores in registration order.
    #[must_use]
    pub fn insect_scores(world: &World) -> Vec<ScoreEntry> {
        world
            .insect_players
            .iter()
            .map(|player| ScoreEntry {
                player: player.id,
                name: player.name.clone(),
                score: player.score,
            })
            .collect()
    }

    /// Captures a read-only view of the board regions.
    #[must_use]
    pub fn region_view(world: &World) -> RegionView {
        let mut snapshots: Vec<RegionSnapshot> = world
            .regions
            .iter()
            .map(|region| RegionSnapshot {
                id: region.id,
                kind: region.kind,
                neighbors: region.neighbors.clone(),
                threads: region.threads.clone(),
                spores: region
                    .spores
                    .iter()
                    .map(|spore| SporeSnapshot {
                        id: spore.id,
                        kind: spore.kind,
                        thread: spore.thread,
                    })
                    .collect(),
                insect: region.insect,
                mushroom: region.mushroom,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        RegionView { snapshots }
    }

    /// Captures a read-only view of the fungal threads.
    #[must_use]
    pub fn thread_view(world: &World) -> ThreadView {
        let mut snapshots: Vec<ThreadSnapshot> = world
            .threads
            .iter()
            .map(|thread| {
                let mut regions = thread.regions.clone();
                regions.sort();
                ThreadSnapshot {
                    id: thread.id,
                    kind: thread.kind,
                    owner: thread.owner,
                    regions,
                    severances: thread
                        .doomed
                        .iter()
                        .map(|severance| SeveranceSnapshot {
                            region: severance.region,
                            rounds_left: severance.rounds_left,
                        })
                        .collect(),
                }
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        ThreadView { snapshots }
    }

    /// Captures a read-only view of the mushrooms.
    #[must_use]
    pub fn mushroom_view(world: &World) -> MushroomView {
        let mut snapshots: Vec<MushroomSnapshot> = world
            .mushrooms
            .iter()
            .map(|mushroom| MushroomSnapshot {
                id: mushroom.id,
                thread: mushroom.thread,
                region: mushroom.region,
                stage: mushroom.stage,
                age: mushroom.age,
                shots: mushroom.shots,
                queued: mushroom
                    .queue
                    .iter()
                    .map(|spore| SporeSnapshot {
                        id: spore.id,
                        kind: spore.kind,
                        thread: spore.thread,
                    })
                    .collect(),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        MushroomView { snapshots }
    }

    /// Captures a read-only view of the insects.
    #[must_use]
    pub fn insect_view(world: &World) -> InsectView {
        let mut snapshots: Vec<InsectSnapshot> = world
            .insects
            .iter()
            .map(|insect| InsectSnapshot {
                id: insect.id,
                owner: insect.owner,
                region: insect.region,
                status: insect.status,
                moved: insect.moved,
                cut: insect.cut,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        InsectView { snapshots }
    }

    /// Identity of the player whose turn it is.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct PlayerSnapshot {
        /// Identifier assigned at registration.
        pub id: PlayerId,
        /// Display name registered for the player.
        pub name: String,
        /// Side the player plays on.
        pub faction: Faction,
    }

    /// Score line for one player.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct ScoreEntry {
        /// Identifier assigned at registration.
        pub player: PlayerId,
        /// Display name registered for the player.
        pub name: String,
        /// Points accumulated so far.
        pub score: u32,
    }

    /// Spore resting on a region or queued inside a mushroom.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SporeSnapshot {
        /// Unique identifier assigned to the spore.
        pub id: SporeId,
        /// Payload the spore carries.
        pub kind: SporeKind,
        /// Thread the spore belongs to.
        pub thread: ThreadId,
    }

    /// Immutable representation of a single region's state used for queries.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct RegionSnapshot {
        /// Unique identifier assigned to the region.
        pub id: RegionId,
        /// Structural variant of the region.
        pub kind: RegionKind,
        /// Clockwise neighbor list; `None` marks a board edge.
        pub neighbors: Vec<Option<RegionId>>,
        /// Threads currently occupying the region.
        pub threads: Vec<ThreadId>,
        /// Spores resting on the region in landing order.
        pub spores: Vec<SporeSnapshot>,
        /// Insect standing on the region, if any.
        pub insect: Option<InsectId>,
        /// Mushroom hosted by the region, if any.
        pub mushroom: Option<MushroomId>,
    }

    /// Read-only snapshot describing all board regions.
    #[derive(Clone, Debug, Default)]
    pub struct RegionView {
        snapshots: Vec<RegionSnapshot>,
    }

    impl RegionView {
        /// Iterator over the captured region snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &RegionSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<RegionSnapshot> {
            self.snapshots
        }
    }

    /// Pending severance entry on a thread.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SeveranceSnapshot {
        /// Region whose section withers.
        pub region: RegionId,
        /// Round boundaries left before the section withers.
        pub rounds_left: u8,
    }

    /// Immutable representation of a single thread's state used for queries.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct ThreadSnapshot {
        /// Unique identifier assigned to the thread.
        pub id: ThreadId,
        /// Species of the thread.
        pub kind: ThreadKind,
        /// Player owning the thread.
        pub owner: PlayerId,
        /// Regions the thread occupies, sorted by identifier.
        pub regions: Vec<RegionId>,
        /// Sections scheduled to wither.
        pub severances: Vec<SeveranceSnapshot>,
    }

    /// Read-only snapshot describing all fungal threads.
    #[derive(Clone, Debug, Default)]
    pub struct ThreadView {
        snapshots: Vec<ThreadSnapshot>,
    }

    impl ThreadView {
        /// Iterator over the captured thread snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &ThreadSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<ThreadSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single mushroom's state used for queries.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct MushroomSnapshot {
        /// Unique identifier assigned to the mushroom.
        pub id: MushroomId,
        /// Thread the mushroom belongs to.
        pub thread: ThreadId,
        /// Region hosting the mushroom.
        pub region: RegionId,
        /// Growth stage of the mushroom.
        pub stage: MushroomStage,
        /// Rounds survived since the mushroom appeared.
        pub age: u32,
        /// Spores shot so far; the mushroom dies at the tenth.
        pub shots: u8,
        /// Spores queued for shooting in generation order.
        pub queued: Vec<SporeSnapshot>,
    }

    /// Read-only snapshot describing all mushrooms.
    #[derive(Clone, Debug, Default)]
    pub struct MushroomView {
        snapshots: Vec<MushroomSnapshot>,
    }

    impl MushroomView {
        /// Iterator over the captured mushroom snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &MushroomSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<MushroomSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single insect's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct InsectSnapshot {
        /// Unique identifier assigned to the insect.
        pub id: InsectId,
        /// Player owning the insect.
        pub owner: PlayerId,
        /// Region the insect stands on.
        pub region: RegionId,
        /// Spore status currently in effect.
        pub status: InsectStatus,
        /// Indicates whether the insect spent its move this round.
        pub moved: bool,
        /// Indicates whether the insect spent its cut this round.
        pub cut: bool,
    }

    /// Read-only snapshot describing all insects.
    #[derive(Clone, Debug, Default)]
    pub struct InsectView {
        snapshots: Vec<InsectSnapshot>,
    }

    impl InsectView {
        /// Iterator over the captured insect snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &InsectSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<InsectSnapshot> {
            self.snapshots
        }
    }
}
