#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Fungorium engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Fungorium.";

/// The two competing sides of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// Players steering fungal threads and mushrooms.
    Fungus,
    /// Players steering insects grazing on the network.
    Insects,
}

/// Lifecycle states the match moves through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Fungus players place their first mushroom, one after another.
    MushroomPlacement,
    /// Insect players place their first insect, one after another.
    InsectPlacement,
    /// Fungus players act in roster order.
    FungusTurn,
    /// Insect players act in roster order.
    InsectTurn,
    /// The round limit was reached; the world accepts no further commands.
    GameOver,
}

/// Structural variants a board region can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionKind {
    /// Carries any number of threads and may host a mushroom.
    MultiThread,
    /// Carries at most one thread at a time.
    SingleThread,
    /// Periodically destroys every thread crossing it; never hosts a mushroom.
    Absorbing,
    /// Keeps threads alive even when they lose contact with a mushroom.
    KeepThread,
}

impl RegionKind {
    /// Reports whether a mushroom may ever stand on a region of this kind.
    #[must_use]
    pub const fn can_host_mushroom(self) -> bool {
        !matches!(self, Self::Absorbing)
    }

    /// Reports whether the region is limited to a single thread.
    #[must_use]
    pub const fn single_threaded(self) -> bool {
        matches!(self, Self::SingleThread)
    }

    /// Reports whether occupied regions of this kind anchor their threads
    /// during pruning regardless of mushroom contact.
    #[must_use]
    pub const fn keeps_threads(self) -> bool {
        matches!(self, Self::KeepThread)
    }
}

/// Species a fungal thread can belong to, fixing its severance decay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreadKind {
    /// Severed sections wither after one round.
    ShortLife,
    /// Severed sections survive one extra round before withering.
    LongLife,
}

impl ThreadKind {
    /// Number of round boundaries a severed section survives.
    #[must_use]
    pub const fn decay_rounds(self) -> u8 {
        match self {
            Self::ShortLife => 1,
            Self::LongLife => 2,
        }
    }
}

/// Payload variants a spore can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SporeKind {
    /// Grants the consuming insect an extra move this round.
    Speed,
    /// The consuming insect skips its move next round.
    Slow,
    /// The consuming insect can neither move nor cut next round.
    Paralysing,
    /// The consuming insect loses its cut for the rest of this round.
    NoCut,
    /// The consuming insect spawns a copy after each move this round.
    Dividing,
}

impl SporeKind {
    /// Status an insect enters after consuming a spore of this kind.
    #[must_use]
    pub const fn applied_status(self) -> InsectStatus {
        match self {
            Self::Speed => InsectStatus::SpeedBoost,
            Self::Slow => InsectStatus::Slowed,
            Self::Paralysing => InsectStatus::Paralyzed,
            Self::NoCut => InsectStatus::NoCut,
            Self::Dividing => InsectStatus::Divided,
        }
    }
}

/// Transient condition an insect is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsectStatus {
    /// No spore effect is active.
    Normal,
    /// The insect may move again without spending its allowance.
    SpeedBoost,
    /// The insect will forfeit its move next round.
    Slowed,
    /// The insect will forfeit both actions next round.
    Paralyzed,
    /// The insect cannot cut for the rest of this round.
    NoCut,
    /// The insect spawns a copy after each of its moves this round.
    Divided,
}

/// Growth stages of a mushroom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MushroomStage {
    /// Freshly grown; shoots spores one region far.
    Unevolved,
    /// Aged five rounds; shoots spores up to two regions far.
    Evolved,
}

/// Unique identifier assigned to a board region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(u32);

impl RegionId {
    /// Creates a new region identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a fungal thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThreadId(u32);

impl ThreadId {
    /// Creates a new thread identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a mushroom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MushroomId(u32);

impl MushroomId {
    /// Creates a new mushroom identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an insect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InsectId(u32);

impl InsectId {
    /// Creates a new insect identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a spore.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SporeId(u32);

impl SporeId {
    /// Creates a new spore identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a registered player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Declarative description of one region in a board topology.
///
/// Neighbor entries index into the surrounding specification list; `None`
/// marks a side facing the board edge. The world consumes resolved topology
/// only and performs no file parsing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSpec {
    /// Structural variant of the region.
    pub kind: RegionKind,
    /// Clockwise neighbor list; entries index the specification list.
    pub neighbors: Vec<Option<u32>>,
}

impl RegionSpec {
    /// Creates a new region specification.
    #[must_use]
    pub fn new(kind: RegionKind, neighbors: Vec<Option<u32>>) -> Self {
        Self { kind, neighbors }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the board with the provided topology and restarts the match.
    ConfigureBoard {
        /// Resolved region list; neighbor entries index into this list.
        regions: Vec<RegionSpec>,
    },
    /// Seats a new player on one of the two sides before placement begins.
    RegisterPlayer {
        /// Display name recorded for scorekeeping.
        name: String,
        /// Side the player joins.
        faction: Faction,
    },
    /// Places the acting fungus player's first mushroom, founding their thread.
    PlaceFirstMushroom {
        /// Species of the thread founded alongside the mushroom.
        kind: ThreadKind,
        /// Region the mushroom is placed on.
        region: RegionId,
    },
    /// Places the acting insect player's first insect.
    PlaceFirstInsect {
        /// Region the insect is placed on.
        region: RegionId,
    },
    /// Extends the acting player's thread onto an adjacent region.
    BranchThread {
        /// Region the thread grows onto.
        region: RegionId,
    },
    /// Grows a mushroom from three same-thread spores resting on a region.
    GrowMushroom {
        /// Region the mushroom grows on.
        region: RegionId,
    },
    /// Shoots the oldest queued spore of a mushroom onto a nearby region.
    ShootSpore {
        /// Mushroom performing the shot.
        mushroom: MushroomId,
        /// Region the spore lands on.
        region: RegionId,
    },
    /// Moves an insect along a shared thread to an adjacent region.
    MoveInsect {
        /// Insect attempting the move.
        insect: InsectId,
        /// Destination region.
        region: RegionId,
    },
    /// Severs every thread shared between an insect's region and a neighbor.
    CutThread {
        /// Insect performing the cut.
        insect: InsectId,
        /// Region whose thread sections are severed.
        region: RegionId,
    },
    /// Consumes a spent insect standing on the acting player's thread.
    EatInsect {
        /// Insect to consume.
        insect: InsectId,
    },
    /// Splits a region into two successors, redistributing its sides.
    SplitRegion {
        /// Region to split.
        region: RegionId,
    },
    /// Ends the acting player's turn, rotating to the next in the roster.
    EndTurn,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a new board topology replaced the previous one.
    BoardConfigured {
        /// Number of regions the new board holds.
        regions: u32,
    },
    /// Confirms that a player joined the match.
    PlayerRegistered {
        /// Identifier assigned to the player by the world.
        player: PlayerId,
        /// Display name the player registered under.
        name: String,
        /// Side the player joined.
        faction: Faction,
    },
    /// Confirms that a first placement founded a new thread.
    ThreadSprouted {
        /// Identifier assigned to the thread.
        thread: ThreadId,
        /// Species of the thread.
        kind: ThreadKind,
        /// Player owning the thread.
        owner: PlayerId,
        /// Region the thread sprouted on.
        region: RegionId,
    },
    /// Confirms that a thread grew onto an additional region.
    ThreadExtended {
        /// Thread that grew.
        thread: ThreadId,
        /// Region the thread now occupies.
        region: RegionId,
    },
    /// Reports that a thread withdrew from a region through severance,
    /// absorption, pruning, or a region split.
    ThreadRetreated {
        /// Thread that withdrew.
        thread: ThreadId,
        /// Region the thread no longer occupies.
        region: RegionId,
    },
    /// Confirms that a mushroom appeared on a region.
    MushroomPlaced {
        /// Identifier assigned to the mushroom.
        mushroom: MushroomId,
        /// Thread the mushroom belongs to.
        thread: ThreadId,
        /// Region hosting the mushroom.
        region: RegionId,
    },
    /// Reports that a mushroom aged into its evolved stage.
    MushroomEvolved {
        /// Mushroom that evolved.
        mushroom: MushroomId,
    },
    /// Reports that a mushroom died after shooting its tenth spore.
    MushroomDied {
        /// Mushroom that died.
        mushroom: MushroomId,
        /// Region the mushroom stood on.
        region: RegionId,
    },
    /// Confirms that a mushroom queued a freshly generated spore.
    SporeGenerated {
        /// Identifier assigned to the spore.
        spore: SporeId,
        /// Payload the spore carries.
        kind: SporeKind,
        /// Mushroom holding the spore.
        mushroom: MushroomId,
    },
    /// Confirms that a shot spore landed on a region.
    SporeLanded {
        /// Spore that landed.
        spore: SporeId,
        /// Payload the spore carries.
        kind: SporeKind,
        /// Region the spore rests on.
        region: RegionId,
    },
    /// Confirms that an insect consumed a spore after moving.
    SporeConsumed {
        /// Spore that was consumed.
        spore: SporeId,
        /// Payload applied to the insect.
        kind: SporeKind,
        /// Insect that consumed the spore.
        insect: InsectId,
    },
    /// Reports that a spore was destroyed without being consumed.
    SporeDestroyed {
        /// Spore that was destroyed.
        spore: SporeId,
    },
    /// Confirms that a new insect entered the board.
    InsectHatched {
        /// Identifier assigned to the insect.
        insect: InsectId,
        /// Player owning the insect.
        owner: PlayerId,
        /// Region the insect stands on.
        region: RegionId,
    },
    /// Confirms that an insect moved between two regions.
    InsectMoved {
        /// Insect that moved.
        insect: InsectId,
        /// Region the insect left.
        from: RegionId,
        /// Region the insect entered.
        to: RegionId,
    },
    /// Reports that an insect's status changed outside round maintenance.
    InsectStatusChanged {
        /// Insect whose status changed.
        insect: InsectId,
        /// Status now in effect.
        status: InsectStatus,
    },
    /// Confirms that a thread consumed an insect.
    InsectEaten {
        /// Insect that was consumed.
        insect: InsectId,
        /// Region the insect stood on.
        region: RegionId,
    },
    /// Confirms that a cut scheduled a thread section for severance.
    CutScheduled {
        /// Thread whose section was severed.
        thread: ThreadId,
        /// Region carrying the severed section.
        region: RegionId,
        /// Round boundaries the section survives before withering.
        rounds_left: u8,
    },
    /// Confirms that a region split into two successors.
    RegionSplit {
        /// Region that was split and left the board.
        original: RegionId,
        /// Successor inheriting the first half of the sides and the insect.
        first: RegionId,
        /// Successor inheriting the second half of the sides.
        second: RegionId,
    },
    /// Announces that the match entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
    },
    /// Announces that a new round began.
    RoundAdvanced {
        /// One-based index of the round that began.
        round: u32,
    },
    /// Reports that a command was rejected without mutating the world.
    ActionFailed {
        /// Operation that was rejected.
        action: ActionKind,
        /// Specific reason the operation failed.
        reason: ActionError,
    },
    /// Announces that the round limit was reached and the match ended.
    GameOver {
        /// Highest-scoring fungus player, if any fungus player registered.
        fungus_winner: Option<PlayerId>,
        /// Highest-scoring insect player, if any insect player registered.
        insect_winner: Option<PlayerId>,
    },
}

/// Names the operation a rejected command attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// [`Command::ConfigureBoard`].
    ConfigureBoard,
    /// [`Command::RegisterPlayer`].
    RegisterPlayer,
    /// [`Command::PlaceFirstMushroom`].
    PlaceFirstMushroom,
    /// [`Command::PlaceFirstInsect`].
    PlaceFirstInsect,
    /// [`Command::BranchThread`].
    BranchThread,
    /// [`Command::GrowMushroom`].
    GrowMushroom,
    /// [`Command::ShootSpore`].
    ShootSpore,
    /// [`Command::MoveInsect`].
    MoveInsect,
    /// [`Command::CutThread`].
    CutThread,
    /// [`Command::EatInsect`].
    EatInsect,
    /// [`Command::SplitRegion`].
    SplitRegion,
    /// [`Command::EndTurn`].
    EndTurn,
}

/// Reasons the world rejects a command.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionError {
    /// The acting player may not perform this operation right now.
    #[error("the acting player may not perform this operation right now")]
    InvalidActor,
    /// The targeted entity is missing or fails the operation's requirements.
    #[error("the targeted entity is missing or fails the operation's requirements")]
    InvalidTarget,
    /// The once-per-round allowance for this operation is already spent.
    #[error("the once-per-round allowance for this operation is already spent")]
    AlreadyActedThisRound,
    /// A required resource is missing, exhausted, or already occupied.
    #[error("a required resource is missing, exhausted, or already occupied")]
    ResourceUnavailable,
    /// The match is over and accepts no further commands.
    #[error("the match is over and accepts no further commands")]
    TerminalState,
}

/// Deterministic source of bounded random draws injected into the world.
///
/// Implementations must return values uniformly distributed in `[0, bound)`
/// and must tolerate a zero bound by returning zero.
pub trait RandomSource: std::fmt::Debug {
    /// Draws the next value in `[0, bound)`.
    fn next_in(&mut self, bound: u32) -> u32;
}

const LCG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const DEFAULT_LCG_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

/// Default linear congruential [`RandomSource`] used for deterministic runs.
#[derive(Clone, Debug)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    /// Creates a generator starting from the provided seed.
    #[must_use]
    pub const fn seeded(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Self::seeded(DEFAULT_LCG_SEED)
    }
}

impl RandomSource for Lcg {
    fn next_in(&mut self, bound: u32) -> u32 {
        self.state = self.state.wrapping_mul(LCG_MULTIPLIER).wrapping_add(1);
        if bound == 0 {
            return 0;
        }
        ((self.state >> 33) % u64::from(bound)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ActionError, Lcg, RandomSource, RegionId, RegionKind, RegionSpec, SporeKind, ThreadKind,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn region_id_round_trips_through_bincode() {
        assert_round_trip(&RegionId::new(42));
    }

    #[test]
    fn action_error_round_trips_through_bincode() {
        assert_round_trip(&ActionError::AlreadyActedThisRound);
    }

    #[test]
    fn region_spec_round_trips_through_bincode() {
        let spec = RegionSpec::new(RegionKind::KeepThread, vec![Some(1), None, Some(3)]);
        assert_round_trip(&spec);
    }

    #[test]
    fn decay_rounds_match_thread_species() {
        assert_eq!(ThreadKind::ShortLife.decay_rounds(), 1);
        assert_eq!(ThreadKind::LongLife.decay_rounds(), 2);
    }

    #[test]
    fn absorbing_regions_never_host_mushrooms() {
        assert!(!RegionKind::Absorbing.can_host_mushroom());
        assert!(RegionKind::KeepThread.can_host_mushroom());
    }

    #[test]
    fn spore_payloads_map_to_statuses() {
        use super::InsectStatus;

        assert_eq!(SporeKind::Speed.applied_status(), InsectStatus::SpeedBoost);
        assert_eq!(
            SporeKind::Paralysing.applied_status(),
            InsectStatus::Paralyzed
        );
    }

    #[test]
    fn lcg_draws_stay_within_bound() {
        let mut lcg = Lcg::seeded(7);
        for _ in 0..64 {
            assert!(lcg.next_in(5) < 5);
        }
        assert_eq!(lcg.next_in(0), 0);
    }

    #[test]
    fn lcg_is_deterministic_for_same_seed() {
        let mut first = Lcg::seeded(99);
        let mut second = Lcg::seeded(99);
        for _ in 0..16 {
            assert_eq!(first.next_in(1000), second.next_in(1000));
        }
    }
}
