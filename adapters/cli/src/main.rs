#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a scripted Fungorium demonstration match.

use anyhow::ensure;
use clap::Parser;
use fungorium_core::{
    Command, Event, Phase, RandomSource, RegionId, SporeKind, ThreadId, ThreadKind,
};
use fungorium_system_bootstrap::{setup_commands, Bootstrap};
use fungorium_world::{apply, query, scaffold, Config, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Hard cap on end-of-turn commands issued while draining the match.
const DRAIN_LIMIT: u32 = 128;

/// Command-line options for the demonstration match.
#[derive(Debug, Parser)]
#[command(name = "fungorium", about = "Plays a scripted Fungorium match")]
struct Args {
    /// Round index at which the match ends.
    #[arg(long, default_value_t = 5)]
    rounds: u32,
    /// Seed for the match RNG; drawn from entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Collapse every random draw to its first outcome.
    #[arg(long)]
    no_random: bool,
}

/// Random source backed by a seedable ChaCha stream.
#[derive(Debug)]
struct ChaChaSource(ChaCha8Rng);

impl RandomSource for ChaChaSource {
    fn next_in(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            0
        } else {
            self.0.gen_range(0..bound)
        }
    }
}

/// Entry point for the Fungorium command-line interface.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    ensure!(args.rounds >= 1, "matches need at least one round");

    let rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut world = World::with_source(
        Box::new(ChaChaSource(rng)),
        Config {
            max_rounds: args.rounds,
            randomize: !args.no_random,
        },
    );

    let bootstrap = Bootstrap::default();
    println!("{}", bootstrap.welcome_banner(&world));

    let mut events = Vec::new();
    for command in setup_commands(&["amanita", "morchella"], &["atta", "formica"]) {
        apply(&mut world, command, &mut events);
    }
    let opening = [
        Command::PlaceFirstMushroom {
            kind: ThreadKind::LongLife,
            region: RegionId::new(0),
        },
        Command::PlaceFirstMushroom {
            kind: ThreadKind::ShortLife,
            region: RegionId::new(2),
        },
        Command::PlaceFirstInsect {
            region: RegionId::new(6),
        },
        Command::PlaceFirstInsect {
            region: RegionId::new(7),
        },
        // Round one: both fungi branch toward the middle row.
        Command::BranchThread {
            region: RegionId::new(3),
        },
        Command::EndTurn,
        Command::BranchThread {
            region: RegionId::new(5),
        },
        Command::EndTurn,
        Command::EndTurn,
        Command::EndTurn,
        // Round two: the first fungus reaches the insect's corner.
        Command::BranchThread {
            region: RegionId::new(6),
        },
        Command::EndTurn,
        Command::BranchThread {
            region: RegionId::new(1),
        },
        Command::EndTurn,
    ];
    for command in opening {
        apply(&mut world, command, &mut events);
    }

    // Bait the first insect onto a boost spore, then let it cut the web.
    let _ = scaffold::sow_spore(
        &mut world,
        RegionId::new(3),
        SporeKind::Speed,
        ThreadId::new(0),
    );
    let insect = query::insect_view(&world)
        .iter()
        .map(|snapshot| snapshot.id)
        .next();
    if let Some(insect) = insect {
        apply(
            &mut world,
            Command::MoveInsect {
                insect,
                region: RegionId::new(3),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::CutThread {
                insect,
                region: RegionId::new(6),
            },
            &mut events,
        );
    }

    let mut drained = 0;
    while query::phase(&world) != Phase::GameOver && drained < DRAIN_LIMIT {
        apply(&mut world, Command::EndTurn, &mut events);
        drained += 1;
    }

    for event in &events {
        println!("{}", describe(event));
    }

    let (fungus, insects) = bootstrap.scoreboard(&world);
    println!("-- final scores --");
    for entry in fungus.iter().chain(insects.iter()) {
        println!("{}: {}", entry.name, entry.score);
    }
    Ok(())
}

fn describe(event: &Event) -> String {
    match event {
        Event::BoardConfigured { regions } => {
            format!("board configured with {regions} regions")
        }
        Event::PlayerRegistered { name, faction, .. } => {
            format!("{name} joined the {faction:?} side")
        }
        Event::ThreadSprouted { thread, kind, region, .. } => {
            format!("thread {thread:?} ({kind:?}) sprouted on {region:?}")
        }
        Event::ThreadExtended { thread, region } => {
            format!("thread {thread:?} extended onto {region:?}")
        }
        Event::ThreadRetreated { thread, region } => {
            format!("thread {thread:?} withered off {region:?}")
        }
        Event::MushroomPlaced { mushroom, region, .. } => {
            format!("mushroom {mushroom:?} grew on {region:?}")
        }
        Event::MushroomEvolved { mushroom } => {
            format!("mushroom {mushroom:?} evolved")
        }
        Event::MushroomDied { mushroom, region } => {
            format!("mushroom {mushroom:?} on {region:?} died")
        }
        Event::SporeGenerated { kind, mushroom, .. } => {
            format!("mushroom {mushroom:?} produced a {kind:?} spore")
        }
        Event::SporeLanded { kind, region, .. } => {
            format!("a {kind:?} spore landed on {region:?}")
        }
        Event::SporeConsumed { kind, insect, .. } => {
            format!("insect {insect:?} ate a {kind:?} spore")
        }
        Event::SporeDestroyed { spore } => {
            format!("spore {spore:?} was destroyed")
        }
        Event::InsectHatched { insect, region, .. } => {
            format!("insect {insect:?} appeared on {region:?}")
        }
        Event::InsectMoved { insect, from, to } => {
            format!("insect {insect:?} moved {from:?} -> {to:?}")
        }
        Event::InsectStatusChanged { insect, status } => {
            format!("insect {insect:?} is now {status:?}")
        }
        Event::InsectEaten { insect, region } => {
            format!("insect {insect:?} was devoured on {region:?}")
        }
        Event::CutScheduled { thread, region, rounds_left } => {
            format!("thread {thread:?} on {region:?} cut, withers in {rounds_left} round(s)")
        }
        Event::RegionSplit { original, first, second } => {
            format!("region {original:?} split into {first:?} and {second:?}")
        }
        Event::PhaseChanged { phase } => {
            format!("phase: {phase:?}")
        }
        Event::RoundAdvanced { round } => {
            format!("== round {round} ==")
        }
        Event::ActionFailed { action, reason } => {
            format!("{action:?} rejected: {reason}")
        }
        Event::GameOver { fungus_winner, insect_winner } => {
            format!("game over; fungus winner {fungus_winner:?}, insect winner {insect_winner:?}")
        }
    }
}
