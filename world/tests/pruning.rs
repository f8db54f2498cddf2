use fungorium_core::{
    ActionError, ActionKind, Command, Event, Faction, InsectId, Lcg, MushroomId, RegionId,
    RegionKind, RegionSpec, SporeKind, ThreadId, ThreadKind,
};
use fungorium_world::{apply, query, scaffold, Config, World};

fn line_board(kinds: &[RegionKind]) -> Vec<RegionSpec> {
    let length = kinds.len() as u32;
    kinds
        .iter()
        .enumerate()
        .map(|(index, kind)| {
            let index = index as u32;
            let west = index.checked_sub(1);
            let east = if index + 1 < length {
                Some(index + 1)
            } else {
                None
            };
            RegionSpec::new(*kind, vec![west, east])
        })
        .collect()
}

fn world_with_board(kinds: &[RegionKind]) -> (World, Vec<Event>) {
    let mut world = World::with_source(
        Box::new(Lcg::seeded(11)),
        Config {
            max_rounds: 50,
            randomize: false,
        },
    );
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::ConfigureBoard {
            regions: line_board(kinds),
        },
        &mut events,
    );
    apply(
        &mut world,
        Command::RegisterPlayer {
            name: "amanita".to_owned(),
            faction: Faction::Fungus,
        },
        &mut events,
    );
    apply(
        &mut world,
        Command::RegisterPlayer {
            name: "atta".to_owned(),
            faction: Faction::Insects,
        },
        &mut events,
    );
    (world, events)
}

fn pass_round(world: &mut World, events: &mut Vec<Event>) {
    apply(world, Command::EndTurn, events);
    apply(world, Command::EndTurn, events);
}

fn thread_regions(world: &World) -> Vec<RegionId> {
    query::thread_view(world)
        .into_vec()
        .remove(0)
        .regions
}

/// Plants a mushroom on region zero and the insect where asked, then walks
/// the thread one region per round until it spans the whole line.
fn weave_line(
    world: &mut World,
    events: &mut Vec<Event>,
    kind: ThreadKind,
    insect_region: u32,
    reach: u32,
) {
    apply(
        world,
        Command::PlaceFirstMushroom {
            kind,
            region: RegionId::new(0),
        },
        events,
    );
    apply(
        world,
        Command::PlaceFirstInsect {
            region: RegionId::new(insect_region),
        },
        events,
    );
    for target in 1..=reach {
        apply(
            world,
            Command::BranchThread {
                region: RegionId::new(target),
            },
            events,
        );
        if target < reach {
            pass_round(world, events);
        }
    }
}

#[test]
fn short_life_cut_withers_at_the_next_round() {
    let (mut world, mut events) = world_with_board(&[RegionKind::MultiThread; 4]);
    weave_line(
        &mut world,
        &mut events,
        ThreadKind::ShortLife,
        3,
        3,
    );

    apply(&mut world, Command::EndTurn, &mut events);
    events.clear();
    apply(
        &mut world,
        Command::CutThread {
            insect: InsectId::new(0),
            region: RegionId::new(2),
        },
        &mut events,
    );
    assert_eq!(
        events,
        vec![Event::CutScheduled {
            thread: ThreadId::new(0),
            region: RegionId::new(2),
            rounds_left: 1,
        }]
    );

    events.clear();
    apply(&mut world, Command::EndTurn, &mut events);
    assert!(events.contains(&Event::ThreadRetreated {
        thread: ThreadId::new(0),
        region: RegionId::new(2),
    }));
    // Region three lost contact with the mushroom anchor and withered too.
    assert!(events.contains(&Event::ThreadRetreated {
        thread: ThreadId::new(0),
        region: RegionId::new(3),
    }));
    assert_eq!(
        thread_regions(&world),
        vec![RegionId::new(0), RegionId::new(1)]
    );
    let regions = query::region_view(&world).into_vec();
    assert!(regions[2].threads.is_empty());
    assert!(regions[3].threads.is_empty());
}

#[test]
fn long_life_cut_survives_one_round_boundary() {
    let (mut world, mut events) = world_with_board(&[RegionKind::MultiThread; 4]);
    weave_line(
        &mut world,
        &mut events,
        ThreadKind::LongLife,
        3,
        3,
    );

    apply(&mut world, Command::EndTurn, &mut events);
    events.clear();
    apply(
        &mut world,
        Command::CutThread {
            insect: InsectId::new(0),
            region: RegionId::new(2),
        },
        &mut events,
    );
    assert_eq!(
        events,
        vec![Event::CutScheduled {
            thread: ThreadId::new(0),
            region: RegionId::new(2),
            rounds_left: 2,
        }]
    );

    apply(&mut world, Command::EndTurn, &mut events);
    let threads = query::thread_view(&world).into_vec();
    assert_eq!(
        threads[0].regions,
        vec![
            RegionId::new(0),
            RegionId::new(1),
            RegionId::new(2),
            RegionId::new(3),
        ]
    );
    assert_eq!(threads[0].severances.len(), 1);
    assert_eq!(threads[0].severances[0].rounds_left, 1);

    pass_round(&mut world, &mut events);
    assert_eq!(
        thread_regions(&world),
        vec![RegionId::new(0), RegionId::new(1)]
    );
}

#[test]
fn keep_thread_regions_anchor_orphaned_sections() {
    let (mut world, mut events) = world_with_board(&[
        RegionKind::MultiThread,
        RegionKind::MultiThread,
        RegionKind::MultiThread,
        RegionKind::KeepThread,
    ]);
    weave_line(
        &mut world,
        &mut events,
        ThreadKind::ShortLife,
        2,
        3,
    );

    apply(&mut world, Command::EndTurn, &mut events);
    apply(
        &mut world,
        Command::CutThread {
            insect: InsectId::new(0),
            region: RegionId::new(1),
        },
        &mut events,
    );
    events.clear();
    apply(&mut world, Command::EndTurn, &mut events);

    // The far sections survive because the keep-thread corner anchors them.
    assert_eq!(
        thread_regions(&world),
        vec![RegionId::new(0), RegionId::new(2), RegionId::new(3)]
    );
    let regions = query::region_view(&world).into_vec();
    assert!(regions[1].threads.is_empty());
}

#[test]
fn absorbing_region_strips_threads_every_fourth_round() {
    let (mut world, mut events) = world_with_board(&[
        RegionKind::MultiThread,
        RegionKind::MultiThread,
        RegionKind::Absorbing,
        RegionKind::MultiThread,
    ]);
    weave_line(
        &mut world,
        &mut events,
        ThreadKind::ShortLife,
        3,
        3,
    );
    assert_eq!(
        thread_regions(&world),
        vec![RegionId::new(0), RegionId::new(1), RegionId::new(2), RegionId::new(3)]
    );

    events.clear();
    pass_round(&mut world, &mut events);
    assert_eq!(query::round(&world), 4);

    assert!(events.contains(&Event::ThreadRetreated {
        thread: ThreadId::new(0),
        region: RegionId::new(2),
    }));
    assert_eq!(
        thread_regions(&world),
        vec![RegionId::new(0), RegionId::new(1)]
    );
}

#[test]
fn mushrooms_cannot_grow_on_absorbing_regions() {
    let (mut world, mut events) = world_with_board(&[
        RegionKind::MultiThread,
        RegionKind::Absorbing,
        RegionKind::MultiThread,
        RegionKind::MultiThread,
    ]);
    weave_line(
        &mut world,
        &mut events,
        ThreadKind::ShortLife,
        3,
        1,
    );
    for _ in 0..3 {
        let sown = scaffold::sow_spore(
            &mut world,
            RegionId::new(1),
            SporeKind::Slow,
            ThreadId::new(0),
        );
        assert!(sown.is_some());
    }

    events.clear();
    apply(
        &mut world,
        Command::GrowMushroom {
            region: RegionId::new(1),
        },
        &mut events,
    );
    assert_eq!(
        events,
        vec![Event::ActionFailed {
            action: ActionKind::GrowMushroom,
            reason: ActionError::InvalidTarget,
        }]
    );
}

#[test]
fn paralysed_insect_can_be_eaten_next_round() {
    let (mut world, mut events) = world_with_board(&[RegionKind::MultiThread; 4]);
    weave_line(
        &mut world,
        &mut events,
        ThreadKind::ShortLife,
        2,
        2,
    );

    let sown = scaffold::sow_spore(
        &mut world,
        RegionId::new(1),
        SporeKind::Paralysing,
        ThreadId::new(0),
    );
    assert!(sown.is_some());
    apply(&mut world, Command::EndTurn, &mut events);
    apply(
        &mut world,
        Command::MoveInsect {
            insect: InsectId::new(0),
            region: RegionId::new(1),
        },
        &mut events,
    );
    apply(&mut world, Command::EndTurn, &mut events);

    events.clear();
    apply(
        &mut world,
        Command::EatInsect {
            insect: InsectId::new(0),
        },
        &mut events,
    );
    assert!(events.contains(&Event::InsectEaten {
        insect: InsectId::new(0),
        region: RegionId::new(1),
    }));
    assert!(events.contains(&Event::MushroomPlaced {
        mushroom: MushroomId::new(1),
        thread: ThreadId::new(0),
        region: RegionId::new(1),
    }));
    assert!(query::insect_view(&world).into_vec().is_empty());
    assert_eq!(query::fungus_scores(&world)[0].score, 2);
    assert_eq!(query::insect_scores(&world)[0].score, 1);
}

#[test]
fn untouched_insects_cannot_be_eaten() {
    let (mut world, mut events) = world_with_board(&[RegionKind::MultiThread; 4]);
    weave_line(
        &mut world,
        &mut events,
        ThreadKind::ShortLife,
        1,
        1,
    );

    events.clear();
    apply(
        &mut world,
        Command::EatInsect {
            insect: InsectId::new(0),
        },
        &mut events,
    );
    assert_eq!(
        events,
        vec![Event::ActionFailed {
            action: ActionKind::EatInsect,
            reason: ActionError::InvalidTarget,
        }]
    );
}
