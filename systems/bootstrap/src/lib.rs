#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a Fungorium match.

use fungorium_core::{Command, Faction, RegionKind, RegionSpec};
use fungorium_world::{query, World};

/// Side length of the standard square board.
const STANDARD_SIDE: u32 = 3;

/// Produces data required to greet the players and start a match.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Exposes the player whose turn it is for presentation purposes.
    #[must_use]
    pub fn current_player(&self, world: &World) -> Option<query::PlayerSnapshot> {
        query::current_player(world)
    }

    /// Exposes both factions' score lines in registration order.
    #[must_use]
    pub fn scoreboard(&self, world: &World) -> (Vec<query::ScoreEntry>, Vec<query::ScoreEntry>) {
        (query::fungus_scores(world), query::insect_scores(world))
    }
}

/// Describes the standard board: a three-by-three grid of regions.
///
/// Sides run north, east, south, west; edge-facing sides stay open. The
/// north-west corner keeps threads alive, the centre admits a single thread,
/// and the south-east corner absorbs threads. Every other region is a plain
/// multi-thread region.
#[must_use]
pub fn standard_board() -> Vec<RegionSpec> {
    let side = STANDARD_SIDE;
    (0..side * side)
        .map(|index| {
            let row = index / side;
            let col = index % side;
            let north = (row > 0).then(|| index - side);
            let east = (col + 1 < side).then(|| index + 1);
            let south = (row + 1 < side).then(|| index + side);
            let west = (col > 0).then(|| index - 1);
            let kind = match index {
                0 => RegionKind::KeepThread,
                4 => RegionKind::SingleThread,
                8 => RegionKind::Absorbing,
                _ => RegionKind::MultiThread,
            };
            RegionSpec::new(kind, vec![north, east, south, west])
        })
        .collect()
}

/// Builds the command sequence that configures the standard board and seats
/// the named players, fungus side first.
#[must_use]
pub fn setup_commands(fungus_names: &[&str], insect_names: &[&str]) -> Vec<Command> {
    let mut commands = vec![Command::ConfigureBoard {
        regions: standard_board(),
    }];
    for name in fungus_names {
        commands.push(Command::RegisterPlayer {
            name: (*name).to_owned(),
            faction: Faction::Fungus,
        });
    }
    for name in insect_names {
        commands.push(Command::RegisterPlayer {
            name: (*name).to_owned(),
            faction: Faction::Insects,
        });
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use fungorium_core::{Event, RegionId};
    use fungorium_world::apply;

    #[test]
    fn standard_board_links_neighbors_both_ways() {
        let board = standard_board();
        assert_eq!(board.len(), 9);
        for (index, spec) in board.iter().enumerate() {
            for neighbor in spec.neighbors.iter().flatten() {
                let other = &board[*neighbor as usize];
                assert!(
                    other.neighbors.contains(&Some(index as u32)),
                    "region {index} links to {neighbor} without a back link"
                );
            }
        }
    }

    #[test]
    fn standard_board_corner_kinds() {
        let board = standard_board();
        assert_eq!(board[0].kind, RegionKind::KeepThread);
        assert_eq!(board[4].kind, RegionKind::SingleThread);
        assert_eq!(board[8].kind, RegionKind::Absorbing);
    }

    #[test]
    fn setup_commands_seat_players_after_configuring() {
        let mut world = World::new();
        let mut events = Vec::new();
        for command in setup_commands(&["amanita"], &["atta"]) {
            apply(&mut world, command, &mut events);
        }

        assert!(events.contains(&Event::BoardConfigured { regions: 9 }));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::ActionFailed { .. })));

        let bootstrap = Bootstrap;
        assert_eq!(bootstrap.welcome_banner(&world), "Welcome to Fungorium.");
        let (fungus, insects) = bootstrap.scoreboard(&world);
        assert_eq!(fungus.len(), 1);
        assert_eq!(insects.len(), 1);
        assert_eq!(fungus[0].name, "amanita");

        let region_count = query::region_view(&world).iter().count();
        assert_eq!(region_count, 9);
        assert!(query::region_view(&world)
            .iter()
            .any(|region| region.id == RegionId::new(0)));
    }
}
