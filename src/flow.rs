//! Deciding which tiles carry flow and whether it reaches the exit.

use std::collections::HashSet;

use crate::board::Grid;
use crate::location::Location;
use crate::shape::Direction;

/// The outcome of a flow evaluation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FlowReport {
    /// Every tile the flow reached.
    pub lit: HashSet<Location>,
    /// Whether the flow leaves the grid through the exit anchor.
    pub won: bool,
}

/// Recompute which tiles are energized, updating every tile's lit flag in place.
///
/// # Rules
/// Flow enters through the entry anchor, but only if the entry tile currently has a connection
/// pointing off the grid in the anchor's outward direction. Otherwise nothing is lit.
///
/// Flow crosses the edge between two tiles only if both present a connector on that edge:
/// one tile's connection in direction D must be met by the neighbor's connection in the inverse of D.
///
/// The level is won once a lit exit tile has a connection in the exit anchor's outward direction.
///
/// The lit flag is the only visited marker. Re-evaluating an unchanged grid yields the same report.
pub fn evaluate(grid: &mut Grid) -> FlowReport {
    grid.tiles.iter_mut().for_each(|tile| tile.lit = false);

    let entry = grid.entry;
    let exit = grid.exit;
    let mut report = FlowReport::default();

    let powered = grid
        .tile(entry.location)
        .is_some_and(|tile| tile.current_connections().contains(entry.outward()));
    if !powered {
        log::trace!("entry tile at {:?} is not facing {:?}", entry.location, entry.outward());
        return report;
    }

    // (tile to light, side the flow came in through)
    let mut pending: Vec<(Location, Direction)> = vec![(entry.location, entry.outward())];

    while let Some((location, arrived_from)) = pending.pop() {
        let Some(tile) = grid.tile_mut(location) else {
            continue;
        };
        if tile.lit {
            continue;
        }
        tile.lit = true;
        report.lit.insert(location);

        let connections = tile.current_connections();
        if location == exit.location && connections.contains(exit.outward()) {
            report.won = true;
        }

        for direction in connections.iter().filter(|dir| *dir != arrived_from) {
            let neighbor = direction.attempt_from(location);
            let accepts = grid
                .tile(neighbor)
                .is_some_and(|other| other.current_connections().contains(direction.invert()));

            if accepts {
                pending.push((neighbor, direction.invert()));
            }
        }
    }

    report
}
