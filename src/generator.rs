//! Building solvable, scrambled levels from nothing.
//!
//! Generation runs in stages, each of which is exposed for testing:
//! 1. [`place_anchors`] picks an entry side at random and puts the exit on the opposite side.
//! 2. [`carve_path`] runs a randomized depth-first search from the entry cell to the exit cell.
//! 3. [`stamp_path`] gives every cell on that path the straight or elbow that carries flow through it.
//! 4. [`fill_decoys`] puts a random shape on every other cell.
//! 5. [`scramble`] randomizes every rotation, hiding the solution.
//!
//! Shapes never change after stamping, so the rotations computed in stage 3 always solve the level.

use itertools::Itertools;
use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::Rng;
use strum::VariantArray;

use crate::anchor::{Anchor, Side};
use crate::board::Grid;
use crate::cell::{Tile, ROTATIONS};
use crate::config::GameConfig;
use crate::error::Error;
use crate::location::{Coord, Location};
use crate::shape::{Connections, Direction, PipeShape};

/// One cell of a [`SolutionPath`]: the shape stamped there and the rotation that carries flow through it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SolutionStep {
    /// The path cell.
    pub location: Location,
    /// Always a straight or an elbow, or a cross if no two-connection shape fits.
    pub shape: PipeShape,
    /// Quarter turns that carry flow through the cell.
    pub rotation: u8,
}

/// The cells connecting entry to exit, in flow order, as they were before scrambling.
///
/// Grids never hold on to this; it is handed back from generation only so a caller can check or reveal the answer.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SolutionPath {
    steps: Vec<SolutionStep>,
}

impl SolutionPath {
    /// Every path cell, entry first.
    pub fn steps(&self) -> &[SolutionStep] {
        &self.steps
    }

    /// Number of cells on the path.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the path has no cells. Never the case for generated levels.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The path cells, entry first.
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        self.steps.iter().map(|step| step.location)
    }

    /// Force every path cell of `grid` back to its solved rotation. Locked tiles are overwritten too.
    pub fn apply(&self, grid: &mut Grid) {
        for step in &self.steps {
            if let Some(tile) = grid.tile_mut(step.location) {
                tile.set_rotation(step.rotation);
            }
        }
    }
}

/// Generate a scrambled, solvable `rows` x `cols` level with the default retry cap.
pub fn generate_level<R: Rng + ?Sized>(rows: Coord, cols: Coord, rng: &mut R) -> Result<Grid, Error> {
    generate_level_with_solution(&GameConfig::with_dims(rows, cols), rng).map(|(grid, _)| grid)
}

/// Generate a scrambled, solvable level as described by `config`, along with the path that solves it.
///
/// If carving fails, generation restarts from fresh anchors, at most
/// [`max_generation_attempts`](GameConfig::max_generation_attempts) times in total.
pub fn generate_level_with_solution<R: Rng + ?Sized>(
    config: &GameConfig,
    rng: &mut R,
) -> Result<(Grid, SolutionPath), Error> {
    generate_with_carver(config, rng, carve_path)
}

pub(crate) fn generate_with_carver<R, C>(
    config: &GameConfig,
    rng: &mut R,
    mut carve: C,
) -> Result<(Grid, SolutionPath), Error>
where
    R: Rng + ?Sized,
    C: FnMut((Coord, Coord), Location, Location, &mut R) -> Option<Vec<Location>>,
{
    config.validate()?;
    let dims = (config.rows, config.cols);

    for attempt in 1..=config.max_generation_attempts {
        let (entry, exit) = place_anchors(dims, rng);
        log::debug!(
            "attempt {attempt}: entry {:?} on {:?}, exit {:?} on {:?}",
            entry.location, entry.side, exit.location, exit.side
        );

        let Some(path) = carve(dims, entry.location, exit.location, &mut *rng) else {
            log::warn!("attempt {attempt}: no path from {:?} to {:?}, retrying", entry.location, exit.location);
            continue;
        };
        log::debug!("attempt {attempt}: carved a path of {} cells", path.len());

        let mut grid = blank_grid(dims, entry, exit);
        let solution = stamp_path(&mut grid, &path);
        fill_decoys(&mut grid, rng);
        scramble(&mut grid, rng);

        log::info!("generated a {}x{} level with a {} cell solution", dims.0, dims.1, solution.len());
        return Ok((grid, solution));
    }

    Err(Error::GenerationExhausted {
        attempts: config.max_generation_attempts,
    })
}

pub(crate) fn blank_grid(dims: (Coord, Coord), entry: Anchor, exit: Anchor) -> Grid {
    let tiles = Array2::from_shape_fn(dims, |ind| Tile::new(Location::from(ind), PipeShape::Empty));
    Grid::new(tiles, entry, exit)
}

/// Pick a uniformly random side for the entry and put the exit on the side across from it,
/// each at a uniformly random cell along its side.
///
/// Both dimensions must be nonzero.
pub fn place_anchors<R: Rng + ?Sized>(dims: (Coord, Coord), rng: &mut R) -> (Anchor, Anchor) {
    let entry_side = Side::VARIANTS[rng.gen_range(0..Side::VARIANTS.len())];
    let exit_side = entry_side.opposite();

    (
        Anchor::new(entry_side.random_cell(dims, rng), entry_side),
        Anchor::new(exit_side.random_cell(dims, rng), exit_side),
    )
}

/// Randomized depth-first search from `start` to `end` over the 4-neighbor grid.
///
/// The frontier is a stack, which favors long winding paths over short ones.
/// Each cell's parent is recorded in a table when the cell is first visited, and the path is read back
/// from that table once `end` comes off the stack.
///
/// Returns the path in `start` to `end` order, or [`None`] if the search runs dry first.
pub fn carve_path<R: Rng + ?Sized>(
    dims: (Coord, Coord),
    start: Location,
    end: Location,
    rng: &mut R,
) -> Option<Vec<Location>> {
    if !start.within(dims) || !end.within(dims) {
        return None;
    }

    let mut visited = Array2::from_elem(dims, false);
    let mut parents: Array2<Option<Location>> = Array2::from_elem(dims, None);
    let mut frontier: Vec<(Location, Option<Location>)> = vec![(start, None)];

    while let Some((current, parent)) = frontier.pop() {
        // a cell may be pushed by several neighbors; only the first pop counts
        if visited[current.as_index()] {
            continue;
        }
        visited[current.as_index()] = true;
        parents[current.as_index()] = parent;

        if current == end {
            return Some(trace_back(&parents, end));
        }

        let mut neighbors = Direction::VARIANTS
            .iter()
            .map(|dir| dir.attempt_from(current))
            .filter(|next| next.within(dims) && !visited[next.as_index()])
            .collect_vec();
        neighbors.shuffle(rng);

        frontier.extend(neighbors.into_iter().map(|next| (next, Some(current))));
    }

    None
}

// parents are always visited before their children, so this walk ends at the start cell
fn trace_back(parents: &Array2<Option<Location>>, end: Location) -> Vec<Location> {
    let mut path = vec![end];
    let mut cursor = end;
    while let Some(parent) = parents[cursor.as_index()] {
        path.push(parent);
        cursor = parent;
    }
    path.reverse();
    path
}

/// Give every cell on `path` the shape and rotation that joins the side flow arrives through
/// to the side it leaves through, and return those placements.
///
/// The first cell receives flow from the entry anchor's outward side, and the last cell hands it off
/// through the exit anchor's outward side. A pairing of sides no straight or elbow can join is stamped
/// as a [`Cross`](PipeShape::Cross) so the path still conducts.
pub fn stamp_path(grid: &mut Grid, path: &[Location]) -> SolutionPath {
    let entry_side = grid.entry.outward();
    let exit_side = grid.exit.outward();

    let mut steps = Vec::with_capacity(path.len());
    for (index, &location) in path.iter().enumerate() {
        let inbound = match index.checked_sub(1) {
            None => Some(entry_side),
            Some(prev) => Direction::direction_to(location, path[prev]),
        };
        let outbound = match path.get(index + 1) {
            None => Some(exit_side),
            Some(&next) => Direction::direction_to(location, next),
        };

        let mask = inbound.into_iter().chain(outbound).fold(Connections::NONE, |acc, dir| acc | dir);
        let (shape, rotation) = PipeShape::for_path_mask(mask).unwrap_or_else(|| {
            log::warn!("no straight or elbow matches {mask:?} at {location:?}, stamping a cross");
            (PipeShape::Cross, 0)
        });

        if let Some(tile) = grid.tile_mut(location) {
            tile.shape = shape;
            tile.set_rotation(rotation);
        }
        steps.push(SolutionStep { location, shape, rotation });
    }

    SolutionPath { steps }
}

/// Give every [`Empty`](PipeShape::Empty) cell a uniformly random shape from [`PipeShape::DECOYS`].
pub fn fill_decoys<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    for tile in grid.tiles.iter_mut().filter(|tile| tile.shape == PipeShape::Empty) {
        tile.shape = PipeShape::DECOYS[rng.gen_range(0..PipeShape::DECOYS.len())];
    }
}

/// Overwrite every tile's rotation with a uniformly random one. Shapes are untouched.
pub fn scramble<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    for tile in grid.tiles.iter_mut() {
        tile.set_rotation(rng.gen_range(0..ROTATIONS));
    }
}
