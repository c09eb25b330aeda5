use std::fmt::{Display, Formatter};

use ndarray::{Array2, ArrayView2};

use crate::anchor::Anchor;
use crate::cell::Tile;
use crate::location::{Coord, Location};
use crate::shape::glyph;

/// One level: a rectangle of [`Tile`]s plus the entry and exit [`Anchor`]s.
///
/// A grid is built once, either by the [`generator`](crate::generator) or a [`GridBuilder`](crate::builder::GridBuilder),
/// and only ever changes afterwards through [`rotate`](Self::rotate) and flow evaluation.
/// Starting a new level replaces the grid outright.
#[derive(Clone, Debug)]
pub struct Grid {
    pub(crate) tiles: Array2<Tile>,
    pub(crate) entry: Anchor,
    pub(crate) exit: Anchor,
}

impl Grid {
    pub(crate) fn new(tiles: Array2<Tile>, entry: Anchor, exit: Anchor) -> Self {
        Self { tiles, entry, exit }
    }

    /// `(rows, cols)`.
    pub fn dims(&self) -> (Coord, Coord) {
        self.tiles.dim()
    }

    /// Number of rows.
    pub fn rows(&self) -> Coord {
        self.tiles.nrows()
    }

    /// Number of columns.
    pub fn cols(&self) -> Coord {
        self.tiles.ncols()
    }

    /// The tile at `location`, or [`None`] if it lies outside the grid.
    pub fn tile(&self, location: Location) -> Option<&Tile> {
        self.tiles.get(location.as_index())
    }

    pub(crate) fn tile_mut(&mut self, location: Location) -> Option<&mut Tile> {
        self.tiles.get_mut(location.as_index())
    }

    /// A read-only view of every tile, indexed `(row, col)`.
    pub fn tiles(&self) -> ArrayView2<'_, Tile> {
        self.tiles.view()
    }

    /// `(entry, exit)`.
    pub fn anchors(&self) -> (&Anchor, &Anchor) {
        (&self.entry, &self.exit)
    }

    /// Where flow comes in.
    pub fn entry(&self) -> &Anchor {
        &self.entry
    }

    /// Where flow has to leave for the level to be won.
    pub fn exit(&self) -> &Anchor {
        &self.exit
    }

    /// Turn the tile at `(row, col)` a quarter turn clockwise.
    ///
    /// Coordinates outside the grid are ignored, as are locked tiles.
    /// Flow is not re-evaluated; see [`flow::evaluate`](crate::flow::evaluate).
    pub fn rotate(&mut self, row: Coord, col: Coord) {
        match self.tile_mut(Location(row, col)) {
            Some(tile) => {
                tile.rotate_once();
                log::trace!("rotated ({row}, {col}) to {}", tile.rotation);
            }
            None => log::trace!("ignoring rotation outside the grid at ({row}, {col})"),
        }
    }

    /// Locations of every tile lit by the most recent flow evaluation, in row-major order.
    pub fn lit_locations(&self) -> impl Iterator<Item = Location> + '_ {
        self.tiles.iter().filter(|tile| tile.lit).map(|tile| tile.location)
    }

    /// Dump the lit state of every tile, `#` for lit and `.` for dark, one row per line.
    pub fn lit_map(&self) -> String {
        let mut out = String::with_capacity(self.rows() * (self.cols() + 1));

        for row in self.tiles.rows() {
            for tile in row {
                out.push(if tile.lit { '#' } else { '.' });
            }
            out.push('\n');
        }

        out
    }
}

impl Display for Grid {
    /// Draws each tile's current connections as a box-drawing glyph, one row per line.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.tiles.rows() {
            for tile in row {
                write!(f, "{}", glyph(tile.current_connections()))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
