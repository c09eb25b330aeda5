use rand::Rng;
use strum::VariantArray;

use crate::location::{Coord, Location};
use crate::shape::Direction;

/// A side of the grid's perimeter.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum Side {
    /// Row 0, opening north.
    Top,
    /// The last column, opening east.
    Right,
    /// The last row, opening south.
    Bottom,
    /// Column 0, opening west.
    Left,
}

impl Side {
    /// The direction pointing off the grid from a cell on this side.
    pub fn outward(self) -> Direction {
        match self {
            Self::Top => Direction::North,
            Self::Right => Direction::East,
            Self::Bottom => Direction::South,
            Self::Left => Direction::West,
        }
    }

    /// The side two positions away, i.e. across the grid.
    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// Whether `location` is a cell along this side of a grid with `dims` `(rows, cols)`.
    pub fn borders(self, location: Location, dims: (Coord, Coord)) -> bool {
        if !location.within(dims) {
            return false;
        }

        match self {
            Self::Top => location.row() == 0,
            Self::Right => location.col() == dims.1 - 1,
            Self::Bottom => location.row() == dims.0 - 1,
            Self::Left => location.col() == 0,
        }
    }

    /// A uniformly random cell along this side of a grid with `dims` `(rows, cols)`.
    ///
    /// Both dimensions must be nonzero.
    pub(crate) fn random_cell<R: Rng + ?Sized>(self, dims: (Coord, Coord), rng: &mut R) -> Location {
        let (rows, cols) = dims;
        match self {
            Self::Top => Location(0, rng.gen_range(0..cols)),
            Self::Right => Location(rng.gen_range(0..rows), cols - 1),
            Self::Bottom => Location(rows - 1, rng.gen_range(0..cols)),
            Self::Left => Location(rng.gen_range(0..rows), 0),
        }
    }
}

/// A boundary cell where flow enters or must leave the grid.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Anchor {
    pub(crate) location: Location,
    pub(crate) side: Side,
}

impl Anchor {
    pub(crate) fn new(location: Location, side: Side) -> Self {
        Self { location, side }
    }

    /// The border cell flow enters or leaves through.
    pub fn location(&self) -> Location {
        self.location
    }

    /// The grid edge the anchor opens onto.
    pub fn side(&self) -> Side {
        self.side
    }

    /// The direction pointing off the grid from this anchor's cell.
    pub fn outward(&self) -> Direction {
        self.side.outward()
    }
}
