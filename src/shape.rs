//! Directions, connector masks and the pipe shapes built from them.

use std::fmt::{Debug, Formatter};
use std::ops::{BitOr, BitOrAssign};

use itertools::Itertools;
use strum::VariantArray;

use crate::location::Location;

/// One of the four cardinal directions, each occupying its own bit of a [`Connections`] mask.
///
/// [`VARIANTS`](VariantArray::VARIANTS) lists them in clockwise order starting from [`North`](Direction::North).
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
#[repr(u8)]
pub enum Direction {
    /// Up, towards row 0.
    North = 1,
    /// Towards higher columns.
    East = 2,
    /// Towards higher rows.
    South = 4,
    /// Towards column 0.
    West = 8,
}

impl Direction {
    /// The bit this direction occupies in a [`Connections`] mask.
    #[inline]
    pub fn bit(self) -> u8 {
        self as u8
    }

    /// Attempt the step from `location` in the direction specified by `self` and return the resultant [`Location`].
    ///
    /// Stepping north from row 0 or west from column 0 wraps to a location which is out of bounds for any grid.
    pub fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::North => location.offset_by((-1, 0)),
            Self::East => location.offset_by((0, 1)),
            Self::South => location.offset_by((1, 0)),
            Self::West => location.offset_by((0, -1)),
        }
    }

    /// Invert the direction specified by `self`.
    pub fn invert(&self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Turn this direction clockwise by `quarter_turns` (N -> E -> S -> W -> N), modulo 4.
    pub fn rotated_cw(self, quarter_turns: u8) -> Self {
        let index = Self::VARIANTS.iter().position(|dir| *dir == self).unwrap_or_default();
        Self::VARIANTS[(index + quarter_turns as usize) % Self::VARIANTS.len()]
    }

    /// Determine the direction from `a` to `b` by calling [`attempt_from`](Self::attempt_from) until one works.
    ///
    /// Returns [`None`] if the two locations are not orthogonally adjacent.
    pub fn direction_to(a: Location, b: Location) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|dir| dir.attempt_from(a) == b)
    }
}

/// A set of [`Direction`]s packed into the low four bits of a byte.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Connections(u8);

impl Connections {
    /// The empty set.
    pub const NONE: Self = Self(0);
    /// Every direction.
    pub const ALL: Self = Self(0b1111);

    /// Build a mask from raw bits. Anything above the low four bits is discarded.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1111)
    }

    /// The raw bits of this mask.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether `direction` has a connector.
    pub fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Whether no side has a connector.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of connectors.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// The directions present in this mask, in clockwise order from north.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::VARIANTS.iter().copied().filter(move |dir| self.contains(*dir))
    }

    /// Turn every direction in this mask clockwise by `quarter_turns`.
    pub fn rotated_cw(self, quarter_turns: u8) -> Self {
        self.iter()
            .map(|dir| dir.rotated_cw(quarter_turns))
            .fold(Self::NONE, |acc, dir| acc | dir)
    }
}

impl From<Direction> for Connections {
    fn from(value: Direction) -> Self {
        Self(value.bit())
    }
}

impl<T: Into<Connections>> BitOr<T> for Connections {
    type Output = Self;

    fn bitor(self, rhs: T) -> Self::Output {
        Self(self.0 | rhs.into().0)
    }
}

impl<T: Into<Connections>> BitOrAssign<T> for Connections {
    fn bitor_assign(&mut self, rhs: T) {
        self.0 |= rhs.into().0
    }
}

impl BitOr for Direction {
    type Output = Connections;

    fn bitor(self, rhs: Self) -> Self::Output {
        Connections::from(self) | rhs
    }
}

impl Debug for Connections {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Connections({})", self.iter().map(|dir| format!("{dir:?}")).join("|"))
    }
}

/// The unrotated connection pattern of a pipe tile.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Default, Ord, PartialOrd)]
pub enum PipeShape {
    /// North and south.
    Straight,
    /// North and east.
    Elbow,
    /// North, east and south.
    Tee,
    /// All four directions.
    Cross,
    /// No connections at all; only seen mid-generation or on hand-built grids.
    #[default]
    Empty,
}

impl PipeShape {
    /// The shapes handed out to cells off the solution path.
    pub const DECOYS: [Self; 4] = [Self::Straight, Self::Elbow, Self::Tee, Self::Cross];

    /// This shape's connections at rotation 0.
    pub fn connections(self) -> Connections {
        match self {
            Self::Straight => Direction::North | Direction::South,
            Self::Elbow => Direction::North | Direction::East,
            Self::Tee => Direction::North | Direction::East | Direction::South,
            Self::Cross => Connections::ALL,
            Self::Empty => Connections::NONE,
        }
    }

    /// Find the two-connection shape and rotation that produce exactly `mask`.
    ///
    /// Only the six orientations of [`Straight`](Self::Straight) and [`Elbow`](Self::Elbow) are recognised.
    pub fn for_path_mask(mask: Connections) -> Option<(Self, u8)> {
        use Direction::*;

        let table = [
            (North | South, (Self::Straight, 0)),
            (East | West, (Self::Straight, 1)),
            (North | East, (Self::Elbow, 0)),
            (East | South, (Self::Elbow, 1)),
            (South | West, (Self::Elbow, 2)),
            (West | North, (Self::Elbow, 3)),
        ];

        table.into_iter().find(|(candidate, _)| *candidate == mask).map(|(_, found)| found)
    }
}

/// A box-drawing glyph for a connection mask. The empty mask draws as `.`.
pub(crate) fn glyph(connections: Connections) -> char {
    const GLYPHS: [char; 16] = [
        '.', '╵', '╶', '└', '╷', '│', '┌', '├', '╴', '┘', '─', '┴', '┐', '┤', '┬', '┼',
    ];
    GLYPHS[connections.bits() as usize]
}
