use std::hash::{Hash, Hasher};

use crate::location::Location;
use crate::shape::{Connections, PipeShape};

/// Number of distinct rotations a tile can take.
pub(crate) const ROTATIONS: u8 = 4;

/// A single grid cell: a pipe shape turned some number of quarter turns clockwise.
///
/// Tiles are identified by their [`Location`]; two tiles with the same shape and rotation
/// behave identically for flow purposes but are never equal unless they share a location.
#[derive(Clone, Copy, Debug)]
pub struct Tile {
    pub(crate) location: Location,
    pub(crate) shape: PipeShape,
    pub(crate) rotation: u8,
    pub(crate) lit: bool,
    pub(crate) locked: bool,
}

impl Tile {
    pub(crate) fn new(location: Location, shape: PipeShape) -> Self {
        Self {
            location,
            shape,
            rotation: 0,
            lit: false,
            locked: false,
        }
    }

    /// Where the tile sits in its grid.
    pub fn location(&self) -> Location {
        self.location
    }

    /// The unrotated pipe shape.
    pub fn shape(&self) -> PipeShape {
        self.shape
    }

    /// Quarter turns clockwise from the shape's base orientation, always in `0..4`.
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Whether the most recent flow evaluation reached this tile.
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Locked tiles ignore [`rotate_once`](Self::rotate_once).
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// The live connection set: every direction of the base shape turned clockwise `rotation` times.
    ///
    /// Always derived from `(shape, rotation)`; nothing is cached.
    pub fn current_connections(&self) -> Connections {
        self.shape.connections().rotated_cw(self.rotation)
    }

    /// Turn the tile a quarter turn clockwise, unless it is locked.
    pub fn rotate_once(&mut self) {
        if self.locked {
            return;
        }
        self.rotation = (self.rotation + 1) % ROTATIONS;
    }

    pub(crate) fn set_rotation(&mut self, rotation: u8) {
        self.rotation = rotation % ROTATIONS;
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
    }
}

impl Eq for Tile {}

impl Hash for Tile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.location.hash(state)
    }
}
