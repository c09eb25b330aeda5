//! Hand-placed grids.

use std::num::NonZero;

use ndarray::{Array2, AssignElem};

use crate::anchor::{Anchor, Side};
use crate::board::Grid;
use crate::cell::{Tile, ROTATIONS};
use crate::location::{Coord, Dimension, Location};
use crate::shape::PipeShape;

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum BuilderInvalidReason {
    /// A tile or anchor was placed outside the bounds specified by `dims` on the builder.
    #[error("feature placed outside the grid")]
    FeatureOutOfBounds,
    /// An anchor was placed on a cell which does not lie along the side it was given.
    #[error("anchor does not lie on its side of the grid")]
    AnchorOffSide,
    /// [`build`](GridBuilder::build) was called before both the entry and exit anchors were set.
    #[error("entry or exit anchor missing")]
    MissingAnchor,
    /// A rotation of 4 or more was requested.
    #[error("rotation outside 0..4")]
    InvalidRotation,
}

/// A builder for hand-placed grids, mostly useful for fixed puzzles and tests.
///
/// Every cell starts as [`PipeShape::Empty`] at rotation 0.
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
///
/// ```
/// # use std::num::NonZero;
/// # use pipewright::builder::GridBuilder;
/// # use pipewright::{Location, PipeShape, Side};
/// let grid = GridBuilder::with_dims((NonZero::new(2).unwrap(), NonZero::new(1).unwrap()))
///     .set_tile(Location(0, 0), PipeShape::Straight, 0)
///     .set_tile(Location(1, 0), PipeShape::Straight, 0)
///     .set_entry(Location(0, 0), Side::Top)
///     .set_exit(Location(1, 0), Side::Bottom)
///     .build()
///     .unwrap();
///
/// assert_eq!(format!("{}", grid), "│\n│\n");
/// ```
#[derive(Clone)]
pub struct GridBuilder {
    // rows, cols
    dims: (Dimension, Dimension),
    cells: Array2<Tile>,
    entry: Option<Anchor>,
    exit: Option<Anchor>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::with_dims((NonZero::<Coord>::MIN, NonZero::<Coord>::MIN))
    }
}

impl GridBuilder {
    /// Construct a new [`Self`] with the specified dimensions, specified in `(rows, cols)` order.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            dims,
            cells: Array2::from_shape_fn((dims.0.get(), dims.1.get()), |ind| {
                Tile::new(Location::from(ind), PipeShape::Empty)
            }),
            entry: None,
            exit: None,
            invalid_reasons: Default::default(),
        }
    }

    #[inline]
    fn raw_dims(&self) -> (Coord, Coord) {
        (self.dims.0.get(), self.dims.1.get())
    }

    /// Place `shape` at `location` turned `rotation` quarter turns clockwise.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) or
    /// [`InvalidRotation`](BuilderInvalidReason::InvalidRotation) invalid state.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn set_tile(&mut self, location: Location, shape: PipeShape, rotation: u8) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if rotation >= ROTATIONS {
            self.invalid_reasons.push(BuilderInvalidReason::InvalidRotation);
            return self;
        }

        match self.cells.get_mut(location.as_index()) {
            None => self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds),
            Some(cell) => {
                let mut tile = Tile::new(location, shape);
                tile.set_rotation(rotation);
                tile.locked = cell.locked;
                cell.assign_elem(tile);
            }
        }

        self
    }

    /// Fill every cell in row-major order from `shapes`, all at rotation 0.
    ///
    /// Extra shapes are ignored and missing ones leave cells as they were.
    pub fn fill(&mut self, shapes: impl IntoIterator<Item = PipeShape>) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        for (cell, shape) in self.cells.iter_mut().zip(shapes) {
            cell.shape = shape;
            cell.rotation = 0;
        }

        self
    }

    /// Prevent the tile at `location` from being rotated during play.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn lock(&mut self, location: Location) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        match self.cells.get_mut(location.as_index()) {
            None => self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds),
            Some(cell) => cell.locked = true,
        }

        self
    }

    /// Set where flow enters the grid.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) or
    /// [`AnchorOffSide`](BuilderInvalidReason::AnchorOffSide) invalid state.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn set_entry(&mut self, location: Location, side: Side) -> &mut Self {
        if let Some(anchor) = self.checked_anchor(location, side) {
            self.entry = Some(anchor);
        }
        self
    }

    /// Set where flow must leave the grid. Same conditions as [`Self::set_entry`].
    pub fn set_exit(&mut self, location: Location, side: Side) -> &mut Self {
        if let Some(anchor) = self.checked_anchor(location, side) {
            self.exit = Some(anchor);
        }
        self
    }

    fn checked_anchor(&mut self, location: Location, side: Side) -> Option<Anchor> {
        if !self.invalid_reasons.is_empty() {
            return None;
        }

        if !location.within(self.raw_dims()) {
            self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds);
            return None;
        }

        if !side.borders(location, self.raw_dims()) {
            self.invalid_reasons.push(BuilderInvalidReason::AnchorOffSide);
            return None;
        }

        Some(Anchor::new(location, side))
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    /// Missing anchors are only reported by [`Self::build`].
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Grid`].
    ///
    /// If the builder is invalid for any reason, a [`Vec`] of [`BuilderInvalidReason`] will indicate why.
    pub fn build(&self) -> Result<Grid, Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(self.invalid_reasons.clone());
        }

        match (self.entry, self.exit) {
            (Some(entry), Some(exit)) => Ok(Grid::new(self.cells.clone(), entry, exit)),
            _ => Err(vec![BuilderInvalidReason::MissingAnchor]),
        }
    }
}
