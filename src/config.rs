use crate::error::Error;
use crate::location::Coord;

/// Settings for a [`Game`](crate::game::Game) and the levels it generates.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GameConfig {
    /// Grid height of generated levels.
    pub rows: Coord,
    /// Grid width of generated levels.
    pub cols: Coord,
    /// How many times generation may restart from fresh anchors before giving up.
    pub max_generation_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 6,
            cols: 8,
            max_generation_attempts: 16,
        }
    }
}

impl GameConfig {
    /// Default settings with the given grid size.
    pub fn with_dims(rows: Coord, cols: Coord) -> Self {
        Self {
            rows,
            cols,
            ..Default::default()
        }
    }

    /// Reject configurations no level can be built from.
    pub fn validate(&self) -> Result<(), Error> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.max_generation_attempts == 0 {
            return Err(Error::InvalidConfig("at least one generation attempt is required"));
        }

        Ok(())
    }
}
