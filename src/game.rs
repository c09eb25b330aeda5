use std::fmt::{Debug, Formatter};

use rand::Rng;

use crate::board::Grid;
use crate::config::GameConfig;
use crate::error::Error;
use crate::flow::{evaluate, FlowReport};
use crate::generator::generate_level_with_solution;
use crate::location::Coord;

type WinCallback = Box<dyn FnMut(&Grid)>;

/// The current level and everything an input or render layer needs to drive it.
///
/// Every method takes `&mut self`, so a rotation and the evaluation that follows it always happen
/// together. Hosts delivering input from several threads should keep the game behind a single lock.
///
/// The win callback runs exactly once per won level, even when the level is already solved as generated.
/// Once a win has been observed, rotations are ignored until [`restart`](Self::restart) builds the next level.
pub struct Game<R: Rng> {
    config: GameConfig,
    rng: R,
    grid: Grid,
    last_report: FlowReport,
    won: bool,
    // whether the callback has seen this level's win
    notified: bool,
    on_win: Option<WinCallback>,
}

impl<R: Rng> Game<R> {
    /// Start a game on a freshly generated level.
    pub fn new(config: GameConfig, mut rng: R) -> Result<Self, Error> {
        let (grid, _) = generate_level_with_solution(&config, &mut rng)?;
        Ok(Self::with_grid(config, rng, grid))
    }

    /// Start a game on an existing grid, e.g. one from a [`GridBuilder`](crate::builder::GridBuilder).
    ///
    /// `rng` is only used by [`restart`](Self::restart).
    pub fn with_grid(config: GameConfig, rng: R, grid: Grid) -> Self {
        let mut game = Self {
            config,
            rng,
            grid,
            last_report: FlowReport::default(),
            won: false,
            notified: false,
            on_win: None,
        };
        game.recompute_flow();
        game
    }

    /// Register the function called the first time each level is observed to be won.
    ///
    /// If the current level is already won and no callback has been told yet, `callback` runs right away.
    pub fn on_win(&mut self, callback: impl FnMut(&Grid) + 'static) {
        self.on_win = Some(Box::new(callback));
        self.notify_win();
    }

    fn notify_win(&mut self) {
        if !self.won || self.notified {
            return;
        }
        if let Some(callback) = self.on_win.as_mut() {
            self.notified = true;
            callback(&self.grid);
        }
    }

    /// The current level.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The settings new levels are generated with.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Whether the current level has been won.
    pub fn is_won(&self) -> bool {
        self.won
    }

    /// The result of the most recent flow evaluation.
    pub fn last_report(&self) -> &FlowReport {
        &self.last_report
    }

    /// Rotate the tile at `(row, col)` and re-evaluate flow.
    ///
    /// Ignored once the level is won. Out-of-bounds coordinates rotate nothing but still re-evaluate.
    pub fn rotate_tile(&mut self, row: Coord, col: Coord) -> &FlowReport {
        if self.won {
            log::debug!("level already won, ignoring rotation at ({row}, {col})");
            return &self.last_report;
        }

        self.grid.rotate(row, col);
        self.recompute_flow()
    }

    /// Re-evaluate flow over the current grid, firing the win callback if this is the first win observed.
    pub fn recompute_flow(&mut self) -> &FlowReport {
        self.last_report = evaluate(&mut self.grid);

        if self.last_report.won && !self.won {
            self.won = true;
            log::info!("level won with {} tiles lit", self.last_report.lit.len());
        }
        self.notify_win();

        &self.last_report
    }

    /// Replace the current level with a freshly generated one. The win callback stays registered.
    ///
    /// On failure the current level is kept.
    pub fn restart(&mut self) -> Result<(), Error> {
        let (grid, _) = generate_level_with_solution(&self.config, &mut self.rng)?;
        self.grid = grid;
        self.won = false;
        self.notified = false;
        self.recompute_flow();
        Ok(())
    }
}

impl<R: Rng> Debug for Game<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("config", &self.config)
            .field("grid", &self.grid)
            .field("won", &self.won)
            .field("notified", &self.notified)
            .finish_non_exhaustive()
    }
}
