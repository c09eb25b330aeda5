//! Browser bindings: a thin [`wasm_bindgen`] wrapper over [`Game`] for a canvas front end.
//!
//! The front end owns drawing, pointer-to-cell mapping and rotation animation; it calls
//! [`WasmGame::rotate_tile`] with a cell index and reads tile state back to draw.

use js_sys::Function;
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::game::Game;
use crate::location::Location;

/// A [`Game`] owned by JavaScript.
#[wasm_bindgen]
pub struct WasmGame {
    game: Game<StdRng>,
}

#[wasm_bindgen]
impl WasmGame {
    /// Start a game of `rows` x `cols`, seeded from `Math.random`.
    #[wasm_bindgen(constructor)]
    pub fn new(rows: usize, cols: usize) -> Result<WasmGame, JsError> {
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
        Self::with_seed(rows, cols, seed)
    }

    /// Start a reproducible game.
    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(rows: usize, cols: usize, seed: u64) -> Result<WasmGame, JsError> {
        let config = GameConfig::with_dims(rows, cols);
        let game = Game::new(config, StdRng::seed_from_u64(seed)).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self { game })
    }

    /// Called with no arguments the first time each level is won.
    #[wasm_bindgen(js_name = onWin)]
    pub fn on_win(&mut self, callback: Function) {
        self.game.on_win(move |_| {
            if let Err(e) = callback.call0(&JsValue::NULL) {
                log::error!("win callback threw: {e:?}");
            }
        });
    }

    /// Rotate a tile and re-evaluate; returns whether the level is won.
    #[wasm_bindgen(js_name = rotateTile)]
    pub fn rotate_tile(&mut self, row: usize, col: usize) -> bool {
        self.game.rotate_tile(row, col).won
    }

    /// Re-evaluate flow without rotating; returns whether the level is won.
    #[wasm_bindgen(js_name = recomputeFlow)]
    pub fn recompute_flow(&mut self) -> bool {
        self.game.recompute_flow().won
    }

    /// Generate the next level.
    pub fn restart(&mut self) -> Result<(), JsError> {
        self.game.restart().map_err(|e| JsError::new(&e.to_string()))
    }

    /// Grid height.
    pub fn rows(&self) -> usize {
        self.game.grid().rows()
    }

    /// Grid width.
    pub fn cols(&self) -> usize {
        self.game.grid().cols()
    }

    /// Whether the current level has been won.
    #[wasm_bindgen(js_name = isWon)]
    pub fn is_won(&self) -> bool {
        self.game.is_won()
    }

    /// Unrotated connection bits (N=1, E=2, S=4, W=8) of a tile, or 0 outside the grid.
    #[wasm_bindgen(js_name = baseConnections)]
    pub fn base_connections(&self, row: usize, col: usize) -> u8 {
        self.game.grid().tile(Location(row, col)).map_or(0, |tile| tile.shape().connections().bits())
    }

    /// Current connection bits of a tile, or 0 outside the grid.
    pub fn connections(&self, row: usize, col: usize) -> u8 {
        self.game.grid().tile(Location(row, col)).map_or(0, |tile| tile.current_connections().bits())
    }

    /// The discrete rotation a renderer should animate towards.
    pub fn rotation(&self, row: usize, col: usize) -> u8 {
        self.game.grid().tile(Location(row, col)).map_or(0, |tile| tile.rotation())
    }

    /// Whether flow reached the tile in the last evaluation.
    #[wasm_bindgen(js_name = isLit)]
    pub fn is_lit(&self, row: usize, col: usize) -> bool {
        self.game.grid().tile(Location(row, col)).is_some_and(|tile| tile.is_lit())
    }

    /// `[row, col, outward bit]` of the entry anchor.
    pub fn entry(&self) -> Vec<u32> {
        let anchor = self.game.grid().entry();
        vec![anchor.location().row() as u32, anchor.location().col() as u32, anchor.outward().bit() as u32]
    }

    /// `[row, col, outward bit]` of the exit anchor.
    pub fn exit(&self) -> Vec<u32> {
        let anchor = self.game.grid().exit();
        vec![anchor.location().row() as u32, anchor.location().col() as u32, anchor.outward().bit() as u32]
    }
}
