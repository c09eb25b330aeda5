#![warn(missing_docs)]

//! # `pipewright`
//!
//! Level generation and flow evaluation for rotate-the-pipes puzzles.
//! A grid of pipe tiles must be turned until a connected run of pipe links an entry point on one side of the grid
//! to an exit point on the opposite side.
//!
//! Build a level with [`generate_level`](generator::generate_level), or by hand with a [`GridBuilder`](builder::GridBuilder).
//! Drive it through a [`Game`], which pairs every [`rotate_tile`](Game::rotate_tile) with a flow evaluation and reports
//! the first win of each level to a callback.
//!
//! Drawing, pointer-to-cell mapping and rotation animation are left to the host; with the `wasm` feature,
//! [`wasm::WasmGame`] exposes the game to a browser front end.
//!
//! # Internals
//! Every tile stores only its base [`PipeShape`] and a rotation in `0..4`.
//! Its live [`Connections`] are recomputed from those two on every read, turning each direction of the shape clockwise
//! once per quarter turn.
//!
//! A high level overview of generation is as follows:
//!
//! 1. Pick an entry on a random side of the grid and an exit on the side across from it.
//! 2. Carve a path between them with a randomized depth-first search. Using a stack as the frontier favors long,
//!    winding paths.
//! 3. Stamp each path cell with the straight or elbow that joins the side flow arrives through to the side it leaves by.
//! 4. Fill every other cell with a random decoy shape, then randomize every rotation.
//!
//! Shapes are fixed from step 3 onwards, so turning the path cells back to their stamped rotations always solves the
//! level.
//!
//! Flow is a flood fill from the entry tile. It crosses between neighbors only where both tiles have a connector on
//! their shared edge, and the level is won once the exit tile is lit and faces off the grid through the exit anchor.

pub use anchor::{Anchor, Side};
pub use board::Grid;
pub use cell::Tile;
pub use config::GameConfig;
pub use error::Error;
pub use flow::{evaluate, FlowReport};
pub use game::Game;
pub use generator::generate_level;
pub use location::Location;
pub use shape::{Connections, Direction, PipeShape};

pub(crate) mod anchor;
pub(crate) mod board;
pub mod builder;
pub(crate) mod cell;
pub(crate) mod config;
pub(crate) mod error;
pub mod flow;
pub(crate) mod game;
pub mod generator;
pub(crate) mod location;
pub mod shape;
mod tests;
#[cfg(feature = "wasm")]
pub mod wasm;
