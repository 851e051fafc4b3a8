//! # Connect Four
//!
//! A pure Connect Four game-state engine, together with the data shapes the
//! layers around it exchange.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, player, immutable state machine
//! - [`protocol`] — REST and event-stream payloads, per-game rooms
//! - [`session`] — Translation to the third-party session service's 0/1/2 encoding
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod protocol;
pub mod session;

pub use error::MoveError;
pub use game::{Board, Cell, GameState, GameStatus, Move, Player};
