//! Grid puzzles built on [GridSearch](crate::search::GridSearch). Each takes its puzzle input
//! as text; reading it from disk is left to the caller.
//!
//! - [reindeer_maze]: cheapest route with turn penalties and the tiles on every best route.
//! - [falling_bytes]: a grid that fills up with walls, searched again whenever the current
//!   path gets cut.
//! - [race_condition]: shortcuts through walls of bounded length on a single-lane track.
//! - [keypad]: robots typing on keypads through layers of directional keypads.
pub mod falling_bytes;
pub mod keypad;
pub mod race_condition;
pub mod reindeer_maze;
