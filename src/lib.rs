//! # grid_search
//!
//! Shortest path search on rectangular, 4-connected grids. Implements
//! [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm) over
//! (cell, heading) states so that step costs may depend on the direction of travel, such as
//! penalties for turning. Every equal-cost predecessor can be kept, which allows enumerating
//! all shortest paths rather than an arbitrary one. Pre-computes
//! [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! to avoid flood-filling behaviour if no path exists.
//!
//! The [puzzles] module contains the grid puzzles that are solved with the engine.
pub mod cost;
pub mod direction;
pub mod error;
pub mod grid;
pub mod puzzles;
pub mod search;
pub mod tile;

pub use cost::{Cost, StepCost, TurnPenalty, UnitCost};
pub use direction::{Direction, Turn};
pub use error::{Error, Result};
pub use grid::SearchGrid;
pub use grid_util::point::Point;
pub use search::{shortest_distance, GridSearch, SearchConfig, SearchResult};
pub use tile::Tile;

use itertools::Itertools;

/// Cost of a single straight step.
pub const DEFAULT_STEP: u64 = 1;
/// Extra cost of a 90° turn for [TurnPenalty::reindeer].
pub const QUARTER_TURN: u64 = 1000;
/// Extra cost of turning around for [TurnPenalty::reindeer].
pub const REVERSE_TURN: u64 = 2000;

const N_SMALLVEC_SIZE: usize = 8;

/// Turns a path of orthogonally adjacent points into the moves that walk it. Pairs of points
/// that are not adjacent are skipped.
pub fn path_to_directions(path: &[Point]) -> Vec<Direction> {
    path.iter()
        .tuple_windows()
        .filter_map(|(from, to)| Direction::between(from, to))
        .collect()
}
