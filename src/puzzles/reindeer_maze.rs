use grid_util::point::Point;

use crate::cost::TurnPenalty;
use crate::direction::Direction;
use crate::error::Result;
use crate::grid::SearchGrid;
use crate::search::{GridSearch, SearchConfig};

/// A maze walked by a reindeer that starts on `S` facing east and wants to reach `E`.
/// Moving forward costs 1 point and every 90° turn another 1000.
#[derive(Clone, Debug)]
pub struct ReindeerMaze {
    pub grid: SearchGrid,
    pub start: Point,
    pub end: Point,
    pub cost: TurnPenalty,
}

/// Both answers for a maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BestRoutes {
    /// Lowest score a reindeer can get, [None] if `E` cannot be reached.
    pub score: Option<u64>,
    pub seats: usize,
}

impl ReindeerMaze {
    pub fn parse(input: &str) -> Result<ReindeerMaze> {
        let grid = SearchGrid::parse(input)?;
        let start = grid.start()?;
        let end = grid.goal()?;
        Ok(ReindeerMaze {
            grid,
            start,
            end,
            cost: TurnPenalty::reindeer(),
        })
    }

    /// Searches the maze once and reports the lowest score together with the number of
    /// tiles, `S` and `E` included, that are part of at least one best route.
    pub fn solve(&self) -> Result<BestRoutes> {
        let mut engine = GridSearch::with_config(SearchConfig {
            initial_heading: Some(Direction::East),
            ..SearchConfig::default()
        });
        let result = engine.search(&self.grid, self.start, self.end, &self.cost)?;
        Ok(BestRoutes {
            score: result.distance,
            seats: engine.reconstruct_paths(&self.end)?.len(),
        })
    }
}
