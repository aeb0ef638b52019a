use fxhash::FxHashMap;
use grid_util::point::Point;
use log::debug;

use crate::cost::UnitCost;
use crate::error::Result;
use crate::grid::SearchGrid;
use crate::search::{FxIndexMap, GridSearch, SearchConfig};

/// A race track from `S` to `E`. Once per race a program may cheat by moving through walls
/// for up to a given number of picoseconds, as long as it ends up back on the track.
#[derive(Clone, Debug)]
pub struct RaceTrack {
    pub grid: SearchGrid,
    pub start: Point,
    pub end: Point,
}

impl RaceTrack {
    pub fn parse(input: &str) -> Result<RaceTrack> {
        let grid = SearchGrid::parse(input)?;
        let start = grid.start()?;
        let end = grid.goal()?;
        Ok(RaceTrack { grid, start, end })
    }

    /// Picoseconds needed to reach every track cell from the start without cheating.
    pub fn track_times(&self) -> Result<FxIndexMap<Point, u64>> {
        let mut engine = GridSearch::new();
        engine.flood(&self.grid, self.start, &UnitCost)?;
        engine.distances()
    }

    /// Counts every distinct cheat of at most `duration` picoseconds, keyed by the number of
    /// picoseconds it saves. Cheats that save nothing are left out.
    pub fn cheat_savings(&self, duration: u64) -> Result<FxHashMap<u64, usize>> {
        let times = self.track_times()?;
        let mut cheat = GridSearch::with_config(SearchConfig {
            all_predecessors: false,
            max_cost: Some(duration),
            through_walls: true,
            ..SearchConfig::default()
        });
        let mut savings: FxHashMap<u64, usize> = FxHashMap::default();
        for (cheat_start, &time) in &times {
            cheat.reset();
            cheat.flood(&self.grid, *cheat_start, &UnitCost)?;
            for (cheat_end, cheat_time) in cheat.distances()? {
                if let Some(&end_time) = times.get(&cheat_end) {
                    if end_time > time + cheat_time {
                        *savings.entry(end_time - time - cheat_time).or_default() += 1;
                    }
                }
            }
        }
        debug!(
            "{} cheat start points, {} distinct savings",
            times.len(),
            savings.len()
        );
        Ok(savings)
    }

    /// Number of cheats of at most `duration` picoseconds saving at least `min_saving`.
    pub fn count_cheats(&self, duration: u64, min_saving: u64) -> Result<usize> {
        Ok(self
            .cheat_savings(duration)?
            .into_iter()
            .filter(|(saving, _)| *saving >= min_saving)
            .map(|(_, count)| count)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcut_through_single_wall() {
        // The track loops around the wall in the middle
        let track = RaceTrack::parse(
            "
#####
#S#E#
#.#.#
#...#
#####
",
        )
        .unwrap();
        let times = track.track_times().unwrap();
        assert_eq!(times[&track.end], 6);
        let savings = track.cheat_savings(2).unwrap();
        // S -> E saves 4, the row below saves 2
        assert_eq!(savings.get(&4), Some(&1));
        assert_eq!(savings.get(&2), Some(&1));
        assert_eq!(track.count_cheats(2, 3).unwrap(), 1);
    }
}
