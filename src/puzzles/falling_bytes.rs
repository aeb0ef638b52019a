use fxhash::FxHashSet;
use grid_util::point::Point;
use log::debug;

use crate::cost::UnitCost;
use crate::error::{Error, Result};
use crate::grid::SearchGrid;
use crate::search::{GridSearch, SearchConfig};
use crate::tile::Tile;

/// Bytes falling onto a square memory space, each one turning a cell into a wall. The
/// walker goes from the top left corner to the bottom right one.
#[derive(Clone, Debug)]
pub struct FallingBytes {
    pub size: usize,
    pub bytes: Vec<Point>,
}

fn parse_point(line: &str) -> Result<Point> {
    let (x, y) = line
        .trim()
        .split_once(',')
        .ok_or_else(|| Error::Input(format!("expected x,y but got {:?}", line)))?;
    Ok(Point::new(x.trim().parse()?, y.trim().parse()?))
}

impl FallingBytes {
    /// Parses one `x,y` pair per line for a `size` x `size` memory space.
    pub fn parse(input: &str, size: usize) -> Result<FallingBytes> {
        let bytes = input
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(parse_point)
            .collect::<Result<Vec<_>>>()?;
        Ok(FallingBytes { size, bytes })
    }

    fn corners(&self) -> (Point, Point) {
        let far = self.size as i32 - 1;
        (Point::new(0, 0), Point::new(far, far))
    }

    /// The memory space after the first `fallen` bytes have landed.
    pub fn grid_after(&self, fallen: usize) -> Result<SearchGrid> {
        let mut grid = SearchGrid::new(self.size, self.size, Tile::Empty)?;
        for byte in self.bytes.iter().take(fallen) {
            grid.set_wall(byte, true)?;
        }
        grid.update();
        Ok(grid)
    }

    /// Minimum number of steps to the exit once `fallen` bytes have landed.
    pub fn steps_after(&self, fallen: usize) -> Result<Option<u64>> {
        let grid = self.grid_after(fallen)?;
        let (start, end) = self.corners();
        if !grid.is_passable(&start) || !grid.is_passable(&end) {
            return Ok(None);
        }
        let mut engine = GridSearch::new();
        Ok(engine.search(&grid, start, end, &UnitCost)?.distance)
    }

    /// The first byte after which the exit can no longer be reached. The grid is searched
    /// again only when a byte lands on the path currently known to work.
    pub fn first_blocking_byte(&self) -> Result<Option<Point>> {
        let mut grid = SearchGrid::new(self.size, self.size, Tile::Empty)?;
        let (start, end) = self.corners();
        let mut engine = GridSearch::with_config(SearchConfig {
            all_predecessors: false,
            ..SearchConfig::default()
        });
        engine.search(&grid, start, end, &UnitCost)?;
        let mut path: FxHashSet<Point> = engine.path(&end)?.into_iter().flatten().collect();
        let mut searches = 1;
        for byte in &self.bytes {
            grid.set_wall(byte, true)?;
            if !path.contains(byte) {
                continue;
            }
            grid.update();
            if grid.unreachable(&start, &end) {
                debug!("Exit cut off by {} after {} searches", byte, searches);
                return Ok(Some(*byte));
            }
            engine.reset();
            engine.search(&grid, start, end, &UnitCost)?;
            searches += 1;
            path = engine.path(&end)?.into_iter().flatten().collect();
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors() {
        assert!(matches!(
            FallingBytes::parse("1,2\n3;4\n", 7),
            Err(Error::Input(_))
        ));
        assert!(matches!(
            FallingBytes::parse("1,x\n", 7),
            Err(Error::ParseInt(_))
        ));
    }

    #[test]
    fn byte_outside_memory() {
        let bytes = FallingBytes::parse("9,9\n", 3).unwrap();
        assert!(matches!(
            bytes.steps_after(1),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn wall_across_memory() {
        let bytes = FallingBytes::parse("0,1\n1,1\n2,1\n", 3).unwrap();
        assert_eq!(bytes.steps_after(0).unwrap(), Some(4));
        assert_eq!(bytes.steps_after(2).unwrap(), Some(4));
        assert_eq!(bytes.steps_after(3).unwrap(), None);
        assert_eq!(bytes.first_blocking_byte().unwrap(), Some(Point::new(2, 1)));
    }
}
