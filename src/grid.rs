use core::fmt;
use std::str::FromStr;

use grid_util::grid::{Grid, SimpleGrid};
use grid_util::point::Point;
use log::info;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::direction::Direction;
use crate::error::{Error, Result};
use crate::tile::Tile;

/// [SearchGrid] wraps a [SimpleGrid] of [Tile]s. Points use `x` for the column and `y` for
/// the row. In addition to the tiles it maintains the connected components of passable cells
/// in a [UnionFind] structure so that searches between disconnected cells can be answered
/// without flood-filling.
#[derive(Clone, Debug)]
pub struct SearchGrid {
    pub grid: SimpleGrid<Tile>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl SearchGrid {
    /// A `rows` x `cols` grid filled with `tile`.
    pub fn new(rows: usize, cols: usize, tile: Tile) -> Result<SearchGrid> {
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyGrid);
        }
        let mut grid = SearchGrid {
            grid: SimpleGrid::new(cols, rows, tile),
            components: UnionFind::new(rows * cols),
            components_dirty: false,
        };
        grid.generate_components();
        Ok(grid)
    }

    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<SearchGrid> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(Error::EmptyGrid);
        }
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != cols)
        {
            return Err(Error::RaggedRow {
                row,
                expected: cols,
                found,
            });
        }
        let n_rows = rows.len();
        let mut grid = SearchGrid {
            grid: SimpleGrid {
                width: cols,
                height: n_rows,
                values: rows.into_iter().flatten().collect(),
            },
            components: UnionFind::new(n_rows * cols),
            components_dirty: false,
        };
        grid.generate_components();
        Ok(grid)
    }

    /// Parses a map drawn with `.`, `#`, `S` and `E`. Blank lines around the map are ignored.
    pub fn parse(input: &str) -> Result<SearchGrid> {
        let rows = input
            .trim()
            .lines()
            .enumerate()
            .map(|(row, line)| {
                line.trim_end()
                    .chars()
                    .enumerate()
                    .map(|(col, ch)| Tile::from_char(ch).ok_or(Error::UnknownTile { ch, row, col }))
                    .collect::<Result<Vec<Tile>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        SearchGrid::from_rows(rows)
    }

    pub fn rows(&self) -> usize {
        self.grid.height
    }
    pub fn cols(&self) -> usize {
        self.grid.width
    }
    /// The [Point] for a `(row, col)` pair.
    pub fn point(row: usize, col: usize) -> Point {
        Point::new(col as i32, row as i32)
    }
    /// The tile at `point`, [None] if it lies off the grid.
    pub fn get(&self, point: &Point) -> Option<Tile> {
        self.grid
            .point_in_bounds(*point)
            .then(|| self.grid.get_point(*point))
    }
    pub fn is_passable(&self, point: &Point) -> bool {
        self.get(point).is_some_and(Tile::is_passable)
    }

    /// Fails with [Error::OutOfBounds] if `point` is not on the grid.
    pub fn check_in_bounds(&self, point: &Point) -> Result<()> {
        if self.grid.point_in_bounds(*point) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                point: *point,
                rows: self.rows(),
                cols: self.cols(),
            })
        }
    }
    /// Fails if `point` is not on the grid or is a wall.
    pub fn check_passable(&self, point: &Point) -> Result<()> {
        self.check_in_bounds(point)?;
        if self.is_passable(point) {
            Ok(())
        } else {
            Err(Error::Blocked { point: *point })
        }
    }

    /// Updates a position on the grid. Joins newly connected components and flags the
    /// components as dirty if components are (potentially) broken apart into multiple.
    pub fn set(&mut self, point: &Point, tile: Tile) -> Result<()> {
        self.check_in_bounds(point)?;
        let ix = self.grid.get_ix_point(point);
        let was_passable = self.grid.get_point(*point).is_passable();
        self.grid.set_point(*point, tile);
        if was_passable && !tile.is_passable() {
            self.components_dirty = true;
        } else if tile.is_passable() {
            for (n, _) in self.neighbours(point) {
                if self.is_passable(&n) {
                    let n_ix = self.grid.get_ix_point(&n);
                    self.components.union(ix, n_ix);
                }
            }
        }
        Ok(())
    }
    /// Places or removes a wall.
    pub fn set_wall(&mut self, point: &Point, blocked: bool) -> Result<()> {
        self.set(point, if blocked { Tile::Wall } else { Tile::Empty })
    }

    /// In-bounds orthogonal neighbours of `point` together with the direction leading there.
    pub fn neighbours(&self, point: &Point) -> SmallVec<[(Point, Direction); 4]> {
        Direction::ALL
            .into_iter()
            .map(|dir| (dir.step(point), dir))
            .filter(|(p, _)| self.grid.point_in_bounds(*p))
            .collect()
    }

    /// All points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.rows()).flat_map(move |row| (0..self.cols()).map(move |col| Self::point(row, col)))
    }
    pub fn find_all(&self, tile: Tile) -> impl Iterator<Item = Point> + '_ {
        self.points().filter(move |p| self.get(p) == Some(tile))
    }
    /// The single cell holding `tile`.
    pub fn find_unique(&self, tile: Tile) -> Result<Point> {
        let mut found = self.find_all(tile);
        match (found.next(), found.next()) {
            (Some(p), None) => Ok(p),
            (None, _) => Err(Error::MissingTile(tile)),
            (Some(_), Some(_)) => Err(Error::DuplicateTile(tile)),
        }
    }
    pub fn start(&self) -> Result<Point> {
        self.find_unique(Tile::Start)
    }
    pub fn goal(&self) -> Result<Point> {
        self.find_unique(Tile::Goal)
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> usize {
        self.components.find(self.grid.get_ix_point(point))
    }
    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }
    /// Checks if start and goal are not on the same component. Walls are never reachable.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        if self.is_passable(start) && self.is_passable(goal) {
            self.get_component(start) != self.get_component(goal)
        } else {
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }
    /// Generates a new [UnionFind] structure and links up passable neighbours to the same
    /// components. Only the south and east neighbours need to be linked.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.rows() * self.cols());
        self.components_dirty = false;
        for point in self.points().collect::<Vec<_>>() {
            if !self.is_passable(&point) {
                continue;
            }
            let parent_ix = self.grid.get_ix_point(&point);
            for dir in [Direction::East, Direction::South] {
                let n = dir.step(&point);
                if self.is_passable(&n) {
                    let ix = self.grid.get_ix_point(&n);
                    self.components.union(parent_ix, ix);
                }
            }
        }
    }
}

impl FromStr for SearchGrid {
    type Err = Error;

    fn from_str(s: &str) -> Result<SearchGrid> {
        SearchGrid::parse(s)
    }
}

impl fmt::Display for SearchGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.grid.values.chunks(self.grid.width) {
            let line = row.iter().map(|t| t.as_char()).collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
