use fxhash::FxHashMap;
use grid_util::point::Point;
use itertools::Itertools;

use crate::cost::UnitCost;
use crate::error::{Error, Result};
use crate::grid::SearchGrid;
use crate::path_to_directions;
use crate::search::GridSearch;
use crate::tile::Tile;

const NUMERIC_LAYOUT: [&str; 4] = ["789", "456", "123", " 0A"];
const DIRECTIONAL_LAYOUT: [&str; 2] = [" ^A", "<v>"];
const ACTIVATE: char = 'A';

/// A keypad whose arm may never hover over the gap.
#[derive(Clone, Debug)]
pub struct Keypad {
    pub grid: SearchGrid,
    buttons: FxHashMap<char, Point>,
}

impl Keypad {
    /// Builds a keypad from rows of button labels, a space marking the gap.
    pub fn new(layout: &[&str]) -> Result<Keypad> {
        let mut buttons = FxHashMap::default();
        let rows: Vec<Vec<Tile>> = layout
            .iter()
            .enumerate()
            .map(|(row, line)| {
                line.chars()
                    .enumerate()
                    .map(|(col, label)| {
                        if label == ' ' {
                            Tile::Wall
                        } else {
                            buttons.insert(label, SearchGrid::point(row, col));
                            Tile::Empty
                        }
                    })
                    .collect::<Vec<Tile>>()
            })
            .collect();
        Ok(Keypad {
            grid: SearchGrid::from_rows(rows)?,
            buttons,
        })
    }
    pub fn numeric() -> Result<Keypad> {
        Keypad::new(&NUMERIC_LAYOUT)
    }
    pub fn directional() -> Result<Keypad> {
        Keypad::new(&DIRECTIONAL_LAYOUT)
    }

    pub fn button(&self, label: char) -> Result<Point> {
        self.buttons
            .get(&label)
            .copied()
            .ok_or_else(|| Error::Input(format!("no button {:?} on keypad", label)))
    }

    /// Every shortest way of moving the arm from `from` to `to` and pressing it, written as
    /// the directional presses that produce it.
    pub fn presses(&self, engine: &mut GridSearch<u64>, from: char, to: char) -> Result<Vec<String>> {
        let goal = self.button(to)?;
        engine.reset();
        engine.search(&self.grid, self.button(from)?, goal, &UnitCost)?;
        Ok(engine
            .all_paths(&goal)?
            .iter()
            .map(|path| {
                path_to_directions(path)
                    .into_iter()
                    .map(|dir| dir.as_char())
                    .chain(std::iter::once(ACTIVATE))
                    .collect()
            })
            .collect())
    }
}

/// A door code typed on the numeric keypad by a robot, which is driven through `robots`
/// layers of robot-operated directional keypads by a human on one more directional keypad.
pub struct KeypadChain {
    numeric: Keypad,
    directional: Keypad,
    robots: usize,
    engine: GridSearch<u64>,
    routes: FxHashMap<(char, char), Vec<String>>,
    cache: FxHashMap<(String, usize), u64>,
}

impl KeypadChain {
    pub fn new(robots: usize) -> Result<KeypadChain> {
        Ok(KeypadChain {
            numeric: Keypad::numeric()?,
            directional: Keypad::directional()?,
            robots,
            engine: GridSearch::new(),
            routes: FxHashMap::default(),
            cache: FxHashMap::default(),
        })
    }

    fn directional_routes(&mut self, from: char, to: char) -> Result<Vec<String>> {
        if let Some(routes) = self.routes.get(&(from, to)) {
            return Ok(routes.clone());
        }
        let routes = self.directional.presses(&mut self.engine, from, to)?;
        self.routes.insert((from, to), routes.clone());
        Ok(routes)
    }

    /// Human presses needed to get `sequence` typed on the directional keypad at `depth`,
    /// where depth 0 is the keypad driving the numeric keypad's robot.
    fn sequence_cost(&mut self, sequence: &str, depth: usize) -> Result<u64> {
        if depth >= self.robots {
            return Ok(sequence.len() as u64);
        }
        let key = (sequence.to_owned(), depth);
        if let Some(&cost) = self.cache.get(&key) {
            return Ok(cost);
        }
        let mut total = 0;
        for (from, to) in std::iter::once(ACTIVATE).chain(sequence.chars()).tuple_windows() {
            let mut best = u64::MAX;
            for route in self.directional_routes(from, to)? {
                best = best.min(self.sequence_cost(&route, depth + 1)?);
            }
            total += best;
        }
        self.cache.insert(key, total);
        Ok(total)
    }

    /// Fewest human button presses that make the numeric keypad's robot type `code`.
    pub fn shortest_presses(&mut self, code: &str) -> Result<u64> {
        let mut total = 0;
        for (from, to) in std::iter::once(ACTIVATE).chain(code.chars()).tuple_windows() {
            let routes = self.numeric.presses(&mut self.engine, from, to)?;
            let mut best = u64::MAX;
            for route in routes {
                best = best.min(self.sequence_cost(&route, 0)?);
            }
            total += best;
        }
        Ok(total)
    }

    /// Shortest press count times the numeric part of the code.
    pub fn complexity(&mut self, code: &str) -> Result<u64> {
        let numeric: u64 = code.trim().trim_end_matches(ACTIVATE).parse()?;
        Ok(self.shortest_presses(code.trim())? * numeric)
    }

    /// Sum of the complexities of one code per line.
    pub fn total_complexity(&mut self, input: &str) -> Result<u64> {
        input
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| self.complexity(line))
            .sum()
    }
}
