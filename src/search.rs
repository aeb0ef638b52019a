//! Dijkstra search over a [SearchGrid] with a caller supplied [StepCost].
//!
//! The search runs on states made of a cell and the heading used to enter it, so a
//! direction dependent cost (turn penalties) is charged for the move actually taken.
//! When the cost is not direction dependent every cell has exactly one state.
//!
//! All per-cell records (best cost, predecessor links) live in the [GridSearch] that ran
//! the search. They stay readable until [GridSearch::reset] is called, which keeps the
//! allocations around so one engine can serve thousands of searches on the same grid.
use fxhash::{FxBuildHasher, FxHashSet};
use grid_util::grid::Grid;
use grid_util::point::Point;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::{IndexMap, IndexSet};
use log::{debug, info, warn};
use smallvec::{smallvec, SmallVec};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::cost::{Cost, StepCost};
use crate::direction::Direction;
use crate::error::{Error, Result};
use crate::grid::SearchGrid;
use crate::N_SMALLVEC_SIZE;

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
pub type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

const HEADINGS: [Option<Direction>; 5] = [
    None,
    Some(Direction::North),
    Some(Direction::East),
    Some(Direction::South),
    Some(Direction::West),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct SearchState {
    pos: Point,
    heading: Option<Direction>,
}

#[derive(Clone, Debug)]
struct Node<C> {
    cost: C,
    parents: SmallVec<[usize; 2]>,
    closed: bool,
}

#[derive(Clone, Debug)]
struct SmallestCostHolder<C> {
    cost: C,
    index: usize,
}

impl<C: PartialEq> Eq for SmallestCostHolder<C> {}

impl<C: PartialEq> PartialEq for SmallestCostHolder<C> {
    fn eq(&self, other: &Self) -> bool {
        self.cost.eq(&other.cost) && self.index == other.index
    }
}

impl<C: Ord> PartialOrd for SmallestCostHolder<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord> Ord for SmallestCostHolder<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest cost first, ties go to the state that was discovered first
        match other.cost.cmp(&self.cost) {
            Ordering::Equal => other.index.cmp(&self.index),
            s => s,
        }
    }
}

/// Knobs of a [GridSearch]. The defaults give a plain shortest path search that records
/// every equal-cost predecessor.
#[derive(Clone, Debug)]
pub struct SearchConfig<C> {
    /// Heading of the start state, seen by direction aware step costs on the first move.
    pub initial_heading: Option<Direction>,
    /// Keep all equal-cost predecessors instead of only the first one found. Needed for
    /// [GridSearch::reconstruct_paths] and [GridSearch::all_paths] to see every shortest path.
    pub all_predecessors: bool,
    /// Moves that would push the cost above this bound are not taken.
    pub max_cost: Option<C>,
    /// Treat walls as open cells.
    pub through_walls: bool,
}

impl<C> Default for SearchConfig<C> {
    fn default() -> Self {
        SearchConfig {
            initial_heading: None,
            all_predecessors: true,
            max_cost: None,
            through_walls: false,
        }
    }
}

/// Outcome of a single [GridSearch::search] or [GridSearch::flood] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult<C> {
    pub start: Point,
    pub goal: Option<Point>,
    /// Cost of the cheapest path to the goal, [None] if it cannot be reached. Always [None]
    /// for a flood, query [GridSearch::distance_at] instead.
    pub distance: Option<C>,
    /// Number of states that were finalized.
    pub expanded: usize,
}

impl<C> SearchResult<C> {
    pub fn is_reachable(&self) -> bool {
        self.distance.is_some()
    }
}

/// Reusable Dijkstra engine. Holds the frontier and the per-state records of the last
/// search; call [reset](Self::reset) before searching again.
#[derive(Clone, Debug)]
pub struct GridSearch<C> {
    pub config: SearchConfig<C>,
    nodes: FxIndexMap<SearchState, Node<C>>,
    to_see: BinaryHeap<SmallestCostHolder<C>>,
    searched: bool,
}

impl<C: Cost> Default for GridSearch<C> {
    fn default() -> Self {
        GridSearch::new()
    }
}

impl<C: Cost> GridSearch<C> {
    pub fn new() -> GridSearch<C> {
        GridSearch::with_config(SearchConfig::default())
    }
    pub fn with_config(config: SearchConfig<C>) -> GridSearch<C> {
        GridSearch {
            config,
            nodes: FxIndexMap::default(),
            to_see: BinaryHeap::new(),
            searched: false,
        }
    }

    /// Whether a search ran since the last [reset](Self::reset).
    pub fn is_searched(&self) -> bool {
        self.searched
    }

    /// Forgets all distances and predecessor links. Allocations are kept for the next search.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.to_see.clear();
        self.searched = false;
    }

    /// Computes the cheapest cost from `start` to `goal`. Stops once every cheapest way of
    /// entering the goal is known. An unreachable goal is reported through
    /// [SearchResult::distance], not as an error.
    pub fn search<S>(
        &mut self,
        grid: &SearchGrid,
        start: Point,
        goal: Point,
        cost: &S,
    ) -> Result<SearchResult<C>>
    where
        S: StepCost<Cost = C> + ?Sized,
    {
        self.check_endpoint(grid, &start)?;
        self.check_endpoint(grid, &goal)?;
        if self.searched {
            return Err(Error::SearchNotReset);
        }
        self.seed(start, cost.directional());
        let use_components = !self.config.through_walls && !grid.components_dirty;
        if use_components && grid.unreachable(&start, &goal) {
            info!("{} is not reachable from {}", goal, start);
            if let Some((_, node)) = self.nodes.get_index_mut(0) {
                node.closed = true;
            }
            return Ok(SearchResult {
                start,
                goal: Some(goal),
                distance: None,
                expanded: 0,
            });
        }
        let (distance, expanded) = self.run(grid, Some(goal), cost)?;
        debug!(
            "Search {} -> {} expanded {} states, distance {:?}",
            start, goal, expanded, distance
        );
        if distance.is_none() && use_components && self.config.max_cost.is_none() {
            warn!("Reachable goal could not be pathed to, are the components correct?");
        }
        Ok(SearchResult {
            start,
            goal: Some(goal),
            distance,
            expanded,
        })
    }

    /// Finalizes the distance of every cell reachable from `start` (within
    /// [SearchConfig::max_cost], if set).
    pub fn flood<S>(&mut self, grid: &SearchGrid, start: Point, cost: &S) -> Result<SearchResult<C>>
    where
        S: StepCost<Cost = C> + ?Sized,
    {
        self.check_endpoint(grid, &start)?;
        if self.searched {
            return Err(Error::SearchNotReset);
        }
        self.seed(start, cost.directional());
        let (_, expanded) = self.run(grid, None, cost)?;
        debug!("Flood from {} expanded {} states", start, expanded);
        Ok(SearchResult {
            start,
            goal: None,
            distance: None,
            expanded,
        })
    }

    fn check_endpoint(&self, grid: &SearchGrid, point: &Point) -> Result<()> {
        if self.config.through_walls {
            grid.check_in_bounds(point)
        } else {
            grid.check_passable(point)
        }
    }

    fn seed(&mut self, start: Point, directional: bool) {
        self.searched = true;
        let heading = if directional {
            self.config.initial_heading
        } else {
            None
        };
        let (index, _) = self.nodes.insert_full(
            SearchState {
                pos: start,
                heading,
            },
            Node {
                cost: C::zero(),
                parents: SmallVec::new(),
                closed: false,
            },
        );
        self.to_see.push(SmallestCostHolder {
            cost: C::zero(),
            index,
        });
    }

    /// The Dijkstra loop. Returns the goal distance (if a goal was given and reached) and
    /// the number of finalized states.
    fn run<S>(&mut self, grid: &SearchGrid, goal: Option<Point>, cost: &S) -> Result<(Option<C>, usize)>
    where
        S: StepCost<Cost = C> + ?Sized,
    {
        let directional = cost.directional();
        let all_predecessors = self.config.all_predecessors;
        let max_cost = self.config.max_cost;
        let through_walls = self.config.through_walls;
        let mut best: Option<C> = None;
        let mut expanded = 0;

        while let Some(SmallestCostHolder {
            cost: node_cost,
            index,
        }) = self.to_see.pop()
        {
            // Every cheapest goal state has been popped once the frontier moves past it.
            if best.is_some_and(|b| node_cost > b) {
                break;
            }
            let state = match self.nodes.get_index_mut(index) {
                Some((state, node)) => {
                    // A node may sit in the heap several times if a cheaper way to it was
                    // found later; only the entry carrying its current cost counts.
                    if node.closed || node_cost > node.cost {
                        continue;
                    }
                    node.closed = true;
                    *state
                }
                None => continue,
            };
            expanded += 1;
            if goal == Some(state.pos) {
                best.get_or_insert(node_cost);
                continue;
            }
            for dir in Direction::ALL {
                let next = dir.step(&state.pos);
                let open = if through_walls {
                    grid.grid.point_in_bounds(next)
                } else {
                    grid.is_passable(&next)
                };
                if !open {
                    continue;
                }
                let step = cost.step_cost(state.heading, dir);
                if step < C::zero() {
                    return Err(Error::NegativeCost);
                }
                let new_cost = node_cost + step;
                if max_cost.is_some_and(|max| new_cost > max) {
                    continue;
                }
                let key = SearchState {
                    pos: next,
                    heading: directional.then_some(dir),
                };
                let n;
                match self.nodes.entry(key) {
                    Vacant(e) => {
                        n = e.index();
                        e.insert(Node {
                            cost: new_cost,
                            parents: smallvec![index],
                            closed: false,
                        });
                    }
                    Occupied(mut e) => {
                        let ix = e.index();
                        let node = e.get_mut();
                        if node.closed {
                            continue;
                        }
                        match new_cost.cmp(&node.cost) {
                            Ordering::Less => {
                                node.cost = new_cost;
                                node.parents = smallvec![index];
                                n = ix;
                            }
                            Ordering::Equal => {
                                if all_predecessors && !node.parents.contains(&index) {
                                    node.parents.push(index);
                                }
                                continue;
                            }
                            Ordering::Greater => continue,
                        }
                    }
                }
                self.to_see.push(SmallestCostHolder {
                    cost: new_cost,
                    index: n,
                });
            }
        }
        Ok((best, expanded))
    }

    fn ensure_searched(&self) -> Result<()> {
        if self.searched {
            Ok(())
        } else {
            Err(Error::NoSearch)
        }
    }

    /// Indices of the finalized states at `point` that carry its cheapest cost.
    fn best_nodes(&self, point: &Point) -> SmallVec<[usize; N_SMALLVEC_SIZE]> {
        let candidates = HEADINGS
            .iter()
            .filter_map(|&heading| {
                self.nodes
                    .get_full(&SearchState {
                        pos: *point,
                        heading,
                    })
                    .filter(|(_, _, node)| node.closed)
                    .map(|(ix, _, node)| (ix, node.cost))
            })
            .collect::<SmallVec<[(usize, C); N_SMALLVEC_SIZE]>>();
        match candidates.iter().map(|(_, c)| *c).min() {
            Some(best) => candidates
                .into_iter()
                .filter(|(_, c)| *c == best)
                .map(|(ix, _)| ix)
                .collect(),
            None => SmallVec::new(),
        }
    }

    /// Finalized distance of `point`, [None] if it was not reached (or nothing was searched).
    pub fn distance_at(&self, point: &Point) -> Option<C> {
        self.best_nodes(point)
            .first()
            .and_then(|&ix| self.nodes.get_index(ix))
            .map(|(_, node)| node.cost)
    }

    /// Finalized distance of every reached cell, in discovery order.
    pub fn distances(&self) -> Result<FxIndexMap<Point, C>> {
        self.ensure_searched()?;
        let mut distances: FxIndexMap<Point, C> = FxIndexMap::default();
        for (state, node) in self.nodes.iter().filter(|(_, node)| node.closed) {
            distances
                .entry(state.pos)
                .and_modify(|c| *c = (*c).min(node.cost))
                .or_insert(node.cost);
        }
        Ok(distances)
    }

    /// Every cell lying on at least one shortest path to `goal`, found by walking the
    /// predecessor links back to the start. Empty if `goal` was not reached.
    pub fn reconstruct_paths(&self, goal: &Point) -> Result<FxIndexSet<Point>> {
        self.ensure_searched()?;
        let mut cells = FxIndexSet::default();
        let mut seen: FxHashSet<usize> = FxHashSet::default();
        let mut stack = self.best_nodes(goal).into_vec();
        while let Some(ix) = stack.pop() {
            if !seen.insert(ix) {
                continue;
            }
            if let Some((state, node)) = self.nodes.get_index(ix) {
                cells.insert(state.pos);
                stack.extend(node.parents.iter().copied());
            }
        }
        Ok(cells)
    }

    /// One shortest path from the start to `goal`, following the first recorded predecessor.
    pub fn path(&self, goal: &Point) -> Result<Option<Vec<Point>>> {
        self.ensure_searched()?;
        let Some(&last) = self.best_nodes(goal).first() else {
            return Ok(None);
        };
        let mut path = std::iter::successors(Some(last), |&ix| {
            self.nodes
                .get_index(ix)
                .and_then(|(_, node)| node.parents.first().copied())
        })
        .filter_map(|ix| self.nodes.get_index(ix).map(|(state, _)| state.pos))
        .collect::<Vec<Point>>();
        path.reverse();
        Ok(Some(path))
    }

    /// Every distinct shortest path from the start to `goal`. Requires
    /// [SearchConfig::all_predecessors] to be complete.
    pub fn all_paths(&self, goal: &Point) -> Result<Vec<Vec<Point>>> {
        self.ensure_searched()?;
        let mut paths = Vec::new();
        let mut stack: Vec<(usize, Vec<Point>)> = self
            .best_nodes(goal)
            .into_iter()
            .map(|ix| (ix, Vec::new()))
            .collect();
        while let Some((ix, mut partial)) = stack.pop() {
            let Some((state, node)) = self.nodes.get_index(ix) else {
                continue;
            };
            partial.push(state.pos);
            match node.parents.split_last() {
                None => {
                    partial.reverse();
                    paths.push(partial);
                }
                Some((&last, rest)) => {
                    for &parent in rest {
                        stack.push((parent, partial.clone()));
                    }
                    stack.push((last, partial));
                }
            }
        }
        Ok(paths)
    }
}

/// Cheapest cost from `start` to `goal` using a throwaway engine.
pub fn shortest_distance<S>(
    grid: &SearchGrid,
    start: Point,
    goal: Point,
    cost: &S,
) -> Result<Option<S::Cost>>
where
    S: StepCost + ?Sized,
{
    let mut engine = GridSearch::new();
    Ok(engine.search(grid, start, goal, cost)?.distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{TurnPenalty, UnitCost};
    use crate::tile::Tile;

    fn open_grid(rows: usize, cols: usize) -> SearchGrid {
        SearchGrid::new(rows, cols, Tile::Empty).unwrap()
    }

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        let grid = open_grid(1, 1);
        let mut engine = GridSearch::new();
        let start = Point::new(0, 0);
        let result = engine.search(&grid, start, start, &UnitCost).unwrap();
        assert_eq!(result.distance, Some(0));
        assert_eq!(engine.path(&start).unwrap(), Some(vec![start]));
    }

    #[test]
    fn solve_simple_problem() {
        // |S  |
        // | # |
        // |  G|
        let mut grid = open_grid(3, 3);
        let start = Point::new(0, 0);
        let goal = Point::new(2, 2);
        assert_eq!(shortest_distance(&grid, start, goal, &UnitCost).unwrap(), Some(4));
        grid.set_wall(&Point::new(1, 1), true).unwrap();
        assert_eq!(shortest_distance(&grid, start, goal, &UnitCost).unwrap(), Some(4));
    }

    #[test]
    fn turn_penalty_is_charged_per_move() {
        let grid = open_grid(3, 3);
        let mut engine = GridSearch::new();
        engine.config.initial_heading = Some(Direction::East);
        let cost = TurnPenalty::new(1, 1000, 2000);
        let result = engine
            .search(&grid, Point::new(0, 0), Point::new(2, 2), &cost)
            .unwrap();
        assert_eq!(result.distance, Some(1004));

        let line = open_grid(1, 5);
        engine.reset();
        let result = engine
            .search(&line, Point::new(0, 0), Point::new(4, 0), &cost)
            .unwrap();
        assert_eq!(result.distance, Some(4));
    }

    #[test]
    fn turning_around_costs_the_reverse_penalty() {
        // Facing east in a dead end corridor, the only way is back west.
        let grid = SearchGrid::parse("E.S#\n").unwrap();
        let mut engine = GridSearch::new();
        engine.config.initial_heading = Some(Direction::East);
        let result = engine
            .search(&grid, Point::new(2, 0), Point::new(0, 0), &TurnPenalty::reindeer())
            .unwrap();
        assert_eq!(result.distance, Some(2002));
    }

    #[test]
    fn must_reset_between_searches() {
        let grid = open_grid(2, 2);
        let mut engine: GridSearch<u64> = GridSearch::new();
        assert_eq!(engine.reconstruct_paths(&Point::new(1, 1)), Err(Error::NoSearch));
        assert_eq!(engine.path(&Point::new(1, 1)), Err(Error::NoSearch));
        engine
            .search(&grid, Point::new(0, 0), Point::new(1, 1), &UnitCost)
            .unwrap();
        assert_eq!(
            engine.search(&grid, Point::new(0, 0), Point::new(1, 1), &UnitCost),
            Err(Error::SearchNotReset)
        );
        engine.reset();
        assert!(!engine.is_searched());
        assert_eq!(engine.distance_at(&Point::new(1, 1)), None);
        assert!(engine
            .search(&grid, Point::new(0, 0), Point::new(1, 1), &UnitCost)
            .is_ok());
    }

    #[test]
    fn invalid_endpoints_fail_fast() {
        let grid = SearchGrid::parse("S#\n..\n").unwrap();
        let mut engine = GridSearch::new();
        assert!(matches!(
            engine.search(&grid, Point::new(0, 0), Point::new(5, 0), &UnitCost),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(matches!(
            engine.search(&grid, Point::new(0, 0), Point::new(1, 0), &UnitCost),
            Err(Error::Blocked { .. })
        ));
        // Nothing ran, so the engine is still clean
        assert!(!engine.is_searched());
    }

    #[test]
    fn negative_costs_are_rejected() {
        let grid = open_grid(1, 2);
        let mut engine = GridSearch::new();
        let cost = |_: Option<Direction>, _: Direction| -1i32;
        assert_eq!(
            engine.search(&grid, Point::new(0, 0), Point::new(1, 0), &cost),
            Err(Error::NegativeCost)
        );
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let grid = SearchGrid::parse("S.#.\n..#E\n").unwrap();
        let mut engine = GridSearch::new();
        let result = engine
            .search(&grid, Point::new(0, 0), Point::new(3, 1), &UnitCost)
            .unwrap();
        assert!(!result.is_reachable());
        assert_eq!(result.expanded, 0);
        assert!(engine.reconstruct_paths(&Point::new(3, 1)).unwrap().is_empty());
        assert_eq!(engine.path(&Point::new(3, 1)).unwrap(), None);
    }

    #[test]
    fn unreachable_without_components() {
        let mut grid = SearchGrid::parse("S..\n...\n..E\n").unwrap();
        grid.set_wall(&Point::new(1, 2), true).unwrap();
        grid.set_wall(&Point::new(2, 1), true).unwrap();
        // Components are dirty, so the search has to exhaust the frontier
        assert!(grid.components_dirty);
        let mut engine = GridSearch::new();
        let result = engine
            .search(&grid, Point::new(0, 0), Point::new(2, 2), &UnitCost)
            .unwrap();
        assert_eq!(result.distance, None);
        assert_eq!(result.expanded, 6);
    }

    #[test]
    fn all_paths_of_open_square() {
        let grid = open_grid(3, 3);
        let mut engine = GridSearch::new();
        let goal = Point::new(2, 2);
        engine.search(&grid, Point::new(0, 0), goal, &UnitCost).unwrap();
        // C(4, 2) monotone lattice paths
        let paths = engine.all_paths(&goal).unwrap();
        assert_eq!(paths.len(), 6);
        for path in &paths {
            assert_eq!(path.len(), 5);
            assert_eq!(path[0], Point::new(0, 0));
            assert_eq!(path[4], goal);
        }
        assert_eq!(engine.reconstruct_paths(&goal).unwrap().len(), 9);
    }

    #[test]
    fn single_predecessor_mode_keeps_one_path() {
        let grid = open_grid(3, 3);
        let mut engine = GridSearch::new();
        engine.config.all_predecessors = false;
        let goal = Point::new(2, 2);
        engine.search(&grid, Point::new(0, 0), goal, &UnitCost).unwrap();
        assert_eq!(engine.all_paths(&goal).unwrap().len(), 1);
        assert_eq!(engine.reconstruct_paths(&goal).unwrap().len(), 5);
    }

    #[test]
    fn bounded_flood_through_walls() {
        let grid = SearchGrid::parse("#####\n#####\n##.##\n#####\n#####\n").unwrap();
        let mut engine = GridSearch::new();
        engine.config.through_walls = true;
        engine.config.max_cost = Some(2);
        engine.flood(&grid, Point::new(2, 2), &UnitCost).unwrap();
        let distances = engine.distances().unwrap();
        // Manhattan diamond of radius 2
        assert_eq!(distances.len(), 13);
        assert_eq!(engine.distance_at(&Point::new(0, 2)), Some(2));
        assert_eq!(engine.distance_at(&Point::new(0, 0)), None);
    }
}
