//! Step costs. A step cost sees the heading the walker currently has (if any) and the
//! direction of the next move, so turn penalties can be expressed without putting a
//! fixed cost on cells.
use core::fmt::Debug;
use num_traits::Zero;

use crate::direction::{Direction, Turn};
use crate::{DEFAULT_STEP, QUARTER_TURN, REVERSE_TURN};

/// Anything usable as an accumulated path cost.
pub trait Cost: Zero + Ord + Copy + Debug {}

impl<T> Cost for T where T: Zero + Ord + Copy + Debug {}

pub trait StepCost {
    type Cost: Cost;

    fn step_cost(&self, heading: Option<Direction>, next: Direction) -> Self::Cost;

    /// Whether [step_cost](Self::step_cost) depends on the heading. When it does not, the
    /// search keeps a single state per cell and always passes [None] as heading.
    fn directional(&self) -> bool {
        true
    }
}

impl<F, C> StepCost for F
where
    F: Fn(Option<Direction>, Direction) -> C,
    C: Cost,
{
    type Cost = C;

    fn step_cost(&self, heading: Option<Direction>, next: Direction) -> C {
        self(heading, next)
    }
}

/// Every orthogonal step costs one.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnitCost;

impl StepCost for UnitCost {
    type Cost = u64;

    fn step_cost(&self, _: Option<Direction>, _: Direction) -> u64 {
        DEFAULT_STEP
    }
    fn directional(&self) -> bool {
        false
    }
}

/// Moving costs `step`, plus `quarter_turn` for a 90° change of heading or `reverse` for
/// turning around. Without a heading no penalty applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnPenalty {
    pub step: u64,
    pub quarter_turn: u64,
    pub reverse: u64,
}

impl TurnPenalty {
    pub fn new(step: u64, quarter_turn: u64, reverse: u64) -> TurnPenalty {
        TurnPenalty {
            step,
            quarter_turn,
            reverse,
        }
    }
    /// 1 to go straight, 1001 after a quarter turn and 2001 after turning around.
    pub fn reindeer() -> TurnPenalty {
        TurnPenalty::new(DEFAULT_STEP, QUARTER_TURN, REVERSE_TURN)
    }
}

impl StepCost for TurnPenalty {
    type Cost = u64;

    fn step_cost(&self, heading: Option<Direction>, next: Direction) -> u64 {
        match heading.map(|h| h.turn(next)) {
            None | Some(Turn::Straight) => self.step,
            Some(Turn::Quarter) => self.step + self.quarter_turn,
            Some(Turn::Reverse) => self.step + self.reverse,
        }
    }
}
