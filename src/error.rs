//! Error types shared by the grid, the search engine and the puzzle solvers.
//!
//! A missing path is not an error: searches report it through
//! [SearchResult::distance](crate::search::SearchResult::distance) being [None].

use grid_util::point::Point;
use std::num::ParseIntError;
use thiserror::Error;

use crate::tile::Tile;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("grid has no cells")]
    EmptyGrid,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile {ch:?} at row {row}, column {col}")]
    UnknownTile { ch: char, row: usize, col: usize },

    #[error("grid has no {0:?} tile")]
    MissingTile(Tile),

    #[error("grid has more than one {0:?} tile")]
    DuplicateTile(Tile),

    #[error("{point} lies outside the {rows}x{cols} grid")]
    OutOfBounds {
        point: Point,
        rows: usize,
        cols: usize,
    },

    #[error("{point} is a wall")]
    Blocked { point: Point },

    #[error("step cost function returned a negative cost")]
    NegativeCost,

    #[error("search state is dirty, call reset before searching again")]
    SearchNotReset,

    #[error("no search has run since the last reset")]
    NoSearch,

    #[error("invalid input: {0}")]
    Input(String),

    #[error("invalid number: {0}")]
    ParseInt(#[from] ParseIntError),
}

pub type Result<T> = std::result::Result<T, Error>;
