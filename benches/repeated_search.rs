use criterion::{criterion_group, criterion_main, Criterion};
use grid_search::{GridSearch, Point, SearchGrid, Tile, TurnPenalty, UnitCost};
use rand::prelude::*;
use std::hint::black_box;

const N: usize = 141;

fn maze_like_grid(rng: &mut StdRng) -> SearchGrid {
    let mut grid = SearchGrid::new(N, N, Tile::Empty).unwrap();
    for p in grid.points().collect::<Vec<_>>() {
        grid.set_wall(&p, rng.gen_bool(0.25)).unwrap();
    }
    grid.set_wall(&Point::new(0, 0), false).unwrap();
    grid.set_wall(&Point::new(N as i32 - 1, N as i32 - 1), false).unwrap();
    grid.generate_components();
    grid
}

/// Resets one engine and searches the same grid over and over, as the cheat and keypad
/// puzzles do.
fn reset_and_search(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let grid = maze_like_grid(&mut rng);
    let start = Point::new(0, 0);
    let end = Point::new(N as i32 - 1, N as i32 - 1);

    let mut engine = GridSearch::new();
    c.bench_function(format!("{N}x{N}, unit cost").as_str(), |b| {
        b.iter(|| {
            engine.reset();
            black_box(engine.search(&grid, start, end, &UnitCost).unwrap());
        })
    });

    let cost = TurnPenalty::reindeer();
    c.bench_function(format!("{N}x{N}, turn penalty").as_str(), |b| {
        b.iter(|| {
            engine.reset();
            black_box(engine.search(&grid, start, end, &cost).unwrap());
            black_box(engine.reconstruct_paths(&end).unwrap());
        })
    });
}

/// Drops walls one at a time and searches after each, like bytes falling into memory.
fn wall_insertion(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let start = Point::new(0, 0);
    let end = Point::new(N as i32 - 1, N as i32 - 1);
    let walls = (0..200)
        .map(|_| Point::new(rng.gen_range(1..N as i32 - 1), rng.gen_range(1..N as i32 - 1)))
        .collect::<Vec<_>>();

    let mut engine = GridSearch::new();
    c.bench_function(format!("{N}x{N}, wall insertion").as_str(), |b| {
        b.iter(|| {
            let mut grid = SearchGrid::new(N, N, Tile::Empty).unwrap();
            for wall in &walls {
                grid.set_wall(wall, true).unwrap();
                engine.reset();
                black_box(engine.search(&grid, start, end, &UnitCost).unwrap());
            }
        })
    });
}

criterion_group!(benches, reset_and_search, wall_insertion);
criterion_main!(benches);
