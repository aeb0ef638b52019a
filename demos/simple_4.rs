use grid_search::{GridSearch, Point, SearchGrid, UnitCost};

// In this example every shortest path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Nodes have a 4-neighborhood, so there are two paths of length 4

fn main() {
    let grid = SearchGrid::parse("S..\n.#.\n..E\n").unwrap();
    println!("{}", grid);
    let start = grid.start().unwrap();
    let end = grid.goal().unwrap();
    let mut engine = GridSearch::new();
    let result = engine.search(&grid, start, end, &UnitCost).unwrap();
    println!("Distance: {:?}", result.distance);
    for (i, path) in engine.all_paths(&end).unwrap().iter().enumerate() {
        println!("Path {}:", i);
        for p in path {
            println!("{:?}", p);
        }
    }
    // The engine keeps its buffers, reset it before searching from elsewhere
    engine.reset();
    let result = engine
        .search(&grid, Point::new(2, 0), Point::new(0, 2), &UnitCost)
        .unwrap();
    println!("Distance from top right to bottom left: {:?}", result.distance);
}
