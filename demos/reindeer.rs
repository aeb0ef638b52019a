use grid_search::puzzles::reindeer_maze::ReindeerMaze;

// A reindeer starts on S facing east. Stepping forward costs 1, turning 90° costs 1000.
// Prints the lowest score and the number of tiles on any of the best routes.

const MAZE: &str = "
###############
#.......#....E#
#.#.###.#.###.#
#.....#.#...#.#
#.###.#####.#.#
#.#.#.......#.#
#.#.#####.###.#
#...........#.#
###.#.#####.#.#
#...#.....#.#.#
#.#.#.###.#.#.#
#.....#...#.#.#
#.###.#.#.#.#.#
#S..#.....#...#
###############
";

// Pass the path of a puzzle input to solve it instead of the built-in maze.
fn main() {
    let input = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path).unwrap(),
        None => MAZE.to_owned(),
    };
    let maze = ReindeerMaze::parse(&input).unwrap();
    println!("{}", maze.grid);
    let routes = maze.solve().unwrap();
    println!("Lowest score: {:?}", routes.score);
    println!("Best seats: {}", routes.seats);
}
