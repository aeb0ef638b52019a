use grid_util::direction::Direction as Compass;
use grid_util::point::Point;

/// One of the four cardinal moves on the grid. Rows grow southwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

/// How much a heading changes between two consecutive moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    Straight,
    Quarter,
    Reverse,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// The matching [grid_util] direction. Its `NORTH` points towards growing `y` while rows
    /// grow southwards here, so the vertical directions are swapped.
    pub fn compass(self) -> Compass {
        match self {
            Direction::North => Compass::SOUTH,
            Direction::East => Compass::EAST,
            Direction::South => Compass::NORTH,
            Direction::West => Compass::WEST,
        }
    }
    /// Inverse of [compass](Self::compass). Diagonals and [Compass::NONE] have no counterpart.
    pub fn from_compass(compass: Compass) -> Option<Direction> {
        match compass {
            Compass::SOUTH => Some(Direction::North),
            Compass::EAST => Some(Direction::East),
            Compass::NORTH => Some(Direction::South),
            Compass::WEST => Some(Direction::West),
            _ => None,
        }
    }

    /// (column, row) offset of a single step.
    pub fn delta(self) -> (i32, i32) {
        let compass = self.compass();
        (compass.x(), compass.y())
    }
    pub fn step(self, point: &Point) -> Point {
        let (dx, dy) = self.delta();
        Point::new(point.x + dx, point.y + dy)
    }
    pub fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
    /// Classifies the change of heading from `self` to `next` by its angle in eighths.
    pub fn turn(self, next: Direction) -> Turn {
        match self.compass().discrete_angle(next.compass()) {
            0 => Turn::Straight,
            4 => Turn::Reverse,
            _ => Turn::Quarter,
        }
    }
    /// Direction of a single orthogonal step from `from` to `to`, if they are adjacent.
    pub fn between(from: &Point, to: &Point) -> Option<Direction> {
        if from.manhattan_distance(to) != 1 {
            return None;
        }
        Direction::from_compass(from.dir_obj(to))
    }
    pub fn from_char(ch: char) -> Option<Direction> {
        match ch {
            '^' => Some(Direction::North),
            '>' => Some(Direction::East),
            'v' => Some(Direction::South),
            '<' => Some(Direction::West),
            _ => None,
        }
    }
    pub fn as_char(self) -> char {
        match self {
            Direction::North => '^',
            Direction::East => '>',
            Direction::South => 'v',
            Direction::West => '<',
        }
    }
}
