use core::fmt;

/// Contents of a single grid cell. Only [Tile::Wall] blocks movement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    Start,
    Goal,
}

impl Tile {
    pub fn from_char(ch: char) -> Option<Tile> {
        match ch {
            '.' => Some(Tile::Empty),
            '#' => Some(Tile::Wall),
            'S' => Some(Tile::Start),
            'E' => Some(Tile::Goal),
            _ => None,
        }
    }
    pub fn as_char(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Wall => '#',
            Tile::Start => 'S',
            Tile::Goal => 'E',
        }
    }
    pub fn is_passable(self) -> bool {
        self != Tile::Wall
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chars_round_trip() {
        for tile in [Tile::Empty, Tile::Wall, Tile::Start, Tile::Goal] {
            assert_eq!(Tile::from_char(tile.as_char()), Some(tile));
        }
        assert_eq!(Tile::from_char('x'), None);
    }

    #[test]
    fn only_walls_block() {
        assert!(!Tile::Wall.is_passable());
        assert!(Tile::Start.is_passable());
        assert!(Tile::Goal.is_passable());
    }
}
