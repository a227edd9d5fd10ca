use crate::wondev::prelude::*;

/// Signed board coordinate; the wire protocol uses `-1 -1` for hidden pawns,
/// so components may sit outside the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    /// Constructs a new coord.
    pub fn new(x: i32, y: i32) -> Coord {
        Coord { x, y }
    }

    /// The Chebyshev (king-move) distance to another coord.
    pub fn chebyshev(&self, other: &Coord) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Linear offset of the coord in a `w`-wide grid.
    pub fn idx(&self, w: usize) -> usize {
        self.y as usize * w + self.x as usize
    }

    /// The canonical notation of the coord as it appears on the wire.
    pub fn notate(&self) -> String {
        format!("{} {}", self.x, self.y)
    }

    /// Determines whether or not the coord is inside a `w`-wide grid.
    pub fn valid(&self, w: usize) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < w as i32 && self.y < w as i32
    }
}

// C + C

impl Add<Coord> for Coord {
    type Output = Coord;
    fn add(self, rhs: Coord) -> Self::Output {
        Coord { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Add<&Coord> for &Coord {
    type Output = Coord;
    fn add(self, rhs: &Coord) -> Self::Output {
        *self + *rhs
    }
}

// C - C

impl Sub<Coord> for Coord {
    type Output = Coord;
    fn sub(self, rhs: Coord) -> Self::Output {
        Coord { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Sub<&Coord> for &Coord {
    type Output = Coord;
    fn sub(self, rhs: &Coord) -> Self::Output {
        *self - *rhs
    }
}

/// The eight compass directions, indexed clockwise from north.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    N = 0,
    NE = 1,
    E = 2,
    SE = 3,
    S = 4,
    SW = 5,
    W = 6,
    NW = 7,
}

impl Direction {
    /// Gets the compass directions in index order.
    pub fn all() -> [Direction; 8] {
        use Direction::*;
        [N, NE, E, SE, S, SW, W, NW]
    }

    /// Whether `other` is within one compass step of this direction, wrapping
    /// around north. Pushes must continue roughly forward.
    pub fn adjacent(&self, other: Direction) -> bool {
        let gap = (self.index() as i32 - other.index() as i32).rem_euclid(8);
        gap <= 1 || gap == 7
    }

    /// Recovers a direction from its clockwise index.
    pub fn from_index(index: usize) -> Direction {
        Direction::all()[index % 8]
    }

    /// The clockwise index of the direction.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Notates the direction with its compass name.
    pub fn notate(&self) -> String {
        match self {
            Direction::N => "N",
            Direction::NE => "NE",
            Direction::E => "E",
            Direction::SE => "SE",
            Direction::S => "S",
            Direction::SW => "SW",
            Direction::W => "W",
            Direction::NW => "NW",
        }
        .into()
    }

    /// The unit offset one step in this direction. North is up, towards
    /// smaller `y`.
    pub fn offset(&self) -> Coord {
        match self {
            Direction::N => Coord::new(0, -1),
            Direction::NE => Coord::new(1, -1),
            Direction::E => Coord::new(1, 0),
            Direction::SE => Coord::new(1, 1),
            Direction::S => Coord::new(0, 1),
            Direction::SW => Coord::new(-1, 1),
            Direction::W => Coord::new(-1, 0),
            Direction::NW => Coord::new(-1, -1),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "N" => Ok(Direction::N),
            "NE" => Ok(Direction::NE),
            "E" => Ok(Direction::E),
            "SE" => Ok(Direction::SE),
            "S" => Ok(Direction::S),
            "SW" => Ok(Direction::SW),
            "W" => Ok(Direction::W),
            "NW" => Ok(Direction::NW),
            _ => Err(anyhow!("invalid notation {s} for Direction")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Coord, Direction};

    #[test]
    fn direction_names_roundtrip() {
        for (i, dir) in Direction::all().into_iter().enumerate() {
            assert_eq!(dir.index(), i);
            assert_eq!(dir.notate().parse::<Direction>().unwrap(), dir);
            assert_eq!(Direction::from_index(i), dir);
        }
        assert!("X".parse::<Direction>().is_err());
        assert!("n".parse::<Direction>().is_err());
    }

    #[test]
    fn offsets_are_units_on_the_compass() {
        assert_eq!(Direction::N.offset(), Coord::new(0, -1));
        assert_eq!(Direction::SE.offset(), Coord::new(1, 1));
        assert_eq!(Direction::W.offset(), Coord::new(-1, 0));
        for dir in Direction::all() {
            let Coord { x, y } = dir.offset();
            assert_eq!(x.abs().max(y.abs()), 1);
        }
    }

    #[test]
    fn push_angle_wraps_around_north() {
        assert!(Direction::N.adjacent(Direction::NW));
        assert!(Direction::N.adjacent(Direction::N));
        assert!(Direction::N.adjacent(Direction::NE));
        assert!(!Direction::N.adjacent(Direction::W));
        assert!(!Direction::N.adjacent(Direction::S));
        assert!(Direction::NW.adjacent(Direction::N));
    }

    #[test]
    fn bounds_and_indexing() {
        let c = Coord::new(2, 3);
        assert!(c.valid(5));
        assert!(!c.valid(3));
        assert!(!Coord::new(-1, 0).valid(5));
        assert_eq!(c.idx(5), 17);
        assert_eq!(c + Direction::N.offset(), Coord::new(2, 2));
        assert_eq!(c - Coord::new(2, 3), Coord::new(0, 0));
        assert_eq!(Coord::new(4, 4).chebyshev(&Coord::new(2, 3)), 2);
    }
}
