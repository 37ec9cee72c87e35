use std::fmt;
use std::ops;

use itertools::Itertools;


pub const NUM_ROWS: u8 = 8;
pub const NUM_COLS: u8 = 8;


// Board row, counted from the top: row 0 is rank 8, row 7 is rank 1.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Row {
    idx: u8, // 0-based
}

impl Row {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_ROWS);
        Self { idx }
    }
    pub const fn from_rank(rank: u8) -> Self {
        assert!(rank >= 1 && rank <= NUM_ROWS);
        Self { idx: NUM_ROWS - rank }
    }
    pub fn from_algebraic(rank: char) -> Option<Self> {
        let rank = rank.to_digit(10)?;
        if (1..=NUM_ROWS as u32).contains(&rank) {
            Some(Self::from_rank(rank as u8))
        } else {
            None
        }
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_rank(self) -> u8 { NUM_ROWS - self.idx }
    pub fn to_algebraic(self) -> char { (self.to_rank() + b'0') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_ROWS).map(Self::from_zero_based)
    }
}

impl ops::Sub for Row {
    type Output = i8;
    fn sub(self, other: Self) -> Self::Output {
        (self.to_zero_based() as i8) - (other.to_zero_based() as i8)
    }
}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Col {
    idx: u8, // 0-based
}

impl Col {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_COLS);
        Self { idx }
    }
    pub const fn from_file(file: char) -> Self {
        assert!(file >= 'a' && file <= 'h');
        Self::from_zero_based(file as u8 - b'a')
    }
    pub fn from_algebraic(file: char) -> Option<Self> {
        let file = file.to_ascii_lowercase();
        if ('a'..='h').contains(&file) { Some(Self::from_file(file)) } else { None }
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub fn to_algebraic(self) -> char { (self.idx + b'a') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_COLS).map(Self::from_zero_based)
    }
}

impl ops::Sub for Col {
    type Output = i8;
    fn sub(self, other: Self) -> Self::Output {
        (self.to_zero_based() as i8) - (other.to_zero_based() as i8)
    }
}


#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub row: Row,
    pub col: Col,
}

impl Coord {
    pub const fn new(row: Row, col: Col) -> Self { Self { row, col } }

    // Parses a square like "c3" or "C3". Anything else, including surrounding whitespace,
    // is rejected.
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let (file, rank) = s.chars().collect_tuple()?;
        Some(Coord {
            row: Row::from_algebraic(rank)?,
            col: Col::from_algebraic(file)?,
        })
    }
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.col.to_algebraic(), self.row.to_algebraic())
    }

    // Row-major cell index: 0 is a8 (top-left), 63 is h1 (bottom-right).
    pub fn to_index(self) -> usize {
        self.row.to_zero_based() as usize * NUM_COLS as usize + self.col.to_zero_based() as usize
    }
    pub fn from_index(idx: usize) -> Option<Self> {
        if idx >= NUM_ROWS as usize * NUM_COLS as usize {
            return None;
        }
        Some(Coord {
            row: Row::from_zero_based((idx / NUM_COLS as usize) as u8),
            col: Col::from_zero_based((idx % NUM_COLS as usize) as u8),
        })
    }

    // Only dark squares can ever hold a piece.
    pub fn is_playable(self) -> bool {
        (self.row.to_zero_based() + self.col.to_zero_based()) % 2 == 1
    }

    pub fn offset(self, (d_row, d_col): (i8, i8)) -> Option<Self> {
        let row = self.row.to_zero_based() as i8 + d_row;
        let col = self.col.to_zero_based() as i8 + d_col;
        if (0..NUM_ROWS as i8).contains(&row) && (0..NUM_COLS as i8).contains(&col) {
            Some(Coord::new(Row::from_zero_based(row as u8), Col::from_zero_based(col as u8)))
        } else {
            None
        }
    }

    // Cells strictly between `self` and `to`, which must lie on a common diagonal.
    pub fn diagonal_path(self, to: Coord) -> impl Iterator<Item = Coord> {
        let (d_row, d_col) = to - self;
        assert_eq!(d_row.abs(), d_col.abs());
        let direction = (d_row.signum(), d_col.signum());
        (1..d_row.abs()).filter_map(move |step| self.offset((direction.0 * step, direction.1 * step)))
    }

    pub fn all() -> impl Iterator<Item = Coord> {
        Row::all().cartesian_product(Col::all()).map(|(row, col)| Coord { row, col })
    }
    pub fn playable() -> impl Iterator<Item = Coord> { Self::all().filter(|c| c.is_playable()) }
}

impl ops::Sub for Coord {
    type Output = (i8, i8);
    fn sub(self, other: Self) -> Self::Output { (self.row - other.row, self.col - other.col) }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({})", self.to_algebraic())
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

// Converts a square like "e3" into a row-major board index.
pub fn coordinate_to_index(text: &str) -> Option<usize> {
    Coord::from_algebraic(text).map(Coord::to_index)
}


macro_rules! define_coords {
    ($($name:ident = $file:literal $rank:literal),* $(,)?) => {
        impl Coord {
            $(pub const $name: Coord = Coord::new(Row::from_rank($rank), Col::from_file($file));)*
        }
    };
}

define_coords! {
    A1 = 'a' 1, A2 = 'a' 2, A3 = 'a' 3, A4 = 'a' 4, A5 = 'a' 5, A6 = 'a' 6, A7 = 'a' 7, A8 = 'a' 8,
    B1 = 'b' 1, B2 = 'b' 2, B3 = 'b' 3, B4 = 'b' 4, B5 = 'b' 5, B6 = 'b' 6, B7 = 'b' 7, B8 = 'b' 8,
    C1 = 'c' 1, C2 = 'c' 2, C3 = 'c' 3, C4 = 'c' 4, C5 = 'c' 5, C6 = 'c' 6, C7 = 'c' 7, C8 = 'c' 8,
    D1 = 'd' 1, D2 = 'd' 2, D3 = 'd' 3, D4 = 'd' 4, D5 = 'd' 5, D6 = 'd' 6, D7 = 'd' 7, D8 = 'd' 8,
    E1 = 'e' 1, E2 = 'e' 2, E3 = 'e' 3, E4 = 'e' 4, E5 = 'e' 5, E6 = 'e' 6, E7 = 'e' 7, E8 = 'e' 8,
    F1 = 'f' 1, F2 = 'f' 2, F3 = 'f' 3, F4 = 'f' 4, F5 = 'f' 5, F6 = 'f' 6, F7 = 'f' 7, F8 = 'f' 8,
    G1 = 'g' 1, G2 = 'g' 2, G3 = 'g' 3, G4 = 'g' 4, G5 = 'g' 5, G6 = 'g' 6, G7 = 'g' 7, G8 = 'g' 8,
    H1 = 'h' 1, H2 = 'h' 2, H3 = 'h' 3, H4 = 'h' 4, H5 = 'h' 5, H6 = 'h' 6, H7 = 'h' 7, H8 = 'h' 8,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algebraic_to_index() {
        assert_eq!(coordinate_to_index("a8"), Some(0));
        assert_eq!(coordinate_to_index("h1"), Some(63));
        assert_eq!(coordinate_to_index("e3"), Some(44));
        assert_eq!(coordinate_to_index("E3"), Some(44));
        assert_eq!(Coord::from_index(44), Some(Coord::E3));
    }

    #[test]
    fn invalid_algebraic() {
        for text in ["", "a", "a9", "a0", "i1", "a10", " a1", "a1 ", "1a", "-"] {
            assert_eq!(coordinate_to_index(text), None, "{text:?}");
        }
        assert_eq!(Coord::from_index(64), None);
    }

    #[test]
    fn playable_squares() {
        assert_eq!(Coord::playable().count(), 32);
        assert!(Coord::A1.is_playable());
        assert!(Coord::B8.is_playable());
        assert!(!Coord::A8.is_playable());
        assert!(!Coord::H1.is_playable());
    }

    #[test]
    fn diagonal_path() {
        let path: Vec<_> = Coord::A1.diagonal_path(Coord::D4).collect();
        assert_eq!(path, vec![Coord::B2, Coord::C3]);
        assert_eq!(Coord::H2.diagonal_path(Coord::G1).count(), 0);
        assert_eq!(Coord::A1.offset((1, 0)), None);
    }
}
