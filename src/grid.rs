use std::{fmt, ops};

use ndarray::{Array, Array2};
use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

use crate::coord::{Coord, NUM_COLS, NUM_ROWS};
use crate::piece::{Piece, PieceKind, cell_from_code, cell_to_code};
use crate::side::Side;


pub const NUM_CELLS: usize = 64;
const_assert_eq!(NUM_CELLS, NUM_ROWS as usize * NUM_COLS as usize);

// Serialized as a flat row-major list of 64 cell codes (see `piece::cell_to_code`).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<u8>", try_from = "Vec<u8>")]
pub struct Grid {
    data: Array2<Option<Piece>>,
}

impl Grid {
    pub fn new() -> Self {
        Grid {
            data: Array::from_elem((NUM_ROWS as usize, NUM_COLS as usize), None),
        }
    }

    // Cells in row-major order, starting from a8.
    pub fn cells(&self) -> impl Iterator<Item = Option<Piece>> + '_ { self.data.iter().copied() }

    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::all().filter_map(|pos| self[pos].map(|piece| (pos, piece)))
    }

    pub fn count(&self, side: Side) -> usize {
        self.pieces().filter(|(_, piece)| piece.side == side).count()
    }

    pub fn count_kind(&self, side: Side, kind: PieceKind) -> usize {
        self.pieces().filter(|(_, piece)| piece.side == side && piece.kind == kind).count()
    }

    pub fn count_empty(&self) -> usize { self.cells().filter(Option::is_none).count() }
}

impl ops::Index<Coord> for Grid {
    type Output = Option<Piece>;
    fn index(&self, pos: Coord) -> &Self::Output { &self.data[coord_to_index(pos)] }
}

impl ops::IndexMut<Coord> for Grid {
    fn index_mut(&mut self, pos: Coord) -> &mut Self::Output { &mut self.data[coord_to_index(pos)] }
}

fn coord_to_index(pos: Coord) -> [usize; 2] {
    [pos.row.to_zero_based() as usize, pos.col.to_zero_based() as usize]
}

impl From<Grid> for Vec<u8> {
    fn from(grid: Grid) -> Self { grid.cells().map(cell_to_code).collect() }
}

impl TryFrom<Vec<u8>> for Grid {
    type Error = String;
    fn try_from(codes: Vec<u8>) -> Result<Self, Self::Error> {
        if codes.len() != NUM_CELLS {
            return Err(format!("Expected {} cells, got {}", NUM_CELLS, codes.len()));
        }
        let cells = codes
            .iter()
            .map(|&code| cell_from_code(code).ok_or_else(|| format!("Invalid cell code: {code}")))
            .collect::<Result<Vec<_>, _>>()?;
        let data = Array2::from_shape_vec((NUM_ROWS as usize, NUM_COLS as usize), cells)
            .map_err(|err| err.to_string())?;
        let grid = Grid { data };
        if let Some((pos, _)) = grid.pieces().find(|(pos, _)| !pos.is_playable()) {
            return Err(format!("Piece on a light square: {pos}"));
        }
        Ok(grid)
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid ")?;
        f.debug_map()
            .entries(self.pieces().map(|(pos, piece)| (pos.to_algebraic(), piece.to_ascii())))
            .finish()
    }
}
