use derive_new::new;
use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::side::Side;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Enum, EnumIter, Serialize, Deserialize)]
pub enum PieceKind {
    Man,
    King,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, new, Serialize, Deserialize)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
}

impl Piece {
    pub fn man(side: Side) -> Self { Self::new(side, PieceKind::Man) }
    pub fn king(side: Side) -> Self { Self::new(side, PieceKind::King) }

    // Kings never demote, so promoting a king is a no-op.
    pub fn promoted(self) -> Self { Self { kind: PieceKind::King, ..self } }

    pub fn to_ascii(self) -> char {
        use PieceKind::*;
        use Side::*;
        match (self.side, self.kind) {
            (Red, Man) => 'r',
            (Black, Man) => 'b',
            (Red, King) => 'R',
            (Black, King) => 'B',
        }
    }

    pub fn from_ascii(ch: char) -> Option<Self> {
        match ch {
            'r' => Some(Piece::man(Side::Red)),
            'b' => Some(Piece::man(Side::Black)),
            'R' => Some(Piece::king(Side::Red)),
            'B' => Some(Piece::king(Side::Black)),
            _ => None,
        }
    }
}

pub const EMPTY_CELL_ASCII: char = '.';

pub fn cell_to_ascii(cell: Option<Piece>) -> char {
    cell.map_or(EMPTY_CELL_ASCII, Piece::to_ascii)
}

// Numeric cell encoding used in serialized boards:
//   0 = empty, 1 = red man, 2 = black man, 3 = red king, 4 = black king.
pub fn cell_to_code(cell: Option<Piece>) -> u8 {
    use PieceKind::*;
    use Side::*;
    match cell.map(|p| (p.side, p.kind)) {
        None => 0,
        Some((Red, Man)) => 1,
        Some((Black, Man)) => 2,
        Some((Red, King)) => 3,
        Some((Black, King)) => 4,
    }
}

pub fn cell_from_code(code: u8) -> Option<Option<Piece>> {
    match code {
        0 => Some(None),
        1 => Some(Some(Piece::man(Side::Red))),
        2 => Some(Some(Piece::man(Side::Black))),
        3 => Some(Some(Piece::king(Side::Red))),
        4 => Some(Some(Piece::king(Side::Black))),
        _ => None,
    }
}
