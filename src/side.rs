use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::coord::{NUM_ROWS, Row};


#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Enum, EnumIter, Serialize, Deserialize,
)]
pub enum Side {
    Red,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    // Row delta of a single forward step. Red starts at the bottom of the board (high row
    // indices) and moves up.
    pub fn forward(self) -> i8 {
        match self {
            Side::Red => -1,
            Side::Black => 1,
        }
    }

    pub fn promotion_row(self) -> Row {
        match self {
            Side::Red => Row::from_zero_based(0),
            Side::Black => Row::from_zero_based(NUM_ROWS - 1),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Red => "Red",
            Side::Black => "Black",
        }
    }

    pub fn board_edge(self) -> &'static str {
        match self {
            Side::Red => "bottom",
            Side::Black => "top",
        }
    }
}
