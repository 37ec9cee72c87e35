use serde::{Deserialize, Serialize};

use crate::coord::{Coord, Row};
use crate::grid::Grid;
use crate::piece::Piece;
use crate::side::Side;


// Number of rows each side fills at setup.
const SETUP_ROWS: u8 = 3;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    #[serde(rename = "move")]
    pub move_text: String,
    #[serde(rename = "color")]
    pub side: Side,
    pub provider_id: String,
    // The side had a capture available but played a non-capturing move.
    pub mistake: bool,
    // The prompt for this move carried a warning about the side's previous mistake.
    pub was_warned: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GameResult {
    Victory(Side),
    // Both sides ran out of pieces at once. Unreachable with one capture per turn, but
    // handled for arbitrary positions.
    Draw,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(rename = "board")]
    pub grid: Grid,
    pub turn: Side,
    pub move_history: Vec<MoveRecord>,
}

impl GameState {
    pub fn new(grid: Grid, turn: Side) -> Self { GameState { grid, turn, move_history: Vec::new() } }

    // Records an accepted move and passes the turn. Rejected moves never get here, so `turn`
    // only changes after a successful application.
    pub fn end_turn(&mut self, record: MoveRecord) {
        assert_eq!(record.side, self.turn);
        self.move_history.push(record);
        self.turn = self.turn.opponent();
    }
}

impl GameResult {
    pub fn ui_string(self) -> &'static str {
        match self {
            GameResult::Victory(Side::Red) => "Red wins!",
            GameResult::Victory(Side::Black) => "Black wins!",
            GameResult::Draw => "Draw!",
        }
    }
}

pub fn generate_starting_grid() -> Grid {
    let mut grid = Grid::new();
    for pos in Coord::playable() {
        let row = pos.row.to_zero_based();
        if row < SETUP_ROWS {
            grid[pos] = Some(Piece::man(Side::Black));
        } else if row >= Row::from_rank(SETUP_ROWS).to_zero_based() {
            grid[pos] = Some(Piece::man(Side::Red));
        }
    }
    grid
}

// Standard 24-piece setup, red to move.
pub fn initial_state() -> GameState { GameState::new(generate_starting_grid(), Side::Red) }
