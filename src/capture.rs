// Capture detection. Unlike the move engine, this never rejects anything: it is used to
// classify an accepted non-capturing move as a missed mandatory capture.

use crate::board::TurnMove;
use crate::coord::Coord;
use crate::game::{GameResult, GameState};
use crate::grid::Grid;
use crate::piece::{Piece, PieceKind};
use crate::side::Side;


pub const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub fn has_mandatory_capture(state: &GameState, side: Side) -> bool {
    find_capture(&state.grid, side).is_some()
}

// Returns the first capture available to `side` in row-major scan order.
pub fn find_capture(grid: &Grid, side: Side) -> Option<TurnMove> {
    grid.pieces()
        .filter(|(_, piece)| piece.side == side)
        .find_map(|(from, piece)| piece_capture(grid, from, piece))
}

fn piece_capture(grid: &Grid, from: Coord, piece: Piece) -> Option<TurnMove> {
    DIAGONALS.into_iter().find_map(|direction| match piece.kind {
        PieceKind::Man => man_capture(grid, from, piece.side, direction),
        PieceKind::King => king_capture(grid, from, piece.side, direction),
    })
}

fn man_capture(grid: &Grid, from: Coord, side: Side, (d_row, d_col): (i8, i8)) -> Option<TurnMove> {
    if d_row != side.forward() {
        return None;
    }
    let over = from.offset((d_row, d_col))?;
    let to = from.offset((2 * d_row, 2 * d_col))?;
    let opposing = grid[over].is_some_and(|p| p.side != side);
    (opposing && grid[to].is_none()).then_some(TurnMove { from, to })
}

// A king looks along the diagonal for the first occupied cell. An opposing piece there can
// be captured if the cell right behind it is free; an own piece blocks the direction.
fn king_capture(grid: &Grid, from: Coord, side: Side, direction: (i8, i8)) -> Option<TurnMove> {
    let mut pos = from.offset(direction)?;
    while grid[pos].is_none() {
        pos = pos.offset(direction)?;
    }
    let blocker = grid[pos]?;
    if blocker.side == side {
        return None;
    }
    let to = pos.offset(direction)?;
    grid[to].is_none().then_some(TurnMove { from, to })
}

// The game ends when a side has no pieces left.
pub fn game_result(grid: &Grid) -> Option<GameResult> {
    match (grid.count(Side::Red), grid.count(Side::Black)) {
        (0, 0) => Some(GameResult::Draw),
        (0, _) => Some(GameResult::Victory(Side::Black)),
        (_, 0) => Some(GameResult::Victory(Side::Red)),
        _ => None,
    }
}
