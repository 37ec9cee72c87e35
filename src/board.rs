// Move validation and application. The engine only checks legality: it happily accepts a
// quiet move when a capture is available (see `capture::has_mandatory_capture`).
//
// Known deviation from English draughts: a turn contains exactly one jump.
// Improvement potential: support multi-jump chains. This needs a multi-square notation
// (e.g. "c3-e5-g7") in the prompt, in `extract_move` and in `TurnMove`.

use lazy_static::lazy_static;
use regex_lite::Regex;

use crate::coord::Coord;
use crate::game::GameState;
use crate::grid::Grid;
use crate::piece::{Piece, PieceKind};
use crate::side::Side;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TurnMove {
    pub from: Coord,
    pub to: Coord,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TurnError {
    InvalidNotation,
    PieceMissing,
    WrongSide,
    DestinationOccupied,
    ImpossibleTrajectory,
    NothingToCapture,
    PathBlocked,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MoveOutcome {
    pub turn_move: TurnMove,
    pub captured: Option<Coord>,
    pub promoted: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Reachability {
    Step,
    Capture(Coord),
}

#[derive(Clone, Debug)]
struct TurnOutcome {
    new_grid: Grid,
    outcome: MoveOutcome,
}

impl TurnMove {
    // Strict `<from>-<to>` notation, e.g. "c3-b4". Case-insensitive, no surrounding text.
    pub fn parse(notation: &str) -> Option<Self> {
        lazy_static! {
            static ref MOVE_RE: Regex = Regex::new(r"(?i)^([a-h][1-8])-([a-h][1-8])$").unwrap();
        }
        let cap = MOVE_RE.captures(notation)?;
        Some(TurnMove {
            from: Coord::from_algebraic(cap.get(1)?.as_str())?,
            to: Coord::from_algebraic(cap.get(2)?.as_str())?,
        })
    }

    pub fn to_algebraic(self) -> String {
        format!("{}-{}", self.from.to_algebraic(), self.to.to_algebraic())
    }

    // Whether the move has the shape of a single jump (two cells along a diagonal). Looks at
    // coordinates only: a long-range king capture does not qualify.
    pub fn is_jump_shaped(self) -> bool {
        let (d_row, d_col) = self.to - self.from;
        d_row.abs() == 2 && d_col.abs() == 2
    }
}

impl TurnError {
    pub fn is_malformed(self) -> bool { self == TurnError::InvalidNotation }

    pub fn ui_string(self) -> &'static str {
        match self {
            TurnError::InvalidNotation => "move must look like c3-d4",
            TurnError::PieceMissing => "no piece on the starting square",
            TurnError::WrongSide => "the piece belongs to the opponent",
            TurnError::DestinationOccupied => "the destination square is occupied",
            TurnError::ImpossibleTrajectory => "the piece cannot move this way",
            TurnError::NothingToCapture => "there is no opposing piece to jump over",
            TurnError::PathBlocked => "the path is blocked",
        }
    }
}

fn should_promote(piece: Piece, to: Coord) -> bool {
    piece.kind == PieceKind::Man && to.row == piece.side.promotion_row()
}

fn is_opposing(cell: Option<Piece>, side: Side) -> bool { cell.is_some_and(|p| p.side != side) }

fn man_reachability(grid: &Grid, side: Side, mv: TurnMove) -> Result<Reachability, TurnError> {
    let (d_row, d_col) = mv.to - mv.from;
    let forward = side.forward();
    if d_row == forward && d_col.abs() == 1 {
        Ok(Reachability::Step)
    } else if d_row == 2 * forward && d_col.abs() == 2 {
        // Cannot fail: both ends are on the board.
        let over = mv.from.offset((forward, d_col / 2)).ok_or(TurnError::ImpossibleTrajectory)?;
        if is_opposing(grid[over], side) {
            Ok(Reachability::Capture(over))
        } else {
            Err(TurnError::NothingToCapture)
        }
    } else {
        Err(TurnError::ImpossibleTrajectory)
    }
}

// Kings fly: any distance along a free diagonal, or over exactly one opposing piece with
// nothing else on the path.
fn king_reachability(grid: &Grid, side: Side, mv: TurnMove) -> Result<Reachability, TurnError> {
    let (d_row, d_col) = mv.to - mv.from;
    if d_row.abs() != d_col.abs() || d_row == 0 {
        return Err(TurnError::ImpossibleTrajectory);
    }
    let occupied: Vec<Coord> = mv.from.diagonal_path(mv.to).filter(|&pos| grid[pos].is_some()).collect();
    match occupied.as_slice() {
        [] => Ok(Reachability::Step),
        [over] if is_opposing(grid[*over], side) => Ok(Reachability::Capture(*over)),
        _ => Err(TurnError::PathBlocked),
    }
}

// Checks validity and computes the resulting grid without touching `grid`.
fn turn_outcome(grid: &Grid, mv: TurnMove, side: Side) -> Result<TurnOutcome, TurnError> {
    let piece = grid[mv.from].ok_or(TurnError::PieceMissing)?;
    if piece.side != side {
        return Err(TurnError::WrongSide);
    }
    if grid[mv.to].is_some() {
        return Err(TurnError::DestinationOccupied);
    }
    let reachability = match piece.kind {
        PieceKind::Man => man_reachability(grid, side, mv)?,
        PieceKind::King => king_reachability(grid, side, mv)?,
    };
    let captured = match reachability {
        Reachability::Step => None,
        Reachability::Capture(pos) => Some(pos),
    };
    let promoted = should_promote(piece, mv.to);
    let mut new_grid = grid.clone();
    new_grid[mv.from] = None;
    if let Some(pos) = captured {
        new_grid[pos] = None;
    }
    new_grid[mv.to] = Some(if promoted { piece.promoted() } else { piece });
    Ok(TurnOutcome {
        new_grid,
        outcome: MoveOutcome { turn_move: mv, captured, promoted },
    })
}

// Applies a parsed move for `side`. The grid is modified only if the move is valid.
pub fn try_turn(grid: &mut Grid, mv: TurnMove, side: Side) -> Result<MoveOutcome, TurnError> {
    // Turn application is split into two phases:
    //   - First, check turn validity and determine the outcome (does not change
    //     the grid, can fail if the turn is invalid).
    //   - Second, apply the outcome (cannot fail).
    let TurnOutcome { new_grid, outcome } = turn_outcome(grid, mv, side)?;
    *grid = new_grid;
    Ok(outcome)
}

// Parses `notation` and applies it to the board of `state`. Does not pass the turn and does
// not record history: that is up to the caller.
pub fn apply_move(state: &mut GameState, notation: &str, side: Side) -> Result<MoveOutcome, TurnError> {
    let mv = TurnMove::parse(notation).ok_or(TurnError::InvalidNotation)?;
    try_turn(&mut state.grid, mv, side)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_notation() {
        assert_eq!(
            TurnMove::parse("c3-b4"),
            Some(TurnMove { from: Coord::C3, to: Coord::B4 })
        );
        assert_eq!(
            TurnMove::parse("C3-B4"),
            Some(TurnMove { from: Coord::C3, to: Coord::B4 })
        );
        for notation in ["c3b4", "c3 - b4", " c3-b4", "c3-b4.", "c9-b4", "i3-b4", "c3-", ""] {
            assert_eq!(TurnMove::parse(notation), None, "{notation:?}");
        }
    }

    #[test]
    fn jump_shape() {
        assert!(TurnMove::parse("c3-a5").unwrap().is_jump_shaped());
        assert!(TurnMove::parse("f6-h4").unwrap().is_jump_shaped());
        assert!(!TurnMove::parse("c3-b4").unwrap().is_jump_shaped());
        assert!(!TurnMove::parse("a1-d4").unwrap().is_jump_shaped());
    }
}
