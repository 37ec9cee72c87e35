// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use std::sync::Arc;

use draughts_arena::game::{GameState, MoveRecord};
use draughts_arena::orchestrator::Providers;
use draughts_arena::piece::{Piece, PieceKind};
use draughts_arena::protocol::MoveProvider;
use draughts_arena::side::Side;
use draughts_arena::test_util::grid_from_ascii;
use enum_map::enum_map;


#[derive(Clone, Copy, Debug)]
pub struct PieceMatcher {
    pub side: Side,
    pub kind: PieceKind,
}

pub trait PieceIs {
    fn is(self, matcher: PieceMatcher) -> bool;
}

impl PieceIs for Option<Piece> {
    fn is(self, matcher: PieceMatcher) -> bool {
        self.is_some_and(|piece| piece.side == matcher.side && piece.kind == matcher.kind)
    }
}

#[macro_export]
macro_rules! piece {
    ($side:ident $kind:ident) => {
        common::PieceMatcher {
            side: draughts_arena::side::Side::$side,
            kind: draughts_arena::piece::PieceKind::$kind,
        }
    };
}

#[allow(dead_code)]
pub fn state_from_ascii(turn: Side, board_str: &str) -> GameState {
    GameState::new(grid_from_ascii(board_str), turn)
}

#[allow(dead_code)]
pub fn providers(red: Arc<dyn MoveProvider>, black: Arc<dyn MoveProvider>) -> Providers {
    enum_map! {
        Side::Red => Arc::clone(&red),
        Side::Black => Arc::clone(&black),
    }
}

#[allow(dead_code)]
pub fn history_moves(history: &[MoveRecord]) -> Vec<&str> {
    history.iter().map(|record| record.move_text.as_str()).collect()
}
