// Plain-text rendering for the terminal. Colors are applied with `console`, which drops them
// automatically when stdout is not a terminal.

use console::Style;
use draughts_arena::coord::{Col, Coord, Row};
use draughts_arena::game::{GameState, MoveRecord};
use draughts_arena::grid::Grid;
use draughts_arena::orchestrator::GameEnd;
use draughts_arena::piece::{Piece, PieceKind};
use draughts_arena::side::Side;
use itertools::Itertools;


fn piece_pictogram(piece: Piece) -> char {
    match piece.kind {
        PieceKind::Man => '●',
        PieceKind::King => '♛',
    }
}

fn piece_style(side: Side) -> Style {
    match side {
        Side::Red => Style::new().color256(160).bold(),
        Side::Black => Style::new().color256(232),
    }
}

fn format_square(ch: char) -> String { format!(" {} ", ch) }

pub fn render_grid(grid: &Grid) -> String {
    let colors = [Style::new().on_color256(230), Style::new().on_color256(137)];
    let col_header =
        format!("   {}\n", Col::all().map(|col| format_square(col.to_algebraic())).join(""));
    let mut ret = col_header.clone();
    for row in Row::all() {
        ret.push_str(&format_square(row.to_algebraic()));
        for col in Col::all() {
            let coord = Coord::new(row, col);
            let color_idx = usize::from(coord.is_playable());
            let square = match grid[coord] {
                Some(piece) => piece_style(piece.side)
                    .apply_to(format_square(piece_pictogram(piece)))
                    .to_string(),
                None => format_square(' '),
            };
            ret.push_str(&colors[color_idx].apply_to(square).to_string());
        }
        ret.push_str(&format_square(row.to_algebraic()));
        ret.push('\n');
    }
    ret.push_str(&col_header);
    ret
}

pub fn render_move_record(number: usize, record: &MoveRecord) -> String {
    let mut line = format!(
        "{}. {} ({}): {}",
        number,
        record.side.name(),
        record.provider_id,
        record.move_text
    );
    if record.mistake {
        line.push_str(" [Mistake: missed capture]");
    }
    if record.was_warned {
        line.push_str(" [Provider was notified about previous mistake]");
    }
    line
}

pub fn render_move_log(history: &[MoveRecord]) -> String {
    history
        .iter()
        .enumerate()
        .map(|(idx, record)| render_move_record(idx + 1, record))
        .join("\n")
}

pub fn render_summary(board_no: usize, end: &GameEnd, state: &GameState) -> String {
    let outcome = match end {
        GameEnd::Finished(result) => result.ui_string().to_owned(),
        GameEnd::Halted(reason) => reason.to_string(),
        GameEnd::Cancelled => "Game stopped".to_owned(),
    };
    let mistakes = |side: Side| {
        state.move_history.iter().filter(|r| r.side == side && r.mistake).count()
    };
    format!(
        "Board {}: {} | moves: {}, missed captures: Red {} Black {}, pieces: Red {} Black {}",
        board_no,
        outcome,
        state.move_history.len(),
        mistakes(Side::Red),
        mistakes(Side::Black),
        state.grid.count(Side::Red),
        state.grid.count(Side::Black),
    )
}
