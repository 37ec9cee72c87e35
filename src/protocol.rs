// Contract between the orchestrator and an external move source, plus the text protocol
// used to talk to language models: board encoding, rules, prompt and answer extraction.

use async_trait::async_trait;
use indoc::{formatdoc, indoc};
use itertools::Itertools;
use lazy_static::lazy_static;
use regex_lite::Regex;

use crate::coord::{Col, Coord, Row};
use crate::game::GameState;
use crate::grid::Grid;
use crate::piece::cell_to_ascii;
use crate::side::Side;


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ProviderError {
    MissingCredentials,
    Transport(String),
    HttpStatus(u16),
    MalformedResponse(String),
    EmptyResponse,
}

// An untrusted source of moves. Implementations return raw text; the orchestrator extracts
// the move with `extract_move` and validates it. Any error is treated as "no move".
#[async_trait]
pub trait MoveProvider: Send + Sync {
    // Identity shown in move logs, e.g. a model name.
    fn id(&self) -> &str;

    async fn get_move(
        &self, state: &GameState, side: Side, was_warned: bool,
    ) -> Result<String, ProviderError>;
}

pub fn render_board(grid: &Grid) -> String {
    let files = format!("    {}\n", Col::all().map(|col| col.to_algebraic().to_ascii_uppercase()).join("  "));
    let border = "  +------------------------+\n";
    let mut s = String::new();
    s.push_str(&files);
    s.push_str(border);
    for row in Row::all() {
        let rank = row.to_algebraic();
        s.push(rank);
        s.push_str(" |");
        for col in Col::all() {
            s.push_str(&format!(" {} ", cell_to_ascii(grid[Coord::new(row, col)])));
        }
        s.push_str(&format!("| {rank}\n"));
    }
    s.push_str(border);
    s.push_str(&files);
    s.push_str("\nLegend: r = red, b = black, R = red king, B = black king, . = empty\n");
    s
}

pub fn system_rules() -> &'static str {
    indoc! {"
        We are playing checkers. Here are the rules:
        - The game is English draughts (American checkers) on an 8x8 board.
        - Red pieces start at the bottom (ranks 1-3), black at the top (ranks 6-8).
        - Regular pieces move diagonally forward to adjacent empty squares.
        - Moves must be to empty squares only; you cannot move to a square that is already occupied.
        - Captures are mandatory: if a piece can jump over an opponent's piece to an empty square, it must do so. Only one jump is made per turn.
        - When a piece reaches the far row, it becomes a king.
        - Kings move and capture both forward and backward along whole diagonals.
        - The game ends when a player has no pieces left.
        - Use chess notation for moves (e.g., e3-d4).
        Play to win and make the best possible move. Only output the move, nothing else.
    "}
}

pub const MISTAKE_FEEDBACK: &str = "IMPORTANT: Your previous move was a mistake. You missed a \
    mandatory capture. In checkers, if a capture is available, you must take it. Please follow \
    the rules strictly.";

pub fn build_prompt(state: &GameState, side: Side, was_warned: bool) -> String {
    let feedback = if was_warned { format!("\n{MISTAKE_FEEDBACK}") } else { String::new() };
    formatdoc! {"
        You are playing a game of checkers. Try to win.
        Current board:
        {board}
        You are {side}.{feedback}
        What is your next move? Respond with a single move in chess notation (e.g., e3-d4).",
        board = render_board(&state.grid),
        side = side.name(),
        feedback = feedback,
    }
}

// Finds a move in a free-form answer. Accepts a bare move, a move surrounded by prose, a
// quoted move, or a JSON object with the answer in a "content" field.
pub fn extract_move(raw: &str) -> Option<String> {
    lazy_static! {
        static ref MOVE_RE: Regex = Regex::new(r"(?i)[a-h][1-8]-[a-h][1-8]").unwrap();
    }
    let mut text = raw.trim().to_owned();
    if let Some(content) = json_content(&text) {
        text = content;
    }
    let text = strip_quotes(text.trim());
    MOVE_RE.find(text.trim()).map(|m| m.as_str().to_owned())
}

fn json_content(text: &str) -> Option<String> {
    let looks_like_json = (text.starts_with('{') && text.ends_with('}'))
        || (text.starts_with('[') && text.ends_with(']'));
    if !looks_like_json {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    value.get("content")?.as_str().map(str::to_owned)
}

fn strip_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}
