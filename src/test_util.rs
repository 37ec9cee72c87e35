// Test utilities that cannot be moved to the "tests" folder, because unit tests use them too.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use itertools::Itertools;

use crate::coord::Coord;
use crate::game::GameState;
use crate::grid::{Grid, NUM_CELLS};
use crate::piece::{EMPTY_CELL_ASCII, Piece};
use crate::protocol::{MoveProvider, ProviderError};
use crate::side::Side;


// Parses a board drawn as 8 lines of 8 cells, rank 8 first. Whitespace is ignored, so cells
// may be separated by spaces for readability:
//   . b . b . b . b
//   ...
//   r . r . r . r .
pub fn grid_from_ascii(ascii: &str) -> Grid {
    let cells = ascii.chars().filter(|ch| !ch.is_whitespace()).collect_vec();
    assert_eq!(cells.len(), NUM_CELLS, "{ascii}");
    let mut grid = Grid::new();
    for (idx, ch) in cells.into_iter().enumerate() {
        let pos = Coord::from_index(idx).unwrap();
        grid[pos] = if ch == EMPTY_CELL_ASCII {
            None
        } else {
            Some(Piece::from_ascii(ch).unwrap_or_else(|| panic!("Unexpected cell: {ch:?}")))
        };
    }
    grid
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MoveRequest {
    pub side: Side,
    pub was_warned: bool,
    pub move_count: usize,
}

// Replays canned answers in order. Once they run out, every call fails with
// `ProviderError::EmptyResponse`.
pub struct ScriptedProvider {
    id: String,
    responses: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<MoveRequest>>,
}

impl ScriptedProvider {
    pub fn new(id: impl Into<String>) -> Self {
        ScriptedProvider {
            id: id.into(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_answers<'a>(id: impl Into<String>, answers: impl IntoIterator<Item = &'a str>) -> Self {
        let provider = Self::new(id);
        for answer in answers {
            provider.push_answer(answer);
        }
        provider
    }

    pub fn push_answer(&self, answer: &str) { self.push(Ok(answer.to_owned())); }
    pub fn push_error(&self, error: ProviderError) { self.push(Err(error)); }
    pub fn requests(&self) -> Vec<MoveRequest> { self.requests.lock().unwrap().clone() }
    pub fn remaining(&self) -> usize { self.responses.lock().unwrap().len() }

    fn push(&self, response: Result<String, ProviderError>) {
        self.responses.lock().unwrap().push_back(response);
    }
}

#[async_trait]
impl MoveProvider for ScriptedProvider {
    fn id(&self) -> &str { &self.id }

    async fn get_move(
        &self, state: &GameState, side: Side, was_warned: bool,
    ) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(MoveRequest {
            side,
            was_warned,
            move_count: state.move_history.len(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ProviderError::EmptyResponse))
    }
}

// Never answers. Useful for exercising cancellation.
pub struct SilentProvider {
    id: String,
}

impl SilentProvider {
    pub fn new(id: impl Into<String>) -> Self { SilentProvider { id: id.into() } }
}

#[async_trait]
impl MoveProvider for SilentProvider {
    fn id(&self) -> &str { &self.id }

    async fn get_move(
        &self, _state: &GameState, _side: Side, _was_warned: bool,
    ) -> Result<String, ProviderError> {
        futures_util::future::pending().await
    }
}
