use enum_map::EnumMap;

use crate::board::MoveOutcome;
use crate::game::{GameResult, MoveRecord};
use crate::grid::Grid;
use crate::orchestrator::{AttemptOutcome, HaltReason};
use crate::side::Side;


// Everything a UI or a log needs to follow a game. Emitted by `TurnOrchestrator` in the
// order things happen; consumers never mutate game state.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MatchEvent {
    GameStarted {
        providers: EnumMap<Side, String>,
    },
    TurnStarted {
        side: Side,
        provider_id: String,
        was_warned: bool,
    },
    AttemptFailed {
        side: Side,
        attempt: u32,
        outcome: AttemptOutcome,
    },
    MoveApplied {
        record: MoveRecord,
        outcome: MoveOutcome,
        grid: Grid, // position after the move
    },
    GameOver(GameResult),
    GameHalted(HaltReason),
    // The game was stopped from the outside; the position is abandoned.
    Cancelled,
}

impl MatchEvent {
    // One-line description for a status bar. `None` for events that don't change it.
    pub fn status_text(&self) -> Option<String> {
        match self {
            MatchEvent::GameStarted { .. } => None,
            MatchEvent::TurnStarted { side, .. } => {
                Some(format!("{}'s turn ({})...", side.name(), side.board_edge()))
            }
            MatchEvent::AttemptFailed { side, attempt, outcome } => Some(format!(
                "{} attempt {}: {}",
                side.name(),
                attempt,
                outcome.ui_string()
            )),
            MatchEvent::MoveApplied { record, .. } => Some(if record.mistake {
                format!("{} missed a mandatory capture!", record.side.name())
            } else {
                format!("{} played {}", record.side.name(), record.move_text)
            }),
            MatchEvent::GameOver(result) => Some(result.ui_string().to_owned()),
            MatchEvent::GameHalted(reason) => Some(reason.to_string()),
            MatchEvent::Cancelled => Some("Game stopped".to_owned()),
        }
    }
}
