// Drives one game: asks the side to move for a move, validates it, records it and passes
// the turn until somebody runs out of pieces, a provider fails to produce a usable move, or
// the game is cancelled.
//
// Mistake policy. Playing a quiet move while a capture is available is legal as far as the
// move engine is concerned. The orchestrator accepts such a move, marks it as a mistake and
// warns the same side in its next prompt.

use std::fmt;
use std::sync::Arc;

use async_std::channel::Sender;
use enum_map::EnumMap;
use log::{debug, info, warn};

use crate::board::{MoveOutcome, TurnError, apply_move};
use crate::cancel::CancellationToken;
use crate::capture::{game_result, has_mandatory_capture};
use crate::event::MatchEvent;
use crate::game::{GameResult, GameState, MoveRecord, initial_state};
use crate::protocol::{MoveProvider, ProviderError, extract_move};
use crate::rules::ArenaRules;
use crate::side::Side;


pub type Providers = EnumMap<Side, Arc<dyn MoveProvider>>;

// Result of asking a provider once.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AttemptOutcome {
    Applied { text: String, outcome: MoveOutcome },
    // Extracted text that fails strict notation. `extract_move` only returns text matching the
    // move pattern, so answers without a readable move are reported as `NoResponse` instead.
    MalformedMove { text: String },
    IllegalMove { text: String, error: TurnError },
    // The provider failed or its answer contained nothing that looks like a move.
    NoResponse,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum HaltReason {
    // The last attempt ended with `AttemptOutcome::NoResponse`.
    NoMove { side: Side, provider_id: String, attempts: u32 },
    // The last attempt produced a move that was rejected. `text` is that move.
    InvalidMove { side: Side, provider_id: String, text: String, attempts: u32 },
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum OrchestratorStatus {
    Idle,
    Running,
    AwaitingMove { side: Side, attempt: u32 },
    Validating { side: Side, attempt: u32 },
    Finished(GameResult),
    Halted(HaltReason),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEnd {
    Finished(GameResult),
    Halted(HaltReason),
    Cancelled,
}

enum TurnResult {
    Applied,
    Halted(HaltReason),
    Cancelled,
}

impl AttemptOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            AttemptOutcome::Applied { text, .. }
            | AttemptOutcome::MalformedMove { text }
            | AttemptOutcome::IllegalMove { text, .. } => Some(text),
            AttemptOutcome::NoResponse => None,
        }
    }

    pub fn ui_string(&self) -> String {
        match self {
            AttemptOutcome::Applied { text, .. } => format!("played {text}"),
            AttemptOutcome::MalformedMove { text } => format!("malformed move {text}"),
            AttemptOutcome::IllegalMove { text, error } => {
                format!("illegal move {text}: {}", error.ui_string())
            }
            AttemptOutcome::NoResponse => "no move received".to_owned(),
        }
    }
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::NoMove { side, provider_id, attempts } => write!(
                f,
                "No move from {} ({}) after {} attempts",
                side.name(),
                provider_id,
                attempts
            ),
            HaltReason::InvalidMove { side, text, attempts, .. } => write!(
                f,
                "Invalid move from {}: {} (after {} attempts)",
                side.name(),
                text,
                attempts
            ),
        }
    }
}

// Owns the game state of a single board. Boards never share orchestrators, so there is
// exactly one writer per game.
pub struct TurnOrchestrator {
    providers: Providers,
    rules: ArenaRules,
    starting_state: GameState,
    state: GameState,
    status: OrchestratorStatus,
    // Whether the side's latest move was a missed capture. Fed into the side's next prompt.
    mistake_last_turn: EnumMap<Side, bool>,
    cancel: CancellationToken,
    events: Option<Sender<MatchEvent>>,
}

impl TurnOrchestrator {
    pub fn new(providers: Providers, rules: ArenaRules) -> Self {
        Self::new_with_state(providers, rules, initial_state())
    }

    pub fn new_with_state(providers: Providers, rules: ArenaRules, starting_state: GameState) -> Self {
        TurnOrchestrator {
            providers,
            rules,
            state: starting_state.clone(),
            starting_state,
            status: OrchestratorStatus::Idle,
            mistake_last_turn: EnumMap::default(),
            cancel: CancellationToken::new(),
            events: None,
        }
    }

    pub fn with_events(mut self, events: Sender<MatchEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn state(&self) -> &GameState { &self.state }
    pub fn status(&self) -> &OrchestratorStatus { &self.status }
    pub fn rules(&self) -> &ArenaRules { &self.rules }
    pub fn move_history(&self) -> &[MoveRecord] { &self.state.move_history }
    pub fn provider_id(&self, side: Side) -> &str { self.providers[side].id() }
    pub fn was_mistaken_last_turn(&self, side: Side) -> bool { self.mistake_last_turn[side] }

    // Token that stops the current run. `reset` replaces it, so fetch a fresh one after
    // every reset.
    pub fn cancellation_token(&self) -> CancellationToken { self.cancel.clone() }

    // Abandons the current game: stops a running loop, forgets in-flight results and
    // mistake flags, and restores the starting position.
    pub fn reset(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.state = self.starting_state.clone();
        self.status = OrchestratorStatus::Idle;
        self.mistake_last_turn = EnumMap::default();
        info!("Game reset");
    }

    // Plays until the game is over, halted or cancelled. After cancellation the status keeps
    // the last stage reached; call `reset` before playing again. A finished or halted game
    // returns its stored end without contacting providers.
    pub async fn run(&mut self) -> GameEnd {
        if self.cancel.is_cancelled() {
            return GameEnd::Cancelled;
        }
        match &self.status {
            OrchestratorStatus::Finished(result) => return GameEnd::Finished(*result),
            OrchestratorStatus::Halted(reason) => return GameEnd::Halted(reason.clone()),
            _ => {}
        }
        self.status = OrchestratorStatus::Running;
        self.emit(MatchEvent::GameStarted {
            providers: EnumMap::from_fn(|side| self.providers[side].id().to_owned()),
        });
        info!(
            "Game started: {} (Red) vs {} (Black)",
            self.provider_id(Side::Red),
            self.provider_id(Side::Black)
        );
        loop {
            if self.cancel.is_cancelled() {
                return self.on_cancelled();
            }
            if let Some(result) = game_result(&self.state.grid) {
                info!("Game over: {}", result.ui_string());
                self.status = OrchestratorStatus::Finished(result);
                self.emit(MatchEvent::GameOver(result));
                return GameEnd::Finished(result);
            }
            match self.play_turn().await {
                TurnResult::Applied => {}
                TurnResult::Halted(reason) => {
                    warn!("Game halted: {}", reason);
                    self.status = OrchestratorStatus::Halted(reason.clone());
                    self.emit(MatchEvent::GameHalted(reason.clone()));
                    return GameEnd::Halted(reason);
                }
                TurnResult::Cancelled => return self.on_cancelled(),
            }
            let pause = async_std::task::sleep(self.rules.turn_pause);
            if self.cancel.run_until_cancelled(pause).await.is_none() {
                return self.on_cancelled();
            }
        }
    }

    async fn play_turn(&mut self) -> TurnResult {
        let side = self.state.turn;
        let provider = Arc::clone(&self.providers[side]);
        let was_warned = self.mistake_last_turn[side];
        let capture_available = has_mandatory_capture(&self.state, side);
        self.emit(MatchEvent::TurnStarted {
            side,
            provider_id: provider.id().to_owned(),
            was_warned,
        });

        let mut last_failure = None;
        for attempt in 1..=self.rules.max_attempts {
            self.status = OrchestratorStatus::AwaitingMove { side, attempt };
            let request = provider.get_move(&self.state, side, was_warned);
            let Some(response) = self.cancel.run_until_cancelled(request).await else {
                return TurnResult::Cancelled;
            };
            if self.cancel.is_cancelled() {
                return TurnResult::Cancelled;
            }
            self.status = OrchestratorStatus::Validating { side, attempt };
            match self.try_attempt(side, response) {
                AttemptOutcome::Applied { text, outcome } => {
                    self.finish_turn(provider.id(), text, outcome, capture_available, was_warned);
                    return TurnResult::Applied;
                }
                failed => {
                    debug!(
                        "{} ({}) attempt {}/{}: {}",
                        side.name(),
                        provider.id(),
                        attempt,
                        self.rules.max_attempts,
                        failed.ui_string()
                    );
                    last_failure = Some(failed.clone());
                    self.emit(MatchEvent::AttemptFailed { side, attempt, outcome: failed });
                }
            }
        }

        let provider_id = provider.id().to_owned();
        let attempts = self.rules.max_attempts;
        TurnResult::Halted(match last_failure.as_ref().and_then(AttemptOutcome::text) {
            None => HaltReason::NoMove { side, provider_id, attempts },
            Some(text) => {
                HaltReason::InvalidMove { side, provider_id, text: text.to_owned(), attempts }
            }
        })
    }

    // Validates a single answer. The board changes only if the outcome is `Applied`.
    fn try_attempt(&mut self, side: Side, response: Result<String, ProviderError>) -> AttemptOutcome {
        let raw = match response {
            Ok(raw) => raw,
            Err(err) => {
                debug!("{} provider error: {:?}", side.name(), err);
                return AttemptOutcome::NoResponse;
            }
        };
        let Some(text) = extract_move(&raw) else {
            debug!("No move found in {} answer: {:?}", side.name(), raw);
            return AttemptOutcome::NoResponse;
        };
        match apply_move(&mut self.state, &text, side) {
            Ok(outcome) => AttemptOutcome::Applied { text, outcome },
            Err(error) if error.is_malformed() => AttemptOutcome::MalformedMove { text },
            Err(error) => AttemptOutcome::IllegalMove { text, error },
        }
    }

    fn finish_turn(
        &mut self, provider_id: &str, text: String, outcome: MoveOutcome, capture_available: bool,
        was_warned: bool,
    ) {
        let side = self.state.turn;
        let mistake = capture_available && !outcome.turn_move.is_jump_shaped();
        if was_warned {
            info!(
                "{} ({}) was notified about a previous mistake before making move {}",
                side.name(),
                provider_id,
                text
            );
        } else {
            debug!(
                "{} ({}) was not notified about a previous mistake before making move {}",
                side.name(),
                provider_id,
                text
            );
        }
        if mistake {
            warn!("{} ({}) missed a mandatory capture: {}", side.name(), provider_id, text);
        } else {
            info!("{} ({}) played {}", side.name(), provider_id, text);
        }
        let record = MoveRecord {
            move_text: text,
            side,
            provider_id: provider_id.to_owned(),
            mistake,
            was_warned,
        };
        self.mistake_last_turn[side] = mistake;
        self.state.end_turn(record.clone());
        self.status = OrchestratorStatus::Running;
        self.emit(MatchEvent::MoveApplied { record, outcome, grid: self.state.grid.clone() });
    }

    fn on_cancelled(&mut self) -> GameEnd {
        info!("Game cancelled");
        self.emit(MatchEvent::Cancelled);
        GameEnd::Cancelled
    }

    fn emit(&self, event: MatchEvent) {
        if let Some(events) = &self.events {
            // A consumer that went away doesn't affect the game.
            events.try_send(event).ok();
        }
    }
}
