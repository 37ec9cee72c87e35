mod common;

use std::sync::Arc;
use std::time::Duration;

use async_std::channel::{self, Receiver};
use common::*;
use draughts_arena::board::TurnError;
use draughts_arena::event::MatchEvent;
use draughts_arena::game::{GameResult, initial_state};
use draughts_arena::orchestrator::{
    AttemptOutcome, GameEnd, HaltReason, OrchestratorStatus, TurnOrchestrator,
};
use draughts_arena::protocol::ProviderError;
use draughts_arena::rules::ArenaRules;
use draughts_arena::side::Side;
use draughts_arena::test_util::{MoveRequest, ScriptedProvider, SilentProvider};
use pretty_assertions::assert_eq;


fn scripted<'a>(id: &str, answers: impl IntoIterator<Item = &'a str>) -> Arc<ScriptedProvider> {
    Arc::new(ScriptedProvider::with_answers(id, answers))
}

fn drain(events: &Receiver<MatchEvent>) -> Vec<MatchEvent> {
    let mut ret = Vec::new();
    while let Ok(event) = events.try_recv() {
        ret.push(event);
    }
    ret
}

fn warned_flags(requests: &[MoveRequest]) -> Vec<bool> {
    requests.iter().map(|r| r.was_warned).collect()
}

// Red can capture c3-a5. The red man on d2 keeps black from capturing c3.
const CAPTURE_AVAILABLE: &str = "
    . . . . . . . b
    . . . . . . . .
    . . . . . . . .
    . . . . . . . .
    . b . . . . . .
    . . r . . . r .
    . . . r . . . .
    . . . . . . . .
";


#[async_std::test]
async fn missed_capture_is_recorded_and_reported() {
    let red = scripted("red-model", ["g3-h4", "c3-a5"]);
    let black = scripted("black-model", ["h8-g7", "g7-f6"]);
    let mut orchestrator = TurnOrchestrator::new_with_state(
        providers(red.clone(), black.clone()),
        ArenaRules::instant(),
        state_from_ascii(Side::Red, CAPTURE_AVAILABLE),
    );
    let end = orchestrator.run().await;

    let history = orchestrator.move_history();
    assert_eq!(history_moves(history), vec!["g3-h4", "h8-g7", "c3-a5", "g7-f6"]);
    assert_eq!(history.iter().map(|r| r.mistake).collect::<Vec<_>>(), vec![
        true, false, false, false
    ]);
    assert_eq!(history.iter().map(|r| r.was_warned).collect::<Vec<_>>(), vec![
        false, false, true, false
    ]);
    assert_eq!(history[0].provider_id, "red-model");
    assert_eq!(history[1].side, Side::Black);

    // The warning goes into the next red prompt only, then red runs out of answers.
    assert_eq!(warned_flags(&red.requests()), vec![false, true, false, false, false]);
    assert_eq!(warned_flags(&black.requests()), vec![false, false]);
    assert!(!orchestrator.was_mistaken_last_turn(Side::Red));

    let reason = HaltReason::NoMove {
        side: Side::Red,
        provider_id: "red-model".to_owned(),
        attempts: 3,
    };
    assert_eq!(end, GameEnd::Halted(reason.clone()));
    assert_eq!(orchestrator.status(), &OrchestratorStatus::Halted(reason));
    assert_eq!(orchestrator.state().turn, Side::Red);
}

#[async_std::test]
async fn unparsable_answers_halt_without_changes() {
    let red = scripted("red-model", ["I think so", "Let me see...", "c3 to d4"]);
    let black = scripted("black-model", []);
    let mut orchestrator =
        TurnOrchestrator::new(providers(red.clone(), black.clone()), ArenaRules::instant());
    let end = orchestrator.run().await;
    assert_eq!(
        end,
        GameEnd::Halted(HaltReason::NoMove {
            side: Side::Red,
            provider_id: "red-model".to_owned(),
            attempts: 3,
        })
    );
    assert_eq!(orchestrator.state(), &initial_state());
    assert_eq!(red.remaining(), 0);
    assert!(black.requests().is_empty());
}

#[async_std::test]
async fn invalid_answers_halt_with_last_move() {
    let red = scripted("red-model", ["c3-c4", "d4-e5", "b6-a5"]);
    let black = scripted("black-model", []);
    let mut orchestrator = TurnOrchestrator::new(providers(red, black), ArenaRules::instant());
    let end = orchestrator.run().await;
    let GameEnd::Halted(reason) = end else {
        panic!("Expected halt, got {end:?}");
    };
    assert_eq!(reason, HaltReason::InvalidMove {
        side: Side::Red,
        provider_id: "red-model".to_owned(),
        text: "b6-a5".to_owned(),
        attempts: 3,
    });
    assert_eq!(reason.to_string(), "Invalid move from Red: b6-a5 (after 3 attempts)");
    assert_eq!(orchestrator.state(), &initial_state());
}

#[async_std::test]
async fn halt_reason_follows_last_attempt() {
    let no_move = HaltReason::NoMove {
        side: Side::Red,
        provider_id: "red-model".to_owned(),
        attempts: 3,
    };
    for answers in [vec!["c3-c4", "no idea", "still no idea"], vec!["no idea", "c3-c4"]] {
        let red = scripted("red-model", answers.iter().copied());
        let black = scripted("black-model", []);
        let mut orchestrator =
            TurnOrchestrator::new(providers(red.clone(), black), ArenaRules::instant());
        let end = orchestrator.run().await;
        assert_eq!(end, GameEnd::Halted(no_move.clone()), "{answers:?}");
        assert_eq!(red.requests().len(), 3);
        assert_eq!(orchestrator.state(), &initial_state());
    }
    assert_eq!(no_move.to_string(), "No move from Red (red-model) after 3 attempts");

    let red = scripted("red-model", ["no idea", "c3-c4", "b6-a5"]);
    let black = scripted("black-model", []);
    let mut orchestrator = TurnOrchestrator::new(providers(red, black), ArenaRules::instant());
    assert_eq!(
        orchestrator.run().await,
        GameEnd::Halted(HaltReason::InvalidMove {
            side: Side::Red,
            provider_id: "red-model".to_owned(),
            text: "b6-a5".to_owned(),
            attempts: 3,
        })
    );
}

#[async_std::test]
async fn ended_game_is_not_replayed() {
    let red = scripted("red-model", ["c3-c4", "d4-e5", "b6-a5"]);
    let black = scripted("black-model", []);
    let mut orchestrator =
        TurnOrchestrator::new(providers(red.clone(), black), ArenaRules::instant());
    let halted = orchestrator.run().await;
    assert!(matches!(halted, GameEnd::Halted(HaltReason::InvalidMove { .. })));

    red.push_answer("c3-d4");
    assert_eq!(orchestrator.run().await, halted);
    assert_eq!(red.requests().len(), 3);
    assert_eq!(red.remaining(), 1);
    assert_eq!(orchestrator.state(), &initial_state());

    let red = scripted("red-model", []);
    let black = scripted("black-model", []);
    let mut orchestrator = TurnOrchestrator::new_with_state(
        providers(red, black),
        ArenaRules::instant(),
        state_from_ascii(Side::Red, &". . . . . . . .\n".repeat(8)),
    );
    let (sender, receiver) = channel::unbounded();
    assert_eq!(orchestrator.run().await, GameEnd::Finished(GameResult::Draw));
    orchestrator = orchestrator.with_events(sender);
    assert_eq!(orchestrator.run().await, GameEnd::Finished(GameResult::Draw));
    assert!(drain(&receiver).is_empty());
}

#[async_std::test]
async fn retries_within_turn() {
    let red = scripted("red-model", ["gibberish", "c3-c4", "Sure! c3-d4"]);
    let black = Arc::new(ScriptedProvider::new("black-model"));
    black.push_error(ProviderError::HttpStatus(500));
    black.push_error(ProviderError::Transport("connection reset".to_owned()));
    let (sender, receiver) = channel::unbounded();
    let mut orchestrator =
        TurnOrchestrator::new(providers(red, black), ArenaRules::instant()).with_events(sender);
    let end = orchestrator.run().await;
    assert_eq!(history_moves(orchestrator.move_history()), vec!["c3-d4"]);
    assert_eq!(
        end,
        GameEnd::Halted(HaltReason::NoMove {
            side: Side::Black,
            provider_id: "black-model".to_owned(),
            attempts: 3,
        })
    );

    let events = drain(&receiver);
    let failures = events
        .iter()
        .filter_map(|event| match event {
            MatchEvent::AttemptFailed { side, attempt, outcome } => Some((*side, *attempt, outcome)),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(failures.len(), 5);
    assert_eq!(failures[0], (Side::Red, 1, &AttemptOutcome::NoResponse));
    assert_eq!(failures[1], (Side::Red, 2, &AttemptOutcome::IllegalMove {
        text: "c3-c4".to_owned(),
        error: TurnError::ImpossibleTrajectory,
    }));
    assert_eq!(failures[4], (Side::Black, 3, &AttemptOutcome::NoResponse));
    assert!(matches!(events.first(), Some(MatchEvent::GameStarted { .. })));
    assert!(matches!(events.last(), Some(MatchEvent::GameHalted(_))));
    assert_eq!(
        events.last().and_then(MatchEvent::status_text).as_deref(),
        Some("No move from Black (black-model) after 3 attempts")
    );
}

#[async_std::test]
async fn capturing_last_piece_wins() {
    let state = state_from_ascii(
        Side::Red,
        "
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . b . . . . . .
        . . r . . . . .
        . . . . . . . .
        . . . . . . . .
        ",
    );
    let red = scripted("red-model", ["c3-a5"]);
    let black = scripted("black-model", []);
    let (sender, receiver) = channel::unbounded();
    let mut orchestrator =
        TurnOrchestrator::new_with_state(providers(red, black.clone()), ArenaRules::instant(), state)
            .with_events(sender);
    let end = orchestrator.run().await;
    assert_eq!(end, GameEnd::Finished(GameResult::Victory(Side::Red)));
    assert_eq!(
        orchestrator.status(),
        &OrchestratorStatus::Finished(GameResult::Victory(Side::Red))
    );
    assert!(black.requests().is_empty());
    let texts = drain(&receiver).iter().filter_map(MatchEvent::status_text).collect::<Vec<_>>();
    assert_eq!(texts, vec!["Red's turn (bottom)...", "Red played c3-a5", "Red wins!"]);
}

#[async_std::test]
async fn empty_board_is_a_draw() {
    let red = scripted("red-model", []);
    let black = scripted("black-model", []);
    let mut orchestrator = TurnOrchestrator::new_with_state(
        providers(red.clone(), black),
        ArenaRules::instant(),
        state_from_ascii(Side::Red, &". . . . . . . .\n".repeat(8)),
    );
    assert_eq!(orchestrator.run().await, GameEnd::Finished(GameResult::Draw));
    assert!(red.requests().is_empty());
}

#[async_std::test]
async fn cancel_while_awaiting_move() {
    let red = Arc::new(SilentProvider::new("red-model"));
    let black = scripted("black-model", []);
    let mut orchestrator = TurnOrchestrator::new(providers(red, black), ArenaRules::instant());
    let token = orchestrator.cancellation_token();
    async_std::task::spawn(async move {
        async_std::task::sleep(Duration::from_millis(20)).await;
        token.cancel();
    });
    assert_eq!(orchestrator.run().await, GameEnd::Cancelled);
    assert_eq!(
        orchestrator.status(),
        &OrchestratorStatus::AwaitingMove { side: Side::Red, attempt: 1 }
    );
    assert_eq!(orchestrator.state(), &initial_state());

    let stale_token = orchestrator.cancellation_token();
    orchestrator.reset();
    assert!(stale_token.is_cancelled());
    assert!(!orchestrator.cancellation_token().is_cancelled());
    assert_eq!(orchestrator.status(), &OrchestratorStatus::Idle);
}

#[async_std::test]
async fn reset_restores_starting_position() {
    let red = scripted("red-model", ["g3-h4"]);
    let black = scripted("black-model", ["h8-g7"]);
    let mut orchestrator = TurnOrchestrator::new_with_state(
        providers(red.clone(), black),
        ArenaRules::instant(),
        state_from_ascii(Side::Red, CAPTURE_AVAILABLE),
    );
    orchestrator.run().await;
    assert_eq!(orchestrator.move_history().len(), 2);
    assert!(orchestrator.was_mistaken_last_turn(Side::Red));

    orchestrator.reset();
    assert!(orchestrator.move_history().is_empty());
    assert_eq!(orchestrator.state(), &state_from_ascii(Side::Red, CAPTURE_AVAILABLE));
    assert!(!orchestrator.was_mistaken_last_turn(Side::Red));

    // The new game starts from scratch: no warning is carried over.
    red.push_answer("c3-a5");
    orchestrator.run().await;
    let requests = red.requests();
    assert_eq!(requests.len(), 5);
    assert!(!requests[4].was_warned);
    assert_eq!(requests[4].move_count, 0);
    assert!(!orchestrator.move_history()[0].mistake);
}
