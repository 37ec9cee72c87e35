// Runs every configured board concurrently and reports their progress on stdout.

use std::sync::Arc;

use anyhow::Context;
use async_std::channel::{self, Receiver};
use async_std::task;
use draughts_arena::event::MatchEvent;
use draughts_arena::orchestrator::{Providers, TurnOrchestrator};
use draughts_arena::protocol::MoveProvider;
use draughts_arena::side::Side;
use enum_map::EnumMap;
use log::info;

use crate::arena_config::{ArenaConfig, BoardConfig};
use crate::openrouter::{OpenRouterClient, OpenRouterProvider};
use crate::tui;


fn board_providers(client: &OpenRouterClient, board: &BoardConfig, temperature: f64) -> Providers {
    EnumMap::from_fn(|side| {
        let model = match side {
            Side::Red => &board.red_model,
            Side::Black => &board.black_model,
        };
        let provider = OpenRouterProvider::new(client.clone(), model.trim().to_owned(), temperature);
        Arc::new(provider) as Arc<dyn MoveProvider>
    })
}

async fn print_events(board_no: usize, show_grid: bool, events: Receiver<MatchEvent>) {
    while let Ok(event) = events.recv().await {
        if let Some(status) = event.status_text() {
            println!("[Board {board_no}] {status}");
        }
        if let MatchEvent::MoveApplied { record, grid, .. } = &event {
            if record.was_warned {
                println!("[Board {board_no}] (provider was notified about its previous mistake)");
            }
            if show_grid {
                println!("{}", tui::render_grid(grid));
            }
        }
    }
}

pub async fn run(config: ArenaConfig) -> anyhow::Result<()> {
    config.validate_boards()?;
    let api_key = config.api_key.get().context("Failed to get API key.")?;
    let client = OpenRouterClient::new(&config.api_base_url, api_key, config.request_timeout)?;
    let show_grid = config.boards.len() == 1;

    let mut tokens = Vec::new();
    let mut games = Vec::new();
    let mut printers = Vec::new();
    for (idx, board) in config.boards.iter().enumerate() {
        let board_no = idx + 1;
        let (sender, receiver) = channel::unbounded();
        let providers = board_providers(&client, board, config.temperature);
        let mut orchestrator =
            TurnOrchestrator::new(providers, config.rules.clone()).with_events(sender);
        tokens.push(orchestrator.cancellation_token());
        info!("Board {}: {} (Red) vs {} (Black)", board_no, board.red_model, board.black_model);
        printers.push(task::spawn(print_events(board_no, show_grid, receiver)));
        games.push(task::spawn(async move {
            let end = orchestrator.run().await;
            // Dropping the orchestrator closes the event stream.
            (end, orchestrator.state().clone())
        }));
    }

    ctrlc::set_handler(move || {
        for token in &tokens {
            token.cancel();
        }
    })
    .context("Failed to set Ctrl-C handler.")?;

    let results = futures_util::future::join_all(games).await;
    futures_util::future::join_all(printers).await;

    println!();
    for (idx, (end, state)) in results.iter().enumerate() {
        let board_no = idx + 1;
        println!("{}", tui::render_summary(board_no, end, state));
        let log = tui::render_move_log(&state.move_history);
        if !log.is_empty() {
            println!("{log}");
        }
        println!();
    }
    Ok(())
}
