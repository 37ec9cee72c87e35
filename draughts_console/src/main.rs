// Legend for various fix-this comments:
//   * "TODO" - bug or missing crucial feature.
//   * "Improvement potential" - missing nice-to-have feature or an opportunity
//       to make code better or faster.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod arena_config;
mod arena_main;
mod openrouter;
mod tui;

use anyhow::Context;
use arena_config::read_config_file;
use clap::{Command, arg};
use draughts_arena::game::initial_state;
use draughts_arena::protocol::{build_prompt, system_rules};
use draughts_arena::side::Side;
use openrouter::{OpenRouterClient, filter_models};


fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Draughts arena")
        .version(clap::crate_version!())
        .about("Plays English draughts between language models")
        .subcommand_required(true)
        .subcommand(Command::new("play").about("Play all configured boards").arg(
            arg!(<config_file> "Path to the configuration file: yaml-serialized ArenaConfig."),
        ))
        .subcommand(
            Command::new("models")
                .about("List models available to the configured API key")
                .arg(arg!(<config_file> "Path to the configuration file."))
                .arg(arg!(-f --"filter" <text> "Only show models whose id or name contains this text")),
        )
        .subcommand(
            Command::new("prompt")
                .about("Print the prompt sent for the starting position")
                .arg(
                    arg!(--"side" <side>)
                        .value_parser(["red", "black"])
                        .default_value("red"),
                )
                .arg(arg!(--"warned" "Include the missed-capture warning")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("play", sub_matches)) => {
            let config = read_config_file(sub_matches.get_one::<String>("config_file").unwrap())?;
            async_std::task::block_on(arena_main::run(config))
        }
        Some(("models", sub_matches)) => {
            let config = read_config_file(sub_matches.get_one::<String>("config_file").unwrap())?;
            let filter = sub_matches.get_one::<String>("filter").map_or("", String::as_str);
            async_std::task::block_on(print_models(&config, filter))
        }
        Some(("prompt", sub_matches)) => {
            let side = match sub_matches.get_one::<String>("side").unwrap().as_str() {
                "red" => Side::Red,
                "black" => Side::Black,
                _ => unreachable!("Restricted by value_parser"),
            };
            println!("{}", system_rules());
            println!("{}", build_prompt(&initial_state(), side, sub_matches.get_flag("warned")));
            Ok(())
        }
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}

async fn print_models(config: &arena_config::ArenaConfig, filter: &str) -> anyhow::Result<()> {
    let api_key = config.api_key.get().context("Failed to get API key.")?;
    let client = OpenRouterClient::new(&config.api_base_url, api_key, config.request_timeout)?;
    let models = client.list_models().await?;
    let models = filter_models(&models, filter);
    if models.is_empty() {
        println!("No models available");
    }
    for model in models {
        println!("{}  {}", model.id, model.name);
    }
    Ok(())
}
