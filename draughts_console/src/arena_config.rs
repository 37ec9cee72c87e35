use std::time::Duration;

use anyhow::Context;
use draughts_arena::rules::ArenaRules;
use serde::{Deserialize, Serialize};


pub const DEFAULT_API_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum StringSource {
    Literal(String),
    EnvVar(String),
    File(String),
}

impl StringSource {
    pub fn get(&self) -> anyhow::Result<String> {
        match self {
            Self::Literal(s) => Ok(s.clone()),
            Self::EnvVar(v) => {
                std::env::var(v).context(format!("Missing environment variable '{v}'."))
            }
            Self::File(f) => std::fs::read_to_string(f)
                .map(|s| s.trim().to_owned())
                .context(format!("Failed to read file '{f}'.")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub red_model: String,
    pub black_model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    pub api_key: StringSource,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default)]
    pub rules: ArenaRules,
    #[serde(default)]
    pub boards: Vec<BoardConfig>,
}

fn default_api_base_url() -> String { DEFAULT_API_BASE_URL.to_owned() }
fn default_request_timeout() -> Duration { Duration::from_secs(60) }
fn default_temperature() -> f64 { DEFAULT_TEMPERATURE }

impl ArenaConfig {
    // Checks what can be checked without talking to the API.
    pub fn validate_boards(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.boards.is_empty(), "No boards configured.");
        for (idx, board) in self.boards.iter().enumerate() {
            anyhow::ensure!(
                !board.red_model.trim().is_empty() && !board.black_model.trim().is_empty(),
                "Board {} needs both a red and a black model.",
                idx + 1
            );
        }
        Ok(())
    }
}

pub fn read_config_file(filename: &str) -> anyhow::Result<ArenaConfig> {
    let contents = std::fs::read_to_string(filename)
        .context(format!("Failed to read config file '{filename}'."))?;
    parse_config(&contents).context(format!("Failed to parse config file '{filename}'."))
}

pub fn parse_config(contents: &str) -> anyhow::Result<ArenaConfig> {
    Ok(serde_yaml::from_str(contents)?)
}
