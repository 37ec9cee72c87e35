use std::time::Duration;

use serde::{Deserialize, Serialize};


#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaRules {
    // How many times a provider may be asked for a move within one turn before the game
    // halts.
    pub max_attempts: u32,
    // Delay between turns. Only there so that humans can follow the game.
    #[serde(with = "humantime_serde")]
    pub turn_pause: Duration,
}

impl ArenaRules {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    pub fn classic() -> Self {
        ArenaRules {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            turn_pause: Duration::from_millis(700),
        }
    }

    // No pacing, for tests and batch runs.
    pub fn instant() -> Self {
        ArenaRules { turn_pause: Duration::ZERO, ..Self::classic() }
    }
}

impl Default for ArenaRules {
    fn default() -> Self { Self::classic() }
}
