#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod board;
pub mod cancel;
pub mod capture;
pub mod coord;
pub mod event;
pub mod game;
pub mod grid;
pub mod orchestrator;
pub mod piece;
pub mod protocol;
pub mod rules;
pub mod side;
pub mod test_util;
