#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod quiz;
pub mod score;
pub mod timer;

pub use chrono::{DateTime, Utc};
pub use quiz::{Question, Quiz, Status};
pub use score::{Leaderboard, ScoreEntry};
pub use timer::Timer;
