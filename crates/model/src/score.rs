use alloc::{string::String, vec::Vec};
use serde::{Deserialize, Serialize};

/// A single submission to a leaderboard. Names need not be unique.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: i64,
}

/// Submissions ordered by descending score. Equal scores keep their submission order.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Leaderboard(Vec<ScoreEntry>);

impl Leaderboard {
    /// Inserts the entry at its ranked position.
    pub fn push(&mut self, entry: ScoreEntry) {
        let index = self.0.partition_point(|other| other.score >= entry.score);
        self.0.insert(index, entry);
    }

    pub fn as_slice(&self) -> &[ScoreEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Leaderboard> for Vec<ScoreEntry> {
    fn from(board: Leaderboard) -> Self {
        board.0
    }
}
