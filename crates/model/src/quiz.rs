use crate::timer::Timer;
use alloc::{boxed::Box, string::String, vec::Vec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Acceptable schema for new questions.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Question {
    /// Prompt to be displayed to participants.
    #[serde(rename = "question")]
    pub text: String,
    /// Possible answers to select from, in display order.
    #[serde(default)]
    pub options: Vec<String>,
    /// Index of the option with the correct answer. This is not checked against the length of
    /// [`options`](Self::options); callers are responsible for keeping it in range.
    #[serde(rename = "answer", default)]
    pub correct_index: u32,
}

/// A stored quiz along with its countdown.
#[derive(Clone, Debug, Serialize)]
pub struct Quiz {
    pub id: Box<str>,
    pub title: String,
    pub questions: Vec<Question>,
    #[serde(flatten)]
    pub timer: Timer,
}

/// Participant-facing view of a quiz. Questions remain hidden until the quiz starts.
#[derive(Clone, Debug, Serialize)]
pub struct Status {
    pub quiz_id: Box<str>,
    pub title: String,
    pub started: bool,
    pub time_left: u64,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn new(id: Box<str>, title: String, questions: Vec<Question>, timer: i64) -> Self {
        Self { id, title, questions, timer: Timer::new(timer) }
    }

    pub fn status(&self, now: DateTime<Utc>) -> Status {
        let started = self.timer.is_started();
        Status {
            quiz_id: self.id.clone(),
            title: self.title.clone(),
            started,
            time_left: self.timer.time_left(now),
            questions: if started { self.questions.clone() } else { Vec::new() },
        }
    }
}
