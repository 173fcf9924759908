use crate::{
    error::Result,
    payload::{self, NewQuiz},
};
use chrono::{DateTime, Utc};
use db::{model::Question, Database};
use hyper::body::Body;
use serde_json::json;

pub async fn try_create<B: Body>(body: B, db: &Database) -> Result<Vec<u8>> {
    let NewQuiz { title, questions, timer } = payload::parse(body).await?;
    let quiz_id = db.create_quiz(title, questions.unwrap_or_default(), timer.unwrap_or_default());
    payload::encode(&json!({ "quiz_id": quiz_id }))
}

pub fn try_get(id: &str, db: &Database) -> Result<Vec<u8>> {
    let quiz = db.get_quiz(id)?;
    payload::encode(&quiz)
}

pub fn try_status(id: &str, db: &Database, now: DateTime<Utc>) -> Result<Vec<u8>> {
    let status = db.get_status(id, now)?;
    payload::encode(&status)
}

pub async fn try_add_question<B: Body>(id: &str, body: B, db: &Database) -> Result<Vec<u8>> {
    let question: Question = payload::parse(body).await?;
    let total = db.add_question(id, question)?;
    payload::encode(&json!({ "message": "Question added", "total_questions": total }))
}

pub fn try_start(id: &str, db: &Database, now: DateTime<Utc>) -> Result<Vec<u8>> {
    let time_left = db.start_quiz(id, now)?;
    payload::encode(&json!({ "message": "started", "time_left": time_left }))
}

pub async fn try_adjust<B: Body>(id: &str, body: B, db: &Database, now: DateTime<Utc>) -> Result<Vec<u8>> {
    let bytes = payload::read(body).await?;
    let delta = payload::coerce_delta(&bytes);
    drop(bytes);

    let time_left = db.adjust_quiz(id, delta, now)?;
    payload::encode(&json!({ "message": "adjusted", "time_left": time_left }))
}
