use crate::{error::Result, payload};
use db::{model::ScoreEntry, Database};
use hyper::body::Body;
use serde_json::json;

pub async fn try_submit<B: Body>(id: &str, body: B, db: &Database) -> Result<Vec<u8>> {
    let entry: ScoreEntry = payload::parse(body).await?;
    let leaderboard = db.append_score(id, entry)?;
    payload::encode(&json!({ "message": "Score submitted", "leaderboard": leaderboard }))
}

pub fn try_leaderboard(id: &str, db: &Database) -> Result<Vec<u8>> {
    let leaderboard = db.get_leaderboard(id)?;
    payload::encode(&leaderboard)
}
