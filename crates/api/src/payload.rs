use crate::error::{Error, Result};
use db::model::Question;
use http_body_util::BodyExt;
use hyper::body::{Body, Buf, Bytes};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// Acceptable schema for new quizzes.
#[derive(Deserialize)]
pub struct NewQuiz {
    pub title: String,
    #[serde(default)]
    pub questions: Option<Vec<Question>>,
    /// Duration in seconds. Negative values are clamped to zero by the store.
    #[serde(default)]
    pub timer: Option<i64>,
}

/// Reads the whole request body into memory.
pub async fn read<B: Body>(body: B) -> Result<Bytes> {
    let collected = body.collect().await.map_err(|_| Error::Fatal)?;
    Ok(collected.to_bytes())
}

/// Reads the whole request body as JSON.
pub async fn parse<T, B>(body: B) -> Result<T>
where
    T: DeserializeOwned,
    B: Body,
{
    let reader = body.collect().await.map_err(|_| Error::Fatal)?.aggregate().reader();
    serde_json::from_reader(reader).map_err(|err| {
        log::debug!("Rejected payload: {err}");
        Error::BadInput
    })
}

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|_| Error::Fatal)
}

/// Extracts the `delta` field of a timer adjustment.
///
/// Integers are taken as is, floats are truncated, and numeric strings are parsed. Everything else
/// (including an unreadable body) counts as zero.
pub fn coerce_delta(body: &[u8]) -> i64 {
    let value = serde_json::from_slice(body).unwrap_or(Value::Null);
    match value.get("delta") {
        Some(Value::Number(num)) => num.as_i64().or_else(|| num.as_f64().map(|num| num as i64)).unwrap_or(0),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
