pub mod error;
pub mod payload;
pub mod route;

mod quiz;
mod score;

pub use db::Database;

use http_body_util::Full;
use hyper::{
    body::{Body, Bytes},
    header::{
        HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
        ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, CONTENT_TYPE,
    },
    Request, Response, StatusCode,
};
use route::Route;

pub const APPLICATION_JSON: &str = "application/json";

type ResponseBody = Full<Bytes>;

/// Any origin may call the service.
fn allow_cors(headers: &mut HeaderMap) {
    assert!(headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")).is_none());
    assert!(headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, POST, OPTIONS")).is_none());
    assert!(headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*")).is_none());
}

fn preflight() -> Response<ResponseBody> {
    let mut res = Response::new(Full::new(Bytes::new()));
    *res.status_mut() = StatusCode::NO_CONTENT;
    let headers = res.headers_mut();
    allow_cors(headers);
    assert!(headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("3600")).is_none());
    res
}

fn json(status: StatusCode, bytes: Vec<u8>) -> Response<ResponseBody> {
    let mut res = Response::new(Full::new(Bytes::from(bytes)));
    *res.status_mut() = status;
    let headers = res.headers_mut();
    assert!(headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON)).is_none());
    allow_cors(headers);
    res
}

async fn try_dispatch<B: Body>(route: Route<'_>, body: B, db: &Database) -> error::Result<Vec<u8>> {
    let now = chrono::Utc::now();
    match route {
        Route::Preflight => Ok(Vec::new()),
        Route::CreateQuiz => quiz::try_create(body, db).await,
        Route::GetQuiz(id) => quiz::try_get(id, db),
        Route::GetStatus(id) => quiz::try_status(id, db, now),
        Route::AddQuestion(id) => quiz::try_add_question(id, body, db).await,
        Route::StartQuiz(id) => quiz::try_start(id, db, now),
        Route::AdjustQuiz(id) => quiz::try_adjust(id, body, db, now).await,
        Route::SubmitScore(id) => score::try_submit(id, body, db).await,
        Route::GetLeaderboard(id) => score::try_leaderboard(id, db),
    }
}

/// Handles a single request against the store. Failures are rendered as a JSON `detail` message
/// with the matching status code, so this never fails.
pub async fn try_respond<B: Body>(req: Request<B>, db: &Database) -> Response<ResponseBody> {
    let (parts, body) = req.into_parts();
    let path = parts.uri.path();

    let result = match Route::resolve(&parts.method, path) {
        Ok(Route::Preflight) => return preflight(),
        Ok(route) => try_dispatch(route, body, db).await,
        Err(err) => Err(err),
    };

    let res = match result {
        Ok(bytes) => json(StatusCode::OK, bytes),
        Err(err) => {
            let detail = serde_json::json!({ "detail": err.to_string() }).to_string();
            json(err.status(), detail.into_bytes())
        }
    };

    log::info!("{} {} -> {}", parts.method, path, res.status());
    res
}
