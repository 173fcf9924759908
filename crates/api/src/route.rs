use crate::error::{Error, Result};
use hyper::Method;

/// Endpoints of the quiz service. Borrowed identifiers point into the request path.
#[derive(Debug, PartialEq, Eq)]
pub enum Route<'p> {
    /// CORS pre-flight for any path.
    Preflight,
    CreateQuiz,
    GetQuiz(&'p str),
    GetStatus(&'p str),
    AddQuestion(&'p str),
    StartQuiz(&'p str),
    AdjustQuiz(&'p str),
    SubmitScore(&'p str),
    GetLeaderboard(&'p str),
}

impl<'p> Route<'p> {
    pub fn resolve(method: &Method, path: &'p str) -> Result<Self> {
        if *method == Method::OPTIONS {
            return Ok(Self::Preflight);
        }

        // Empty segments are skipped so that trailing slashes are tolerated.
        let segments: Vec<_> = path.split('/').filter(|segment| !segment.is_empty()).collect();
        let (route, allowed) = match segments[..] {
            ["quizzes"] => (Self::CreateQuiz, Method::POST),
            ["quizzes", id] => (Self::GetQuiz(id), Method::GET),
            ["quizzes", id, "status"] => (Self::GetStatus(id), Method::GET),
            ["quizzes", id, "start"] => (Self::StartQuiz(id), Method::POST),
            ["quizzes", id, "adjust"] => (Self::AdjustQuiz(id), Method::POST),
            ["questions", id] => (Self::AddQuestion(id), Method::POST),
            ["score", id] => (Self::SubmitScore(id), Method::POST),
            ["leaderboard", id] => (Self::GetLeaderboard(id), Method::GET),
            _ => return Err(Error::UnknownRoute),
        };

        if *method == allowed {
            Ok(route)
        } else {
            Err(Error::MethodNotAllowed)
        }
    }
}
