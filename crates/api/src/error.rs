use core::fmt::{self, Display};
use hyper::StatusCode;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// No quiz exists with the requested identifier.
    UnknownQuiz,
    /// No endpoint exists at the requested path.
    UnknownRoute,
    /// The endpoint exists but does not accept the request method.
    MethodNotAllowed,
    /// The payload is not the JSON we expect.
    BadInput,
    /// The request body could not be read or the response could not be encoded.
    Fatal,
}

impl Error {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::UnknownQuiz | Self::UnknownRoute => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::BadInput => StatusCode::BAD_REQUEST,
            Self::Fatal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnknownQuiz => "Quiz not found",
            Self::UnknownRoute => "Not found",
            Self::MethodNotAllowed => "Method not allowed",
            Self::BadInput => "Malformed payload",
            Self::Fatal => "Oops! We have encountered an unrecoverable error on our end.",
        })
    }
}

impl From<db::error::Error> for Error {
    fn from(err: db::error::Error) -> Self {
        match err {
            db::error::Error::NotFound => Self::UnknownQuiz,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
