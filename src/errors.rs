use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("config deserialization error")]
    ConfigError(#[from] serde_yaml::Error),
    #[error("io error")]
    IOError(#[from] std::io::Error),
    #[error("hyper error")]
    HyperError(#[from] hyper::Error),

    #[error("http error")]
    HTTPError(#[from] axum::http::Error),
    #[error("http invalid header value")]
    HTTPInvalidHeaderValue(#[from] axum::http::header::InvalidHeaderValue),

    #[error("upstream request failed: {0}")]
    UpstreamError(#[from] reqwest::Error),

    #[error("token request to {realm} failed with status {status}: {reason}")]
    TokenRequestFailed {
        realm: String,
        status: StatusCode,
        reason: String,
    },
    #[error("token response from {0} carried no token")]
    MissingToken(String),
}

#[derive(Debug, Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    errors: Vec<ErrorInfo>,
}

#[inline]
fn into_error_response(status_code: StatusCode, code: &'static str, message: String) -> Response {
    let response = ErrorResponse {
        errors: vec![ErrorInfo { code, message }],
    };
    (status_code, axum::Json(response)).into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::UpstreamError(_)
            | Error::TokenRequestFailed { .. }
            | Error::MissingToken(_)
            | Error::HTTPInvalidHeaderValue(_) => {
                tracing::warn!("{}", self);
                into_error_response(StatusCode::BAD_GATEWAY, "UNKNOWN", format!("{}", self))
            }
            Error::ConfigError(_)
            | Error::IOError(_)
            | Error::HyperError(_)
            | Error::HTTPError(_) => {
                tracing::warn!("{:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    String::from("internal server error"),
                )
                    .into_response()
            }
        }
    }
}
