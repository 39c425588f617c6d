use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub const PROXY_ERROR_HEADER: &str = "x-proxy-error";
pub const TEAPOT_MESSAGE: &str = "I'm a teapot";
pub const FETCH_FAILED_BODY: &str = "Failed to fetch content";
pub const NOT_FOUND_BODY: &str = "Not found";
pub const ERROR_BODY: &str = "Error";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I'm a teapot")]
    Teapot,

    #[error("Remote server responded with status {status}")]
    Proxy { status: u16 },

    #[error("Timed out fetching remote content")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(reqwest::Error),

    #[error("Response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("Missing required `url` parameter")]
    MissingUrl,

    #[error("Internal server error")]
    Internal,
}

/// Classify reqwest failures so timeouts surface as 504 and everything else
/// that never produced a usable remote status surfaces as 502.
impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return AppError::Timeout;
        }
        if let Some(status) = e.status() {
            return AppError::Proxy {
                status: status.as_u16(),
            };
        }
        AppError::Transport(e)
    }
}

impl AppError {
    /// Status code relayed to the caller for failed fetches.
    fn fetch_status(&self) -> StatusCode {
        match self {
            AppError::Proxy { status } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Teapot => (
                StatusCode::IM_A_TEAPOT,
                [(PROXY_ERROR_HEADER, TEAPOT_MESSAGE)],
            )
                .into_response(),
            AppError::Proxy { .. }
            | AppError::Timeout
            | AppError::Transport(_)
            | AppError::BodyTooLarge { .. } => {
                let status = self.fetch_status();
                tracing::warn!(error = %self, status = status.as_u16(), "Fetch failed");
                (
                    status,
                    [(PROXY_ERROR_HEADER, status.as_u16().to_string())],
                    FETCH_FAILED_BODY,
                )
                    .into_response()
            }
            AppError::MissingUrl | AppError::Internal => {
                tracing::error!(error = %self, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, ERROR_BODY).into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
