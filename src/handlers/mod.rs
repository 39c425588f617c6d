pub mod summary;

use axum::http::StatusCode;

use crate::error::NOT_FOUND_BODY;

/// Fallback for every unmatched route.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}
