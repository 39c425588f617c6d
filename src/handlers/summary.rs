use std::time::Duration;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::extract::extract_summary;
use crate::fetch::FetchRequest;
use crate::models::SummaryResult;
use crate::state::AppState;

/// Scheme that short-circuits to 418 without fetching anything.
pub const TEAPOT_SCHEME: &str = "coffee://";

// ── Query params ───────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq)]
pub struct SummaryQuery {
    pub url: Option<String>,
    pub lang: Option<String>,
    pub user_agent: Option<String>,
    /// Kept as text so an unparsable value falls back to the default
    /// instead of rejecting the request.
    pub response_timeout: Option<String>,
}

impl SummaryQuery {
    /// Fold decoded query pairs in order. A repeated key keeps its last
    /// value; unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = SummaryQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "url" => &mut query.url,
                "lang" => &mut query.lang,
                "userAgent" => &mut query.user_agent,
                "responseTimeout" => &mut query.response_timeout,
                _ => continue,
            };
            *slot = Some(value);
        }
        query
    }
}

/// `min(ceiling, requested)`, where a missing or unparsable request counts as
/// the ceiling itself.
pub fn effective_timeout(ceiling_ms: u64, requested: Option<&str>) -> Duration {
    let requested = requested
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(ceiling_ms);
    Duration::from_millis(ceiling_ms.min(requested))
}

/// The caller's user agent when non-empty, the configured one otherwise.
pub fn effective_user_agent(default: &str, requested: Option<&str>) -> String {
    requested
        .filter(|ua| !ua.is_empty())
        .unwrap_or(default)
        .to_string()
}

// ── Handler ────────────────────────────────────────────────────────────────

/// GET /?url=<url>&lang=<lang>&userAgent=<ua>&responseTimeout=<ms>
///
/// Fetches the page and returns its summary as JSON.
pub async fn get_summary(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> AppResult<Json<SummaryResult>> {
    let Query(pairs) = query.map_err(|e| {
        tracing::warn!(error = %e, "Rejected summary query");
        AppError::Internal
    })?;
    let params = SummaryQuery::from_pairs(pairs);

    let url = params.url.ok_or(AppError::MissingUrl)?;

    if url.starts_with(TEAPOT_SCHEME) {
        return Err(AppError::Teapot);
    }

    let request = FetchRequest {
        user_agent: effective_user_agent(&state.config.user_agent, params.user_agent.as_deref()),
        accept_language: params.lang.filter(|lang| !lang.is_empty()),
        timeout: effective_timeout(state.config.timeout_ms, params.response_timeout.as_deref()),
        url,
    };

    let body = state.fetcher.fetch(&request).await?;

    // html5ever parsing is CPU-bound.
    let base_url = request.url;
    let summary = tokio::task::spawn_blocking(move || extract_summary(&body, &base_url))
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, "Summary extraction task failed");
            AppError::Internal
        })?;

    tracing::info!(url = %summary.url, has_title = summary.title.is_some(), "Summarized page");

    Ok(Json(summary))
}

// ── Unit tests ─────────────────────────────────────────────────────────────
