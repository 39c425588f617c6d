use std::any::Any;

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Response, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::error::ERROR_BODY;
use crate::handlers;
use crate::state::AppState;

/// Build the service router.
///
/// Layers are added after the fallback so the configured fixed headers land
/// on every response, 404s and recovered panics included.
pub fn router(state: AppState) -> Router {
    let append_headers = state.config.append_headers.clone();

    let app = Router::new()
        .route(
            "/",
            get(handlers::summary::get_summary).fallback(handlers::not_found),
        )
        .fallback(handlers::not_found)
        .with_state(state);

    with_layers(app, append_headers)
}

/// Panic recovery innermost, then the fixed headers, then request tracing.
fn with_layers(app: Router, append_headers: Vec<(HeaderName, HeaderValue)>) -> Router {
    let mut app = app.layer(CatchPanicLayer::custom(panic_response));

    for (name, value) in append_headers {
        app = app.layer(SetResponseHeaderLayer::appending(name, value));
    }

    app.layer(TraceLayer::new_for_http())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");

    let mut response = Response::new(Body::from(ERROR_BODY));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
