use tracing::info;
use tracing_subscriber::EnvFilter;

use summaly_server::config::Config;
use summaly_server::routes;
use summaly_server::state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing — JSON in production, human-readable in dev.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("summaly_server=info,tower_http=info"));

    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("🚀 Summaly Server starting...");

    let config = Config::from_env().expect("Failed to load configuration");
    info!(
        timeout_ms = config.timeout_ms,
        max_size = config.max_size,
        max_redirects = config.max_redirects,
        proxy = config.proxy.as_deref().unwrap_or("none"),
        "📝 Configuration loaded"
    );
    if let Some(media_proxy) = &config.media_proxy {
        tracing::warn!(%media_proxy, "MEDIA_PROXY is set but thumbnails are not proxied yet");
    }

    let addr = config.bind_addr.clone();
    let app_state = AppState::new(config).expect("Failed to build outbound HTTP client");
    let app = routes::router(app_state);

    info!("🎧 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed to start");

    info!("👋 Server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
