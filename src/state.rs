use std::sync::Arc;

use crate::config::Config;
use crate::error::AppResult;
use crate::fetch::Fetcher;

/// Shared application state passed to all handlers.
/// Config is read once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: Fetcher,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let fetcher = Fetcher::new(&config)?;
        Ok(AppState {
            config: Arc::new(config),
            fetcher,
        })
    }
}
