use std::time::Duration;

use reqwest::{header, Client, Proxy};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// A single outbound page fetch, built per request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub user_agent: String,
    pub accept_language: Option<String>,
    /// Already clamped to the configured ceiling.
    pub timeout: Duration,
}

/// Outbound HTTP client shared by every request.
///
/// Built once at startup with the configured proxy, redirect cap and connect
/// timeout. Each fetch is further bounded by its own `FetchRequest::timeout`
/// and by `max_size` while the body streams in.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    max_size: usize,
}

impl Fetcher {
    pub fn new(config: &Config) -> AppResult<Self> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_millis(config.timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects));

        if let Some(proxy) = &config.proxy {
            let proxy = Proxy::all(proxy).map_err(|e| {
                tracing::error!(error = ?e, proxy = %proxy, "Invalid outbound proxy");
                AppError::Internal
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            tracing::error!(error = ?e, "Failed to build HTTP client");
            AppError::Internal
        })?;

        Ok(Fetcher {
            client,
            max_size: config.max_size,
        })
    }

    /// GET `request.url` and return its body.
    ///
    /// 2xx and 3xx responses count as success; any other status becomes
    /// `AppError::Proxy`. Bodies larger than `max_size` fail with
    /// `AppError::BodyTooLarge` without being read past the limit.
    pub async fn fetch(&self, request: &FetchRequest) -> AppResult<Vec<u8>> {
        tracing::debug!(
            url = %request.url,
            timeout_ms = request.timeout.as_millis() as u64,
            "Fetching remote page"
        );

        let mut builder = self
            .client
            .get(&request.url)
            .timeout(request.timeout)
            .header(header::USER_AGENT, &request.user_agent);

        if let Some(lang) = request.accept_language.as_deref().filter(|l| !l.is_empty()) {
            builder = builder.header(header::ACCEPT_LANGUAGE, lang);
        }

        let mut response = builder.send().await.map_err(|e| {
            tracing::warn!(error = ?e, url = %request.url, "Failed to fetch URL");
            AppError::from(e)
        })?;

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(AppError::Proxy {
                status: status.as_u16(),
            });
        }

        if let Some(length) = response.content_length() {
            if length > self.max_size as u64 {
                return Err(AppError::BodyTooLarge {
                    limit: self.max_size,
                });
            }
        }

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(AppError::from)? {
            if body.len() + chunk.len() > self.max_size {
                return Err(AppError::BodyTooLarge {
                    limit: self.max_size,
                });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}
