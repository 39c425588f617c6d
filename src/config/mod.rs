use std::env;

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:12267";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_USER_AGENT: &str = "summaly-rs";
pub const DEFAULT_MAX_SIZE: usize = 2 * 1024 * 1024;
pub const DEFAULT_MAX_REDIRECTS: usize = 5;
pub const DEFAULT_APPEND_HEADERS: &[&str] = &[
    "Content-Security-Policy:default-src 'none'; img-src 'self'; media-src 'self'; style-src 'unsafe-inline'",
    "Access-Control-Allow-Origin:*",
];

/// Separator between entries of `APPEND_HEADERS`.
const HEADER_LIST_SEPARATOR: char = '|';

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("invalid header entry {0:?}: expected Name:Value")]
    InvalidHeader(String),

    #[error("invalid proxy URL {0:?}")]
    InvalidProxy(String),
}

/// Process-wide settings. Built once in `main` and shared read-only.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    /// Ceiling for every outbound fetch. Callers can only lower it.
    pub timeout_ms: u64,
    pub user_agent: String,
    /// Largest response body accepted from a remote page, in bytes.
    pub max_size: usize,
    pub max_redirects: usize,
    pub proxy: Option<String>,
    /// Reserved for thumbnail proxying; not applied to results yet.
    pub media_proxy: Option<String>,
    pub append_headers: Vec<(HeaderName, HeaderValue)>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_size: DEFAULT_MAX_SIZE,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            proxy: None,
            media_proxy: None,
            append_headers: DEFAULT_APPEND_HEADERS
                .iter()
                .filter_map(|entry| parse_header_entry(entry).ok())
                .collect(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Config::from_lookup(|var| env::var(var).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let proxy = optional_var(&lookup, "PROXY");
        if let Some(proxy) = &proxy {
            url::Url::parse(proxy).map_err(|_| ConfigError::InvalidProxy(proxy.clone()))?;
        }

        let append_headers = match optional_var(&lookup, "APPEND_HEADERS") {
            Some(raw) => parse_header_list(&raw)?,
            None => defaults.append_headers,
        };

        Ok(Config {
            bind_addr: optional_var(&lookup, "BIND_ADDR").unwrap_or(defaults.bind_addr),
            timeout_ms: numeric_var(&lookup, "FETCH_TIMEOUT_MS", defaults.timeout_ms)?,
            user_agent: optional_var(&lookup, "USER_AGENT").unwrap_or(defaults.user_agent),
            max_size: numeric_var(&lookup, "MAX_SIZE", defaults.max_size)?,
            max_redirects: numeric_var(&lookup, "MAX_REDIRECTS", defaults.max_redirects)?,
            proxy,
            media_proxy: optional_var(&lookup, "MEDIA_PROXY"),
            append_headers,
        })
    }
}

/// Parse a `|`-separated list of `Name:Value` entries.
pub fn parse_header_list(raw: &str) -> Result<Vec<(HeaderName, HeaderValue)>, ConfigError> {
    raw.split(HEADER_LIST_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_header_entry)
        .collect()
}

/// Split a single `Name:Value` entry on its first colon.
pub fn parse_header_entry(entry: &str) -> Result<(HeaderName, HeaderValue), ConfigError> {
    let invalid = || ConfigError::InvalidHeader(entry.to_string());

    let (name, value) = entry.split_once(':').ok_or_else(invalid)?;
    let name = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|_| invalid())?;
    let value = HeaderValue::from_str(value.trim()).map_err(|_| invalid())?;
    Ok((name, value))
}

fn optional_var<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var).filter(|v| !v.trim().is_empty())
}

fn numeric_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match optional_var(lookup, var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn empty_source_yields_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.append_headers.len(), 2);
    }

    #[test]
    fn numeric_overrides_are_parsed() {
        let config = load(&[
            ("FETCH_TIMEOUT_MS", "1200"),
            ("MAX_SIZE", " 4096 "),
            ("MAX_REDIRECTS", "0"),
        ])
        .unwrap();
        assert_eq!(config.timeout_ms, 1200);
        assert_eq!(config.max_size, 4096);
        assert_eq!(config.max_redirects, 0);
    }

    #[test]
    fn non_numeric_values_name_the_variable() {
        for var in ["FETCH_TIMEOUT_MS", "MAX_SIZE", "MAX_REDIRECTS"] {
            match load(&[(var, "lots")]) {
                Err(ConfigError::InvalidNumber { var: named, value }) => {
                    assert_eq!(named, var);
                    assert_eq!(value, "lots");
                }
                other => panic!("expected InvalidNumber for {var}, got {other:?}"),
            }
        }
    }

    #[test]
    fn negative_timeout_is_rejected() {
        let err = load(&[("FETCH_TIMEOUT_MS", "-5")]).unwrap_err();
        assert!(err.to_string().contains("FETCH_TIMEOUT_MS"));
    }

    #[test]
    fn blank_proxies_count_as_unset() {
        let config = load(&[("PROXY", ""), ("MEDIA_PROXY", "   ")]).unwrap();
        assert!(config.proxy.is_none());
        assert!(config.media_proxy.is_none());
    }

    #[test]
    fn proxies_are_kept_when_set() {
        let config = load(&[
            ("PROXY", "http://proxy.internal:3128"),
            ("MEDIA_PROXY", "https://media.example.com/proxy"),
        ])
        .unwrap();
        assert_eq!(config.proxy.as_deref(), Some("http://proxy.internal:3128"));
        assert_eq!(
            config.media_proxy.as_deref(),
            Some("https://media.example.com/proxy")
        );
    }

    #[test]
    fn unparsable_proxy_is_rejected() {
        assert!(matches!(
            load(&[("PROXY", "not a proxy")]),
            Err(ConfigError::InvalidProxy(p)) if p == "not a proxy"
        ));
    }

    #[test]
    fn append_headers_override_defaults() {
        let config = load(&[("APPEND_HEADERS", "X-Frame-Options:DENY")]).unwrap();
        assert_eq!(config.append_headers.len(), 1);
        assert_eq!(config.append_headers[0].0.as_str(), "x-frame-options");
    }

    #[test]
    fn malformed_append_headers_are_rejected() {
        assert!(matches!(
            load(&[("APPEND_HEADERS", "X-Ok:1|broken")]),
            Err(ConfigError::InvalidHeader(_))
        ));
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.bind_addr, "0.0.0.0:12267");
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(config.max_size, 2 * 1024 * 1024);
        assert_eq!(config.max_redirects, 5);
        assert!(config.proxy.is_none());
        assert!(config.media_proxy.is_none());
    }

    #[test]
    fn default_headers_include_cors_and_csp() {
        let config = Config::default();
        assert_eq!(config.append_headers.len(), 2);
        let (name, value) = &config.append_headers[1];
        assert_eq!(name.as_str(), "access-control-allow-origin");
        assert_eq!(value, "*");
        let (name, value) = &config.append_headers[0];
        assert_eq!(name.as_str(), "content-security-policy");
        assert!(value.to_str().unwrap().starts_with("default-src 'none'"));
    }

    #[test]
    fn header_entry_splits_on_first_colon_only() {
        let (name, value) = parse_header_entry("Link:<https://a.example>; rel=x").unwrap();
        assert_eq!(name.as_str(), "link");
        assert_eq!(value, "<https://a.example>; rel=x");
    }

    #[test]
    fn header_entry_without_colon_is_rejected() {
        assert!(matches!(
            parse_header_entry("NoColonHere"),
            Err(ConfigError::InvalidHeader(_))
        ));
    }

    #[test]
    fn header_entry_with_bad_name_is_rejected() {
        assert!(parse_header_entry("Bad Name:value").is_err());
    }

    #[test]
    fn header_list_skips_blank_entries() {
        let headers = parse_header_list("X-One:1| |X-Two:2|").unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0].0.as_str(), "x-one");
        assert_eq!(headers[1].1, "2");
    }
}
