//! Configuration options for the Fitness Sharks client

use std::time::Duration;
use url::Url;

use crate::error::Error;

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Candidate base URLs tried, in order, by the connectivity probe
pub const DEFAULT_FALLBACK_URLS: [&str; 5] = [
    "/api",
    "http://localhost:8080/api",
    "http://localhost:8080",
    "http://127.0.0.1:8080/api",
    "http://127.0.0.1:8080",
];

/// Lightweight read endpoints used only to test reachability
pub const PROBE_ENDPOINTS: [&str; 3] = ["/trainers", "/memberships", "/plans"];

/// Configuration options for the Fitness Sharks client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Root address prepended to every API path
    pub base_url: String,

    /// Ordered candidates for the connectivity probe
    pub fallback_urls: Vec<String>,

    /// Scheme, host and port used to resolve relative base URLs such as `/api`
    pub origin: Option<String>,

    /// The request timeout
    pub request_timeout: Duration,

    /// Timeout for each probe request
    pub probe_timeout: Duration,

    /// Keep session cookies between requests
    pub with_credentials: bool,

    /// Headers sent with every request
    pub headers: Vec<(String, String)>,

    /// Port named in connection diagnostics
    pub backend_port: u16,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fallback_urls: DEFAULT_FALLBACK_URLS.iter().map(|u| u.to_string()).collect(),
            origin: None,
            request_timeout: Duration::from_millis(10_000),
            probe_timeout: Duration::from_millis(5_000),
            with_credentials: true,
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
            ],
            backend_port: 8080,
        }
    }
}

impl ClientOptions {
    /// Set the base URL
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.to_string();
        self
    }

    /// Replace the probe candidates
    pub fn with_fallback_urls<I, T>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.fallback_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    /// Set the origin used for relative URLs
    pub fn with_origin(mut self, value: &str) -> Self {
        self.origin = Some(value.to_string());
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Duration) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the per-request probe timeout
    pub fn with_probe_timeout(mut self, value: Duration) -> Self {
        self.probe_timeout = value;
        self
    }

    /// Set whether session cookies are kept
    pub fn with_credentials(mut self, value: bool) -> Self {
        self.with_credentials = value;
        self
    }

    /// Add or replace a default header
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Set the port named in connection diagnostics
    pub fn with_backend_port(mut self, value: u16) -> Self {
        self.backend_port = value;
        self
    }

    /// Read options from `FITNESS_SHARKS_*` environment variables, keeping
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientOptions::from_env`] with an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(url) = lookup("FITNESS_SHARKS_API_URL") {
            options.base_url = url;
        }
        if let Some(urls) = lookup("FITNESS_SHARKS_FALLBACK_URLS") {
            options.fallback_urls = urls
                .split(',')
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(origin) = lookup("FITNESS_SHARKS_ORIGIN") {
            options.origin = Some(origin);
        }
        if let Some(ms) = lookup("FITNESS_SHARKS_TIMEOUT_MS") {
            let ms: u64 = ms
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("FITNESS_SHARKS_TIMEOUT_MS is not a number: {}", ms)))?;
            options.request_timeout = Duration::from_millis(ms);
        }
        if let Some(flag) = lookup("FITNESS_SHARKS_WITH_CREDENTIALS") {
            options.with_credentials = parse_flag(&flag).ok_or_else(|| {
                Error::config(format!("FITNESS_SHARKS_WITH_CREDENTIALS is not a boolean: {}", flag))
            })?;
        }
        if let Some(port) = lookup("FITNESS_SHARKS_BACKEND_PORT") {
            options.backend_port = port
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("FITNESS_SHARKS_BACKEND_PORT is not a port: {}", port)))?;
        }

        Ok(options)
    }

    /// Turn a possibly relative base URL into an absolute one
    pub fn resolve_url(&self, candidate: &str) -> Result<Url, Error> {
        match Url::parse(candidate) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let origin = self.origin.as_deref().ok_or_else(|| {
                    Error::config(format!(
                        "relative base URL {} needs an origin to resolve against",
                        candidate
                    ))
                })?;
                Ok(Url::parse(origin)?.join(candidate)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
