//! Finding a reachable backend
//!
//! The probe walks the candidate base URLs in order and, for each, the probe
//! endpoints in order, one short-timeout GET at a time. The first success
//! wins and a fresh [`ApiClient`] for that base URL is returned. Nothing is
//! retried, cached or re-probed in the background.

use serde_json::Value;
use std::future::Future;
use url::Url;

use crate::config::{ClientOptions, PROBE_ENDPOINTS};
use crate::error::{Error, Result};
use crate::fetch::Transport;
use crate::ApiClient;

/// Where a connection test succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionReport {
    pub base_url: Url,
    pub endpoint: String,
    /// Records returned by the probe endpoint, 0 if the body was not a list
    pub item_count: usize,
}

impl ConnectionReport {
    pub fn summary(&self) -> String {
        format!(
            "Backend connection successful! Connected via {}{} and found {} items.",
            self.base_url.as_str().trim_end_matches('/'),
            self.endpoint,
            self.item_count
        )
    }
}

/// Try every candidate base URL from `options.fallback_urls` and return a
/// client for the first one that answers a probe endpoint. The returned
/// client keeps the original timeout, headers and credentials setting; the
/// probe requests themselves use `options.probe_timeout` and no cookies.
pub async fn find_working_backend(options: &ClientOptions) -> Result<ApiClient> {
    let http_client = Transport::http_client(options, options.probe_timeout, false)?;

    for candidate in &options.fallback_urls {
        let base_url = match options.resolve_url(candidate) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("skipping candidate {}: {}", candidate, e);
                continue;
            }
        };
        log::info!("Testing URL: {}", base_url);

        let transport = Transport::new(http_client.clone(), base_url, options.backend_port);
        for endpoint in PROBE_ENDPOINTS {
            match transport.get(endpoint).execute_empty().await {
                Ok(()) => {
                    log::info!("Connected to backend at {}", transport.url(endpoint));
                    return ApiClient::new(options.clone().with_base_url(candidate));
                }
                Err(e) => log::debug!("Failed {}: {}", transport.url(endpoint), e),
            }
        }
    }

    log::warn!("All connection attempts failed");
    Err(Error::Unreachable {
        port: options.backend_port,
    })
}

/// Run `op`; if it fails for lack of a connection, probe for another backend
/// and run `op` exactly once more against it. Returns the client the final
/// attempt used. When the probe finds nothing, the original error is kept.
pub async fn retry_with_probe<T, F, Fut>(client: &ApiClient, op: F) -> Result<(ApiClient, T)>
where
    F: Fn(ApiClient) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let first = match op(client.clone()).await {
        Ok(value) => return Ok((client.clone(), value)),
        Err(e) if e.is_connectivity() => e,
        Err(e) => return Err(e),
    };

    log::info!("{}; probing for another backend", first);
    let probed = match find_working_backend(client.options()).await {
        Ok(probed) => probed,
        Err(_) => return Err(first),
    };

    let value = op(probed.clone()).await?;
    Ok((probed, value))
}

impl ApiClient {
    /// Check the probe endpoints on this client's own base URL; if none
    /// answers, probe the fallback URLs and re-test once with the client
    /// found there.
    pub async fn test_connection(&self) -> Result<(ApiClient, ConnectionReport)> {
        log::info!("Testing connection to: {}", self.base_url());
        if let Some(report) = self.check_endpoints().await {
            return Ok((self.clone(), report));
        }

        log::info!("All endpoints failed with current URL, trying alternatives...");
        let probed = find_working_backend(self.options()).await?;
        match probed.check_endpoints().await {
            Some(report) => Ok((probed, report)),
            None => Err(Error::Unreachable {
                port: self.options().backend_port,
            }),
        }
    }

    async fn check_endpoints(&self) -> Option<ConnectionReport> {
        for endpoint in PROBE_ENDPOINTS {
            match self.transport().get(endpoint).send().await {
                Ok(response) => {
                    let body = response.json::<Value>().await.unwrap_or(Value::Null);
                    let report = ConnectionReport {
                        base_url: self.base_url().clone(),
                        endpoint: endpoint.to_string(),
                        item_count: body.as_array().map_or(0, Vec::len),
                    };
                    log::info!("{}", report.summary());
                    return Some(report);
                }
                Err(e) => log::debug!("Failed to connect to {}: {}", endpoint, e),
            }
        }
        None
    }
}
