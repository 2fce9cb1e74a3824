//! HTTP plumbing shared by every backend call
//!
//! [`Transport`] owns the `reqwest` client and the resolved base URL;
//! [`FetchBuilder`] builds one request against it and turns any failure into
//! [`Error`], so no raw transport error leaves this module.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use url::Url;

use crate::config::ClientOptions;
use crate::error::{Error, Result};

/// A configured HTTP client bound to one base URL
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    client: Client,
    base_url: Url,
    port: u16,
}

impl Transport {
    pub(crate) fn new(client: Client, base_url: Url, port: u16) -> Self {
        Self {
            client,
            base_url,
            port,
        }
    }

    /// Build the underlying `reqwest` client from the options' headers
    pub(crate) fn http_client(
        options: &ClientOptions,
        timeout: Duration,
        with_credentials: bool,
    ) -> Result<Client> {
        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::config(format!("invalid header name {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::config(format!("invalid header value for {}: {}", name.as_str(), e)))?;
            headers.insert(name, value);
        }

        Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .cookie_store(with_credentials)
            .build()
            .map_err(Error::config)
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    pub(crate) fn get(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::GET)
    }

    pub(crate) fn post(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::POST)
    }

    pub(crate) fn put(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::PUT)
    }

    pub(crate) fn delete(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::DELETE)
    }
}

/// Helper for building and executing one request
pub(crate) struct FetchBuilder<'a> {
    transport: &'a Transport,
    path: String,
    method: Method,
    query_params: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl<'a> FetchBuilder<'a> {
    fn new(transport: &'a Transport, path: &str, method: Method) -> Self {
        Self {
            transport,
            path: path.to_string(),
            method,
            query_params: Vec::new(),
            body: None,
        }
    }

    /// Add a query parameter
    pub(crate) fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a JSON body to the request
    pub(crate) fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let json = serde_json::to_vec(body).map_err(Error::request)?;
        self.body = Some(json);
        Ok(self)
    }

    fn build(&self) -> Result<RequestBuilder> {
        let mut url = Url::parse(&self.transport.url(&self.path)).map_err(Error::request)?;

        if !self.query_params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                query_pairs.append_pair(key, value);
            }
        }

        let mut req = self.transport.client.request(self.method.clone(), url);
        if let Some(body) = &self.body {
            req = req.body(body.clone());
        }

        Ok(req)
    }

    /// Send the request; non-success statuses become [`Error::Server`]
    pub(crate) async fn send(&self) -> Result<Response> {
        let req = self.build()?;
        log::debug!("{} {}{}", self.method, self.transport.base_url, self.path);

        let port = self.transport.port;
        let response = req
            .send()
            .await
            .map_err(|e| Error::from_transport(e, port))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .bytes()
                .await
                .map_err(|e| Error::from_transport(e, port))?;
            let err = Error::from_response(status.as_u16(), &body);
            log::warn!("{} {} failed: {}", self.method, self.path, err);
            return Err(err);
        }

        Ok(response)
    }

    /// Execute the request and parse the response as JSON
    pub(crate) async fn execute<T: DeserializeOwned>(&self) -> Result<T> {
        let response = self.send().await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::from_transport(e, self.transport.port))?;
        serde_json::from_slice(&body).map_err(Error::decode)
    }

    /// Execute the request and ignore any response body
    pub(crate) async fn execute_empty(&self) -> Result<()> {
        self.send().await?;
        Ok(())
    }
}
