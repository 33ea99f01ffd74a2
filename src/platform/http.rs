// ABOUTME: Platform API client built on reqwest with rustls and the native root store.
// ABOUTME: Basic auth with an empty user; every request is bounded by the configured timeout.

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use std::time::Duration;
use url::Url;

use super::{PlatformApi, PlatformError, ProcessResponse};
use crate::config::PlatformConfig;
use crate::types::{AppName, KeyName};

/// Platform API client.
pub struct HttpPlatform {
    client: Client,
    base_url: String,
    host: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl std::fmt::Debug for HttpPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPlatform")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.api_key.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpPlatform {
    /// Create a client for `api_url`, which must be `http` or `https`.
    pub fn new(
        api_url: &str,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, PlatformError> {
        let invalid = |reason: String| PlatformError::InvalidUrl {
            url: api_url.to_string(),
            reason,
        };

        let base = Url::parse(api_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
        }
        let host = base
            .host_str()
            .ok_or_else(|| invalid("missing host".to_string()))?
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .user_agent(concat!("headless/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlatformError::Request(format!("failed to build client: {e}")))?;

        Ok(Self {
            client,
            base_url: api_url.trim_end_matches('/').to_string(),
            host,
            api_key: api_key.map(str::to_string),
            timeout,
        })
    }

    /// Create a client from the platform section of the configuration.
    pub fn from_config(config: &PlatformConfig) -> crate::error::Result<Self> {
        let api_key = config.resolve_api_key()?;
        Ok(Self::new(
            &config.api_url,
            api_key.as_deref(),
            config.request_timeout,
        )?)
    }

    /// Full URL for `path`, keeping any path prefix of the base URL.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let request = self.client.request(method, url);
        match self.api_key {
            Some(ref key) => request.basic_auth("", Some(key)),
            None => request,
        }
    }

    /// Send a request and return the body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<String, PlatformError> {
        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            tracing::debug!("Platform returned {}: {}", status, body);
            return Err(PlatformError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    fn classify(&self, error: reqwest::Error) -> PlatformError {
        if error.is_timeout() {
            PlatformError::Timeout(self.timeout)
        } else if error.is_connect() {
            PlatformError::Connection {
                host: self.host.clone(),
                reason: error.to_string(),
            }
        } else {
            PlatformError::Request(error.to_string())
        }
    }
}

#[async_trait]
impl PlatformApi for HttpPlatform {
    async fn post_key(&self, public_key: &str) -> Result<(), PlatformError> {
        let request = self
            .request(Method::POST, "/user/keys")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(public_key.trim().to_string());
        self.send(request).await?;
        Ok(())
    }

    async fn delete_key(&self, name: &KeyName) -> Result<(), PlatformError> {
        let path = format!("/user/keys/{}", urlencoding::encode(name.as_str()));
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    async fn restart_processes(&self, app: &AppName) -> Result<String, PlatformError> {
        let path = format!("/apps/{}/ps/restart", urlencoding::encode(app.as_str()));
        self.send(self.request(Method::POST, &path)).await
    }

    async fn run_process(
        &self,
        app: &AppName,
        command: &str,
        attach: bool,
    ) -> Result<ProcessResponse, PlatformError> {
        let path = format!(
            "/apps/{}/ps?attach={}&command={}",
            urlencoding::encode(app.as_str()),
            attach,
            urlencoding::encode(command)
        );
        let body = self.send(self.request(Method::POST, &path)).await?;

        if body.trim().is_empty() {
            return Ok(ProcessResponse::default());
        }

        serde_json::from_str(&body).map_err(|e| PlatformError::InvalidResponse(e.to_string()))
    }
}
