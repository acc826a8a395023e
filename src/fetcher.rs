use crate::error::LinkError;
use crate::http_client::build_http_client;
use anyhow::Result;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_HEAD_TIMEOUT: Duration = Duration::from_secs(5);

/// A successfully fetched document
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// Single-shot HTTP fetcher. Retries are left to the caller.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    head_client: Client,
    timeout: Duration,
    head_timeout: Duration,
}

impl Fetcher {
    pub fn new(timeout: Duration, head_timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            head_client: build_http_client(head_timeout)?,
            timeout,
            head_timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GETs `url` and returns its body, mapping every failure to a typed [`LinkError`].
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, LinkError> {
        let parsed = parse_http_url(url)?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| classify_transport_error(url, self.timeout, e))?;

        let response = check_status(url, response)?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(url, self.timeout, e))?;

        Ok(FetchedPage {
            url: final_url,
            status,
            content_type,
            body,
        })
    }

    /// Issues a HEAD request with the shorter liveness timeout and returns the status code.
    ///
    /// Non-2xx statuses are returned as-is; only transport failures are errors.
    pub async fn head(&self, url: &str) -> Result<u16, LinkError> {
        let parsed = parse_http_url(url)?;

        let response = self
            .head_client
            .head(parsed)
            .send()
            .await
            .map_err(|e| classify_transport_error(url, self.head_timeout, e))?;

        Ok(response.status().as_u16())
    }
}

/// Parses `url` and rejects anything that is not an absolute http(s) URL.
pub fn parse_http_url(url: &str) -> Result<Url, LinkError> {
    let parsed = Url::parse(url).map_err(|e| LinkError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(LinkError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}', only http and https are supported", scheme),
        }),
    }
}

fn check_status(url: &str, response: Response) -> Result<Response, LinkError> {
    let status = response.status();
    if status == StatusCode::FORBIDDEN {
        return Err(LinkError::AccessBlocked {
            url: url.to_string(),
        });
    }
    if !status.is_success() {
        return Err(LinkError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

fn classify_transport_error(url: &str, timeout: Duration, err: reqwest::Error) -> LinkError {
    let url = url.to_string();
    if err.is_timeout() {
        LinkError::Timeout {
            url,
            timeout_secs: timeout.as_secs().max(1),
            source: err,
        }
    } else if err.is_connect() {
        LinkError::Connection { url, source: err }
    } else {
        LinkError::Transport { url, source: err }
    }
}
