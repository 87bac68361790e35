use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, StatusCode};
use tracing::debug;
use url::Url;

use crate::error::{ApiError, BoxError, Result};

/// Everything needed to issue one call, relative to the client's API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Relative path including the query string, e.g. `board?startAt=0&maxResults=50`.
    pub path: String,
    /// Value of the `Authorization` header.
    pub authorization: String,
    pub timeout: Option<Duration>,
}

/// What came back from the wire. A transport failure means no HTTP response
/// was received; status and body are then empty.
#[derive(Debug, Default)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
    pub transport_error: Option<BoxError>,
}

impl RawResponse {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
            transport_error: None,
        }
    }

    pub fn transport_failure(error: impl Into<BoxError>) -> Self {
        Self {
            transport_error: Some(error.into()),
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, base: &Url, request: &RequestDescriptor) -> RawResponse;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::InvalidConfiguration {
                message: format!("Unable to build HTTP client: {e}"),
            })?;

        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, base: &Url, request: &RequestDescriptor) -> RawResponse {
        let url = match base.join(&request.path) {
            Ok(url) => url,
            Err(e) => return RawResponse::transport_failure(e),
        };

        debug!(method = %request.method, url = %url, "Sending request");

        let mut req = self
            .client
            .request(request.method.clone(), url)
            .header(AUTHORIZATION, &request.authorization)
            .header(ACCEPT, "application/json");

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) => return RawResponse::transport_failure(e),
        };

        let status = response.status();
        let status_text = status_text(status);

        match response.text().await {
            Ok(body) => {
                debug!(status = status.as_u16(), bytes = body.len(), "Received response");
                RawResponse::new(status.as_u16(), status_text, body)
            }
            Err(e) => RawResponse::transport_failure(e),
        }
    }
}

/// Reason phrase for `status`, or the bare code when it has none.
fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string())
}
