//! The single HTTP seam: one authenticated JSON request, raw JSON back.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::TransportError;

#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs `body` with a bearer token and returns the decoded response body.
    async fn post_json(
        &self,
        url: &str,
        token: &str,
        body: &Value,
    ) -> Result<Value, TransportError>;

    async fn get_json(&self, url: &str, token: &str) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T> Transport for std::sync::Arc<T>
where
    T: Transport + ?Sized,
{
    async fn post_json(
        &self,
        url: &str,
        token: &str,
        body: &Value,
    ) -> Result<Value, TransportError> {
        (**self).post_json(url, token, body).await
    }

    async fn get_json(&self, url: &str, token: &str) -> Result<Value, TransportError> {
        (**self).get_json(url, token).await
    }
}

/// `reqwest`-backed transport. No retries and no timeout beyond the client's own.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl HttpTransport {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Client with the crate's user agent.
    pub fn with_user_agent() -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("wabtn/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::new(http))
    }

    async fn finish(response: reqwest::Response) -> Result<Value, TransportError> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), body = %text, "whatsapp api rejected request");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(decode_body(&text))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        token: &str,
        body: &Value,
    ) -> Result<Value, TransportError> {
        debug!(%url, "posting json");
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::finish(response).await
    }

    async fn get_json(&self, url: &str, token: &str) -> Result<Value, TransportError> {
        debug!(%url, "fetching json");
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        Self::finish(response).await
    }
}

/// Empty bodies become `null`; bodies that are not JSON are kept as a string.
pub fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
