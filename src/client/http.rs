//! HTTP transport for the chat server
//!
//! Every call is a plain GET with the identity carried in the query string.

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use std::time::Duration;

use super::error::{TransportError, TransportResult};
use super::ChatTransport;
use crate::model::Event;

/// Configuration for the HTTP transport
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Base URI of the chat server (e.g., "http://localhost:8080/")
    pub base_uri: String,
    /// Per-request timeout. `None` lets a long poll hang as long as the
    /// server holds it open.
    pub request_timeout: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_uri: "http://localhost:8080/".to_string(),
            request_timeout: None,
        }
    }
}

/// `reqwest`-backed chat server client
pub struct HttpTransport {
    client: Client,
    base_uri: String,
}

impl HttpTransport {
    /// Create a transport for the configured server
    pub fn new(config: TransportConfig) -> TransportResult<Self> {
        let base_uri = normalize_base(&config.base_uri);
        Url::parse(&base_uri).map_err(|e| TransportError::InvalidUri(format!("{base_uri}: {e}")))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TransportError::Request)?;

        Ok(Self { client, base_uri })
    }

    /// Base URI with the trailing slash endpoint paths are appended to
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    fn join_url(&self, nick_name: &str, email: &str) -> String {
        format!(
            "{}join?nickName={}&email={}",
            self.base_uri,
            urlencoding::encode(nick_name),
            urlencoding::encode(email)
        )
    }

    fn poll_url(&self, since: u64, nick_name: &str, email: &str) -> String {
        format!(
            "{}eventpoll?since={}&nickName={}&email={}",
            self.base_uri,
            since,
            urlencoding::encode(nick_name),
            urlencoding::encode(email)
        )
    }

    fn message_url(&self, nick_name: &str, email: &str, message: &str) -> String {
        format!(
            "{}message?nickName={}&email={}&message={}",
            self.base_uri,
            urlencoding::encode(nick_name),
            urlencoding::encode(email),
            urlencoding::encode(message)
        )
    }

    /// GET `url`, turning non-2xx answers into `TransportError::Api`
    async fn get_ok(&self, url: &str) -> TransportResult<Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(TransportError::from_reqwest)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(TransportError::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn join(&self, nick_name: &str, email: &str) -> TransportResult<()> {
        let url = self.join_url(nick_name, email);
        tracing::debug!(%url, "GET join");
        self.get_ok(&url).await?;
        Ok(())
    }

    async fn poll(&self, since: u64, nick_name: &str, email: &str) -> TransportResult<Vec<Event>> {
        let url = self.poll_url(since, nick_name, email);
        tracing::trace!(%url, "GET eventpoll");
        let response = self.get_ok(&url).await?;
        let body = response.text().await.map_err(TransportError::from_reqwest)?;
        let events: Vec<Event> = serde_json::from_str(&body)?;
        Ok(events)
    }

    async fn send_message(&self, nick_name: &str, email: &str, message: &str) -> TransportResult<()> {
        let url = self.message_url(nick_name, email, message);
        tracing::debug!(%url, "GET message");
        self.get_ok(&url).await?;
        Ok(())
    }
}

/// Ensure the base URI ends with `/` so endpoint names can be appended
fn normalize_base(base: &str) -> String {
    let trimmed = base.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}
