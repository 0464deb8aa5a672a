//! Reqwest-based stream transport.
//!
//! Production implementation of [`StreamTransport`]: POSTs the query as
//! JSON and hands back the response body as a byte stream.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::error::{classify_reqwest_error, ChatResult, TransportError};
use crate::models::QueryRequest;
use crate::traits::{ByteStream, StreamTransport};

/// Stream transport using reqwest.
///
/// # Example
///
/// ```ignore
/// use chatstream::adapters::HttpTransport;
/// use chatstream::config::ClientConfig;
///
/// let transport = HttpTransport::new(&ClientConfig::from_env()?)?;
/// println!("Streaming from {}", transport.endpoint());
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Build a transport from validated configuration.
    pub fn new(config: &ClientConfig) -> ChatResult<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.stream_url(),
        })
    }

    /// Create a transport around an existing reqwest::Client.
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Full URL queries are POSTed to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl StreamTransport for HttpTransport {
    async fn open(&self, request: &QueryRequest) -> Result<ByteStream, TransportError> {
        debug!(
            "POST {} (session: {})",
            self.endpoint,
            request.session_id.as_deref().unwrap_or("unset")
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "text/event-stream")
            .json(request)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e, &self.endpoint))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            error!("Stream request failed with HTTP {}: {}", status, message);
            return Err(TransportError::HttpStatus { status, message });
        }

        let body = response.bytes_stream().map(|chunk| {
            chunk.map_err(|e| TransportError::Body {
                message: e.to_string(),
            })
        });

        Ok(Box::pin(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_configured_endpoint() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9000/")
            .with_stream_path("/api/query/stream");
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.endpoint(), "http://127.0.0.1:9000/api/query/stream");
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let config = ClientConfig::default().with_base_url("not a url");
        assert!(HttpTransport::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_open_against_closed_port_fails() {
        let transport = HttpTransport::with_client(
            reqwest::Client::new(),
            "http://127.0.0.1:1/api/query/stream",
        );
        let request = QueryRequest::new("test", None);
        let result = transport.open(&request).await;
        assert!(result.is_err());
    }
}
