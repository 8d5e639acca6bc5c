//! HTTP transport for SOAP calls.

use std::time::Duration;

use async_trait::async_trait;
use itemsync_core::ServiceDescriptor;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

/// Longest response excerpt kept in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Transport-level failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("service answered HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Start of the response body.
        body: String,
    },
}

/// Performs one SOAP call and returns the raw response body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SoapTransport: Send + Sync {
    /// POSTs the descriptor's payload to its endpoint.
    async fn call(&self, service: &ServiceDescriptor) -> Result<String, TransportError>;
}

/// `reqwest` based transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport whose calls time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SoapTransport for HttpTransport {
    async fn call(&self, service: &ServiceDescriptor) -> Result<String, TransportError> {
        let response = self
            .client
            .post(&service.endpoint)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", &service.soap_action)
            .body(service.payload.clone())
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(TransportError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            })
        }
    }
}
