//! Executing `HttpRequest`s.
//!
//! # Design
//! [`Transport`] is the only seam between the storefront and the network.
//! [`HttpTransport`] runs a blocking `ureq` agent on tokio's blocking pool so
//! the caller only suspends its own future. HTTP status codes are returned as
//! data; interpreting them is the protocol clients' job.
//!
//! Process-wide instances, one per distinct timeout, are available through
//! [`shared_transport_with_timeout`]. They are handed to the orchestrator
//! explicitly, never looked up from inside it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::config::DEFAULT_REQUEST_TIMEOUT_MS;
use crate::error::RemoteError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one request and returns one response. Implementations must not
/// retry, batch or deduplicate.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, RemoteError>;
}

static SHARED: Lazy<Mutex<HashMap<Duration, Arc<HttpTransport>>>> = Lazy::new(Default::default);

/// The shared transport with the default request timeout.
pub fn shared_transport() -> Arc<dyn Transport> {
    shared_transport_with_timeout(Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS))
}

/// The lazily-created transport shared by every storefront in the process
/// that uses `timeout`.
pub fn shared_transport_with_timeout(timeout: Duration) -> Arc<dyn Transport> {
    let transport = SHARED
        .lock()
        .entry(timeout)
        .or_insert_with(|| Arc::new(HttpTransport::new(timeout)))
        .clone();
    transport
}

/// `ureq`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        // Status codes are data here, so 4xx/5xx must not become `Err`.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent, timeout }
    }

    /// Upper bound on one whole request, connect through body.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(skip(self, request), fields(method = request.method.as_str(), path = %request.path))]
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, RemoteError> {
        let agent = self.agent.clone();
        let response = tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        tracing::debug!(status = response.status, "response received");
        Ok(response)
    }
}

fn execute_blocking(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, ureq::Error> {
    let HttpRequest {
        method,
        path,
        headers,
        body,
    } = request;

    let mut response = match method {
        HttpMethod::Get => with_headers(agent.get(&path), &headers).call(),
        HttpMethod::Delete => with_headers(agent.delete(&path), &headers).call(),
        HttpMethod::Post => {
            let builder = with_headers(agent.post(&path), &headers);
            match body {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    }?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response.body_mut().read_to_string()?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_transport_is_a_singleton() {
        let a = shared_transport();
        let b = shared_transport();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn shared_transports_are_keyed_by_timeout() {
        let short = shared_transport_with_timeout(Duration::from_millis(300));
        let again = shared_transport_with_timeout(Duration::from_millis(300));
        let default = shared_transport();
        assert!(Arc::ptr_eq(&short, &again));
        assert!(!Arc::ptr_eq(&short, &default));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(Duration::from_secs(2));
        let err = transport
            .execute(HttpRequest::get(format!("http://{addr}/api/authors")))
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Transport(_)));
    }
}
