//! Blocking `Transport` backed by ureq.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Timeout and debug settings for `UreqTransport`.
///
/// `timeout: None` keeps ureq's defaults.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    pub timeout: Option<Duration>,
    pub debug: bool,
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Log every request and response body at debug level.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Executes requests with a shared `ureq::Agent`.
///
/// The agent is `Send + Sync`, so one transport can serve concurrent
/// searches from several threads.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    debug: bool,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(config: TransportConfig) -> Self {
        // Status codes are interpreted by the client, not by ureq.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .build()
            .new_agent();
        Self {
            agent,
            debug: config.debug,
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        if self.debug {
            debug!(url = %request.path, query = ?request.query, "GET");
        }

        let mut builder = self.agent.get(&request.path);
        for (key, value) in &request.query {
            builder = builder.query(key, value);
        }

        let mut response = builder
            .call()
            .map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::new(e.to_string()))?;

        if self.debug {
            debug!(status, body = %body, "response");
        }

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builders_set_fields() {
        let config = TransportConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_debug(true);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert!(config.debug);
    }

    #[test]
    fn default_config_has_no_timeout_and_no_debug() {
        let config = TransportConfig::default();
        assert!(config.timeout.is_none());
        assert!(!config.debug);
    }

    #[test]
    fn connection_refused_is_a_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = UreqTransport::new(
            TransportConfig::default().with_timeout(Duration::from_secs(2)),
        );
        let request = HttpRequest {
            path: format!("http://{addr}/AdresseWS/adresse/sok"),
            query: vec![("sokestreng".to_string(), "oslo".to_string())],
        };
        let err = transport.execute(&request).unwrap_err();
        assert!(!err.0.is_empty());
    }
}
