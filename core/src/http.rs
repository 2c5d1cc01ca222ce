//! HTTP request/response values and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. `AddressClient` builds an
//! `HttpRequest` and parses an `HttpResponse` without touching the network;
//! a `Transport` sits between the two and performs the single GET. Hosts
//! that already own an HTTP stack implement `Transport` themselves (or call
//! `build_request` / `parse_response` directly), the rest use
//! `UreqTransport`.
//!
//! Every request to the address service is a GET, so there is no method
//! field.

use crate::error::TransportError;

/// A GET request described as plain data.
///
/// `query` keeps insertion order so the serialized query string is stable.
/// Values are not percent-encoded here; that is the transport's job.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    /// Value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Query parameter names in order.
    pub fn query_keys(&self) -> Vec<&str> {
        self.query.iter().map(|(k, _)| k.as_str()).collect()
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one `HttpRequest`.
///
/// Non-2xx statuses should come back as `Ok(HttpResponse)`; `Err` is for
/// failures where no response exists at all (DNS, refused connection,
/// timeout).
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}
