//! Stateless request builder and response parser for the address service.
//!
//! # Design
//! `AddressClient` holds only a `base_url`. `build_request` turns a `Query`
//! into an `HttpRequest`; `parse_response` turns an `HttpResponse` into
//! records or an error. The `search*` methods run one through a `Transport`
//! and feed the result to the other, so all three searches share a single
//! request and parse path.

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::AddressError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{Address, BoundingBox, Pagination, Query};

pub const DEFAULT_BASE_URL: &str = "http://ws.geonorge.no/AdresseWS/adresse";

/// Wire envelope. Only `sokStatus` is required for parsing to succeed;
/// the hit count is checked after the status flag.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "sokStatus")]
    status: SearchStatus,
    #[serde(rename = "totaltAntallTreff")]
    total_hits: Option<i64>,
    #[serde(rename = "adresser")]
    addresses: Option<Vec<Address>>,
}

#[derive(Debug, Deserialize)]
struct SearchStatus {
    ok: bool,
    #[serde(rename = "melding")]
    message: Option<String>,
}

/// Synchronous, stateless client for the address service.
#[derive(Debug, Clone)]
pub struct AddressClient {
    base_url: String,
}

impl Default for AddressClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl AddressClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validate `query` and describe it as a GET request.
    ///
    /// Fails with `InvalidArgument` for blank search text or non-finite
    /// coordinates. Nothing else is checked locally.
    pub fn build_request(&self, query: &Query) -> Result<HttpRequest, AddressError> {
        let mut params: Vec<(String, String)> = match query {
            Query::Text { text, .. } => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(AddressError::InvalidArgument(
                        "search text must not be empty".to_string(),
                    ));
                }
                vec![param("sokestreng", text.to_string())]
            }
            Query::Radius {
                north,
                east,
                radius,
                ..
            } => vec![
                param("nord", decimal("nord", *north)?),
                param("aust", decimal("aust", *east)?),
                param("radius", decimal("radius", *radius)?),
            ],
            Query::BoundingBox { bbox, .. } => vec![
                param("nordLL", decimal("nordLL", bbox.north_lower)?),
                param("austLL", decimal("austLL", bbox.east_lower)?),
                param("nordUR", decimal("nordUR", bbox.north_upper)?),
                param("austUR", decimal("austUR", bbox.east_upper)?),
            ],
        };

        let pagination = query.pagination();
        params.push(param("side", pagination.page.to_string()));
        params.push(param("antPerSide", pagination.per_page.to_string()));

        Ok(HttpRequest {
            path: format!("{}/{}", self.base_url, query.endpoint()),
            query: params,
        })
    }

    /// Interpret a service response.
    ///
    /// Order matters: HTTP status, then JSON shape, then `sokStatus.ok`,
    /// then the hit count. Zero hits is an empty `Vec`, not an error.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Vec<Address>, AddressError> {
        if !response.is_success() {
            return Err(AddressError::transport(format!(
                "HTTP {}: {}",
                response.status, response.body
            )));
        }

        let envelope: Envelope = serde_json::from_str(&response.body).map_err(|e| {
            let detail = e.to_string();
            if detail.is_empty() {
                AddressError::invalid_response(format!("invalid JSON: {}", response.body))
            } else {
                AddressError::invalid_response(format!("invalid JSON: {detail}"))
            }
        })?;

        if !envelope.status.ok {
            return Err(AddressError::remote(
                envelope.status.message.unwrap_or_default(),
            ));
        }

        match envelope.total_hits {
            None => Err(AddressError::invalid_response(
                "malformed response: missing totaltAntallTreff",
            )),
            // `adresser` is only sent when there are hits.
            Some(hits) if hits > 0 => Ok(envelope.addresses.unwrap_or_default()),
            Some(_) => Ok(Vec::new()),
        }
    }

    /// Run `query` through `transport` and return every record on the
    /// requested page.
    #[instrument(skip(self, transport), fields(endpoint = query.endpoint()))]
    pub fn search<T>(&self, transport: &T, query: &Query) -> Result<Vec<Address>, AddressError>
    where
        T: Transport + ?Sized,
    {
        let request = self.build_request(query)?;
        debug!(url = %request.path, "sending address search");

        let response = transport.execute(&request).map_err(|e| {
            warn!(error = %e, "transport failure");
            AddressError::from(e)
        })?;
        debug!(status = response.status, "received response");

        let addresses = self.parse_response(response).inspect_err(|e| {
            warn!(error = %e, "address search failed");
        })?;
        debug!(hits = addresses.len(), "address search completed");
        Ok(addresses)
    }

    /// Free-text search (`sok` endpoint). `text` is trimmed first.
    pub fn search_by_text<T>(
        &self,
        transport: &T,
        text: &str,
        pagination: Pagination,
    ) -> Result<Vec<Address>, AddressError>
    where
        T: Transport + ?Sized,
    {
        self.search(transport, &Query::text(text).with_pagination(pagination))
    }

    /// Addresses within `radius` of (`north`, `east`).
    pub fn search_by_radius<T>(
        &self,
        transport: &T,
        north: f64,
        east: f64,
        radius: f64,
        pagination: Pagination,
    ) -> Result<Vec<Address>, AddressError>
    where
        T: Transport + ?Sized,
    {
        let query = Query::radius(north, east)
            .with_radius(radius)
            .with_pagination(pagination);
        self.search(transport, &query)
    }

    /// Addresses inside `bbox`. Shares the `radius` endpoint.
    pub fn search_by_bounding_box<T>(
        &self,
        transport: &T,
        bbox: BoundingBox,
        pagination: Pagination,
    ) -> Result<Vec<Address>, AddressError>
    where
        T: Transport + ?Sized,
    {
        let query = Query::bounding_box(bbox).with_pagination(pagination);
        self.search(transport, &query)
    }
}

fn param(key: &str, value: String) -> (String, String) {
    (key.to_string(), value)
}

/// Decimal form of a coordinate. `f64`'s `Display` never uses exponent
/// notation, but NaN and infinities have no decimal form at all.
fn decimal(name: &str, value: f64) -> Result<String, AddressError> {
    if !value.is_finite() {
        return Err(AddressError::InvalidArgument(format!(
            "{name} must be a finite number, got {value}"
        )));
    }
    Ok(value.to_string())
}
