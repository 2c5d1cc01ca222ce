//! Synchronous client for the Geonorge AdresseWS address lookup service.
//!
//! # Overview
//! Three searches (free text, radius, bounding box) go through one request
//! builder and one response parser. Each search is a single GET; the JSON
//! envelope's status flag and hit count are mapped to records or to a
//! typed `AddressError`.
//!
//! # Design
//! - `AddressClient` is stateless; it holds only `base_url`.
//! - `build_request` / `parse_response` are pure, so hosts with their own
//!   HTTP stack can drive them directly.
//! - `Transport` is the I/O seam. `UreqTransport` (feature `ureq`, on by
//!   default) is the bundled blocking implementation.
//! - Address records are opaque JSON; the client never reshapes them.
//!
//! ```no_run
//! use adresse_core::{AddressClient, Pagination, UreqTransport};
//!
//! let client = AddressClient::default();
//! let transport = UreqTransport::default();
//! let hits = client.search_by_text(&transport, "Storgata 1", Pagination::default())?;
//! for address in hits {
//!     println!("{:?}", address.get_str("adressenavn"));
//! }
//! # Ok::<(), adresse_core::AddressError>(())
//! ```

pub mod client;
pub mod error;
pub mod http;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;

pub use client::{AddressClient, DEFAULT_BASE_URL};
pub use error::{AddressError, ServiceErrorOrigin, TransportError};
pub use http::{HttpRequest, HttpResponse, Transport};
#[cfg(feature = "ureq")]
pub use transport::{TransportConfig, UreqTransport};
pub use types::{Address, BoundingBox, Pagination, Query};
