//! Query and result types for the address service.
//!
//! # Design
//! `Query` is the typed form of the three searches. Each variant knows its
//! remote endpoint and its parameter keys, so `AddressClient` has a single
//! request path. `Address` is deliberately opaque: the record shape belongs
//! to the remote API and is passed through untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PAGE: u32 = 0;
pub const DEFAULT_PER_PAGE: u32 = 10;
pub const DEFAULT_RADIUS: f64 = 1.0;

/// Page index (`side`) and page size (`antPerSide`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Lower-left and upper-right corners of a search box.
///
/// Corner ordering is not checked locally; the service decides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub north_lower: f64,
    pub east_lower: f64,
    pub north_upper: f64,
    pub east_upper: f64,
}

impl BoundingBox {
    pub fn new(north_lower: f64, east_lower: f64, north_upper: f64, east_upper: f64) -> Self {
        Self {
            north_lower,
            east_lower,
            north_upper,
            east_upper,
        }
    }
}

/// One search against the address service.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Text {
        text: String,
        pagination: Pagination,
    },
    Radius {
        north: f64,
        east: f64,
        radius: f64,
        pagination: Pagination,
    },
    BoundingBox {
        bbox: BoundingBox,
        pagination: Pagination,
    },
}

impl Query {
    /// Free-text search with default pagination.
    pub fn text(text: impl Into<String>) -> Self {
        Query::Text {
            text: text.into(),
            pagination: Pagination::default(),
        }
    }

    /// Radius search around a point with the default radius and pagination.
    pub fn radius(north: f64, east: f64) -> Self {
        Query::Radius {
            north,
            east,
            radius: DEFAULT_RADIUS,
            pagination: Pagination::default(),
        }
    }

    pub fn bounding_box(bbox: BoundingBox) -> Self {
        Query::BoundingBox {
            bbox,
            pagination: Pagination::default(),
        }
    }

    /// Replace the radius. No effect on other variants.
    pub fn with_radius(mut self, value: f64) -> Self {
        if let Query::Radius { radius, .. } = &mut self {
            *radius = value;
        }
        self
    }

    pub fn with_pagination(mut self, value: Pagination) -> Self {
        match &mut self {
            Query::Text { pagination, .. }
            | Query::Radius { pagination, .. }
            | Query::BoundingBox { pagination, .. } => *pagination = value,
        }
        self
    }

    pub fn pagination(&self) -> Pagination {
        match self {
            Query::Text { pagination, .. }
            | Query::Radius { pagination, .. }
            | Query::BoundingBox { pagination, .. } => *pagination,
        }
    }

    /// Remote route name. Radius and bounding-box searches share `radius`
    /// and differ only in their parameter keys.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Query::Text { .. } => "sok",
            Query::Radius { .. } | Query::BoundingBox { .. } => "radius",
        }
    }
}

/// An address record as returned by the service.
///
/// The wrapped JSON is exactly what the service sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(Value);

impl Address {
    pub fn new(value: Value) -> Self {
        Address(value)
    }

    /// Top-level field by name, e.g. `"adressenavn"` or `"postnr"`.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Top-level string field, if present and a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Address {
    fn from(value: Value) -> Self {
        Address(value)
    }
}
