//! Proximity filter for "nearby" queries.
//!
//! Entertainment and disaster content is always returned. Community content
//! is returned only when it lies inside a square of `±AROUND` degrees around
//! the caller. The square is measured in degrees, not metres, so its ground
//! size shrinks in longitude towards the poles. It is an approximation, not a
//! geodesic radius.

use crate::error::{AppError, Result};
use crate::models::{Category, ContentRecord, Coordinate};
use validator::Validate;

/// Half-width of the search square in degrees
pub const AROUND: f64 = 0.01;

/// Slack added to every edge so a point exactly `AROUND` away stays inside
/// despite decimal coordinates not being exact in binary floating point.
const EDGE_TOLERANCE: f64 = 1e-9;

/// Inclusive latitude/longitude bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn around(center: Coordinate, delta: f64) -> Self {
        let reach = delta + EDGE_TOLERANCE;
        Self {
            min_lat: center.lat - reach,
            max_lat: center.lat + reach,
            min_lng: center.lng - reach,
            max_lng: center.lng + reach,
        }
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }
}

/// A parsed proximity request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityQuery {
    area: Option<BoundingBox>,
}

impl ProximityQuery {
    /// Query centred on `center`.
    pub fn near(center: Coordinate) -> Self {
        Self {
            area: Some(BoundingBox::around(center, AROUND)),
        }
    }

    /// Query without a position: only the unconditional categories match.
    pub fn anywhere() -> Self {
        Self { area: None }
    }

    /// Decode an optional request body. A missing or blank body means no
    /// position; anything else must be a valid coordinate.
    pub fn from_body(body: Option<&[u8]>) -> Result<Self> {
        let body = match body {
            Some(bytes) if !bytes.iter().all(u8::is_ascii_whitespace) => bytes,
            _ => return Ok(Self::anywhere()),
        };

        let center: Coordinate = serde_json::from_slice(body)
            .map_err(|e| AppError::Validation(format!("invalid coordinate: {}", e)))?;
        center.validate()?;
        Ok(Self::near(center))
    }

    pub fn area(&self) -> Option<BoundingBox> {
        self.area
    }

    pub fn matches(&self, record: &ContentRecord) -> bool {
        if record.category.is_unconditional() {
            return true;
        }
        match (record.category, self.area) {
            (Category::Community, Some(area)) => area.contains(record.coordinate),
            _ => false,
        }
    }
}
