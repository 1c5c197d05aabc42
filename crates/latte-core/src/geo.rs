//! Great-circle distance and viewport geometry.
//!
//! The map asks the backend for shops within a radius of the viewport center.
//! That radius scales with the visible area: half the viewport diagonal,
//! clamped so neither a street-level zoom nor a whole-globe view produces a
//! degenerate request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const MIN_RADIUS_KM: f64 = 10.0;
pub const MAX_RADIUS_KM: f64 = 1000.0;
/// Radius used before the map has reported bounds at least once.
pub const DEFAULT_RADIUS_KM: f64 = MIN_RADIUS_KM;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Visible map rectangle, as reported by the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    #[must_use]
    pub const fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    #[must_use]
    pub fn center(&self) -> LatLng {
        LatLng {
            lat: (self.south_west.lat + self.north_east.lat) / 2.0,
            lng: (self.south_west.lng + self.north_east.lng) / 2.0,
        }
    }

    #[must_use]
    pub fn to_bbox(&self) -> BoundingBox {
        BoundingBox {
            south: self.south_west.lat,
            west: self.south_west.lng,
            north: self.north_east.lat,
            east: self.north_east.lng,
        }
    }
}

/// `[south, west, north, east]` envelope, the order Overpass expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn to_bounds(&self) -> Bounds {
        Bounds {
            south_west: LatLng::new(self.south, self.west),
            north_east: LatLng::new(self.north, self.east),
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

impl FromStr for BoundingBox {
    type Err = CoreError;

    /// Parses `"south,west,north,east"`. Exactly four finite numbers are required.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| CoreError::InvalidBbox {
            input: s.to_owned(),
            reason,
        };

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(invalid(format!(
                "expected 4 comma-separated numbers, got {}",
                parts.len()
            )));
        }

        let mut values = [0.0_f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            let value = part
                .parse::<f64>()
                .map_err(|e| invalid(format!("\"{part}\": {e}")))?;
            if !value.is_finite() {
                return Err(invalid(format!("\"{part}\" is not a finite number")));
            }
            *slot = value;
        }

        let [south, west, north, east] = values;
        Ok(Self {
            south,
            west,
            north,
            east,
        })
    }
}

/// Haversine distance in kilometers between two lat/lng points.
#[must_use]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Half the south-west to north-east diagonal, clamped to
/// [`MIN_RADIUS_KM`, `MAX_RADIUS_KM`].
#[must_use]
pub fn dynamic_radius_km(bounds: &Bounds) -> f64 {
    let diagonal = distance_km(
        bounds.south_west.lat,
        bounds.south_west.lng,
        bounds.north_east.lat,
        bounds.north_east.lng,
    );
    (diagonal / 2.0).clamp(MIN_RADIUS_KM, MAX_RADIUS_KM)
}

/// Search radius for an optional viewport; [`DEFAULT_RADIUS_KM`] without bounds.
#[must_use]
pub fn radius_for(bounds: Option<&Bounds>) -> f64 {
    bounds.map_or(DEFAULT_RADIUS_KM, dynamic_radius_km)
}
