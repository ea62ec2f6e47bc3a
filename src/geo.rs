use std::collections::HashMap;

/// Photo locations keyed by capture timestamp (unix seconds).
pub type GeoTable = HashMap<i64, GeoPoint>;

/// A validated location in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Returns `None` unless latitude is in [-90, 90] and longitude in [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        (lat_ok && lon_ok).then_some(Self { latitude, longitude })
    }

    /// `"<lat>,<lon>"` as plain decimal degrees, always with a fractional part.
    pub fn location(&self) -> String {
        format!("{},{}", degrees(self.latitude), degrees(self.longitude))
    }
}

/// f64 Display never uses exponent notation; whole values get a `.0`.
fn degrees(value: f64) -> String {
    let s = value.to_string();
    if s.contains('.') {
        s
    } else {
        format!("{}.0", s)
    }
}

/// One photo's location at its place in the capture order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoRecord {
    pub timestamp: i64,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoRecord {
    pub fn new(timestamp: i64, point: GeoPoint) -> Self {
        Self {
            timestamp,
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
