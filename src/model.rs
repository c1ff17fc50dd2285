/// Storm, ForecastPoint, Location, ProximityResult, MonitorError
/// core data structures and error handling
///
/// Core data types for the tropical storm monitoring service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond unit conversion, no I/O, and no parsing;
/// entities are built by `ingest::nhc` and consumed read-only everywhere else.

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Unit conversion
// ---------------------------------------------------------------------------

/// Knots to km/h, rounded to the nearest whole unit (1 kt = 1.852 km/h).
pub fn knots_to_kmh(knots: u32) -> u32 {
    (knots as f64 * 1.852).round() as u32
}

// ---------------------------------------------------------------------------
// Forecast track types
// ---------------------------------------------------------------------------

/// A single predicted position on a storm's forecast track.
///
/// The NHC feed carries one sustained-wind value per storm entry; the
/// parser stamps it onto every point, so `wind_kt` is uniform within a
/// track today but the model is ready for per-point intensities.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub time: DateTime<Utc>,
    /// WGS84 latitude, decimal degrees, -90..90.
    pub latitude: f64,
    /// WGS84 longitude, decimal degrees, -180..180.
    pub longitude: f64,
    /// Maximum sustained wind at this point, in knots.
    pub wind_kt: u32,
}

/// One active tropical system from the feed.
///
/// `track` preserves the feed's native ordering (earliest to latest) and
/// contains no duplicate timestamps — both enforced by the tolerant
/// parser. A storm with zero valid forecast points is dropped before it
/// reaches analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Storm {
    /// Advisory name, e.g. "Hurricane Tammy". Not unique across runs.
    pub name: String,
    pub track: Vec<ForecastPoint>,
}

impl Storm {
    /// Maximum sustained wind across the whole forecast track, in knots.
    pub fn max_wind_kt(&self) -> u32 {
        self.track.iter().map(|p| p.wind_kt).max().unwrap_or(0)
    }
}

/// A monitored geographic point from the configuration.
/// Names are unique within a run (config map keys).
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Closest approach of one storm's sampled track to one location.
///
/// Produced by `analysis::proximity::closest_approach`. `distance_km`
/// is never negative; `closest` is the forecast point achieving the
/// minimum (the earliest such point on a tie), whose timestamp the
/// report exposes as `closest_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityResult {
    pub location: String,
    pub distance_km: f64,
    pub closest: ForecastPoint,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Fatal errors for a monitoring run.
///
/// Partial problems (one malformed storm entry or forecast point) are
/// never errors: the parser logs a warning, skips the entry, and keeps
/// going. These variants all short-circuit the run instead.
#[derive(Debug, PartialEq)]
pub enum MonitorError {
    /// Network/timeout/DNS failure or non-2xx response retrieving the feed.
    /// The core is not invoked; the previous output is left untouched.
    Fetch(String),
    /// The feed bytes cannot be structurally opened: corrupt container,
    /// no .kml member, or unparseable markup.
    FeedParse(String),
    /// Invalid or missing required configuration fields, surfaced before
    /// the feed is fetched.
    Config(String),
}

impl std::fmt::Display for MonitorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorError::Fetch(msg) => write!(f, "Feed fetch failed: {}", msg),
            MonitorError::FeedParse(msg) => write!(f, "Feed parse failed: {}", msg),
            MonitorError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for MonitorError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
