/// Monitoring configuration, loaded from a JSON file and validated once
/// at startup, before the feed is fetched.
///
/// The file holds the alert radius, the wind threshold, the monitored
/// locations as a `name -> [lat, lon]` map, and an optional webhook URL:
///
/// ```json
/// {
///   "alert_radius_km": 150,
///   "wind_threshold_kt": 60,
///   "locations": { "St. Barths": [17.9, -62.83] },
///   "webhook_url": "https://example.net/storm-hook"
/// }
/// ```
///
/// An empty (or absent) `locations` map selects global mode: storms are
/// reported purely by wind threshold, with no distance filter.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;

use crate::model::{Location, MonitorError};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_CONFIG_PATH: &str = "stormwatch.config";
pub const DEFAULT_ALERT_RADIUS_KM: f64 = 150.0;
pub const DEFAULT_WIND_THRESHOLD_KT: u32 = 60;

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Raw file shape. A `BTreeMap` keyed by location name keeps the
/// monitored list in a deterministic (name-sorted) order, so identical
/// config and feed produce byte-identical reports apart from the run
/// timestamp.
#[derive(Debug, Deserialize)]
struct RawConfig {
    alert_radius_km: Option<f64>,
    wind_threshold_kt: Option<u32>,
    locations: Option<BTreeMap<String, [f64; 2]>>,
    webhook_url: Option<String>,
}

/// Validated configuration handed to the rest of the service.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub alert_radius_km: f64,
    pub wind_threshold_kt: u32,
    /// Name-sorted. Empty selects global mode.
    pub locations: Vec<Location>,
    /// Consumed by the output layer only.
    pub webhook_url: Option<String>,
}

impl MonitorConfig {
    pub fn location_names(&self) -> Vec<String> {
        self.locations.iter().map(|l| l.name.clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

/// Reads and validates the config file. Every failure (unreadable file,
/// malformed JSON, type mismatch, out-of-range value) maps to
/// `MonitorError::Config` so the run aborts before any network access.
pub fn load_config(path: &str) -> Result<MonitorConfig, MonitorError> {
    let text = fs::read_to_string(path)
        .map_err(|e| MonitorError::Config(format!("cannot read '{}': {}", path, e)))?;
    parse_config(&text)
}

/// Pure parse + validate, split out from file access for testability.
pub fn parse_config(text: &str) -> Result<MonitorConfig, MonitorError> {
    let raw: RawConfig = serde_json::from_str(text)
        .map_err(|e| MonitorError::Config(format!("malformed config JSON: {}", e)))?;

    let alert_radius_km = raw.alert_radius_km.unwrap_or(DEFAULT_ALERT_RADIUS_KM);
    if !alert_radius_km.is_finite() || alert_radius_km <= 0.0 {
        return Err(MonitorError::Config(format!(
            "alert_radius_km must be a finite number > 0, got {}",
            alert_radius_km
        )));
    }

    let wind_threshold_kt = raw.wind_threshold_kt.unwrap_or(DEFAULT_WIND_THRESHOLD_KT);

    let mut locations = Vec::new();
    for (name, [lat, lon]) in raw.locations.unwrap_or_default() {
        let name = name.trim();
        if name.is_empty() {
            return Err(MonitorError::Config(
                "location with empty name in 'locations'".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(MonitorError::Config(format!(
                "location '{}': latitude {} outside -90..90",
                name, lat
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(MonitorError::Config(format!(
                "location '{}': longitude {} outside -180..180",
                name, lon
            )));
        }
        locations.push(Location {
            name: name.to_string(),
            latitude: lat,
            longitude: lon,
        });
    }

    Ok(MonitorConfig {
        alert_radius_km,
        wind_threshold_kt,
        locations,
        webhook_url: raw.webhook_url,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
