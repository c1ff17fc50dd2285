/// Report assembly for the storm monitoring service.
///
/// Pure transformation from parsed storms + configuration + an injected
/// run timestamp to the JSON-shaped report consumed downstream. All
/// filtering rules live here:
///
///   - a storm qualifies iff its maximum wind reaches the threshold;
///   - targeted mode (locations configured) additionally requires at
///     least one location inside the alert radius, and attaches only
///     the qualifying location entries;
///   - global mode (no locations) reports every storm past the wind
///     threshold with an empty locations list.
///
/// No I/O happens here; `output` owns the file and webhook sinks.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::alert::severity;
use crate::analysis::proximity;
use crate::config::MonitorConfig;
use crate::logging::{DataSource, Logger};
use crate::model::{knots_to_kmh, ProximityResult, Storm};

/// The `name` field of every emitted report.
pub const SERVICE_NAME: &str = "stormwatch_service";

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StormReport {
    pub name: String,
    /// RFC 3339 run timestamp (the only field that differs between two
    /// runs over identical feed and config).
    pub timestamp: String,
    /// "ok" | "error"
    pub status: String,
    pub message: String,
    pub locations_monitored: Vec<String>,
    pub alert_radius_km: f64,
    pub storms: Vec<ReportedStorm>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportedStorm {
    pub name: String,
    pub wind_kt: u32,
    pub wind_kmh: u32,
    pub category_description: String,
    pub locations: Vec<AffectedLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AffectedLocation {
    pub location: String,
    /// Closest-approach time in Atlantic Standard Time, the timezone of
    /// the monitored islands: "%Y-%m-%d %H:%M AST".
    pub closest_time: String,
    /// Rounded to the nearest whole kilometre.
    pub distance_km: u32,
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Builds the success report. The clock is injected so identical inputs
/// reproduce identical reports in tests.
pub fn build_report(
    storms: &[Storm],
    config: &MonitorConfig,
    timestamp: DateTime<Utc>,
    logger: &Logger,
) -> StormReport {
    let mut reported = Vec::new();

    for storm in storms {
        let max_wind_kt = storm.max_wind_kt();
        if max_wind_kt < config.wind_threshold_kt {
            logger.debug(
                DataSource::Report,
                Some(&storm.name),
                &format!(
                    "{} kt is below the {} kt threshold, excluded",
                    max_wind_kt, config.wind_threshold_kt
                ),
            );
            continue;
        }

        let mut affected = Vec::new();
        if !config.locations.is_empty() {
            for location in &config.locations {
                let Some(result) = proximity::closest_approach(storm, location) else {
                    continue;
                };
                if result.distance_km <= config.alert_radius_km {
                    affected.push(affected_entry(&result));
                }
            }
            if affected.is_empty() {
                logger.debug(
                    DataSource::Report,
                    Some(&storm.name),
                    &format!(
                        "outside the {} km radius of every monitored location, excluded",
                        config.alert_radius_km
                    ),
                );
                continue;
            }
        }

        reported.push(ReportedStorm {
            name: storm.name.clone(),
            wind_kt: max_wind_kt,
            wind_kmh: knots_to_kmh(max_wind_kt),
            category_description: severity::classify(max_wind_kt).text(),
            locations: affected,
        });
    }

    let message = format!("{} active dangerous storm(s) found.", reported.len());
    logger.info(DataSource::Report, None, &message);

    StormReport {
        name: SERVICE_NAME.to_string(),
        timestamp: timestamp.to_rfc3339(),
        status: "ok".to_string(),
        message,
        locations_monitored: config.location_names(),
        alert_radius_km: config.alert_radius_km,
        storms: reported,
    }
}

/// The fatal-feed counterpart: no storms, error status. The output
/// layer refuses to overwrite the previous good file with this.
pub fn error_report(config: &MonitorConfig, timestamp: DateTime<Utc>) -> StormReport {
    StormReport {
        name: SERVICE_NAME.to_string(),
        timestamp: timestamp.to_rfc3339(),
        status: "error".to_string(),
        message: "Failed to fetch or parse active storm data.".to_string(),
        locations_monitored: config.location_names(),
        alert_radius_km: config.alert_radius_km,
        storms: Vec::new(),
    }
}

fn affected_entry(result: &ProximityResult) -> AffectedLocation {
    AffectedLocation {
        location: result.location.clone(),
        closest_time: format_closest_time(result.closest.time),
        distance_km: result.distance_km.round() as u32,
    }
}

/// AST is UTC-4 year-round (no daylight saving).
fn format_closest_time(time: DateTime<Utc>) -> String {
    let ast = FixedOffset::west_opt(4 * 3600).unwrap();
    time.with_timezone(&ast).format("%Y-%m-%d %H:%M AST").to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
