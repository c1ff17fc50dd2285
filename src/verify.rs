//! Feed & Configuration Verification Module
//!
//! Framework for testing a configuration against the live NHC feed:
//! is the feed reachable, does its container open, does its markup
//! parse, and where do the monitored locations stand relative to the
//! currently active storms.
//!
//! Run this (via `--verify`) before wiring the service into a scheduler.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;

use crate::analysis::proximity;
use crate::config::MonitorConfig;
use crate::ingest::nhc;
use crate::logging::Logger;
use crate::model::{Location, Storm};

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub feed: FeedVerification,
    pub location_results: Vec<LocationVerification>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedVerification {
    pub url: String,
    pub status: VerificationStatus,
    pub kmz_bytes: usize,
    pub kml_bytes: usize,
    pub storms_parsed: usize,
    pub storm_names: Vec<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationVerification {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: VerificationStatus,
    /// Closest active storm by sampled-track distance, if any are active.
    pub nearest_storm: Option<String>,
    pub nearest_distance_km: Option<u32>,
    pub inside_alert_radius: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub feed_ok: bool,
    pub storms_active: usize,
    pub locations_total: usize,
    pub locations_threatened: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum VerificationStatus {
    Success,
    PartialSuccess,
    Failed,
}

// ============================================================================
// Feed Verification
// ============================================================================

/// Fetches and parses the live feed, reporting how far the pipeline got.
/// Returns the parsed storms alongside so location checks can reuse them.
pub fn verify_feed(client: &reqwest::blocking::Client, logger: &Logger) -> (FeedVerification, Vec<Storm>) {
    let mut result = FeedVerification {
        url: nhc::NHC_KMZ_URL.to_string(),
        status: VerificationStatus::Failed,
        kmz_bytes: 0,
        kml_bytes: 0,
        storms_parsed: 0,
        storm_names: Vec::new(),
        error_message: None,
    };

    let kmz = match nhc::fetch_feed(client) {
        Ok(bytes) => bytes,
        Err(e) => {
            result.error_message = Some(e.to_string());
            return (result, Vec::new());
        }
    };
    result.kmz_bytes = kmz.len();

    let kml = match nhc::extract_kml(&kmz) {
        Ok(bytes) => bytes,
        Err(e) => {
            result.error_message = Some(e.to_string());
            return (result, Vec::new());
        }
    };
    result.kml_bytes = kml.len();

    match nhc::parse_feed(&kml, logger) {
        Ok(storms) => {
            result.storms_parsed = storms.len();
            result.storm_names = storms.iter().map(|s| s.name.clone()).collect();
            // An empty basin is a healthy feed with nothing to report.
            result.status = if storms.is_empty() {
                VerificationStatus::PartialSuccess
            } else {
                VerificationStatus::Success
            };
            (result, storms)
        }
        Err(e) => {
            result.error_message = Some(e.to_string());
            (result, Vec::new())
        }
    }
}

// ============================================================================
// Location Verification
// ============================================================================

/// Measures one monitored location against the active storms.
pub fn verify_location(
    location: &Location,
    storms: &[Storm],
    alert_radius_km: f64,
) -> LocationVerification {
    let mut result = LocationVerification {
        name: location.name.clone(),
        latitude: location.latitude,
        longitude: location.longitude,
        status: VerificationStatus::PartialSuccess,
        nearest_storm: None,
        nearest_distance_km: None,
        inside_alert_radius: false,
    };

    let mut best: Option<(f64, String)> = None;
    for storm in storms {
        if let Some(approach) = proximity::closest_approach(storm, location) {
            match &best {
                Some((min, _)) if approach.distance_km >= *min => {}
                _ => best = Some((approach.distance_km, storm.name.clone())),
            }
        }
    }

    if let Some((distance_km, storm_name)) = best {
        result.status = VerificationStatus::Success;
        result.inside_alert_radius = distance_km <= alert_radius_km;
        result.nearest_storm = Some(storm_name);
        result.nearest_distance_km = Some(distance_km.round() as u32);
    }

    result
}

// ============================================================================
// Full Verification Runner
// ============================================================================

pub fn run_full_verification(config: &MonitorConfig) -> Result<VerificationReport, Box<dyn Error>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    let logger = Logger::quiet();

    println!("🔍 Verifying NHC feed...");
    let (feed, storms) = verify_feed(&client, &logger);

    match feed.status {
        VerificationStatus::Success => {
            println!("   ✓ OK ({} storm(s): {})", feed.storms_parsed, feed.storm_names.join(", "));
        }
        VerificationStatus::PartialSuccess => {
            println!("   ⚠ Feed healthy, basin quiet (0 active storms)");
        }
        VerificationStatus::Failed => {
            println!("   ✗ FAILED: {}", feed.error_message.as_deref().unwrap_or("Unknown"));
        }
    }

    println!("\n🔍 Verifying monitored locations...");
    let mut location_results = Vec::new();
    for location in &config.locations {
        print!("  {} ... ", location.name);
        let result = verify_location(location, &storms, config.alert_radius_km);

        match (&result.nearest_storm, result.nearest_distance_km) {
            (Some(storm), Some(distance)) if result.inside_alert_radius => {
                println!("⚠ THREATENED: {} at {} km", storm, distance);
            }
            (Some(storm), Some(distance)) => {
                println!("✓ clear (nearest: {} at {} km)", storm, distance);
            }
            _ => println!("✓ clear (no active storms)"),
        }

        location_results.push(result);
    }

    let feed_ok = feed.status != VerificationStatus::Failed;
    let locations_threatened = location_results.iter().filter(|r| r.inside_alert_radius).count();

    let report = VerificationReport {
        timestamp: Utc::now().to_rfc3339(),
        summary: VerificationSummary {
            feed_ok,
            storms_active: feed.storms_parsed,
            locations_total: location_results.len(),
            locations_threatened,
        },
        feed,
        location_results,
    };

    Ok(report)
}

pub fn print_summary(report: &VerificationReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("📊 VERIFICATION SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("Feed:        {}", if report.summary.feed_ok { "reachable and parseable" } else { "FAILED" });
    println!("Storms:      {} active", report.summary.storms_active);
    println!(
        "Locations:   {}/{} inside alert radius",
        report.summary.locations_threatened, report.summary.locations_total
    );
    println!("═══════════════════════════════════════════════════════════");
}

// ============================================================================
// Tests
// ============================================================================
