/// NHC (National Hurricane Center) Active Storm Feed Client
///
/// Retrieves the active tropical cyclone forecast-track feed published
/// by the NOAA National Hurricane Center as a KMZ archive, and parses
/// its KML payload into typed `Storm` entities.
///
/// Feed: https://www.nhc.noaa.gov/gis/kml/nhc.kmz
///
/// Each storm is a Placemark carrying a name, a description with a
/// "Maximum sustained winds: N knots" line, a coordinates block of
/// whitespace-separated "lon,lat[,alt]" triples, and a parallel
/// sequence of RFC 3339 `when` timestamps.
///
/// Parsing is tolerant: a malformed storm entry or forecast point is
/// logged as a warning and skipped, and the rest of the feed still
/// parses. Only a feed that cannot be structurally opened at all
/// (corrupt container, no .kml member, unreadable markup) fails the
/// run, so a previous good output is never replaced by a partial one.

use chrono::{DateTime, Utc};
use std::io::Read;

use crate::logging::{DataSource, Logger};
use crate::model::{ForecastPoint, MonitorError, Storm};

pub const NHC_KMZ_URL: &str = "https://www.nhc.noaa.gov/gis/kml/nhc.kmz";

// ============================================================================
// Fetch boundary
// ============================================================================

/// Downloads the raw KMZ bytes. Network access lives here and nowhere
/// else in this module; the timeout bound comes from the client.
pub fn fetch_feed(client: &reqwest::blocking::Client) -> Result<Vec<u8>, MonitorError> {
    let response = client
        .get(NHC_KMZ_URL)
        .send()
        .map_err(|e| MonitorError::Fetch(e.to_string()))?;

    if !response.status().is_success() {
        return Err(MonitorError::Fetch(format!("HTTP {}", response.status())));
    }

    let bytes = response
        .bytes()
        .map_err(|e| MonitorError::Fetch(format!("reading response body: {}", e)))?;

    Ok(bytes.to_vec())
}

// ============================================================================
// Container extraction
// ============================================================================

/// Opens the KMZ container and returns the bytes of its first `.kml`
/// member. A corrupt archive or an archive without KML is a structural
/// feed failure.
pub fn extract_kml(kmz: &[u8]) -> Result<Vec<u8>, MonitorError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(kmz))
        .map_err(|e| MonitorError::FeedParse(format!("not a readable KMZ container: {}", e)))?;

    let kml_name = archive
        .file_names()
        .find(|name| name.ends_with(".kml"))
        .map(String::from)
        .ok_or_else(|| MonitorError::FeedParse("no .kml entry in KMZ archive".to_string()))?;

    let mut entry = archive
        .by_name(&kml_name)
        .map_err(|e| MonitorError::FeedParse(format!("cannot open '{}': {}", kml_name, e)))?;

    let mut kml = Vec::new();
    entry
        .read_to_end(&mut kml)
        .map_err(|e| MonitorError::FeedParse(format!("cannot decompress '{}': {}", kml_name, e)))?;

    Ok(kml)
}

// ============================================================================
// Track parsing
// ============================================================================

/// Parses KML bytes into storms.
///
/// Returns `FeedParse` only when the bytes are not a KML document at
/// all. A well-formed document with zero Placemark entries is an empty
/// feed, not an error: the basin is simply quiet.
pub fn parse_feed(kml: &[u8], logger: &Logger) -> Result<Vec<Storm>, MonitorError> {
    let text = std::str::from_utf8(kml)
        .map_err(|e| MonitorError::FeedParse(format!("feed is not valid UTF-8: {}", e)))?;

    let doc = roxmltree::Document::parse(text)
        .map_err(|e| MonitorError::FeedParse(format!("unparseable markup: {}", e)))?;

    if !doc.root_element().has_tag_name("kml") {
        return Err(MonitorError::FeedParse(format!(
            "no recognizable storm markup: root element is <{}>",
            doc.root_element().tag_name().name()
        )));
    }

    let mut storms = Vec::new();
    for placemark in doc.descendants().filter(|n| n.has_tag_name("Placemark")) {
        match storm_from_placemark(&placemark, logger) {
            Ok(storm) => storms.push(storm),
            Err(reason) => {
                logger.warn(DataSource::Nhc, None, &format!("skipping storm entry: {}", reason));
            }
        }
    }

    Ok(storms)
}

/// One Placemark to one Storm. Entry-level problems (no name, no wind
/// line, no coordinates, no timestamps, nothing parseable) reject the
/// whole entry; point-level problems only drop that point.
fn storm_from_placemark(placemark: &roxmltree::Node, logger: &Logger) -> Result<Storm, String> {
    let name = placemark
        .children()
        .find(|n| n.has_tag_name("name"))
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or("entry has no name")?
        .to_string();

    let description = placemark
        .descendants()
        .find(|n| n.has_tag_name("description"))
        .and_then(|n| n.text())
        .unwrap_or("");

    let wind_kt = extract_wind_kt(description)
        .ok_or_else(|| format!("'{}': no sustained-wind line in description", name))?;

    let coordinates = placemark
        .descendants()
        .find(|n| n.has_tag_name("coordinates"))
        .and_then(|n| n.text())
        .ok_or_else(|| format!("'{}': no coordinates block", name))?;

    let triples: Vec<&str> = coordinates.split_whitespace().collect();

    let whens: Vec<&str> = placemark
        .descendants()
        .filter(|n| n.has_tag_name("when"))
        .filter_map(|n| n.text())
        .collect();

    if whens.is_empty() {
        return Err(format!("'{}': no forecast timestamps", name));
    }

    if triples.len() != whens.len() {
        logger.warn(
            DataSource::Nhc,
            Some(&name),
            &format!(
                "coordinate/timestamp count mismatch ({} positions, {} times), pairing to the shorter",
                triples.len(),
                whens.len()
            ),
        );
    }

    let mut track: Vec<ForecastPoint> = Vec::new();
    for (triple, when) in triples.iter().zip(whens.iter()) {
        let (longitude, latitude) = match parse_coordinate_triple(triple) {
            Ok(pair) => pair,
            Err(reason) => {
                logger.warn(DataSource::Nhc, Some(&name), &format!("skipping forecast point: {}", reason));
                continue;
            }
        };

        let time = match DateTime::parse_from_rfc3339(when.trim()) {
            Ok(t) => t.with_timezone(&Utc),
            Err(e) => {
                logger.warn(
                    DataSource::Nhc,
                    Some(&name),
                    &format!("skipping forecast point: bad timestamp '{}': {}", when.trim(), e),
                );
                continue;
            }
        };

        // Feed invariant: no duplicate timestamps within one track.
        if track.iter().any(|p| p.time == time) {
            logger.warn(
                DataSource::Nhc,
                Some(&name),
                &format!("skipping forecast point: duplicate timestamp {}", time.to_rfc3339()),
            );
            continue;
        }

        track.push(ForecastPoint { time, latitude, longitude, wind_kt });
    }

    if track.is_empty() {
        return Err(format!("'{}': no usable forecast points", name));
    }

    Ok(Storm { name, track })
}

/// Pulls the sustained wind in knots out of the advisory description:
/// the first integer after a "Maximum sustained winds" marker. The
/// description arrives as CDATA with either newlines or <br> separators,
/// so this scans characters rather than token positions. Lines whose
/// marker has no parseable value are passed over in case a later line is
/// well-formed.
fn extract_wind_kt(description: &str) -> Option<u32> {
    const MARKER: &str = "Maximum sustained winds";

    for line in description.lines() {
        if let Some(idx) = line.find(MARKER) {
            let digits: String = line[idx + MARKER.len()..]
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if let Ok(wind) = digits.parse::<u32>() {
                return Some(wind);
            }
        }
    }
    None
}

/// "lon,lat[,alt]" to (lon, lat). The altitude, when present, is
/// ignored. Out-of-range coordinates are rejected here so impossible
/// positions never reach the distance math.
fn parse_coordinate_triple(triple: &str) -> Result<(f64, f64), String> {
    let mut parts = triple.split(',');

    let longitude: f64 = parts
        .next()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| format!("bad longitude in '{}'", triple))?;
    let latitude: f64 = parts
        .next()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| format!("bad latitude in '{}'", triple))?;

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(format!("latitude {} outside -90..90 in '{}'", latitude, triple));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("longitude {} outside -180..180 in '{}'", longitude, triple));
    }

    Ok((longitude, latitude))
}

// ============================================================================
// Tests
// ============================================================================
