//! Tolerant-parsing integration tests.
//!
//! The NHC feed degrades in practice: entries with missing advisory
//! text, unparseable coordinates, clock glitches, or auxiliary archive
//! members. A partial feed must never sink the run; only a feed that
//! cannot be structurally opened at all is fatal.

use std::io::Write;
use zip::write::SimpleFileOptions;

use stormwatch_service::ingest::nhc;
use stormwatch_service::logging::Logger;
use stormwatch_service::model::MonitorError;

const FEED_HEADER: &str =
    r#"<?xml version="1.0" encoding="UTF-8"?><kml xmlns="http://www.opengis.net/kml/2.2"><Document>"#;
const FEED_FOOTER: &str = "</Document></kml>";

fn feed(placemarks: &str) -> Vec<u8> {
    format!("{}{}{}", FEED_HEADER, placemarks, FEED_FOOTER).into_bytes()
}

#[test]
fn test_degraded_feed_keeps_every_salvageable_storm() {
    // Five entries: two healthy, one nameless, one without advisory
    // text, one whose track is entirely garbage.
    let kml = feed(
        r#"
        <Placemark>
          <name>Hurricane First</name>
          <description>Maximum sustained winds: 90 knots</description>
          <LineString><coordinates>-70.0,25.0,0 -71.0,26.0,0</coordinates></LineString>
          <when>2024-08-01T00:00:00Z</when>
          <when>2024-08-01T06:00:00Z</when>
        </Placemark>
        <Placemark>
          <description>Maximum sustained winds: 55 knots</description>
          <LineString><coordinates>-60.0,15.0,0</coordinates></LineString>
          <when>2024-08-01T00:00:00Z</when>
        </Placemark>
        <Placemark>
          <name>Silent System</name>
          <LineString><coordinates>-61.0,16.0,0</coordinates></LineString>
          <when>2024-08-01T00:00:00Z</when>
        </Placemark>
        <Placemark>
          <name>Scrambled Track</name>
          <description>Maximum sustained winds: 75 knots</description>
          <LineString><coordinates>a,b,c d,e,f</coordinates></LineString>
          <when>2024-08-01T00:00:00Z</when>
          <when>2024-08-01T06:00:00Z</when>
        </Placemark>
        <Placemark>
          <name>Tropical Storm Second</name>
          <description>Maximum sustained winds: 45 knots</description>
          <LineString><coordinates>-55.0,12.0,0</coordinates></LineString>
          <when>2024-08-01T00:00:00Z</when>
        </Placemark>
        "#,
    );

    let storms = nhc::parse_feed(&kml, &Logger::quiet()).expect("partial damage is not fatal");

    let names: Vec<_> = storms.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Hurricane First", "Tropical Storm Second"],
        "healthy entries survive, in feed order"
    );
}

#[test]
fn test_partially_damaged_track_keeps_its_good_points() {
    let kml = feed(
        r#"
        <Placemark>
          <name>Hurricane Patchwork</name>
          <description>Maximum sustained winds: 85 knots</description>
          <LineString><coordinates>-70.0,25.0,0 broken -72.0,27.0,0 -73.0,999.0,0</coordinates></LineString>
          <when>2024-08-01T00:00:00Z</when>
          <when>2024-08-01T06:00:00Z</when>
          <when>not-a-time</when>
          <when>2024-08-01T18:00:00Z</when>
        </Placemark>
        "#,
    );

    let storms = nhc::parse_feed(&kml, &Logger::quiet()).unwrap();
    assert_eq!(storms.len(), 1);

    // Positional pairs: (good, good) kept; ("broken", good) dropped on
    // the coordinate; (good, "not-a-time") dropped on the timestamp;
    // (latitude 999, good) dropped on the range check. One survivor.
    assert_eq!(storms[0].track.len(), 1);
    assert_eq!(storms[0].track[0].latitude, 25.0);
}

#[test]
fn test_feed_of_only_unusable_entries_parses_to_nothing() {
    let kml = feed(
        r#"
        <Placemark><name>Empty Shell</name></Placemark>
        <Placemark>
          <name>Timeless</name>
          <description>Maximum sustained winds: 60 knots</description>
          <LineString><coordinates>-60.0,15.0,0</coordinates></LineString>
        </Placemark>
        "#,
    );

    let storms = nhc::parse_feed(&kml, &Logger::quiet()).expect("unusable entries are skipped");
    assert!(
        storms.is_empty(),
        "nothing salvageable still parses as an empty feed, not an error"
    );
}

#[test]
fn test_kmz_with_auxiliary_members_still_extracts_the_kml() {
    // Real NHC archives ship icons beside the document. The extractor
    // must find the .kml member wherever it sits.
    let kml_text = format!("{}{}", FEED_HEADER, FEED_FOOTER);
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        writer
            .start_file("images/storm_icon.png", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(&[0x89, 0x50, 0x4e, 0x47]).unwrap();
        writer
            .start_file("doc.kml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(kml_text.as_bytes()).unwrap();
        writer.finish().unwrap();
    }
    let kmz = cursor.into_inner();

    let kml = nhc::extract_kml(&kmz).expect("auxiliary members must not confuse extraction");
    assert_eq!(kml, kml_text.as_bytes());
}

#[test]
fn test_structural_failures_are_fatal_not_tolerated() {
    // Corrupt container.
    assert!(matches!(
        nhc::extract_kml(b"\x50\x4b\x03\x04 truncated").unwrap_err(),
        MonitorError::FeedParse(_)
    ));

    // Markup that is not KML at all.
    assert!(matches!(
        nhc::parse_feed(b"<rss version=\"2.0\"></rss>", &Logger::quiet()).unwrap_err(),
        MonitorError::FeedParse(_)
    ));

    // Bytes that are not markup at all.
    assert!(matches!(
        nhc::parse_feed(b"512 Gateway Timeout", &Logger::quiet()).unwrap_err(),
        MonitorError::FeedParse(_)
    ));
}
