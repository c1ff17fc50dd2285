/// Output sinks: the JSON report file and the optional webhook POST.
///
/// Both sinks take the assembled report as-is and never reshape it.
/// Error-status reports are deliberately not written and not posted:
/// downstream consumers keep reading the previous successful run until
/// a healthy one replaces it.

use crate::logging::{DataSource, Logger};
use crate::report::StormReport;

pub const OUTPUT_JSON: &str = "stormwatch.json";

// ---------------------------------------------------------------------------
// File sink
// ---------------------------------------------------------------------------

/// Writes the report as pretty-printed JSON. Returns `Ok(true)` when a
/// write happened, `Ok(false)` when an error-status report was refused.
pub fn write_report(
    path: &str,
    report: &StormReport,
    logger: &Logger,
) -> Result<bool, Box<dyn std::error::Error>> {
    if report.status == "error" {
        logger.warn(
            DataSource::Output,
            None,
            &format!("error-status report: leaving '{}' untouched", path),
        );
        return Ok(false);
    }

    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;

    logger.info(
        DataSource::Output,
        None,
        &format!("Updated {} with {} active dangerous system(s).", path, report.storms.len()),
    );
    Ok(true)
}

// ---------------------------------------------------------------------------
// Webhook sink
// ---------------------------------------------------------------------------

/// Best-effort POST of the report to a configured webhook. Failures are
/// logged warnings, never fatal; the file sink is the system of record.
pub fn post_webhook(
    client: &reqwest::blocking::Client,
    url: &str,
    report: &StormReport,
    logger: &Logger,
) {
    if report.status == "error" {
        logger.warn(DataSource::Output, None, "error-status report: webhook not posted");
        return;
    }

    match client.post(url).json(report).send() {
        Ok(response) if response.status().is_success() => {
            logger.info(DataSource::Output, None, &format!("webhook POST to {} delivered", url));
        }
        Ok(response) => {
            logger.warn(
                DataSource::Output,
                None,
                &format!("webhook POST to {} returned HTTP {}", url, response.status()),
            );
        }
        Err(e) => {
            logger.warn(DataSource::Output, None, &format!("webhook POST to {} failed: {}", url, e));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
