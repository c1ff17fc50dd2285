/// Entry point: one scheduled run of the tropical storm monitor.
///
/// Usage:
///   stormwatch_service [--config <path>] [--feed-file <path>] [--verify]
///
/// Exit codes: 0 = report written; 1 = fetch/parse failure (previous
/// output preserved); 2 = configuration error (nothing fetched).

use chrono::Utc;
use std::process;
use std::time::Duration;

use stormwatch_service::config::{self, DEFAULT_CONFIG_PATH, MonitorConfig};
use stormwatch_service::dev_mode::DevMode;
use stormwatch_service::ingest::nhc;
use stormwatch_service::logging::{DataSource, LogLevel, Logger};
use stormwatch_service::output::{self, OUTPUT_JSON};
use stormwatch_service::report;
use stormwatch_service::verify;

const LOG_FILE: &str = "stormwatch.log";
const VERIFICATION_JSON: &str = "verification_report.json";
/// Bound on the feed download so a stalled fetch cannot hang a
/// scheduled run.
const FETCH_TIMEOUT_SECS: u64 = 20;

struct CliArgs {
    config_path: String,
    feed_file: Option<String>,
    verify: bool,
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = CliArgs {
        config_path: DEFAULT_CONFIG_PATH.to_string(),
        feed_file: None,
        verify: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                args.config_path = iter.next().ok_or("--config requires a path")?;
            }
            "--feed-file" => {
                args.feed_file = Some(iter.next().ok_or("--feed-file requires a path")?);
            }
            "--verify" => args.verify = true,
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }
    Ok(args)
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("stormwatch_service: {}", msg);
            process::exit(2);
        }
    };

    // Config problems abort here, before any network access.
    let config = match config::load_config(&args.config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("stormwatch_service: {}", e);
            process::exit(2);
        }
    };

    if args.verify {
        process::exit(run_verification(&config));
    }

    let logger = Logger::new(LogLevel::Info, Some(LOG_FILE), false);
    process::exit(run(&config, &logger, args.feed_file.as_deref()));
}

fn run_verification(config: &MonitorConfig) -> i32 {
    match verify::run_full_verification(config) {
        Ok(report) => {
            verify::print_summary(&report);
            match serde_json::to_string_pretty(&report) {
                Ok(json) => {
                    if let Err(e) = std::fs::write(VERIFICATION_JSON, json) {
                        eprintln!("stormwatch_service: cannot write {}: {}", VERIFICATION_JSON, e);
                    } else {
                        println!("\n📄 Full report saved to: {}", VERIFICATION_JSON);
                    }
                }
                Err(e) => eprintln!("stormwatch_service: cannot serialize report: {}", e),
            }
            if report.summary.feed_ok { 0 } else { 1 }
        }
        Err(e) => {
            eprintln!("stormwatch_service: verification failed: {}", e);
            1
        }
    }
}

fn run(config: &MonitorConfig, logger: &Logger, feed_file: Option<&str>) -> i32 {
    let client = match reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            logger.error(DataSource::System, None, &format!("cannot build HTTP client: {}", e));
            return 1;
        }
    };

    // Fetch boundary. On failure the core is never invoked and the
    // previous output stays in place.
    let fetched = match feed_file {
        Some(path) => {
            logger.info(DataSource::Nhc, None, &format!("replaying feed snapshot from {}", path));
            DevMode::new(path).read_feed()
        }
        None => nhc::fetch_feed(&client),
    };
    let kmz = match fetched {
        Ok(bytes) => bytes,
        Err(e) => {
            logger.error(DataSource::Nhc, None, &e.to_string());
            return 1;
        }
    };

    let timestamp = Utc::now();
    let parsed = nhc::extract_kml(&kmz).and_then(|kml| nhc::parse_feed(&kml, logger));

    let report = match parsed {
        Ok(storms) => report::build_report(&storms, config, timestamp, logger),
        Err(e) => {
            logger.error(DataSource::Nhc, None, &e.to_string());
            report::error_report(config, timestamp)
        }
    };

    if let Err(e) = output::write_report(OUTPUT_JSON, &report, logger) {
        logger.error(DataSource::Output, None, &format!("cannot write {}: {}", OUTPUT_JSON, e));
        return 1;
    }

    if let Some(url) = &config.webhook_url {
        output::post_webhook(&client, url, &report, logger);
    }

    if report.status == "ok" { 0 } else { 1 }
}
