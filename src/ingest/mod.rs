/// Feed ingestion for the storm monitoring service.
///
/// Submodules:
/// - `nhc` — NOAA National Hurricane Center active-storm KMZ feed:
///   fetch boundary, container extraction, and tolerant track parsing.

pub mod nhc;
