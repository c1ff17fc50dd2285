/// Severity assessment for active storms.
///
/// Submodules:
/// - `severity` — Saffir-Simpson-derived wind-speed classification.

pub mod severity;
