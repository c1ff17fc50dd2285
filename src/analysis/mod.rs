/// Track analysis for the storm monitoring service.
///
/// Submodules:
/// - `proximity` — great-circle closest approach between a storm's
///   forecast track and a monitored location.

pub mod proximity;
