/// flowcomp_service: Lower Colorado River flow comparison service.
///
/// Compares reservoir release series from the USBR Hydrologic Database (HDB)
/// against downstream USGS stream gauges, with a travel-time lag applied to
/// the upstream series, and reports agreement statistics for the overlap.
///
/// # Module structure
///
/// ```text
/// flowcomp_service
/// ├── model       — shared data types (TimeSeries, AlignedPair, CompareError, …)
/// ├── config      — service configuration loader (comparison.toml)
/// ├── stations    — HDB sdid / USGS site code registry and river reach catalog
/// ├── ingest
/// │   ├── hdb     — USBR HDB CGI API: URL construction + JSON parsing
/// │   ├── usgs    — USGS NWIS IV API: URL construction + JSON parsing + hourly resample
/// │   └── fixtures (test only) — representative API response payloads
/// ├── analysis
/// │   ├── align   — lag shifting and inner-join timestamp alignment
/// │   └── stats   — agreement statistics (Correlation, ME, RMSE, R², NSE)
/// ├── session     — comparison workflow state machine
/// ├── export      — CSV export of aligned pairs
/// └── logging     — leveled logging with backend/station context
/// ```

/// Public modules
pub mod analysis;
pub mod config;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod session;
pub mod stations;
