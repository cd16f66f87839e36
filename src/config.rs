/// Service configuration loader - parses comparison.toml
///
/// Separates tunable settings from code: backend base URLs, the HTTP
/// timeout, and statistic options can be adjusted without recompiling.
/// The station and reach catalogs are compile-time data in `stations.rs`,
/// not configuration.

use serde::Deserialize;
use std::fs;

use crate::analysis::stats::{NseReference, StatsOptions};

/// Default bounded timeout for backend HTTP calls. A hung backend must
/// surface as DataUnavailable rather than blocking the session indefinitely.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Service settings loaded from comparison.toml.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// USBR HDB CGI endpoint.
    pub hdb_base_url: String,
    /// USGS NWIS Instantaneous Values endpoint.
    pub usgs_base_url: String,
    /// Timeout applied to every backend HTTP call, in seconds.
    pub http_timeout_secs: u64,
    /// Whether the report includes the Mean Error row. On by default.
    pub include_mean_error: bool,
    /// Which side of the pair is the "observed" reference for NSE:
    /// "upstream" (default) or "downstream".
    pub nse_reference: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            hdb_base_url: "https://www.usbr.gov/pn-bin/hdb/hdb.pl".to_string(),
            usgs_base_url: "https://waterservices.usgs.gov/nwis/iv/".to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            include_mean_error: true,
            nse_reference: "upstream".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Statistic options derived from the config fields.
    ///
    /// # Panics
    /// Panics if `nse_reference` is neither "upstream" nor "downstream".
    /// This is intentional — a typo here would silently flip which series
    /// is treated as truth, so it must fail loudly at startup.
    pub fn stats_options(&self) -> StatsOptions {
        let reference = match self.nse_reference.as_str() {
            "upstream" => NseReference::Upstream,
            "downstream" => NseReference::Downstream,
            other => panic!(
                "comparison.toml: nse_reference must be 'upstream' or 'downstream', got '{}'",
                other
            ),
        };
        StatsOptions { include_mean_error: self.include_mean_error, nse_reference: reference }
    }
}

/// Loads service settings from `comparison.toml` in the working directory.
/// A missing file yields the defaults; a malformed file panics.
///
/// # Panics
/// Panics if the file exists but cannot be parsed. The service must not
/// run against half-applied settings.
pub fn load_config() -> ServiceConfig {
    load_config_from("comparison.toml")
}

pub fn load_config_from(path: &str) -> ServiceConfig {
    match fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents)
            .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path, e)),
        Err(_) => ServiceConfig::default(),
    }
}
