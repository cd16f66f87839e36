/// Data retrieval from the two backend APIs.
///
/// `TimeSeriesFetcher` is the seam between the comparison pipeline and the
/// outside world: given a station and a date range it returns one ordered,
/// datetime-indexed hourly flow series. `HttpFetcher` is the production
/// implementation, dispatching to the HDB or USGS client; tests substitute
/// an in-memory fake.

pub mod hdb;
pub mod usgs;

#[cfg(test)]
pub(crate) mod fixtures;

use std::time::Duration;

use crate::config::ServiceConfig;
use crate::logging::{self, DataSource};
use crate::model::{CompareError, DateRange, TimeSeries};
use crate::stations::StationRef;

// ---------------------------------------------------------------------------
// Sampling interval
// ---------------------------------------------------------------------------

/// Sampling cadence requested from a backend. Comparisons run on hourly
/// data; daily exists for coarse long-range lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingInterval {
    Hourly,
    Daily,
}

impl SamplingInterval {
    /// HDB `tstp` query token.
    pub fn hdb_token(&self) -> &'static str {
        match self {
            SamplingInterval::Hourly => "HR",
            SamplingInterval::Daily => "DY",
        }
    }
}

// ---------------------------------------------------------------------------
// Fetcher seam
// ---------------------------------------------------------------------------

/// Contract every backend must satisfy: an ordered, timezone-naive,
/// hourly-indexed numeric series with a human-readable name, or a
/// `CompareError` explaining why the window cannot be served.
pub trait TimeSeriesFetcher {
    fn fetch(&self, station: &StationRef, range: &DateRange) -> Result<TimeSeries, CompareError>;
}

/// Production fetcher over blocking HTTP.
///
/// The reqwest client carries the configured timeout, so a hung backend
/// surfaces as `DataUnavailable` within a bounded wait instead of stalling
/// the session. The configuration (base URLs, timeout) is owned here —
/// nothing backend-related lives in process-global state.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    config: ServiceConfig,
}

impl HttpFetcher {
    pub fn new(config: ServiceConfig) -> Result<Self, CompareError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| {
                CompareError::DataUnavailable(format!("failed to build HTTP client: {}", e))
            })?;
        Ok(HttpFetcher { client, config })
    }
}

impl TimeSeriesFetcher for HttpFetcher {
    fn fetch(&self, station: &StationRef, range: &DateRange) -> Result<TimeSeries, CompareError> {
        match station {
            StationRef::Hdb(s) => hdb::fetch_series(
                &self.client,
                &self.config.hdb_base_url,
                &[s],
                SamplingInterval::Hourly,
                range,
            )
            .map(|mut batch| batch.remove(0))
            .inspect_err(|e| logging::log_fetch_failure(DataSource::Hdb, s.sdid, e)),
            StationRef::Usgs(s) => {
                usgs::fetch_series(&self.client, &self.config.usgs_base_url, s, range)
                    .inspect_err(|e| logging::log_fetch_failure(DataSource::Usgs, s.site_code, e))
            }
        }
    }
}
