/// USBR HDB (Hydrologic Database) API client.
///
/// Retrieves release and gauge flow timeseries from the Bureau of
/// Reclamation HDB CGI service used for lower/upper Colorado reservoir
/// operations:
///   https://www.usbr.gov/pn-bin/hdb/hdb.pl
///
/// One request may carry several comma-joined sdids, all served from the
/// same HDB instance (`svr`); the response carries one value column per
/// requested sdid, in request order. See `fixtures.rs` for annotated
/// response payloads.

use serde::Deserialize;

use crate::ingest::SamplingInterval;
use crate::model::{CompareError, DateRange, TimeSeries};
use crate::stations::{HdbDatabase, HdbStation};

// ---------------------------------------------------------------------------
// Serde structures for HDB JSON deserialization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct HdbResponse {
    #[serde(rename = "Series")]
    series: Vec<HdbSeries>,
}

#[derive(Deserialize)]
struct HdbSeries {
    #[serde(rename = "SDI")]
    sdi: String,
    #[serde(rename = "Data")]
    data: Vec<HdbPoint>,
}

#[derive(Deserialize)]
struct HdbPoint {
    /// Timestamp, timezone-naive local time.
    t: String,
    /// Measurement as a string; empty or "NaN" marks a gap.
    v: String,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds an HDB query URL for the given sdids and date range.
///
/// All sdids in one request must live in the same HDB instance — the
/// caller groups stations by `HdbDatabase` before batching. Query
/// parameters mirror the service contract: `svr` selects the database
/// namespace, `sdi` is the comma-joined id list, `tstp` the sampling
/// interval token, `t1`/`t2` the inclusive ISO date range, `table=R`
/// the observed (real) table, `mrid=0` no model run.
pub fn build_series_url(
    base_url: &str,
    sdids: &[&str],
    db: HdbDatabase,
    interval: SamplingInterval,
    range: &DateRange,
) -> String {
    let sdi_param = sdids.join(",");
    format!(
        "{}?svr={}&sdi={}&tstp={}&t1={}&t2={}&table=R&mrid=0&format=json",
        base_url,
        db.namespace(),
        urlencoding::encode(&sdi_param),
        interval.hdb_token(),
        range.start.format("%Y-%m-%d"),
        range.end.format("%Y-%m-%d"),
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses an HDB JSON response into one `TimeSeries` per requested
/// station, in the same order as requested. Series are named with the
/// catalog label for their sdid.
///
/// Gap values (empty string or "NaN") become NaN entries; the rows stay
/// in the index so alignment still sees the timestamp.
///
/// # Errors
/// - `CompareError::ParseError` — malformed JSON, unparseable timestamps,
///   or a non-increasing index.
/// - `CompareError::DataUnavailable` — a requested sdid is absent from
///   the response or carries no data points.
pub fn parse_series_response(
    json: &str,
    requested: &[&HdbStation],
) -> Result<Vec<TimeSeries>, CompareError> {
    let response: HdbResponse = serde_json::from_str(json)
        .map_err(|e| CompareError::ParseError(format!("HDB JSON deserialization failed: {}", e)))?;

    let mut out = Vec::with_capacity(requested.len());
    for station in requested {
        let series = response
            .series
            .iter()
            .find(|s| s.sdi == station.sdid)
            .ok_or_else(|| {
                CompareError::DataUnavailable(format!(
                    "HDB response missing requested sdid {} ({})",
                    station.sdid, station.label
                ))
            })?;

        if series.data.is_empty() {
            return Err(CompareError::DataUnavailable(format!(
                "HDB returned no data for sdid {} ({})",
                station.sdid, station.label
            )));
        }

        let mut timestamps = Vec::with_capacity(series.data.len());
        let mut values = Vec::with_capacity(series.data.len());
        for point in &series.data {
            timestamps.push(parse_hdb_timestamp(&point.t)?);
            values.push(parse_hdb_value(&point.v));
        }
        out.push(TimeSeries::new(station.label, timestamps, values)?);
    }

    Ok(out)
}

/// HDB emits ISO timestamps from the JSON interface and US-style
/// `MM/DD/YYYY hh:mm` strings from the legacy table interface. Accept both.
fn parse_hdb_timestamp(raw: &str) -> Result<chrono::NaiveDateTime, CompareError> {
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(raw, "%m/%d/%Y %H:%M"))
        .map_err(|_| CompareError::ParseError(format!("unparseable HDB timestamp '{}'", raw)))
}

fn parse_hdb_value(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return f64::NAN;
    }
    // Unparseable measurements are treated as gaps, not hard failures;
    // the row keeps its place in the index.
    trimmed.parse().unwrap_or(f64::NAN)
}

// ---------------------------------------------------------------------------
// HTTP fetch
// ---------------------------------------------------------------------------

/// Fetches flow series for a batch of stations sharing one HDB instance.
///
/// # Errors
/// `CompareError::DataUnavailable` on any transport failure (connection,
/// timeout, non-2xx status) — the bounded client timeout makes a hung
/// backend surface here rather than blocking forever.
pub fn fetch_series(
    client: &reqwest::blocking::Client,
    base_url: &str,
    stations: &[&HdbStation],
    interval: SamplingInterval,
    range: &DateRange,
) -> Result<Vec<TimeSeries>, CompareError> {
    let db = stations
        .first()
        .map(|s| s.db)
        .ok_or_else(|| CompareError::DataUnavailable("no HDB stations requested".to_string()))?;
    debug_assert!(stations.iter().all(|s| s.db == db), "batch must share one HDB instance");

    let sdids: Vec<&str> = stations.iter().map(|s| s.sdid).collect();
    let url = build_series_url(base_url, &sdids, db, interval, range);

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| CompareError::DataUnavailable(format!("HDB request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(CompareError::DataUnavailable(format!(
            "HDB API error: {}",
            response.status()
        )));
    }

    let body = response
        .text()
        .map_err(|e| CompareError::DataUnavailable(format!("HDB response read failed: {}", e)))?;

    parse_series_response(&body, stations)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
