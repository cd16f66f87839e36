/// USGS NWIS Instantaneous Values (IV) API client.
///
/// Handles URL construction and JSON response parsing for the USGS Water
/// Services IV endpoint:
///   https://waterservices.usgs.gov/nwis/iv/
///
/// The IV service returns WaterML rendered as JSON. See `fixtures.rs` for
/// annotated examples of the response structure. Gauge data arrives at the
/// station's native cadence (typically 15 minutes) with a timezone offset;
/// the comparison pipeline needs timezone-naive hourly series, so parsing
/// strips the offset and `resample_hourly` averages into hour buckets.

use chrono::{DateTime, NaiveDateTime, Timelike};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::model::{CompareError, DateRange, TimeSeries, PARAM_DISCHARGE};
use crate::stations::UsgsStation;

// ---------------------------------------------------------------------------
// Serde structures for WaterML JSON deserialization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct IvResponse {
    value: ValueWrapper,
}

#[derive(Deserialize)]
struct ValueWrapper {
    #[serde(rename = "timeSeries")]
    time_series: Vec<IvTimeSeries>,
}

#[derive(Deserialize)]
struct IvTimeSeries {
    #[serde(rename = "sourceInfo")]
    source_info: SourceInfo,
    variable: Variable,
    values: Vec<Values>,
}

#[derive(Deserialize)]
struct SourceInfo {
    #[serde(rename = "siteName")]
    site_name: String,
    #[serde(rename = "siteCode")]
    site_code: Vec<SiteCode>,
}

#[derive(Deserialize)]
struct SiteCode {
    value: String,
}

#[derive(Deserialize)]
struct Variable {
    #[serde(rename = "noDataValue")]
    no_data_value: f64,
}

#[derive(Deserialize)]
struct Values {
    value: Vec<ValueEntry>,
}

#[derive(Deserialize)]
struct ValueEntry {
    value: String, // USGS returns measurements as strings
    #[serde(rename = "dateTime")]
    date_time: String,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds a USGS IV API URL for one site over an explicit date range.
/// Always requests JSON and the discharge parameter unless told otherwise.
pub fn build_iv_url(base_url: &str, site_code: &str, param_code: &str, range: &DateRange) -> String {
    format!(
        "{}?sites={}&parameterCd={}&startDT={}&endDT={}&format=json",
        base_url,
        site_code,
        param_code,
        range.start.format("%Y-%m-%d"),
        range.end.format("%Y-%m-%d"),
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a USGS IV JSON response into a single `TimeSeries` carrying every
/// reading in the window.
///
/// The series is named `"<site name before the first comma> (USGS)"`, the
/// convention the rest of the pipeline uses for gauge columns. Sentinel
/// measurements (`noDataValue`, typically -999999) become NaN gaps;
/// timestamps have their UTC offset stripped, keeping local clock time.
///
/// # Errors
/// - `CompareError::ParseError` — malformed or unexpected JSON structure.
/// - `CompareError::DataUnavailable` — no `timeSeries` entries, or an
///   entry with an empty `value` array.
pub fn parse_series_response(json: &str) -> Result<TimeSeries, CompareError> {
    let response: IvResponse = serde_json::from_str(json)
        .map_err(|e| CompareError::ParseError(format!("USGS JSON deserialization failed: {}", e)))?;

    let series = response.value.time_series.first().ok_or_else(|| {
        CompareError::DataUnavailable("No timeSeries entries in USGS response".to_string())
    })?;

    let site_name = series.source_info.site_name.clone();
    let short_name = site_name.split(',').next().unwrap_or(&site_name).trim();
    let name = format!("{} (USGS)", short_name);
    let no_data_value = series.variable.no_data_value;

    let values_wrapper = series
        .values
        .first()
        .ok_or_else(|| CompareError::ParseError("Missing values array".to_string()))?;

    if values_wrapper.value.is_empty() {
        let site_code = series
            .source_info
            .site_code
            .first()
            .map(|c| c.value.as_str())
            .unwrap_or("unknown");
        return Err(CompareError::DataUnavailable(format!(
            "USGS returned no readings for site {}",
            site_code
        )));
    }

    let mut timestamps = Vec::with_capacity(values_wrapper.value.len());
    let mut values = Vec::with_capacity(values_wrapper.value.len());
    for entry in &values_wrapper.value {
        timestamps.push(parse_usgs_timestamp(&entry.date_time)?);
        let parsed: f64 = entry.value.parse().unwrap_or(f64::NAN);
        // The sentinel marks an explicit gap, not a reading of -999999 cfs.
        if (parsed - no_data_value).abs() < 0.1 {
            values.push(f64::NAN);
        } else {
            values.push(parsed);
        }
    }

    TimeSeries::new(name, timestamps, values)
}

/// USGS datetimes carry an offset (`2024-05-01T12:00:00.000-07:00`).
/// The comparison index is timezone-naive local time, matching HDB.
fn parse_usgs_timestamp(raw: &str) -> Result<NaiveDateTime, CompareError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .map_err(|_| CompareError::ParseError(format!("unparseable USGS timestamp '{}'", raw)))
}

// ---------------------------------------------------------------------------
// Hourly resampling
// ---------------------------------------------------------------------------

/// Averages sub-hourly readings into hour buckets, producing a uniform
/// hourly grid from the first observed hour to the last. Hours with no
/// finite readings become NaN gaps — the grid stays uniform so positional
/// lag shifting remains valid.
pub fn resample_hourly(series: &TimeSeries) -> TimeSeries {
    if series.is_empty() {
        return series.clone();
    }

    let mut buckets: BTreeMap<NaiveDateTime, (f64, u32)> = BTreeMap::new();
    for (ts, value) in series.timestamps().iter().zip(series.values()) {
        let hour = ts.with_minute(0).unwrap().with_second(0).unwrap().with_nanosecond(0).unwrap();
        let entry = buckets.entry(hour).or_insert((0.0, 0));
        if value.is_finite() {
            entry.0 += value;
            entry.1 += 1;
        }
    }

    let first = *buckets.keys().next().unwrap();
    let last = *buckets.keys().next_back().unwrap();
    let mut timestamps = Vec::new();
    let mut values = Vec::new();
    let mut current = first;
    while current <= last {
        timestamps.push(current);
        values.push(match buckets.get(&current) {
            Some((sum, count)) if *count > 0 => sum / *count as f64,
            _ => f64::NAN,
        });
        current += chrono::Duration::hours(1);
    }

    // The grid is strictly increasing by construction.
    TimeSeries::new(series.name(), timestamps, values)
        .expect("hourly grid violates the series invariant")
}

// ---------------------------------------------------------------------------
// HTTP fetch
// ---------------------------------------------------------------------------

/// Fetches the discharge series for one gauge and resamples it to hourly.
///
/// # Errors
/// `CompareError::DataUnavailable` on transport failure (connection,
/// timeout, non-2xx status) or an empty response.
pub fn fetch_series(
    client: &reqwest::blocking::Client,
    base_url: &str,
    station: &UsgsStation,
    range: &DateRange,
) -> Result<TimeSeries, CompareError> {
    let url = build_iv_url(base_url, station.site_code, PARAM_DISCHARGE, range);

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| CompareError::DataUnavailable(format!("USGS request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(CompareError::DataUnavailable(format!(
            "USGS API error: {}",
            response.status()
        )));
    }

    let body = response
        .text()
        .map_err(|e| CompareError::DataUnavailable(format!("USGS response read failed: {}", e)))?;

    let raw = parse_series_response(&body)?;
    Ok(resample_hourly(&raw))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
