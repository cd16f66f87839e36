/// Core data types for the flow comparison service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O and no external collaborators — only types and the
/// invariants they enforce.

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// Parameter codes
// ---------------------------------------------------------------------------

/// USGS parameter code for discharge (streamflow), in cubic feet per second.
pub const PARAM_DISCHARGE: &str = "00060";

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// An ordered, timezone-naive hourly flow series from one station.
///
/// Timestamps are strictly increasing; values are flow rates in cfs and may
/// be NaN where the source had a gap. Timestamps and values are parallel
/// vectors of equal length.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    name: String,
    timestamps: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Builds a series, enforcing the index invariants.
    ///
    /// # Errors
    /// - `CompareError::LengthMismatch` — timestamps and values differ in length.
    /// - `CompareError::ParseError` — timestamps are not strictly increasing
    ///   (duplicates or disorder), which would make alignment ambiguous.
    pub fn new(
        name: impl Into<String>,
        timestamps: Vec<NaiveDateTime>,
        values: Vec<f64>,
    ) -> Result<Self, CompareError> {
        if timestamps.len() != values.len() {
            return Err(CompareError::LengthMismatch {
                left: timestamps.len(),
                right: values.len(),
            });
        }
        for pair in timestamps.windows(2) {
            if pair[1] <= pair[0] {
                return Err(CompareError::ParseError(format!(
                    "timestamps must be strictly increasing, got {} after {}",
                    pair[1], pair[0]
                )));
            }
        }
        Ok(TimeSeries {
            name: name.into(),
            timestamps,
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Value at a position, `None` past the end. NaN gaps are returned
    /// as-is — a gap is still a row.
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Rebuilds the series with the same index but new values.
    /// Used by the lag shifter, which moves values without touching the index.
    pub(crate) fn with_values(&self, values: Vec<f64>) -> Result<Self, CompareError> {
        TimeSeries::new(self.name.clone(), self.timestamps.clone(), values)
    }
}

// ---------------------------------------------------------------------------
// Date range
// ---------------------------------------------------------------------------

/// A user-supplied comparison window, validated at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// # Errors
    /// `CompareError::InvalidRange` if `start` is after `end`. Future dates
    /// and overlong ranges are not rejected here — the backends decide what
    /// they can serve, and their failures surface as `DataUnavailable`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CompareError> {
        if start > end {
            return Err(CompareError::InvalidRange { start, end });
        }
        Ok(DateRange { start, end })
    }
}

// ---------------------------------------------------------------------------
// Aligned pair
// ---------------------------------------------------------------------------

/// Two series reduced to their common timestamps (inner join).
///
/// Invariant: `timestamps`, `upstream`, and `downstream` always have the
/// same length. A zero-length pair is valid — it means the inputs shared
/// no timestamps, and every statistic over it is undefined.
#[derive(Debug, Clone)]
pub struct AlignedPair {
    pub upstream_name: String,
    pub downstream_name: String,
    pub timestamps: Vec<NaiveDateTime>,
    pub upstream: Vec<f64>,
    pub downstream: Vec<f64>,
}

impl AlignedPair {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Removes rows where either value is NaN.
    ///
    /// Missing rows must never feed into statistics — the lag shifter leaves
    /// NaN in the first `lag` positions, and source gaps leave NaN anywhere.
    pub fn drop_missing(&self) -> AlignedPair {
        let mut timestamps = Vec::with_capacity(self.len());
        let mut upstream = Vec::with_capacity(self.len());
        let mut downstream = Vec::with_capacity(self.len());
        for i in 0..self.len() {
            if self.upstream[i].is_nan() || self.downstream[i].is_nan() {
                continue;
            }
            timestamps.push(self.timestamps[i]);
            upstream.push(self.upstream[i]);
            downstream.push(self.downstream[i]);
        }
        AlignedPair {
            upstream_name: self.upstream_name.clone(),
            downstream_name: self.downstream_name.clone(),
            timestamps,
            upstream,
            downstream,
        }
    }
}

// ---------------------------------------------------------------------------
// Statistic report
// ---------------------------------------------------------------------------

/// One row of the agreement report. `None` means the metric is undefined
/// for this pair (zero-length input, zero variance, zero NSE denominator).
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticRow {
    pub name: &'static str,
    pub value: Option<f64>,
}

/// Agreement statistics over an aligned pair, in fixed display order:
/// Correlation, [Mean Error], RMSE, R Squared, NSE.
///
/// Rows hold full-precision values; use [`StatisticReport::rounded`] for
/// display. Mean Error is present only when the report was computed with
/// `include_mean_error` set.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticReport {
    pub rows: Vec<StatisticRow>,
}

impl StatisticReport {
    /// Looks up a metric by its display name.
    /// Outer `None` = metric absent from the report; inner `None` = undefined.
    pub fn get(&self, name: &str) -> Option<Option<f64>> {
        self.rows.iter().find(|r| r.name == name).map(|r| r.value)
    }

    /// Display copy with every defined value rounded to `decimals` places.
    pub fn rounded(&self, decimals: u32) -> StatisticReport {
        let factor = 10f64.powi(decimals as i32);
        StatisticReport {
            rows: self
                .rows
                .iter()
                .map(|r| StatisticRow {
                    name: r.name,
                    value: r.value.map(|v| (v * factor).round() / factor),
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while fetching, aligning, or comparing flow series.
#[derive(Debug, PartialEq)]
pub enum CompareError {
    /// Start date after end date.
    InvalidRange { start: NaiveDate, end: NaiveDate },
    /// Backend fetch failure: non-2xx response, network error, timeout,
    /// or an empty response for the requested window.
    DataUnavailable(String),
    /// A response body could not be deserialized or violated the schema.
    ParseError(String),
    /// Lag shifting requires uniform hourly sampling; the series had a
    /// different interval at the named timestamp.
    IrregularSampling { expected_minutes: i64, found_minutes: i64, at: NaiveDateTime },
    /// Requested lag exceeds the reach's travel-time bound.
    LagOutOfRange { lag: u32, max: u32 },
    /// Two sequences that must be equal length were not. Post-alignment
    /// this indicates an internal invariant violation.
    LengthMismatch { left: usize, right: usize },
    /// The requested reach key is not in the registry.
    UnknownReach(String),
    /// A session method was called out of order (e.g. `apply_lag` before
    /// a reach was selected).
    InvalidTransition { method: &'static str, state: &'static str },
}

impl std::fmt::Display for CompareError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompareError::InvalidRange { start, end } => {
                write!(f, "Invalid date range: start {} is after end {}", start, end)
            }
            CompareError::DataUnavailable(msg) => write!(f, "Data unavailable: {}", msg),
            CompareError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            CompareError::IrregularSampling { expected_minutes, found_minutes, at } => write!(
                f,
                "Irregular sampling at {}: expected {} minute interval, found {}",
                at, expected_minutes, found_minutes
            ),
            CompareError::LagOutOfRange { lag, max } => {
                write!(f, "Lag {} hours exceeds reach maximum of {} hours", lag, max)
            }
            CompareError::LengthMismatch { left, right } => {
                write!(f, "Length mismatch: {} vs {} values", left, right)
            }
            CompareError::UnknownReach(key) => write!(f, "Unknown reach: {}", key),
            CompareError::InvalidTransition { method, state } => {
                write!(f, "Cannot call {} while session is {}", method, state)
            }
        }
    }
}

impl std::error::Error for CompareError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hour(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_series_accepts_strictly_increasing_index() {
        let ts = TimeSeries::new("Davis Release", vec![hour(0), hour(1), hour(2)], vec![
            100.0, 110.0, 120.0,
        ]);
        assert!(ts.is_ok());
        assert_eq!(ts.unwrap().len(), 3);
    }

    #[test]
    fn test_series_rejects_duplicate_timestamps() {
        let result =
            TimeSeries::new("Davis Release", vec![hour(0), hour(1), hour(1)], vec![1.0, 2.0, 3.0]);
        assert!(
            matches!(result, Err(CompareError::ParseError(_))),
            "duplicate timestamps must be rejected, got {:?}",
            result
        );
    }

    #[test]
    fn test_series_rejects_out_of_order_timestamps() {
        let result =
            TimeSeries::new("Davis Release", vec![hour(2), hour(1)], vec![1.0, 2.0]);
        assert!(matches!(result, Err(CompareError::ParseError(_))));
    }

    #[test]
    fn test_series_rejects_mismatched_lengths() {
        let result = TimeSeries::new("Davis Release", vec![hour(0), hour(1)], vec![1.0]);
        assert!(matches!(
            result,
            Err(CompareError::LengthMismatch { left: 2, right: 1 })
        ));
    }

    #[test]
    fn test_series_allows_nan_values() {
        // Source gaps arrive as NaN; the index invariant is unaffected.
        let ts = TimeSeries::new("BBBLC", vec![hour(0), hour(1)], vec![f64::NAN, 2.0]).unwrap();
        assert!(ts.values()[0].is_nan());
        assert_eq!(ts.value_at(1), Some(2.0));
        assert_eq!(ts.value_at(2), None, "out of range reads are None, not a panic");
    }

    #[test]
    fn test_date_range_rejects_start_after_end() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert!(matches!(
            DateRange::new(start, end),
            Err(CompareError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_date_range_accepts_single_day() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert!(DateRange::new(day, day).is_ok());
    }

    #[test]
    fn test_drop_missing_removes_rows_with_nan_on_either_side() {
        let pair = AlignedPair {
            upstream_name: "Davis Release".to_string(),
            downstream_name: "BBBLC".to_string(),
            timestamps: vec![hour(0), hour(1), hour(2), hour(3)],
            upstream: vec![f64::NAN, 10.0, 12.0, 14.0],
            downstream: vec![8.0, 10.0, f64::NAN, 15.0],
        };
        let clean = pair.drop_missing();
        assert_eq!(clean.len(), 2);
        assert_eq!(clean.timestamps, vec![hour(1), hour(3)]);
        assert_eq!(clean.upstream, vec![10.0, 14.0]);
        assert_eq!(clean.downstream, vec![10.0, 15.0]);
    }

    #[test]
    fn test_report_rounding_preserves_row_order_and_names() {
        let report = StatisticReport {
            rows: vec![
                StatisticRow { name: "Correlation", value: Some(0.991_78) },
                StatisticRow { name: "RMSE", value: Some(1.658_31) },
                StatisticRow { name: "NSE", value: None },
            ],
        };
        let display = report.rounded(3);
        assert_eq!(display.rows[0].value, Some(0.992));
        assert_eq!(display.rows[1].value, Some(1.658));
        assert_eq!(display.rows[2].value, None, "undefined stays undefined");
        assert_eq!(display.rows[0].name, "Correlation");
    }
}
