/// Series alignment and lag shifting.
///
/// `align` is an inner join on timestamps: both outputs are restricted to
/// the timestamps present in both inputs, in chronological order, with no
/// forward or backward filling. `lag_shift` moves values later by whole
/// row positions to account for travel time between an upstream release
/// and a downstream gauge.

use chrono::Duration;

use crate::model::{AlignedPair, CompareError, TimeSeries};

/// Joins two series on their shared timestamps.
///
/// Inputs are not mutated. Timestamps present in only one series are
/// dropped. A disjoint pair yields a zero-length `AlignedPair`, which is
/// valid input for statistics (every metric comes back undefined).
pub fn align(upstream: &TimeSeries, downstream: &TimeSeries) -> AlignedPair {
    let mut timestamps = Vec::new();
    let mut up_values = Vec::new();
    let mut down_values = Vec::new();

    // Both indices are strictly increasing (TimeSeries invariant), so the
    // intersection is a linear two-pointer merge.
    let (mut i, mut j) = (0, 0);
    let (a_ts, b_ts) = (upstream.timestamps(), downstream.timestamps());
    while i < a_ts.len() && j < b_ts.len() {
        if a_ts[i] < b_ts[j] {
            i += 1;
        } else if a_ts[i] > b_ts[j] {
            j += 1;
        } else {
            timestamps.push(a_ts[i]);
            up_values.push(upstream.values()[i]);
            down_values.push(downstream.values()[j]);
            i += 1;
            j += 1;
        }
    }

    AlignedPair {
        upstream_name: upstream.name().to_string(),
        downstream_name: downstream.name().to_string(),
        timestamps,
        upstream: up_values,
        downstream: down_values,
    }
}

/// Shifts a series' values `lag_hours` row positions later.
///
/// This is a positional shift, not timestamp arithmetic: value at position
/// `i` moves to position `i + lag`, the first `lag` positions become NaN,
/// and the timestamp index is unchanged. Length, ordering, and uniqueness
/// are all preserved. Callers must drop NaN rows (via
/// [`AlignedPair::drop_missing`]) before computing statistics.
///
/// Positional shifting is only meaningful over uniform hourly sampling, so
/// for `lag_hours > 0` the series must have exactly one hour between
/// consecutive timestamps.
///
/// # Errors
/// `CompareError::IrregularSampling` if any consecutive interval differs
/// from one hour while a non-zero lag is requested. Silently shifting an
/// irregular series would misattribute values to the wrong hours.
pub fn lag_shift(series: &TimeSeries, lag_hours: u32) -> Result<TimeSeries, CompareError> {
    if lag_hours == 0 {
        return Ok(series.clone());
    }

    let hour = Duration::hours(1);
    for pair in series.timestamps().windows(2) {
        let gap = pair[1] - pair[0];
        if gap != hour {
            return Err(CompareError::IrregularSampling {
                expected_minutes: 60,
                found_minutes: gap.num_minutes(),
                at: pair[1],
            });
        }
    }

    let lag = lag_hours as usize;
    let n = series.len();
    let mut shifted = vec![f64::NAN; n];
    for i in 0..n.saturating_sub(lag) {
        shifted[i + lag] = series.values()[i];
    }
    series.with_values(shifted)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn hour(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn series(name: &str, hours: &[u32], values: &[f64]) -> TimeSeries {
        TimeSeries::new(name, hours.iter().map(|&h| hour(h)).collect(), values.to_vec()).unwrap()
    }

    // --- align ---------------------------------------------------------------

    #[test]
    fn test_align_disjoint_series_yields_empty_pair() {
        let a = series("Davis Release", &[0, 1, 2], &[1.0, 2.0, 3.0]);
        let b = series("BBBLC", &[10, 11, 12], &[4.0, 5.0, 6.0]);
        let pair = align(&a, &b);
        assert_eq!(pair.len(), 0, "disjoint indices must align to length zero");
    }

    #[test]
    fn test_align_keeps_exactly_the_shared_timestamps() {
        let a = series("Davis Release", &[0, 1, 2, 3, 5], &[10.0, 11.0, 12.0, 13.0, 15.0]);
        let b = series("BBBLC", &[1, 2, 4, 5], &[21.0, 22.0, 24.0, 25.0]);
        let pair = align(&a, &b);
        assert_eq!(pair.timestamps, vec![hour(1), hour(2), hour(5)]);
        assert_eq!(pair.upstream, vec![11.0, 12.0, 15.0]);
        assert_eq!(pair.downstream, vec![21.0, 22.0, 25.0]);
    }

    #[test]
    fn test_align_identical_indices_keeps_full_length() {
        let a = series("Davis Release", &[0, 1, 2], &[1.0, 2.0, 3.0]);
        let b = series("BBBLC", &[0, 1, 2], &[4.0, 5.0, 6.0]);
        let pair = align(&a, &b);
        assert_eq!(pair.len(), 3);
        assert_eq!(pair.upstream_name, "Davis Release");
        assert_eq!(pair.downstream_name, "BBBLC");
    }

    #[test]
    fn test_align_does_not_mutate_inputs() {
        let a = series("Davis Release", &[0, 1, 2], &[1.0, 2.0, 3.0]);
        let b = series("BBBLC", &[1], &[5.0]);
        let _ = align(&a, &b);
        assert_eq!(a.len(), 3);
        assert_eq!(b.len(), 1);
        assert_eq!(a.values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_align_carries_nan_values_through() {
        // Alignment intersects indices only; NaN removal is a separate,
        // explicit step before statistics.
        let a = series("Davis Release", &[0, 1], &[f64::NAN, 2.0]);
        let b = series("BBBLC", &[0, 1], &[4.0, 5.0]);
        let pair = align(&a, &b);
        assert_eq!(pair.len(), 2);
        assert!(pair.upstream[0].is_nan());
    }

    // --- lag_shift -------------------------------------------------------------

    #[test]
    fn test_lag_shift_moves_values_and_blanks_the_head() {
        let s = series("Davis Release", &[0, 1, 2, 3, 4], &[10.0, 12.0, 14.0, 16.0, 18.0]);
        let shifted = lag_shift(&s, 2).unwrap();
        assert_eq!(shifted.len(), s.len(), "length must be preserved");
        assert!(shifted.values()[0].is_nan());
        assert!(shifted.values()[1].is_nan());
        assert_eq!(&shifted.values()[2..], &[10.0, 12.0, 14.0]);
        assert_eq!(shifted.timestamps(), s.timestamps(), "index must not move");
    }

    #[test]
    fn test_lag_shift_zero_is_identity() {
        let s = series("Davis Release", &[0, 1, 2], &[1.0, 2.0, 3.0]);
        let shifted = lag_shift(&s, 0).unwrap();
        assert_eq!(shifted.values(), s.values());
    }

    #[test]
    fn test_lag_shift_longer_than_series_blanks_everything() {
        let s = series("Davis Release", &[0, 1, 2], &[1.0, 2.0, 3.0]);
        let shifted = lag_shift(&s, 5).unwrap();
        assert_eq!(shifted.len(), 3);
        assert!(shifted.values().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_lag_shift_rejects_irregular_sampling() {
        // A gap in the hourly grid would silently misalign a positional
        // shift, so it must be refused.
        let s = series("Davis Release", &[0, 1, 3], &[1.0, 2.0, 3.0]);
        let result = lag_shift(&s, 1);
        assert!(
            matches!(result, Err(CompareError::IrregularSampling { found_minutes: 120, .. })),
            "two-hour gap should be reported, got {:?}",
            result
        );
    }

    #[test]
    fn test_lag_shift_zero_skips_sampling_check() {
        // With no shift there is nothing to misalign.
        let s = series("Davis Release", &[0, 1, 3], &[1.0, 2.0, 3.0]);
        assert!(lag_shift(&s, 0).is_ok());
    }

    #[test]
    fn test_lag_shift_offsets_every_position_by_the_lag() {
        let s = series("Davis Release", &[0, 1, 2, 3, 4], &[10.0, 12.0, 14.0, 16.0, 18.0]);
        let shifted = lag_shift(&s, 1).unwrap();
        // value at position i+1 equals the input value at position i
        for i in 0..4 {
            assert_eq!(shifted.values()[i + 1], s.values()[i]);
        }
    }
}
