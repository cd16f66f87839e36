/// CSV export of an aligned (and possibly lagged) pair.
///
/// Column order is timestamp, then the two series, comma-separated with a
/// header row — the shape a hydrologist expects to pull into a spreadsheet
/// or back into pandas. Values are written with Rust's shortest round-trip
/// float formatting, so re-parsing the output reproduces the pair exactly.
/// Gaps are written as empty fields.
///
/// Series labels in the catalog contain no commas; USGS names are truncated
/// at the first comma when the series is built, so the three-column layout
/// is unambiguous.

use chrono::NaiveDateTime;

use crate::model::{AlignedPair, CompareError};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders the pair as CSV text.
pub fn to_csv(pair: &AlignedPair) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "datetime,{},{}\n",
        pair.upstream_name, pair.downstream_name
    ));
    for i in 0..pair.len() {
        out.push_str(&format!(
            "{},{},{}\n",
            pair.timestamps[i].format(TIMESTAMP_FORMAT),
            format_value(pair.upstream[i]),
            format_value(pair.downstream[i]),
        ));
    }
    out
}

fn format_value(v: f64) -> String {
    if v.is_nan() { String::new() } else { format!("{}", v) }
}

/// Parses CSV text produced by [`to_csv`] back into an `AlignedPair`.
///
/// # Errors
/// `CompareError::ParseError` on a missing header, wrong column count,
/// or an unparseable timestamp or value.
pub fn parse_csv(text: &str) -> Result<AlignedPair, CompareError> {
    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| CompareError::ParseError("empty CSV input".to_string()))?;

    let columns: Vec<&str> = header.split(',').collect();
    if columns.len() != 3 || columns[0] != "datetime" {
        return Err(CompareError::ParseError(format!(
            "expected header 'datetime,<upstream>,<downstream>', got '{}'",
            header
        )));
    }
    let upstream_name = columns[1].to_string();
    let downstream_name = columns[2].to_string();

    let mut timestamps = Vec::new();
    let mut upstream = Vec::new();
    let mut downstream = Vec::new();
    for (line_no, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 3 {
            return Err(CompareError::ParseError(format!(
                "line {}: expected 3 fields, got {}",
                line_no + 2,
                fields.len()
            )));
        }
        let ts = NaiveDateTime::parse_from_str(fields[0], TIMESTAMP_FORMAT).map_err(|_| {
            CompareError::ParseError(format!("line {}: bad timestamp '{}'", line_no + 2, fields[0]))
        })?;
        timestamps.push(ts);
        upstream.push(parse_value(fields[1], line_no + 2)?);
        downstream.push(parse_value(fields[2], line_no + 2)?);
    }

    Ok(AlignedPair { upstream_name, downstream_name, timestamps, upstream, downstream })
}

fn parse_value(field: &str, line_no: usize) -> Result<f64, CompareError> {
    if field.is_empty() {
        return Ok(f64::NAN);
    }
    field
        .parse()
        .map_err(|_| CompareError::ParseError(format!("line {}: bad value '{}'", line_no, field)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn hour(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn sample_pair() -> AlignedPair {
        AlignedPair {
            upstream_name: "Davis Release".to_string(),
            downstream_name: "BBBLC".to_string(),
            timestamps: vec![hour(0), hour(1), hour(2)],
            // A value with a long fractional expansion exercises exact
            // round-tripping, not just pretty integers.
            upstream: vec![8240.0, 8200.333333333334, 8300.5],
            downstream: vec![8100.0, f64::NAN, 8170.25],
        }
    }

    #[test]
    fn test_csv_layout_header_then_rows() {
        let csv = to_csv(&sample_pair());
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("datetime,Davis Release,BBBLC"));
        assert_eq!(lines.next(), Some("2024-05-01 00:00:00,8240,8100"));
        assert_eq!(csv.lines().count(), 4, "header plus one row per timestamp");
    }

    #[test]
    fn test_nan_is_written_as_empty_field() {
        let csv = to_csv(&sample_pair());
        let gap_row = csv.lines().nth(2).unwrap();
        assert_eq!(gap_row, "2024-05-01 01:00:00,8200.333333333334,");
    }

    #[test]
    fn test_round_trip_is_exact() {
        let original = sample_pair();
        let parsed = parse_csv(&to_csv(&original)).expect("own output must re-parse");

        assert_eq!(parsed.upstream_name, original.upstream_name);
        assert_eq!(parsed.downstream_name, original.downstream_name);
        assert_eq!(parsed.timestamps, original.timestamps);
        assert_eq!(parsed.upstream, original.upstream, "values must survive bit-exact");
        assert_eq!(parsed.downstream[0], original.downstream[0]);
        assert!(parsed.downstream[1].is_nan(), "gap must come back as NaN");
        assert_eq!(parsed.downstream[2], original.downstream[2]);
    }

    #[test]
    fn test_empty_pair_exports_header_only() {
        let pair = AlignedPair {
            upstream_name: "Davis Release".to_string(),
            downstream_name: "BBBLC".to_string(),
            timestamps: vec![],
            upstream: vec![],
            downstream: vec![],
        };
        let csv = to_csv(&pair);
        assert_eq!(csv.lines().count(), 1);
        let parsed = parse_csv(&csv).unwrap();
        assert_eq!(parsed.len(), 0);
    }

    #[test]
    fn test_parse_rejects_wrong_column_count() {
        let result = parse_csv("datetime,A,B\n2024-05-01 00:00:00,1.0\n");
        assert!(matches!(result, Err(CompareError::ParseError(_))));
    }

    #[test]
    fn test_parse_rejects_bad_header() {
        let result = parse_csv("time,A,B\n");
        assert!(matches!(result, Err(CompareError::ParseError(_))));
    }

    #[test]
    fn test_parse_rejects_bad_timestamp_and_value() {
        assert!(matches!(
            parse_csv("datetime,A,B\nnot-a-date,1.0,2.0\n"),
            Err(CompareError::ParseError(_))
        ));
        assert!(matches!(
            parse_csv("datetime,A,B\n2024-05-01 00:00:00,abc,2.0\n"),
            Err(CompareError::ParseError(_))
        ));
    }
}
