/// Test fixtures: representative JSON payloads from the HDB and USGS APIs.
///
/// These fixtures are structurally complete but truncated to the minimum
/// needed to exercise the parsers.
///
/// HDB JSON response shape (hdb.pl?...&format=json):
///   Series[]
///     .SDI   — site datatype id, echoed as a string
///     .Data[]
///       .t   — timestamp, timezone-naive local time
///       .v   — measurement as a STRING; "" marks a gap
///
/// USGS IV response shape (WaterML as JSON):
///   value.timeSeries[]
///     .sourceInfo.siteName / .siteCode[0].value
///     .variable.noDataValue — sentinel for missing data (-999999)
///     .values[0].value[]
///       .value    — the measurement as a STRING
///       .dateTime — ISO 8601 with UTC offset

/// Two lower-Colorado stations (Davis Release 2166 + BBBLC 2336), four
/// hourly values each. BBBLC hour 2 is an empty string — a gap, not zero.
#[cfg(test)]
pub(crate) fn fixture_hdb_davis_big_bend_json() -> &'static str {
    r#"{
      "Series": [
        {
          "SDI": "2166",
          "SiteName": "Davis Dam Release",
          "DataTypeName": "average flow",
          "Data": [
            { "t": "2024-05-01T00:00:00", "v": "8240" },
            { "t": "2024-05-01T01:00:00", "v": "8200" },
            { "t": "2024-05-01T02:00:00", "v": "8300" },
            { "t": "2024-05-01T03:00:00", "v": "8280" }
          ]
        },
        {
          "SDI": "2336",
          "SiteName": "Colorado River Below Big Bend",
          "DataTypeName": "average flow",
          "Data": [
            { "t": "2024-05-01T00:00:00", "v": "8100" },
            { "t": "2024-05-01T01:00:00", "v": "8150" },
            { "t": "2024-05-01T02:00:00", "v": "" },
            { "t": "2024-05-01T03:00:00", "v": "8170" }
          ]
        }
      ]
    }"#
}

/// Davis Release with an empty Data array — the window predates the record
/// or the backend had nothing to serve. Parser must report DataUnavailable.
#[cfg(test)]
pub(crate) fn fixture_hdb_empty_series_json() -> &'static str {
    r#"{
      "Series": [
        { "SDI": "2166", "SiteName": "Davis Dam Release", "Data": [] }
      ]
    }"#
}

/// Lees Ferry gauge (09380000) with quarter-hour discharge readings spanning
/// two hours. One reading is the USGS sentinel (-999999) — an explicit gap.
#[cfg(test)]
pub(crate) fn fixture_usgs_lees_ferry_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "Colorado River at Lees Ferry, AZ",
              "siteCode": [{ "value": "09380000", "network": "NWIS", "agencyCode": "USGS" }],
              "geoLocation": {
                "geogLocation": { "srs": "EPSG:4326", "latitude": 36.8644, "longitude": -111.5875 }
              }
            },
            "variable": {
              "variableCode": [{ "value": "00060", "network": "NWIS" }],
              "variableName": "Streamflow, ft&#179;/s",
              "unit": { "unitCode": "ft3/s" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "11200", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-07:00" },
                { "value": "11300", "qualifiers": ["P"], "dateTime": "2024-05-01T12:15:00.000-07:00" },
                { "value": "11250", "qualifiers": ["P"], "dateTime": "2024-05-01T12:30:00.000-07:00" },
                { "value": "-999999", "qualifiers": ["P"], "dateTime": "2024-05-01T12:45:00.000-07:00" },
                { "value": "11400", "qualifiers": ["P"], "dateTime": "2024-05-01T13:00:00.000-07:00" },
                { "value": "11500", "qualifiers": ["P"], "dateTime": "2024-05-01T13:15:00.000-07:00" }
              ],
              "qualifier": [{ "qualifierCode": "P", "qualifierDescription": "Provisional data subject to revision." }]
            }]
          }
        ]
      }
    }"#
}

/// Grand Canyon gauge with an empty value array — simulates a sensor outage
/// over the requested window. Parser should return DataUnavailable.
#[cfg(test)]
pub(crate) fn fixture_usgs_empty_value_array_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "Colorado River near Grand Canyon, AZ",
              "siteCode": [{ "value": "09402500", "network": "NWIS", "agencyCode": "USGS" }],
              "geoLocation": {
                "geogLocation": { "srs": "EPSG:4326", "latitude": 36.1044, "longitude": -112.0866 }
              }
            },
            "variable": {
              "variableCode": [{ "value": "00060", "network": "NWIS" }],
              "variableName": "Streamflow, ft&#179;/s",
              "unit": { "unitCode": "ft3/s" },
              "noDataValue": -999999.0
            },
            "values": [{ "value": [], "qualifier": [] }]
          }
        ]
      }
    }"#
}
