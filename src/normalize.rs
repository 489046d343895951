//! Response normalization.
//!
//! Locates the observation array inside a raw water-data response and
//! flattens it into an ordered list of string-typed timestamp/value pairs.
//! Two layouts are recognized; the shape is detected from the body rather
//! than assumed from the endpoint, so either API can change its mind about
//! what it returns without breaking the run.
//!
//! No numeric or temporal parsing happens here. That is the cleaner's job.

use serde_json::Value;

use crate::model::{NormalizedSeries, PipelineError, RawObservation, ResponseShape};

// ---------------------------------------------------------------------------
// Shape detection
// ---------------------------------------------------------------------------

/// Flatten a raw response body into a `NormalizedSeries`.
///
/// Detection order: a top-level `features` array wins (OGC API items
/// response); otherwise `value.timeSeries` marks an NWIS IV response.
/// Anything else is a schema error, as is a recognized layout whose
/// observation array turns out to be empty.
pub fn normalize(body: &Value) -> Result<NormalizedSeries, PipelineError> {
    if let Some(features) = body.get("features").and_then(|f| f.as_array()) {
        return from_geojson_features(features);
    }
    if body.get("value").and_then(|v| v.get("timeSeries")).is_some() {
        return from_nested_timeseries(body);
    }
    Err(PipelineError::Schema(
        "unrecognized response layout (expected 'features' or 'value.timeSeries')".to_string(),
    ))
}

// ---------------------------------------------------------------------------
// GeoJSON features layout
// ---------------------------------------------------------------------------

fn from_geojson_features(features: &[Value]) -> Result<NormalizedSeries, PipelineError> {
    if features.is_empty() {
        return Err(PipelineError::Schema(
            "response contained no features".to_string(),
        ));
    }

    let mut observations = Vec::with_capacity(features.len());
    for feature in features {
        let properties = match feature.get("properties") {
            Some(p) => p,
            None => continue,
        };
        // A feature without a time is unusable; skip rather than fail.
        let datetime = match properties.get("time").and_then(|t| t.as_str()) {
            Some(t) => t.to_string(),
            None => continue,
        };
        observations.push(RawObservation {
            datetime,
            value: scalar_to_string(properties.get("value")),
        });
    }

    if observations.is_empty() {
        return Err(PipelineError::Schema(
            "no feature carried a 'properties.time' field".to_string(),
        ));
    }

    Ok(NormalizedSeries {
        shape: ResponseShape::GeoJsonFeatures,
        site_name: None,
        unit: None,
        observations,
    })
}

// ---------------------------------------------------------------------------
// Nested timeSeries layout
// ---------------------------------------------------------------------------

fn from_nested_timeseries(body: &Value) -> Result<NormalizedSeries, PipelineError> {
    let series_list = body
        .get("value")
        .and_then(|v| v.get("timeSeries"))
        .and_then(|ts| ts.as_array())
        .ok_or_else(|| PipelineError::Schema("'value.timeSeries' is not an array".to_string()))?;

    let series = series_list.first().ok_or_else(|| {
        PipelineError::Schema("no timeSeries entries in response".to_string())
    })?;

    let site_name = series
        .get("sourceInfo")
        .and_then(|s| s.get("siteName"))
        .and_then(|n| n.as_str())
        .map(String::from);
    let unit = series
        .get("variable")
        .and_then(|v| v.get("unit"))
        .and_then(|u| u.get("unitCode"))
        .and_then(|u| u.as_str())
        .map(String::from);

    let values = series
        .get("values")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|set| set.get("value"))
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            PipelineError::Schema("'values[0].value' is not an array".to_string())
        })?;

    if values.is_empty() {
        return Err(PipelineError::Schema(
            "response contained no observations".to_string(),
        ));
    }

    let mut observations = Vec::with_capacity(values.len());
    for entry in values {
        let datetime = match entry.get("dateTime").and_then(|d| d.as_str()) {
            Some(d) => d.to_string(),
            None => continue,
        };
        observations.push(RawObservation {
            datetime,
            value: scalar_to_string(entry.get("value")),
        });
    }

    if observations.is_empty() {
        return Err(PipelineError::Schema(
            "no value entry carried a 'dateTime' field".to_string(),
        ));
    }

    Ok(NormalizedSeries {
        shape: ResponseShape::NestedTimeSeries,
        site_name,
        unit,
        observations,
    })
}

/// JSON scalars both APIs use for readings: strings stay as-is, numbers are
/// stringified, null and anything else become missing.
fn scalar_to_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn iv_body(values: Value) -> Value {
        json!({
            "value": {
                "timeSeries": [{
                    "sourceInfo": { "siteName": "RIO GRANDE AT ALBUQUERQUE, NM" },
                    "variable": { "unit": { "unitCode": "ft3/s" } },
                    "values": [{ "value": values }]
                }]
            }
        })
    }

    #[test]
    fn test_detects_nested_timeseries_shape() {
        let body = iv_body(json!([
            { "dateTime": "2024-05-01T12:00:00.000-06:00", "value": "1230" },
            { "dateTime": "2024-05-01T12:15:00.000-06:00", "value": "1250" },
        ]));
        let series = normalize(&body).expect("IV body should normalize");
        assert_eq!(series.shape, ResponseShape::NestedTimeSeries);
        assert_eq!(series.site_name.as_deref(), Some("RIO GRANDE AT ALBUQUERQUE, NM"));
        assert_eq!(series.unit.as_deref(), Some("ft3/s"));
        assert_eq!(series.observations.len(), 2);
        assert_eq!(series.observations[0].value.as_deref(), Some("1230"));
    }

    #[test]
    fn test_detects_geojson_features_shape() {
        let body = json!({
            "type": "FeatureCollection",
            "features": [
                { "properties": { "time": "2024-05-01T18:00:00Z", "value": 1230.0 } },
                { "properties": { "time": "2024-05-01T18:15:00Z", "value": 1250.0 } },
            ]
        });
        let series = normalize(&body).expect("GeoJSON body should normalize");
        assert_eq!(series.shape, ResponseShape::GeoJsonFeatures);
        assert_eq!(series.site_name, None);
        assert_eq!(series.observations.len(), 2);
    }

    #[test]
    fn test_numeric_and_string_values_both_survive_flattening() {
        let body = json!({
            "features": [
                { "properties": { "time": "2024-05-01T18:00:00Z", "value": 1230.5 } },
                { "properties": { "time": "2024-05-01T18:15:00Z", "value": "1250" } },
                { "properties": { "time": "2024-05-01T18:30:00Z", "value": null } },
            ]
        });
        let series = normalize(&body).expect("mixed scalar types should normalize");
        assert_eq!(series.observations[0].value.as_deref(), Some("1230.5"));
        assert_eq!(series.observations[1].value.as_deref(), Some("1250"));
        assert_eq!(series.observations[2].value, None);
    }

    #[test]
    fn test_source_order_is_preserved() {
        // The OGC API returns newest-first; the normalizer must not re-sort.
        let body = json!({
            "features": [
                { "properties": { "time": "2024-05-01T18:15:00Z", "value": 2.0 } },
                { "properties": { "time": "2024-05-01T18:00:00Z", "value": 1.0 } },
            ]
        });
        let series = normalize(&body).expect("should normalize");
        assert_eq!(series.observations[0].datetime, "2024-05-01T18:15:00Z");
        assert_eq!(series.observations[1].datetime, "2024-05-01T18:00:00Z");
    }

    #[test]
    fn test_unrecognized_layout_is_a_schema_error() {
        let body = json!({ "results": [] });
        match normalize(&body) {
            Err(PipelineError::Schema(msg)) => {
                assert!(msg.contains("unrecognized"), "got message: {}", msg);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_features_array_is_a_schema_error() {
        let body = json!({ "type": "FeatureCollection", "features": [] });
        assert!(matches!(normalize(&body), Err(PipelineError::Schema(_))));
    }

    #[test]
    fn test_empty_timeseries_list_is_a_schema_error() {
        // The IV API answers an unknown site with an empty timeSeries list
        // and HTTP 200, so this path is routine, not exotic.
        let body = json!({ "value": { "timeSeries": [] } });
        match normalize(&body) {
            Err(PipelineError::Schema(msg)) => {
                assert!(msg.contains("no timeSeries entries"), "got message: {}", msg);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_value_array_is_a_schema_error() {
        let body = iv_body(json!([]));
        match normalize(&body) {
            Err(PipelineError::Schema(msg)) => {
                assert!(msg.contains("no observations"), "got message: {}", msg);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_features_without_time_are_skipped() {
        let body = json!({
            "features": [
                { "properties": { "value": 5.0 } },
                { "properties": { "time": "2024-05-01T18:00:00Z", "value": 5.0 } },
            ]
        });
        let series = normalize(&body).expect("one usable feature is enough");
        assert_eq!(series.observations.len(), 1);
    }
}
