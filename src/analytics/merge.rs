use std::collections::{HashMap, HashSet};

use super::parse_timestamp;
use crate::domain::{FlowTarget, ForecastPoint, MergedPoint, ResampledPoint};

/// Join a historical resampled series and a forecast series on their exact
/// timestamp strings.
///
/// Keys are matched byte-for-byte, no timezone normalization: the backend
/// formats both feeds identically and the comparison table relies on that.
/// Each key of the union appears exactly once; a side missing the key
/// contributes `None`. The result is sorted ascending by parsed timestamp
/// (unparsable keys first, in encounter order). Within one input, a
/// duplicated key keeps the last occurrence.
pub fn merge_series(
    historical: &[ResampledPoint],
    target: FlowTarget,
    forecast: &[ForecastPoint],
) -> Vec<MergedPoint> {
    let mut hist_by_ts: HashMap<&str, Option<f64>> = HashMap::new();
    for point in historical {
        hist_by_ts.insert(point.ds.as_str(), target.of(point));
    }
    let mut fc_by_ts: HashMap<&str, &ForecastPoint> = HashMap::new();
    for point in forecast {
        fc_by_ts.insert(point.ds.as_str(), point);
    }

    let mut keys: Vec<&str> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for key in historical
        .iter()
        .map(|p| p.ds.as_str())
        .chain(forecast.iter().map(|p| p.ds.as_str()))
    {
        if seen.insert(key) {
            keys.push(key);
        }
    }
    keys.sort_by_key(|k| parse_timestamp(k));

    keys.into_iter()
        .map(|key| {
            let fc = fc_by_ts.get(key);
            MergedPoint {
                ds: key.to_string(),
                historical: hist_by_ts.get(key).copied().flatten(),
                predicted: fc.and_then(|p| p.yhat),
                lower: fc.and_then(|p| p.yhat_lower),
                upper: fc.and_then(|p| p.yhat_upper),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hist(ds: &str, fv: f64) -> ResampledPoint {
        ResampledPoint {
            ds: ds.to_string(),
            flow_volume: Some(fv),
            flow_rate: None,
        }
    }

    fn fc(ds: &str, yhat: f64) -> ForecastPoint {
        ForecastPoint {
            ds: ds.to_string(),
            yhat: Some(yhat),
            yhat_lower: Some(yhat - 1.0),
            yhat_upper: Some(yhat + 1.0),
        }
    }

    #[test]
    fn union_with_nulls_where_one_side_is_absent() {
        let historical = vec![hist("2024-01-01T00:00:00Z", 10.0), hist("2024-01-01T01:00:00Z", 11.0)];
        let forecast = vec![fc("2024-01-01T01:00:00Z", 12.0), fc("2024-01-01T02:00:00Z", 13.0)];

        let out = merge_series(&historical, FlowTarget::Volume, &forecast);
        assert_eq!(out.len(), 3);

        assert_eq!(out[0].historical, Some(10.0));
        assert_eq!(out[0].predicted, None);

        assert_eq!(out[1].historical, Some(11.0));
        assert_eq!(out[1].predicted, Some(12.0));

        assert_eq!(out[2].historical, None);
        assert_eq!(out[2].predicted, Some(13.0));
        assert_eq!(out[2].upper, Some(14.0));
    }

    #[test]
    fn sorted_ascending_by_parsed_timestamp() {
        let historical = vec![hist("2024-01-03T00:00:00Z", 1.0), hist("2024-01-01T00:00:00Z", 2.0)];
        let forecast = vec![fc("2024-01-02T00:00:00Z", 3.0)];
        let out = merge_series(&historical, FlowTarget::Volume, &forecast);
        let ds: Vec<&str> = out.iter().map(|p| p.ds.as_str()).collect();
        assert_eq!(
            ds,
            vec!["2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z", "2024-01-03T00:00:00Z"]
        );
    }

    #[test]
    fn keys_are_exact_strings_no_normalization() {
        // Same instant, different formatting: two distinct keys.
        let historical = vec![hist("2024-01-01T00:00:00Z", 1.0)];
        let forecast = vec![fc("2024-01-01T00:00:00+00:00", 2.0)];
        let out = merge_series(&historical, FlowTarget::Volume, &forecast);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn duplicate_key_within_a_side_keeps_the_last() {
        let historical = vec![hist("2024-01-01T00:00:00Z", 1.0), hist("2024-01-01T00:00:00Z", 2.0)];
        let out = merge_series(&historical, FlowTarget::Volume, &[]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].historical, Some(2.0));
    }

    #[test]
    fn merging_a_series_with_itself_populates_both_sides() {
        let points: Vec<ResampledPoint> =
            (0..5).map(|h| hist(&format!("2024-01-01T{h:02}:00:00Z"), h as f64)).collect();
        let forecast: Vec<ForecastPoint> =
            points.iter().map(|p| fc(&p.ds, p.flow_volume.unwrap())).collect();

        let out = merge_series(&points, FlowTarget::Volume, &forecast);
        assert_eq!(out.len(), points.len());
        for row in &out {
            assert!(row.historical.is_some());
            assert!(row.predicted.is_some());
        }
    }

    proptest! {
        #[test]
        fn output_is_the_key_union_each_exactly_once(
            hist_hours in proptest::collection::vec(0u32..48, 0..30),
            fc_hours in proptest::collection::vec(0u32..48, 0..30),
        ) {
            let key = |h: u32| format!("2024-01-{:02}T{:02}:00:00Z", h / 24 + 1, h % 24);
            let historical: Vec<ResampledPoint> =
                hist_hours.iter().map(|&h| hist(&key(h), h as f64)).collect();
            let forecast: Vec<ForecastPoint> =
                fc_hours.iter().map(|&h| fc(&key(h), h as f64)).collect();

            let out = merge_series(&historical, FlowTarget::Volume, &forecast);

            let union: std::collections::HashSet<String> = hist_hours
                .iter()
                .chain(fc_hours.iter())
                .map(|&h| key(h))
                .collect();
            prop_assert_eq!(out.len(), union.len());

            let mut seen = std::collections::HashSet::new();
            for row in &out {
                prop_assert!(seen.insert(row.ds.clone()), "duplicate key {}", row.ds);
                prop_assert!(union.contains(&row.ds));
            }

            for pair in out.windows(2) {
                prop_assert!(parse_timestamp(&pair[0].ds) <= parse_timestamp(&pair[1].ds));
            }
        }
    }
}
