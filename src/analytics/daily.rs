use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::parse_timestamp;
use crate::domain::{DailyForecast, ForecastRecord};

/// How many of the most recent days the daily chart shows.
const MAX_DAYS: usize = 12;

/// Group forecast records by UTC calendar day and average each day's
/// predicted value and confidence bounds. Records whose timestamp does not
/// parse are skipped. The result is sorted ascending by date and truncated
/// to the most recent [`MAX_DAYS`] days.
pub fn aggregate_by_day(records: &[ForecastRecord]) -> Vec<DailyForecast> {
    let mut groups: BTreeMap<NaiveDate, Vec<&ForecastRecord>> = BTreeMap::new();
    for record in records {
        if let Some(ts) = parse_timestamp(&record.timestamp) {
            groups.entry(ts.date_naive()).or_default().push(record);
        }
    }

    let mut days: Vec<DailyForecast> = groups
        .into_iter()
        .map(|(date, day)| {
            let n = day.len() as f64;
            let predicted_mean = day.iter().map(|r| r.predicted).sum::<f64>() / n;
            let lower_mean = day.iter().map(|r| r.lower).sum::<f64>() / n;
            let upper_mean = day.iter().map(|r| r.upper).sum::<f64>() / n;
            DailyForecast {
                date,
                predicted_mean,
                lower_mean,
                upper_mean,
                confidence_band: upper_mean - lower_mean,
            }
        })
        .collect();

    // BTreeMap iteration is already date-ascending; keep only the tail.
    if days.len() > MAX_DAYS {
        days.drain(..days.len() - MAX_DAYS);
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Granularity;

    fn record(ts: &str, predicted: f64, lower: f64, upper: f64) -> ForecastRecord {
        ForecastRecord {
            timestamp: ts.to_string(),
            predicted,
            lower,
            upper,
            meter_code: "M1".to_string(),
            granularity: Granularity::Daily,
        }
    }

    #[test]
    fn averages_within_a_day() {
        let input = vec![
            record("2024-03-01T06:00:00Z", 10.0, 5.0, 15.0),
            record("2024-03-01T18:00:00Z", 20.0, 10.0, 30.0),
        ];
        let out = aggregate_by_day(&input);
        assert_eq!(out.len(), 1);
        assert!((out[0].predicted_mean - 15.0).abs() < 1e-9);
        assert!((out[0].lower_mean - 7.5).abs() < 1e-9);
        assert!((out[0].upper_mean - 22.5).abs() < 1e-9);
        assert!((out[0].confidence_band - 15.0).abs() < 1e-9);
    }

    #[test]
    fn single_record_day_band_is_its_own_spread() {
        let out = aggregate_by_day(&[record("2024-03-01T00:00:00Z", 10.0, 4.0, 9.0)]);
        assert_eq!(out.len(), 1);
        assert!((out[0].confidence_band - 5.0).abs() < 1e-9);
    }

    #[test]
    fn sorted_ascending_and_truncated_to_most_recent_twelve() {
        let input: Vec<ForecastRecord> = (1..=20)
            .map(|day| record(&format!("2024-03-{day:02}T12:00:00Z"), day as f64, 0.0, 1.0))
            .collect();
        let out = aggregate_by_day(&input);
        assert_eq!(out.len(), 12);
        assert_eq!(out[0].date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(out[11].date, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
        assert!(out.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn output_never_exceeds_distinct_days() {
        let input = vec![
            record("2024-03-01T00:00:00Z", 1.0, 0.0, 2.0),
            record("2024-03-01T12:00:00Z", 3.0, 1.0, 4.0),
            record("2024-03-02T00:00:00Z", 5.0, 2.0, 6.0),
        ];
        assert_eq!(aggregate_by_day(&input).len(), 2);
    }

    #[test]
    fn unparsable_timestamps_are_skipped() {
        let input = vec![
            record("garbage", 1.0, 0.0, 2.0),
            record("2024-03-01T00:00:00Z", 3.0, 1.0, 4.0),
        ];
        let out = aggregate_by_day(&input);
        assert_eq!(out.len(), 1);
        assert!((out[0].predicted_mean - 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(aggregate_by_day(&[]).is_empty());
    }
}
