use chrono::Timelike;

use super::parse_timestamp;
use crate::domain::HourlyAverage;

/// Mean value per UTC hour-of-day, as a dense 24-entry series.
///
/// `timestamp` and `value` select the relevant fields of each item;
/// `value` returning `None` (a sanitized `NaN`) drops the item. Hours with
/// no data are reported as exactly 0.0 rather than omitted, because the bar
/// chart assumes a dense series with labels "00:00" through "23:00".
pub fn hourly_averages<T>(
    items: &[T],
    timestamp: impl Fn(&T) -> &str,
    value: impl Fn(&T) -> Option<f64>,
) -> Vec<HourlyAverage> {
    let mut sums = [0.0f64; 24];
    let mut counts = [0u32; 24];

    for item in items {
        let Some(ts) = parse_timestamp(timestamp(item)) else {
            continue;
        };
        let Some(v) = value(item) else { continue };
        let hour = ts.hour() as usize;
        sums[hour] += v;
        counts[hour] += 1;
    }

    (0..24)
        .map(|hour| HourlyAverage {
            hour: format!("{hour:02}:00"),
            average: if counts[hour] > 0 {
                sums[hour] / counts[hour] as f64
            } else {
                0.0
            },
        })
        .collect()
}
