use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::parse_timestamp;
use crate::domain::MeterReading;

/// Reduce a raw readings list to the single most recent reading per meter
/// code. Meter codes are exact, case-sensitive keys.
///
/// The winner per meter is the reading with the greatest parsed timestamp;
/// when two readings tie exactly, the one later in input order wins.
/// Unparsable timestamps compare below every parsable one, so an invalid
/// date never displaces a valid reading. Output keeps first-seen meter
/// order.
pub fn latest_per_meter(readings: &[MeterReading]) -> Vec<MeterReading> {
    // meter code -> (slot in `out`, winning timestamp)
    let mut slots: HashMap<&str, (usize, Option<DateTime<Utc>>)> = HashMap::new();
    let mut out: Vec<MeterReading> = Vec::new();

    for reading in readings {
        let ts = parse_timestamp(&reading.timestamp);
        match slots.entry(reading.meter_code.as_str()) {
            Entry::Vacant(entry) => {
                entry.insert((out.len(), ts));
                out.push(reading.clone());
            }
            Entry::Occupied(mut entry) => {
                let (slot, best) = entry.get_mut();
                // None < Some(_), so >= gives last-write-wins on exact ties
                // and keeps invalid dates from winning over valid ones.
                if ts >= *best {
                    out[*slot] = reading.clone();
                    *best = ts;
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn reading(meter: &str, ts: &str, fv: f64) -> MeterReading {
        MeterReading {
            meter_code: meter.to_string(),
            timestamp: ts.to_string(),
            flow_rate: 0.0,
            flow_volume: fv,
            net_total: 0.0,
            today: 0.0,
            extra: Default::default(),
        }
    }

    #[test]
    fn keeps_most_recent_reading_per_meter() {
        let input = vec![
            reading("M1", "2024-01-01T00:00:00Z", 10.0),
            reading("M1", "2024-01-02T00:00:00Z", 20.0),
        ];
        let out = latest_per_meter(&input);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].timestamp, "2024-01-02T00:00:00Z");
        assert_eq!(out[0].flow_volume, 20.0);
    }

    #[test]
    fn exact_timestamp_tie_is_last_write_wins() {
        let input = vec![
            reading("M1", "2024-01-01T00:00:00Z", 1.0),
            reading("M1", "2024-01-01T00:00:00Z", 2.0),
        ];
        let out = latest_per_meter(&input);
        assert_eq!(out[0].flow_volume, 2.0);
    }

    #[test]
    fn invalid_date_never_beats_a_valid_one() {
        let input = vec![
            reading("M1", "2024-01-01T00:00:00Z", 1.0),
            reading("M1", "garbage", 2.0),
        ];
        let out = latest_per_meter(&input);
        assert_eq!(out[0].flow_volume, 1.0);

        // ...but a valid date arriving after garbage does win.
        let input = vec![
            reading("M2", "garbage", 1.0),
            reading("M2", "2024-01-01T00:00:00Z", 2.0),
        ];
        assert_eq!(latest_per_meter(&input)[0].flow_volume, 2.0);
    }

    #[test]
    fn meter_codes_are_case_sensitive() {
        let input = vec![
            reading("m1", "2024-01-01T00:00:00Z", 1.0),
            reading("M1", "2024-01-02T00:00:00Z", 2.0),
        ];
        assert_eq!(latest_per_meter(&input).len(), 2);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(latest_per_meter(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn one_entry_per_distinct_meter_and_it_is_maximal(
            rows in proptest::collection::vec(
                ("M[0-9]", 0u32..5, 0u32..28),
                0..40,
            )
        ) {
            let input: Vec<MeterReading> = rows
                .iter()
                .map(|(meter, month_off, day_off)| reading(
                    meter,
                    &format!("2024-{:02}-{:02}T00:00:00Z", month_off + 1, day_off + 1),
                    0.0,
                ))
                .collect();

            let out = latest_per_meter(&input);

            let distinct: HashSet<&str> =
                input.iter().map(|r| r.meter_code.as_str()).collect();
            prop_assert_eq!(out.len(), distinct.len());

            for kept in &out {
                let kept_ts = parse_timestamp(&kept.timestamp);
                for other in input.iter().filter(|r| r.meter_code == kept.meter_code) {
                    prop_assert!(kept_ts >= parse_timestamp(&other.timestamp));
                }
            }
        }
    }
}
