//! Weight-log trend summary.

use crate::WeightEntry;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// First and latest measurement over a span of weight entries
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WeightTrend {
    pub first_kg: f64,
    pub first_at: DateTime<Utc>,
    pub latest_kg: f64,
    pub latest_at: DateTime<Utc>,
    pub change_kg: f64,
    pub measurements: usize,
}

/// Summarize weight entries, or `None` when there are none
pub fn weight_trend(entries: &[WeightEntry]) -> Option<WeightTrend> {
    let first = entries.iter().min_by_key(|e| e.timestamp)?;
    let latest = entries.iter().max_by_key(|e| e.timestamp)?;

    Some(WeightTrend {
        first_kg: first.weight_kg,
        first_at: first.timestamp,
        latest_kg: latest.weight_kg,
        latest_at: latest.timestamp,
        change_kg: latest.weight_kg - first.weight_kg,
        measurements: entries.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(kg: f64, days_ago: i64) -> WeightEntry {
        WeightEntry {
            weight_kg: kg,
            timestamp: Utc::now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn test_empty_has_no_trend() {
        assert!(weight_trend(&[]).is_none());
    }

    #[test]
    fn test_trend_ignores_input_order() {
        let entries = vec![entry(71.5, 3), entry(72.0, 10), entry(70.5, 0)];
        let trend = weight_trend(&entries).unwrap();
        assert_eq!(trend.first_kg, 72.0);
        assert_eq!(trend.latest_kg, 70.5);
        assert_eq!(trend.change_kg, -1.5);
        assert_eq!(trend.measurements, 3);
    }

    #[test]
    fn test_single_measurement() {
        let trend = weight_trend(&[entry(80.0, 1)]).unwrap();
        assert_eq!(trend.change_kg, 0.0);
        assert_eq!(trend.first_at, trend.latest_at);
    }
}
