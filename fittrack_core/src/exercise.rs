//! Built-in exercise catalog and calorie-burn estimation.
//!
//! Calories burned follow the MET method: `MET × weight_kg × hours`.

use crate::{ExerciseEntry, ValidationError};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// MET used when an activity is not in the catalog
pub const DEFAULT_MET: f64 = 3.5;

/// Cached MET table - built once and reused across all lookups
static MET_TABLE: Lazy<BTreeMap<&'static str, f64>> = Lazy::new(|| {
    BTreeMap::from([
        ("Walking (slow)", 2.5),
        ("Walking (moderate)", 3.5),
        ("Walking (fast)", 4.5),
        ("Running (slow)", 6.0),
        ("Running (moderate)", 8.0),
        ("Running (fast)", 11.0),
        ("Cycling (light)", 4.0),
        ("Cycling (moderate)", 6.0),
        ("Cycling (intense)", 10.0),
        ("Swimming", 6.0),
        ("Yoga", 2.5),
        ("Weight Training", 3.5),
        ("HIIT", 8.0),
        ("Dancing", 4.5),
        ("Sports (moderate)", 6.0),
        ("Sports (intense)", 8.0),
        ("Household chores", 3.0),
        ("Gardening", 4.0),
    ])
});

/// All catalog activities with their MET values, sorted by name
pub fn activities() -> impl Iterator<Item = (&'static str, f64)> {
    MET_TABLE.iter().map(|(name, met)| (*name, *met))
}

/// Look up an activity's MET value, ignoring case
pub fn met_for(activity: &str) -> Option<f64> {
    let wanted = activity.trim();
    MET_TABLE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
        .map(|(_, met)| *met)
}

/// Estimate calories burned, rounded to the nearest kcal
pub fn calories_burned(
    met: f64,
    weight_kg: f64,
    duration_min: f64,
) -> Result<f64, ValidationError> {
    crate::normalizer::require_positive("met_value", met)?;
    crate::normalizer::require_positive("weight_kg", weight_kg)?;
    crate::normalizer::require_positive("duration_min", duration_min)?;
    Ok((met * weight_kg * duration_min / 60.0).round())
}

impl ExerciseEntry {
    /// Build an entry whose calories are derived from MET, weight and duration
    ///
    /// When `met_value` is `None` the catalog is consulted, falling back to
    /// [`DEFAULT_MET`] for unknown activities.
    pub fn estimate(
        activity_type: impl Into<String>,
        met_value: Option<f64>,
        duration_min: f64,
        weight_kg: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let activity_type = activity_type.into();
        let met_value = match met_value {
            Some(met) => met,
            None => met_for(&activity_type).unwrap_or_else(|| {
                tracing::info!(
                    "Activity {:?} not in catalog, using default MET {}",
                    activity_type,
                    DEFAULT_MET
                );
                DEFAULT_MET
            }),
        };
        let calories_burned = calories_burned(met_value, weight_kg, duration_min)?;

        Ok(ExerciseEntry {
            activity_type,
            met_value,
            duration_min,
            calories_burned,
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(met_for("Running (moderate)"), Some(8.0));
        assert_eq!(met_for("yoga"), Some(2.5));
        assert_eq!(met_for("hiit "), Some(8.0));
        assert_eq!(met_for("Underwater basket weaving"), None);
    }

    #[test]
    fn test_catalog_is_complete() {
        assert_eq!(activities().count(), 18);
        assert!(activities().all(|(_, met)| met > 0.0));
    }

    #[test]
    fn test_calories_burned() {
        // 8 MET * 70 kg * 0.5 h
        assert_eq!(calories_burned(8.0, 70.0, 30.0).unwrap(), 280.0);
        // 2.5 * 68 * 45 / 60 = 127.5, rounds half away from zero
        assert_eq!(calories_burned(2.5, 68.0, 45.0).unwrap(), 128.0);
    }

    #[test]
    fn test_calories_burned_rejects_bad_input() {
        assert!(matches!(
            calories_burned(8.0, 70.0, 0.0),
            Err(ValidationError::NonPositive { field: "duration_min", .. })
        ));
        assert!(calories_burned(-1.0, 70.0, 30.0).is_err());
    }

    #[test]
    fn test_estimate_uses_catalog_and_default() {
        let now = Utc::now();
        let run = ExerciseEntry::estimate("Running (fast)", None, 20.0, 60.0, now).unwrap();
        assert_eq!(run.met_value, 11.0);
        assert_eq!(run.calories_burned, 220.0);

        let unknown = ExerciseEntry::estimate("Rock climbing", None, 60.0, 60.0, now).unwrap();
        assert_eq!(unknown.met_value, DEFAULT_MET);
        assert_eq!(unknown.calories_burned, 210.0);

        let explicit = ExerciseEntry::estimate("Rowing", Some(7.0), 30.0, 80.0, now).unwrap();
        assert_eq!(explicit.calories_burned, 280.0);
    }
}
