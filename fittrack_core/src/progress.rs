//! Progress evaluation of a day's totals against its goal.

use crate::config::ProgressConfig;
use crate::{DailyAggregate, Goal, MetricProgress, ProgressReport, ProgressStatus, ValidationError};

/// Classify an actual value against a target
///
/// Band edges are inclusive: exactly `lower_fraction` or `upper_fraction` of
/// the target is on track.
pub fn classify(actual: f64, target: f64, bands: &ProgressConfig) -> ProgressStatus {
    let ratio = actual / target;
    if ratio < bands.lower_fraction {
        ProgressStatus::Under
    } else if ratio > bands.upper_fraction {
        ProgressStatus::Over
    } else {
        ProgressStatus::OnTrack
    }
}

fn measure(
    field: &'static str,
    actual: f64,
    target: f64,
    bands: &ProgressConfig,
) -> Result<MetricProgress, ValidationError> {
    crate::normalizer::require_positive(field, target)?;
    Ok(MetricProgress {
        actual,
        target,
        percent: actual / target * 100.0,
        status: classify(actual, target, bands),
    })
}

/// Compare a day's aggregate to its goal
///
/// Calories are judged on net intake (consumed minus burned). Every goal
/// target must be positive.
pub fn evaluate(
    aggregate: &DailyAggregate,
    goal: &Goal,
    bands: &ProgressConfig,
) -> Result<ProgressReport, ValidationError> {
    let report = ProgressReport {
        calories: measure(
            "calorie_target",
            aggregate.net_calories(),
            goal.calorie_target,
            bands,
        )?,
        protein: measure("protein_g", aggregate.protein_g, goal.protein_g, bands)?,
        carbs: measure("carbs_g", aggregate.carbs_g, goal.carbs_g, bands)?,
        fat: measure("fat_g", aggregate.fat_g, goal.fat_g, bands)?,
        water: measure("water_ml", aggregate.water_ml, goal.water_ml, bands)?,
        fiber: measure("fiber_g", aggregate.fiber_g, goal.fiber_g, bands)?,
    };

    tracing::debug!(
        "Progress: calories {}, protein {}, carbs {}, fat {}, water {}, fiber {}",
        report.calories.status,
        report.protein.status,
        report.carbs.status,
        report.fat.status,
        report.water.status,
        report.fiber.status
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Objective;

    fn goal() -> Goal {
        Goal {
            calorie_target: 2000.0,
            protein_g: 150.0,
            carbs_g: 200.0,
            fat_g: 60.0,
            water_ml: 2500.0,
            fiber_g: 25.0,
            objective: Objective::Maintain,
        }
    }

    #[test]
    fn test_band_boundaries() {
        let bands = ProgressConfig::default();
        assert_eq!(classify(1800.0, 2000.0, &bands), ProgressStatus::OnTrack); // 90%
        assert_eq!(classify(1798.0, 2000.0, &bands), ProgressStatus::Under); // 89.9%
        assert_eq!(classify(2200.0, 2000.0, &bands), ProgressStatus::OnTrack); // 110%
        assert_eq!(classify(2202.0, 2000.0, &bands), ProgressStatus::Over); // 110.1%
        assert_eq!(classify(0.0, 2000.0, &bands), ProgressStatus::Under);
    }

    #[test]
    fn test_band_boundaries_other_targets() {
        let bands = ProgressConfig::default();
        assert_eq!(classify(135.0, 150.0, &bands), ProgressStatus::OnTrack);
        assert_eq!(classify(165.0, 150.0, &bands), ProgressStatus::OnTrack);
        assert_eq!(classify(2250.0, 2500.0, &bands), ProgressStatus::OnTrack);
        assert_eq!(classify(2247.5, 2500.0, &bands), ProgressStatus::Under);
        assert_eq!(classify(2752.5, 2500.0, &bands), ProgressStatus::Over);
    }

    #[test]
    fn test_evaluate_uses_net_calories() {
        let aggregate = DailyAggregate {
            calories_consumed: 2400.0,
            calories_burned: 500.0,
            protein_g: 100.0,
            carbs_g: 250.0,
            fat_g: 60.0,
            water_ml: 2500.0,
            fiber_g: 30.0,
            ..DailyAggregate::default()
        };
        let report = evaluate(&aggregate, &goal(), &ProgressConfig::default()).unwrap();

        assert_eq!(report.calories.actual, 1900.0);
        assert_eq!(report.calories.status, ProgressStatus::OnTrack);
        assert_eq!(report.protein.status, ProgressStatus::Under);
        assert_eq!(report.carbs.status, ProgressStatus::Over);
        assert_eq!(report.fat.status, ProgressStatus::OnTrack);
        assert_eq!(report.water.percent, 100.0);
        assert_eq!(report.fiber.status, ProgressStatus::Over);
    }

    #[test]
    fn test_empty_day_is_under_everywhere() {
        let report =
            evaluate(&DailyAggregate::default(), &goal(), &ProgressConfig::default()).unwrap();
        for (_, metric) in report.rows() {
            assert_eq!(metric.status, ProgressStatus::Under);
        }
    }

    #[test]
    fn test_custom_bands() {
        let bands = ProgressConfig {
            lower_fraction: 0.95,
            upper_fraction: 1.05,
        };
        assert_eq!(classify(1850.0, 2000.0, &bands), ProgressStatus::Under);
        assert_eq!(classify(2100.0, 2000.0, &bands), ProgressStatus::OnTrack);
    }

    #[test]
    fn test_zero_target_rejected() {
        let mut g = goal();
        g.fat_g = 0.0;
        let result = evaluate(&DailyAggregate::default(), &g, &ProgressConfig::default());
        assert!(matches!(result, Err(ValidationError::NonPositive { field: "fat_g", .. })));
    }
}
