//! Health metrics: BMI, BMR (Mifflin-St Jeor) and TDEE.

use crate::{BmiClass, HealthMetrics, Sex, UserProfile, ValidationError};

/// Body mass index from a canonical profile
pub fn bmi(profile: &UserProfile) -> f64 {
    let height_m = profile.height_cm / 100.0;
    profile.weight_kg / (height_m * height_m)
}

/// Classify a BMI value
///
/// Lower bounds are inclusive: 18.5 is normal, 25.0 overweight, 30.0 obese.
pub fn classify_bmi(bmi: f64) -> BmiClass {
    if bmi < 18.5 {
        BmiClass::Underweight
    } else if bmi < 25.0 {
        BmiClass::Normal
    } else if bmi < 30.0 {
        BmiClass::Overweight
    } else {
        BmiClass::Obese
    }
}

/// Basal metabolic rate (kcal/day), Mifflin-St Jeor (1990)
pub fn bmr(profile: &UserProfile) -> f64 {
    let base = 10.0 * profile.weight_kg + 6.25 * profile.height_cm
        - 5.0 * f64::from(profile.age_years);
    match profile.sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Total daily energy expenditure (kcal/day)
pub fn tdee(profile: &UserProfile) -> f64 {
    bmr(profile) * profile.activity_level.multiplier()
}

/// Compute all metrics for a profile
///
/// The profile is re-validated; an invalid one yields a `ValidationError`.
pub fn compute(profile: &UserProfile) -> Result<HealthMetrics, ValidationError> {
    profile.validate()?;

    let bmi = bmi(profile);
    let metrics = HealthMetrics {
        bmi,
        bmi_class: classify_bmi(bmi),
        bmr: bmr(profile),
        tdee: tdee(profile),
    };

    tracing::debug!(
        "Computed metrics: bmi={:.1} ({}), bmr={:.0}, tdee={:.0}",
        metrics.bmi,
        metrics.bmi_class,
        metrics.bmr,
        metrics.tdee
    );
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ActivityLevel;

    fn reference_profile() -> UserProfile {
        UserProfile {
            height_cm: 175.0,
            weight_kg: 70.0,
            age_years: 25,
            sex: Sex::Male,
            activity_level: ActivityLevel::Moderate,
        }
    }

    #[test]
    fn test_reference_bmr_and_tdee() {
        let metrics = compute(&reference_profile()).unwrap();
        assert_eq!(metrics.bmr, 1673.75);
        assert!((metrics.tdee - 2594.3125).abs() < 1e-9);
    }

    #[test]
    fn test_female_bmr_offset() {
        let profile = UserProfile {
            sex: Sex::Female,
            ..reference_profile()
        };
        assert_eq!(bmr(&profile), 1673.75 - 166.0);
    }

    #[test]
    fn test_bmi_value() {
        let value = bmi(&reference_profile());
        assert!((value - 22.857142857).abs() < 1e-6);
        assert_eq!(classify_bmi(value), BmiClass::Normal);
    }

    #[test]
    fn test_bmi_class_boundaries() {
        assert_eq!(classify_bmi(18.4), BmiClass::Underweight);
        assert_eq!(classify_bmi(18.5), BmiClass::Normal);
        assert_eq!(classify_bmi(24.9), BmiClass::Normal);
        assert_eq!(classify_bmi(25.0), BmiClass::Overweight);
        assert_eq!(classify_bmi(29.9), BmiClass::Overweight);
        assert_eq!(classify_bmi(30.0), BmiClass::Obese);
    }

    #[test]
    fn test_bmi_class_is_monotonic() {
        let mut previous = classify_bmi(10.0);
        let mut value = 10.0;
        while value < 45.0 {
            let class = classify_bmi(value);
            assert!(class >= previous, "class decreased at bmi {}", value);
            previous = class;
            value += 0.05;
        }
    }

    #[test]
    fn test_activity_multipliers() {
        let base = bmr(&reference_profile());
        for (level, multiplier) in ActivityLevel::ALL
            .iter()
            .zip([1.2, 1.375, 1.55, 1.725, 1.9])
        {
            let profile = UserProfile {
                activity_level: *level,
                ..reference_profile()
            };
            assert_eq!(tdee(&profile), base * multiplier);
        }
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let profile = UserProfile {
            weight_kg: -1.0,
            ..reference_profile()
        };
        assert!(matches!(
            compute(&profile),
            Err(ValidationError::NonPositive { field: "weight_kg", .. })
        ));

        let profile = UserProfile {
            age_years: 0,
            ..reference_profile()
        };
        assert!(compute(&profile).is_err());
    }
}
