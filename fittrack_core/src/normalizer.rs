//! Unit and profile normalization.
//!
//! Converts raw, possibly imperial, possibly incomplete biometrics into a
//! canonical metric [`UserProfile`].

use crate::{ActivityLevel, Sex, UserProfile, ValidationError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const CM_PER_INCH: f64 = 2.54;
const CM_PER_FOOT: f64 = 30.48;
const KG_PER_POUND: f64 = 0.453_592_37;

/// Unit a raw height is expressed in
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HeightUnit {
    #[default]
    Cm,
    M,
    In,
    Ft,
}

impl HeightUnit {
    pub fn to_cm(self, value: f64) -> f64 {
        match self {
            HeightUnit::Cm => value,
            HeightUnit::M => value * 100.0,
            HeightUnit::In => value * CM_PER_INCH,
            HeightUnit::Ft => value * CM_PER_FOOT,
        }
    }
}

impl FromStr for HeightUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match crate::types::canonical_token(s).as_str() {
            "cm" | "centimeters" => Ok(HeightUnit::Cm),
            "m" | "meters" => Ok(HeightUnit::M),
            "in" | "inches" => Ok(HeightUnit::In),
            "ft" | "feet" => Ok(HeightUnit::Ft),
            _ => Err(ValidationError::UnknownVariant {
                field: "height_unit",
                value: s.to_string(),
            }),
        }
    }
}

/// Unit a raw weight is expressed in
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl WeightUnit {
    pub fn to_kg(self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lb => value * KG_PER_POUND,
        }
    }
}

impl FromStr for WeightUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match crate::types::canonical_token(s).as_str() {
            "kg" | "kilograms" => Ok(WeightUnit::Kg),
            "lb" | "lbs" | "pounds" => Ok(WeightUnit::Lb),
            _ => Err(ValidationError::UnknownVariant {
                field: "weight_unit",
                value: s.to_string(),
            }),
        }
    }
}

/// Profile fields as entered by the user
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RawProfile {
    pub height: Option<f64>,
    #[serde(default)]
    pub height_unit: HeightUnit,
    pub weight: Option<f64>,
    #[serde(default)]
    pub weight_unit: WeightUnit,
    pub age_years: Option<i64>,
    pub sex: Option<String>,
    pub activity_level: Option<String>,
}

impl From<&UserProfile> for RawProfile {
    fn from(profile: &UserProfile) -> Self {
        RawProfile {
            height: Some(profile.height_cm),
            height_unit: HeightUnit::Cm,
            weight: Some(profile.weight_kg),
            weight_unit: WeightUnit::Kg,
            age_years: Some(i64::from(profile.age_years)),
            sex: Some(
                match profile.sex {
                    Sex::Male => "male",
                    Sex::Female => "female",
                }
                .to_string(),
            ),
            activity_level: Some(
                match profile.activity_level {
                    ActivityLevel::Sedentary => "sedentary",
                    ActivityLevel::Light => "light",
                    ActivityLevel::Moderate => "moderate",
                    ActivityLevel::Active => "active",
                    ActivityLevel::VeryActive => "very_active",
                }
                .to_string(),
            ),
        }
    }
}

pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NonPositive { field, value })
    }
}

pub(crate) fn require_non_negative(
    field: &'static str,
    value: f64,
) -> Result<f64, ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NonPositive { field, value })
    }
}

/// Normalize raw profile input into a canonical metric profile
///
/// Missing fields, non-positive or non-finite measurements, and unrecognized
/// sex or activity values are rejected.
pub fn normalize(raw: &RawProfile) -> Result<UserProfile, ValidationError> {
    let height = raw.height.ok_or(ValidationError::Missing("height"))?;
    let height_cm = require_positive("height_cm", raw.height_unit.to_cm(height))?;

    let weight = raw.weight.ok_or(ValidationError::Missing("weight"))?;
    let weight_kg = require_positive("weight_kg", raw.weight_unit.to_kg(weight))?;

    let age = raw.age_years.ok_or(ValidationError::Missing("age_years"))?;
    let age_years = u32::try_from(age)
        .ok()
        .filter(|a| *a > 0)
        .ok_or(ValidationError::NonPositive {
            field: "age_years",
            value: age as f64,
        })?;

    let sex: Sex = raw
        .sex
        .as_deref()
        .ok_or(ValidationError::Missing("sex"))?
        .parse()?;

    let activity_level: ActivityLevel = raw
        .activity_level
        .as_deref()
        .ok_or(ValidationError::Missing("activity_level"))?
        .parse()?;

    let profile = UserProfile {
        height_cm,
        weight_kg,
        age_years,
        sex,
        activity_level,
    };
    tracing::debug!(?profile, "Normalized profile");
    Ok(profile)
}

impl UserProfile {
    /// Check that an already-canonical profile is within domain
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive("height_cm", self.height_cm)?;
        require_positive("weight_kg", self.weight_kg)?;
        if self.age_years == 0 {
            return Err(ValidationError::NonPositive {
                field: "age_years",
                value: 0.0,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric_raw() -> RawProfile {
        RawProfile {
            height: Some(175.0),
            height_unit: HeightUnit::Cm,
            weight: Some(70.0),
            weight_unit: WeightUnit::Kg,
            age_years: Some(25),
            sex: Some("Male".into()),
            activity_level: Some("Moderately Active".into()),
        }
    }

    #[test]
    fn test_normalize_metric_profile() {
        let profile = normalize(&metric_raw()).unwrap();
        assert_eq!(profile.height_cm, 175.0);
        assert_eq!(profile.weight_kg, 70.0);
        assert_eq!(profile.age_years, 25);
        assert_eq!(profile.sex, Sex::Male);
        assert_eq!(profile.activity_level, ActivityLevel::Moderate);
    }

    #[test]
    fn test_normalize_imperial_profile() {
        let raw = RawProfile {
            height: Some(70.0),
            height_unit: HeightUnit::In,
            weight: Some(150.0),
            weight_unit: WeightUnit::Lb,
            ..metric_raw()
        };
        let profile = normalize(&raw).unwrap();
        assert!((profile.height_cm - 177.8).abs() < 1e-9);
        assert!((profile.weight_kg - 68.0388555).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize(&metric_raw()).unwrap();
        let twice = normalize(&RawProfile::from(&once)).unwrap();
        assert_eq!(once, twice);

        let imperial = RawProfile {
            height: Some(5.75),
            height_unit: HeightUnit::Ft,
            weight: Some(181.5),
            weight_unit: WeightUnit::Lb,
            ..metric_raw()
        };
        let once = normalize(&imperial).unwrap();
        assert_eq!(normalize(&RawProfile::from(&once)).unwrap(), once);
    }

    #[test]
    fn test_missing_field_rejected() {
        let raw = RawProfile {
            weight: None,
            ..metric_raw()
        };
        assert_eq!(normalize(&raw), Err(ValidationError::Missing("weight")));
    }

    #[test]
    fn test_non_positive_measurements_rejected() {
        let raw = RawProfile {
            height: Some(0.0),
            ..metric_raw()
        };
        assert!(matches!(
            normalize(&raw),
            Err(ValidationError::NonPositive { field: "height_cm", .. })
        ));

        let raw = RawProfile {
            weight: Some(f64::NAN),
            ..metric_raw()
        };
        assert!(matches!(
            normalize(&raw),
            Err(ValidationError::NonPositive { field: "weight_kg", .. })
        ));

        let raw = RawProfile {
            age_years: Some(-3),
            ..metric_raw()
        };
        assert!(matches!(
            normalize(&raw),
            Err(ValidationError::NonPositive { field: "age_years", .. })
        ));
    }

    #[test]
    fn test_unknown_enum_values_rejected() {
        let raw = RawProfile {
            sex: Some("other".into()),
            ..metric_raw()
        };
        assert!(matches!(
            normalize(&raw),
            Err(ValidationError::UnknownVariant { field: "sex", .. })
        ));

        let raw = RawProfile {
            activity_level: Some("hyperactive".into()),
            ..metric_raw()
        };
        assert!(matches!(
            normalize(&raw),
            Err(ValidationError::UnknownVariant { field: "activity_level", .. })
        ));
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("CM".parse::<HeightUnit>().unwrap(), HeightUnit::Cm);
        assert_eq!("lbs".parse::<WeightUnit>().unwrap(), WeightUnit::Lb);
        assert!("stone".parse::<WeightUnit>().is_err());
    }
}
