//! Core domain types for FitTrack.
//!
//! This module defines the value types shared by every component:
//! - Profile enums and the canonical user profile
//! - Derived health metrics and goals
//! - Logged entries (food, exercise, water, weight)
//! - Daily aggregates and progress classifications

use crate::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lowercase, and fold spaces and hyphens into underscores.
pub(crate) fn canonical_token(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

// ============================================================================
// Profile Enums
// ============================================================================

/// Biological sex, used by the BMR equation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl FromStr for Sex {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical_token(s).as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => Err(ValidationError::UnknownVariant {
                field: "sex",
                value: s.to_string(),
            }),
        }
    }
}

/// Habitual activity level, mapped to a TDEE multiplier
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    /// TDEE multiplier applied to BMR
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

/// Labels are matched by level name, so "Very Active" is `very_active` (1.9)
impl FromStr for ActivityLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical_token(s).as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" | "lightly_active" => Ok(ActivityLevel::Light),
            "moderate" | "moderately_active" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "very_active" | "extra_active" => Ok(ActivityLevel::VeryActive),
            _ => Err(ValidationError::UnknownVariant {
                field: "activity_level",
                value: s.to_string(),
            }),
        }
    }
}

/// Weight objective selected by the user
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Lose,
    Maintain,
    Gain,
}

impl FromStr for Objective {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical_token(s).as_str() {
            "lose" | "lose_weight" => Ok(Objective::Lose),
            "maintain" | "maintain_weight" => Ok(Objective::Maintain),
            "gain" | "gain_weight" => Ok(Objective::Gain),
            _ => Err(ValidationError::UnknownVariant {
                field: "objective",
                value: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// Profile and Derived Metrics
// ============================================================================

/// Canonical, metric-unit profile snapshot
///
/// Produced by the normalizer; replaced wholesale when the user edits it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age_years: u32,
    pub sex: Sex,
    pub activity_level: ActivityLevel,
}

/// BMI classification bands
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum BmiClass {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl fmt::Display for BmiClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BmiClass::Underweight => "underweight",
            BmiClass::Normal => "normal",
            BmiClass::Overweight => "overweight",
            BmiClass::Obese => "obese",
        };
        f.write_str(label)
    }
}

/// Metrics derived from a profile
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthMetrics {
    pub bmi: f64,
    pub bmi_class: BmiClass,
    pub bmr: f64,
    pub tdee: f64,
}

/// Daily targets derived from metrics and an objective
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub calorie_target: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub water_ml: f64,
    #[serde(default)]
    pub fiber_g: f64,
    pub objective: Objective,
}

// ============================================================================
// Logged Entries
// ============================================================================

/// Meal slot for a food entry
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl Meal {
    pub const ALL: [Meal; 4] = [Meal::Breakfast, Meal::Lunch, Meal::Dinner, Meal::Snack];
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Meal::Breakfast => "Breakfast",
            Meal::Lunch => "Lunch",
            Meal::Dinner => "Dinner",
            Meal::Snack => "Snack",
        };
        f.write_str(label)
    }
}

impl FromStr for Meal {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical_token(s).as_str() {
            "breakfast" => Ok(Meal::Breakfast),
            "lunch" => Ok(Meal::Lunch),
            "dinner" => Ok(Meal::Dinner),
            "snack" => Ok(Meal::Snack),
            _ => Err(ValidationError::UnknownVariant {
                field: "meal",
                value: s.to_string(),
            }),
        }
    }
}

/// Nutrients for a single serving of a food
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ServingNutrients {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    #[serde(default)]
    pub fiber_g: f64,
}

/// A logged food item; nutrient fields are totals for `quantity` servings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FoodEntry {
    pub food_id: String,
    pub meal: Meal,
    pub quantity: f64,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    #[serde(default)]
    pub fiber_g: f64,
    pub timestamp: DateTime<Utc>,
}

impl FoodEntry {
    /// Build an entry by scaling per-serving nutrients by `quantity`
    pub fn from_serving(
        food_id: impl Into<String>,
        meal: Meal,
        quantity: f64,
        per_serving: &ServingNutrients,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        crate::normalizer::require_positive("quantity", quantity)?;
        for (field, value) in [
            ("calories", per_serving.calories),
            ("protein_g", per_serving.protein_g),
            ("carbs_g", per_serving.carbs_g),
            ("fat_g", per_serving.fat_g),
            ("fiber_g", per_serving.fiber_g),
        ] {
            crate::normalizer::require_non_negative(field, value)?;
        }

        Ok(FoodEntry {
            food_id: food_id.into(),
            meal,
            quantity,
            calories: per_serving.calories * quantity,
            protein_g: per_serving.protein_g * quantity,
            carbs_g: per_serving.carbs_g * quantity,
            fat_g: per_serving.fat_g * quantity,
            fiber_g: per_serving.fiber_g * quantity,
            timestamp,
        })
    }
}

/// A logged exercise bout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseEntry {
    pub activity_type: String,
    pub met_value: f64,
    pub duration_min: f64,
    pub calories_burned: f64,
    pub timestamp: DateTime<Utc>,
}

/// A logged drink of water
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WaterEntry {
    pub amount_ml: f64,
    pub timestamp: DateTime<Utc>,
}

/// A logged body-weight measurement
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeightEntry {
    pub weight_kg: f64,
    pub timestamp: DateTime<Utc>,
}

/// Any entry that can be written to the journal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEntry {
    Food(FoodEntry),
    Exercise(ExerciseEntry),
    Water(WaterEntry),
    Weight(WeightEntry),
}

impl LogEntry {
    /// Get the timestamp when this entry occurred
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            LogEntry::Food(e) => e.timestamp,
            LogEntry::Exercise(e) => e.timestamp,
            LogEntry::Water(e) => e.timestamp,
            LogEntry::Weight(e) => e.timestamp,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LogEntry::Food(_) => "food",
            LogEntry::Exercise(_) => "exercise",
            LogEntry::Water(_) => "water",
            LogEntry::Weight(_) => "weight",
        }
    }
}

/// A journal line: an entry plus its identity
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct JournalRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub entry: LogEntry,
}

impl JournalRecord {
    pub fn new(entry: LogEntry) -> Self {
        Self {
            id: Uuid::new_v4(),
            entry,
        }
    }
}

// ============================================================================
// Aggregates and Progress
// ============================================================================

/// Totals over one calendar day of entries
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DailyAggregate {
    pub calories_consumed: f64,
    pub calories_burned: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub water_ml: f64,
    pub food_entries: usize,
    pub exercise_entries: usize,
    pub water_entries: usize,
}

impl DailyAggregate {
    /// Calories consumed minus calories burned
    pub fn net_calories(&self) -> f64 {
        self.calories_consumed - self.calories_burned
    }

    /// Calories left before reaching the goal's target (negative when over)
    pub fn remaining_calories(&self, goal: &Goal) -> f64 {
        goal.calorie_target - self.net_calories()
    }
}

/// Progress classification for one metric
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Under,
    OnTrack,
    Over,
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProgressStatus::Under => "under",
            ProgressStatus::OnTrack => "on_track",
            ProgressStatus::Over => "over",
        };
        f.write_str(label)
    }
}

/// Actual versus target for one metric
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MetricProgress {
    pub actual: f64,
    pub target: f64,
    pub percent: f64,
    pub status: ProgressStatus,
}

/// Progress for every tracked metric of a day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressReport {
    pub calories: MetricProgress,
    pub protein: MetricProgress,
    pub carbs: MetricProgress,
    pub fat: MetricProgress,
    pub water: MetricProgress,
    pub fiber: MetricProgress,
}

impl ProgressReport {
    /// Metrics in display order with their labels
    pub fn rows(&self) -> [(&'static str, &MetricProgress); 6] {
        [
            ("Calories (net)", &self.calories),
            ("Protein (g)", &self.protein),
            ("Carbs (g)", &self.carbs),
            ("Fat (g)", &self.fat),
            ("Fiber (g)", &self.fiber),
            ("Water (ml)", &self.water),
        ]
    }
}
