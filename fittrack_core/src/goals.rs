//! Goal engine: daily calorie, macro and water targets.
//!
//! Targets derive from TDEE and the chosen objective:
//! - Calories: TDEE adjusted by the objective's offset, never below the floor
//! - Macros: fixed calorie split per objective, converted to grams
//! - Water: per-kilogram allowance with a minimum

use crate::config::GoalConfig;
use crate::{
    BoundedTarget, Goal, GoalBoundsWarning, HealthMetrics, Objective, UserProfile,
    ValidationError,
};

pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Share of calories per macronutrient
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MacroSplit {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroSplit {
    pub fn for_objective(objective: Objective) -> Self {
        match objective {
            Objective::Lose => MacroSplit {
                protein: 0.40,
                carbs: 0.30,
                fat: 0.30,
            },
            Objective::Maintain => MacroSplit {
                protein: 0.30,
                carbs: 0.40,
                fat: 0.30,
            },
            Objective::Gain => MacroSplit {
                protein: 0.30,
                carbs: 0.45,
                fat: 0.25,
            },
        }
    }
}

/// A goal together with any floors that were applied
#[derive(Clone, Debug, PartialEq)]
pub struct GoalPlan {
    pub goal: Goal,
    pub warnings: Vec<GoalBoundsWarning>,
}

fn calorie_offset(objective: Objective, config: &GoalConfig) -> f64 {
    match objective {
        Objective::Lose => -config.deficit_kcal,
        Objective::Maintain => 0.0,
        Objective::Gain => config.surplus_kcal,
    }
}

/// Derive daily targets from metrics and an objective
///
/// Clamping to a floor is reported through `GoalPlan::warnings` rather than
/// failing. Non-positive TDEE or weight is a `ValidationError`.
pub fn derive_goal(
    profile: &UserProfile,
    metrics: &HealthMetrics,
    objective: Objective,
    config: &GoalConfig,
) -> Result<GoalPlan, ValidationError> {
    crate::normalizer::require_positive("tdee", metrics.tdee)?;
    crate::normalizer::require_positive("weight_kg", profile.weight_kg)?;

    let mut warnings = Vec::new();

    let computed_calories = metrics.tdee + calorie_offset(objective, config);
    let calorie_target = if computed_calories < config.calorie_floor_kcal {
        warnings.push(GoalBoundsWarning {
            target: BoundedTarget::Calories,
            computed: computed_calories,
            floor: config.calorie_floor_kcal,
        });
        config.calorie_floor_kcal
    } else {
        computed_calories
    };

    let computed_water = config.water_ml_per_kg * profile.weight_kg;
    let water_ml = if computed_water < config.water_floor_ml {
        warnings.push(GoalBoundsWarning {
            target: BoundedTarget::Water,
            computed: computed_water,
            floor: config.water_floor_ml,
        });
        config.water_floor_ml
    } else {
        computed_water
    };

    let split = MacroSplit::for_objective(objective);
    let goal = Goal {
        calorie_target,
        protein_g: calorie_target * split.protein / KCAL_PER_G_PROTEIN,
        carbs_g: calorie_target * split.carbs / KCAL_PER_G_CARBS,
        fat_g: calorie_target * split.fat / KCAL_PER_G_FAT,
        water_ml,
        fiber_g: config.fiber_g,
        objective,
    };

    for warning in &warnings {
        tracing::warn!("Goal bounds applied: {}", warning);
    }
    tracing::debug!(?goal, "Derived goal");

    Ok(GoalPlan { goal, warnings })
}
