//! Daily aggregation of logged entries.
//!
//! Entries are assigned to a calendar day using a fixed UTC offset, then
//! summed into a [`DailyAggregate`]. Totals do not depend on entry order.

use crate::{DailyAggregate, ExerciseEntry, FoodEntry, LogEntry, Meal, WaterEntry, WeightEntry};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Entries belonging to one calendar day
#[derive(Clone, Debug, Default)]
pub struct DayEntries {
    pub date: Option<NaiveDate>,
    pub food: Vec<FoodEntry>,
    pub exercise: Vec<ExerciseEntry>,
    pub water: Vec<WaterEntry>,
    pub weight: Vec<WeightEntry>,
}

impl DayEntries {
    pub fn aggregate(&self) -> DailyAggregate {
        aggregate(&self.food, &self.exercise, &self.water)
    }
}

/// Calendar date of a timestamp as seen at `offset`
pub fn local_date(timestamp: DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    timestamp.with_timezone(offset).date_naive()
}

/// Select the entries whose timestamp falls on `date` at `offset`
pub fn entries_for_day<'a, I>(entries: I, date: NaiveDate, offset: &FixedOffset) -> DayEntries
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let mut day = DayEntries {
        date: Some(date),
        ..DayEntries::default()
    };

    for entry in entries {
        if local_date(entry.timestamp(), offset) != date {
            continue;
        }
        match entry {
            LogEntry::Food(e) => day.food.push(e.clone()),
            LogEntry::Exercise(e) => day.exercise.push(e.clone()),
            LogEntry::Water(e) => day.water.push(e.clone()),
            LogEntry::Weight(e) => day.weight.push(e.clone()),
        }
    }

    tracing::debug!(
        "Selected {} food, {} exercise, {} water entries for {}",
        day.food.len(),
        day.exercise.len(),
        day.water.len(),
        date
    );
    day
}

/// Sum in a canonical order so the result is independent of input order
fn order_independent_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}

/// Sum a day's entries into totals
///
/// Entries sharing a timestamp are all counted. Empty input yields zeros.
pub fn aggregate(
    food: &[FoodEntry],
    exercise: &[ExerciseEntry],
    water: &[WaterEntry],
) -> DailyAggregate {
    DailyAggregate {
        calories_consumed: order_independent_sum(food.iter().map(|e| e.calories)),
        calories_burned: order_independent_sum(exercise.iter().map(|e| e.calories_burned)),
        protein_g: order_independent_sum(food.iter().map(|e| e.protein_g)),
        carbs_g: order_independent_sum(food.iter().map(|e| e.carbs_g)),
        fat_g: order_independent_sum(food.iter().map(|e| e.fat_g)),
        fiber_g: order_independent_sum(food.iter().map(|e| e.fiber_g)),
        water_ml: order_independent_sum(water.iter().map(|e| e.amount_ml)),
        food_entries: food.len(),
        exercise_entries: exercise.len(),
        water_entries: water.len(),
    }
}

/// Food totals per meal slot; meals with no entries are omitted
pub fn meal_totals(food: &[FoodEntry]) -> BTreeMap<Meal, DailyAggregate> {
    let mut by_meal: BTreeMap<Meal, Vec<FoodEntry>> = BTreeMap::new();
    for entry in food {
        by_meal.entry(entry.meal).or_default().push(entry.clone());
    }

    by_meal
        .into_iter()
        .map(|(meal, entries)| (meal, aggregate(&entries, &[], &[])))
        .collect()
}
