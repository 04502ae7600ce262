//! CSV export of daily summaries and the food diary.
//!
//! Rows are appended to the target file; a header row is written only when
//! the file is empty. The file is synced to disk before returning.

use crate::aggregate::{entries_for_day, local_date};
use crate::config::ProgressConfig;
use crate::{progress, Goal, JournalRecord, LogEntry, Result};
use chrono::{FixedOffset, NaiveDate};
use std::fs::OpenOptions;
use std::path::Path;

/// One calendar day in the summary export
#[derive(Debug, serde::Serialize)]
struct DaySummaryRow {
    date: String,
    calories_consumed: f64,
    calories_burned: f64,
    net_calories: f64,
    calorie_target: f64,
    calorie_status: String,
    protein_g: f64,
    protein_status: String,
    carbs_g: f64,
    carbs_status: String,
    fat_g: f64,
    fat_status: String,
    fiber_g: f64,
    fiber_status: String,
    water_ml: f64,
    water_status: String,
}

/// One food entry in the diary export
#[derive(Debug, serde::Serialize)]
struct FoodDiaryRow {
    id: String,
    date: String,
    logged_at: String,
    meal: String,
    food_id: String,
    quantity: f64,
    calories: f64,
    protein_g: f64,
    carbs_g: f64,
    fat_g: f64,
    fiber_g: f64,
}

fn write_rows<T: serde::Serialize>(path: &Path, rows: &[T]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    Ok(rows.len())
}

/// Export one summary row per day in `from..=to`
///
/// Days with no entries are still exported, with zero totals.
pub fn export_daily_summaries(
    records: &[JournalRecord],
    from: NaiveDate,
    to: NaiveDate,
    offset: &FixedOffset,
    goal: &Goal,
    bands: &ProgressConfig,
    path: &Path,
) -> Result<usize> {
    let entries: Vec<&LogEntry> = records.iter().map(|r| &r.entry).collect();
    let mut rows = Vec::new();

    for date in from.iter_days().take_while(|d| *d <= to) {
        let aggregate = entries_for_day(entries.iter().copied(), date, offset).aggregate();
        let report = progress::evaluate(&aggregate, goal, bands)?;

        rows.push(DaySummaryRow {
            date: date.to_string(),
            calories_consumed: aggregate.calories_consumed,
            calories_burned: aggregate.calories_burned,
            net_calories: aggregate.net_calories(),
            calorie_target: goal.calorie_target,
            calorie_status: report.calories.status.to_string(),
            protein_g: aggregate.protein_g,
            protein_status: report.protein.status.to_string(),
            carbs_g: aggregate.carbs_g,
            carbs_status: report.carbs.status.to_string(),
            fat_g: aggregate.fat_g,
            fat_status: report.fat.status.to_string(),
            fiber_g: aggregate.fiber_g,
            fiber_status: report.fiber.status.to_string(),
            water_ml: aggregate.water_ml,
            water_status: report.water.status.to_string(),
        });
    }

    let count = write_rows(path, &rows)?;
    tracing::info!("Exported {} daily summaries to {:?}", count, path);
    Ok(count)
}

/// Export every food entry dated within `from..=to`, oldest first
pub fn export_food_diary(
    records: &[JournalRecord],
    from: NaiveDate,
    to: NaiveDate,
    offset: &FixedOffset,
    path: &Path,
) -> Result<usize> {
    let mut food: Vec<_> = records
        .iter()
        .filter_map(|r| match &r.entry {
            LogEntry::Food(entry) => Some((r.id, entry)),
            _ => None,
        })
        .filter(|(_, entry)| {
            let date = local_date(entry.timestamp, offset);
            date >= from && date <= to
        })
        .collect();
    food.sort_by_key(|(_, entry)| entry.timestamp);

    let rows: Vec<FoodDiaryRow> = food
        .into_iter()
        .map(|(id, entry)| FoodDiaryRow {
            id: id.to_string(),
            date: local_date(entry.timestamp, offset).to_string(),
            logged_at: entry.timestamp.to_rfc3339(),
            meal: entry.meal.to_string(),
            food_id: entry.food_id.clone(),
            quantity: entry.quantity,
            calories: entry.calories,
            protein_g: entry.protein_g,
            carbs_g: entry.carbs_g,
            fat_g: entry.fat_g,
            fiber_g: entry.fiber_g,
        })
        .collect();

    let count = write_rows(path, &rows)?;
    tracing::info!("Exported {} food entries to {:?}", count, path);
    Ok(count)
}
