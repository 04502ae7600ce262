#![forbid(unsafe_code)]

//! Core domain model and health-metrics logic for FitTrack.
//!
//! This crate provides:
//! - Domain types (profile, metrics, goals, logged entries)
//! - Profile normalization and health metrics (BMI, BMR, TDEE)
//! - Goal derivation, daily aggregation and progress evaluation
//! - Persistence (entry journal, profile store, CSV export)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod normalizer;
pub mod metrics;
pub mod goals;
pub mod exercise;
pub mod aggregate;
pub mod progress;
pub mod weight;
pub mod journal;
pub mod profile_store;
pub mod export;

// Re-export commonly used types
pub use error::{BoundedTarget, Error, GoalBoundsWarning, Result, ValidationError};
pub use types::*;
pub use config::Config;
pub use normalizer::{normalize, HeightUnit, RawProfile, WeightUnit};
pub use goals::{derive_goal, GoalPlan, MacroSplit};
pub use aggregate::{aggregate, entries_for_day, meal_totals, DayEntries};
pub use progress::evaluate;
pub use weight::{weight_trend, WeightTrend};
pub use journal::{EntrySink, JsonlJournal};
pub use profile_store::ProfileRecord;
