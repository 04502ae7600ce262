//! Error types for the fittrack_core library.

use std::fmt;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for fittrack_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller supplied out-of-domain values
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No profile has been stored yet
    #[error("No profile found; run `fittrack profile set` first")]
    MissingProfile,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Out-of-domain input to one of the pure components
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    Missing(&'static str),

    #[error("`{field}` must be a positive finite number, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("unrecognized {field} `{value}`")]
    UnknownVariant { field: &'static str, value: String },
}

/// Which goal target was clamped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundedTarget {
    Calories,
    Water,
}

impl fmt::Display for BoundedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundedTarget::Calories => f.write_str("calorie target"),
            BoundedTarget::Water => f.write_str("water target"),
        }
    }
}

/// A computed target was raised to its safety floor (non-fatal)
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{target} of {computed:.0} raised to floor of {floor:.0}")]
pub struct GoalBoundsWarning {
    pub target: BoundedTarget,
    pub computed: f64,
    pub floor: f64,
}
