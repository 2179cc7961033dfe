use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::is_weekend;
use crate::error::ValidationError;

/// Daily study-time budget.
///
/// Stored as the `[study]` section of `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_weekday_hours")]
    pub weekday_hours: f64,
    #[serde(default = "default_weekend_hours")]
    pub weekend_hours: f64,
    #[serde(default = "default_max_subjects_per_day")]
    pub max_subjects_per_day: u32,
}

fn default_weekday_hours() -> f64 {
    2.0
}
fn default_weekend_hours() -> f64 {
    5.0
}
fn default_max_subjects_per_day() -> u32 {
    3
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            weekday_hours: default_weekday_hours(),
            weekend_hours: default_weekend_hours(),
            max_subjects_per_day: default_max_subjects_per_day(),
        }
    }
}

impl Settings {
    pub fn new(weekday_hours: f64, weekend_hours: f64, max_subjects_per_day: u32) -> Self {
        Self {
            weekday_hours,
            weekend_hours,
            max_subjects_per_day,
        }
    }

    /// Study minutes available on `date`.
    ///
    /// Non-positive or non-finite hours yield zero capacity.
    pub fn capacity_minutes(&self, date: NaiveDate) -> u32 {
        let hours = if is_weekend(date) {
            self.weekend_hours
        } else {
            self.weekday_hours
        };
        hours_to_minutes(hours)
    }

    /// Reject budgets the caller should never hand to the planner.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_hours("weekday_hours", self.weekday_hours)?;
        check_hours("weekend_hours", self.weekend_hours)?;
        if self.max_subjects_per_day == 0 {
            return Err(ValidationError::InvalidValue {
                field: "max_subjects_per_day".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

fn hours_to_minutes(hours: f64) -> u32 {
    if !hours.is_finite() || hours <= 0.0 {
        return 0;
    }
    (hours * 60.0).round().min(u32::MAX as f64) as u32
}

fn check_hours(field: &str, hours: f64) -> Result<(), ValidationError> {
    if !hours.is_finite() || hours <= 0.0 || hours > 24.0 {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            message: format!("{hours} is not within (0, 24]"),
        });
    }
    Ok(())
}
