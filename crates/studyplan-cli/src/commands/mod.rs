pub mod config;
pub mod plan;
pub mod progress;
pub mod subject;
pub mod task;

use chrono::NaiveDate;
use studyplan_core::date::{parse_date, today_local};
use studyplan_core::ValidationError;

/// Parse an optional `--date`-style argument, defaulting to the local day.
pub(crate) fn date_or_today(value: Option<&str>) -> Result<NaiveDate, ValidationError> {
    value.map_or_else(|| Ok(today_local()), parse_date)
}
